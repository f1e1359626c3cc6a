//! Soundshelf command-line driver
//!
//! Library search, upload validation, and scripted playback sessions over
//! the simulated media backend.
//!
//! This library exposes the driver's pieces for testing purposes.

pub mod config;
pub mod error;
pub mod script;
pub mod upload;

pub use config::AppConfig;
pub use error::{CliError, Result};
pub use script::{ScriptRunner, Step};
