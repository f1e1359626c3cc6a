//! Soundshelf Core
//!
//! Platform-agnostic core types and error handling for Soundshelf.
//!
//! This crate provides the building blocks shared by the playback engine and
//! the command-line driver.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`
//! - **Library Search**: case-insensitive title/artist filtering
//! - **Upload Validation**: required fields, size limits, storage-safe file names
//! - **Error Handling**: Unified `ShelfError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use shelf_core::{library::filter_tracks, Track, TrackId};
//!
//! let tracks = vec![
//!     Track::new(TrackId::new(1), "Blue Monday", "New Order", "https://cdn/a.mp3"),
//!     Track::new(TrackId::new(2), "Heroes", "David Bowie", "https://cdn/b.mp3"),
//! ];
//!
//! let hits = filter_tracks(&tracks, "bowie");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].title, "Heroes");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod library;
pub mod types;
pub mod upload;

// Re-export commonly used types
pub use error::{Result, ShelfError};
pub use types::{Track, TrackId};
pub use upload::{UploadFile, UploadLimits, UploadRequest, ValidatedUpload};
