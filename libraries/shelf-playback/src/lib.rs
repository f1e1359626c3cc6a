//! Soundshelf - Playback Management
//!
//! Platform-agnostic playback queue and media synchronization for Soundshelf.
//!
//! This crate provides:
//! - Player state machine (queue, current track, transport, volume/mute)
//! - Playback modes (Sequential, Shuffle, Repeat One, Repeat All)
//! - Favorites, keyed by track id
//! - Drag-and-drop queue reordering
//! - Media backend synchronization (load, play/pause, seek, error skip)
//! - Preference persistence (volume, mode, mute, favorites)
//! - Global keyboard shortcuts
//!
//! # Architecture
//!
//! `shelf-playback` has no platform dependencies. The one media resource
//! (an audio element, a platform playback handle) is supplied through the
//! [`MediaBackend`] trait, and preferences through [`PreferenceStore`].
//!
//! State changes only through [`PlayerStore::dispatch`]; [`MediaSync`] is
//! handed the store explicitly and reconciles the backend after each change.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use shelf_core::{Track, TrackId};
//! use shelf_playback::{
//!     Action, MemoryPreferences, PlayerConfig, PlayerSession, SimulatedBackend,
//! };
//!
//! let config = PlayerConfig::default();
//! let mut session = PlayerSession::new(
//!     SimulatedBackend::default(),
//!     MemoryPreferences::new(),
//!     &config,
//! );
//!
//! let tracks = vec![
//!     Track::new(TrackId::new(1), "Intro", "Artist", "https://cdn/1.mp3"),
//!     Track::new(TrackId::new(2), "Outro", "Artist", "https://cdn/2.mp3"),
//! ];
//! session
//!     .dispatch(Action::SetQueue { tracks, play_immediately: true })
//!     .unwrap();
//!
//! // Feed the backend's ready events back in
//! for event in session.backend_mut().take_events() {
//!     session.handle_media_event(event);
//! }
//! assert!(session.backend().is_playing());
//! ```
//!
//! # Example: Modes
//!
//! ```rust
//! use shelf_playback::{Action, Dispatch, MemoryPreferences, PlaybackMode, PlayerConfig, PlayerStore};
//!
//! let mut store = PlayerStore::new(MemoryPreferences::new(), &PlayerConfig::default());
//! store.dispatch(Action::SetMode(PlaybackMode::Shuffle)).unwrap();
//! assert_eq!(store.state().mode(), PlaybackMode::Shuffle);
//! ```

mod action;
mod backend;
mod error;
mod events;
pub mod preferences;
pub mod reducer;
mod reorder;
mod session;
mod shortcuts;
mod shuffle;
mod store;
mod sync;
pub mod types;

// Public exports
pub use action::Action;
pub use backend::{BackendCall, MediaBackend, SimulatedBackend};
pub use error::{PlaybackError, Rejection, Result};
pub use events::{MediaEvent, Notification};
pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore, Preferences};
pub use reorder::{move_item, reorder_action};
pub use session::PlayerSession;
pub use shortcuts::Shortcut;
pub use store::{Dispatch, PlayerStore};
pub use sync::MediaSync;
pub use types::{PlaybackMode, PlayerConfig, PlayerState};
