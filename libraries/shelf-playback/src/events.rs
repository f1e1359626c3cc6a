//! Playback Events
//!
//! Events flowing in from the media resource, and user-facing notifications
//! flowing out to the presentation layer.

use crate::types::PlaybackMode;
use serde::{Deserialize, Serialize};
use shelf_core::TrackId;
use std::fmt;

/// Events emitted by the media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum MediaEvent {
    /// Metadata loaded; the resource is ready
    LoadedMetadata {
        /// Track duration in seconds
        duration: f64,
    },

    /// Enough data buffered to start playing
    CanPlay,

    /// Periodic position report
    TimeUpdate {
        /// Current position in seconds
        time: f64,
    },

    /// A seek finished
    Seeked,

    /// Reached end of track
    Ended,

    /// Failed to load or play
    Error {
        /// Backend error description
        message: String,
    },

    /// Playback started (possibly outside our control, e.g. media keys)
    Played,

    /// Playback paused (possibly outside our control, e.g. media keys)
    Paused,
}

/// User-visible notification, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// A track failed and will be skipped
    PlaybackFailed {
        track_id: TrackId,
        title: String,
        message: String,
    },

    /// Playback mode changed from a keyboard shortcut
    ModeChanged { mode: PlaybackMode },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaybackFailed { title, message, .. } => {
                write!(f, "Could not play \"{}\": {}", title, message)
            }
            Self::ModeChanged { mode } => write!(f, "Mode: {}", mode),
        }
    }
}
