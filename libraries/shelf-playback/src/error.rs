//! Error types for playback management

use thiserror::Error;

/// Reason a state-machine action was not applied
///
/// A rejected action leaves the player state untouched. Callers are free to
/// ignore rejections; they exist so tests and diagnostics can tell a refused
/// action apart from one that happened to change nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    /// Index outside the queue
    #[error("Index {index} out of bounds for queue of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Queue is empty
    #[error("Queue is empty")]
    EmptyQueue,

    /// Reorder payload is not a permutation of the current queue
    #[error("New order is not a permutation of the current queue")]
    NotAPermutation,

    /// Volume is NaN or infinite
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Time or duration is NaN or infinite
    #[error("Invalid time: {0}")]
    InvalidTime(f64),
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Seek requested before the media resource reported it was ready
    #[error("Media is not ready")]
    NotReady,

    /// Media backend error
    #[error("Media backend error: {0}")]
    MediaBackend(String),

    /// Preference store error
    #[error("Preference store error: {0}")]
    Preferences(String),

    /// Unknown playback mode name
    #[error("Invalid playback mode: {0}")]
    InvalidMode(String),

    /// Action rejected by the state machine
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
