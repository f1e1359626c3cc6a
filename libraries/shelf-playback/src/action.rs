//! State-machine actions

use crate::types::PlaybackMode;
use shelf_core::{Track, TrackId};

/// Discrete input to the player state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the queue, keeping the current track if it is still present
    SetQueue {
        tracks: Vec<Track>,
        play_immediately: bool,
    },

    /// Replace the queue with a permutation of itself
    ReorderQueue(Vec<Track>),

    /// Play the track at an index
    PlayIndex(usize),

    TogglePlay,
    Play,
    Pause,
    NextSong,
    PrevSong,

    /// Set volume (clamped to `[0, 1]`)
    SetVolume(f32),

    ToggleMute,
    SetMode(PlaybackMode),

    /// Mirror the media position, in seconds
    SetCurrentTime(f64),

    /// Mirror the media duration, in seconds
    SetDuration(f64),

    ToggleFavorite(TrackId),
}

impl Action {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetQueue { .. } => "SetQueue",
            Self::ReorderQueue(_) => "ReorderQueue",
            Self::PlayIndex(_) => "PlayIndex",
            Self::TogglePlay => "TogglePlay",
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::NextSong => "NextSong",
            Self::PrevSong => "PrevSong",
            Self::SetVolume(_) => "SetVolume",
            Self::ToggleMute => "ToggleMute",
            Self::SetMode(_) => "SetMode",
            Self::SetCurrentTime(_) => "SetCurrentTime",
            Self::SetDuration(_) => "SetDuration",
            Self::ToggleFavorite(_) => "ToggleFavorite",
        }
    }
}
