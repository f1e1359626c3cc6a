//! Core types for playback management

use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};
use shelf_core::{Track, TrackId};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Playback mode
///
/// Governs `NextSong`, `PrevSong` and end-of-track behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Play through the queue in order, stop after the last track
    #[default]
    Sequential,

    /// Random order (queue is a permutation of the original order)
    Shuffle,

    /// Loop current track only
    RepeatOne,

    /// Loop entire queue
    RepeatAll,
}

impl PlaybackMode {
    /// Persisted / display name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Shuffle => "shuffle",
            Self::RepeatOne => "repeat-one",
            Self::RepeatAll => "repeat-all",
        }
    }

    /// Next mode in the keyboard cycle
    ///
    /// repeat-all → repeat-one → shuffle → sequential → repeat-all
    pub fn cycle_next(self) -> Self {
        match self {
            Self::RepeatAll => Self::RepeatOne,
            Self::RepeatOne => Self::Shuffle,
            Self::Shuffle => Self::Sequential,
            Self::Sequential => Self::RepeatAll,
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackMode {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "shuffle" => Ok(Self::Shuffle),
            "repeat-one" => Ok(Self::RepeatOne),
            "repeat-all" => Ok(Self::RepeatAll),
            other => Err(PlaybackError::InvalidMode(other.to_string())),
        }
    }
}

/// Player state
///
/// Single aggregate owned by the state machine. Only [`crate::reducer`]
/// mutates it; everything else reads through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub(crate) queue: Vec<Track>,
    pub(crate) original_queue: Vec<Track>,
    pub(crate) current_index: Option<usize>,
    pub(crate) is_playing: bool,
    pub(crate) current_time: f64,
    pub(crate) duration: f64,
    pub(crate) volume: f32,
    pub(crate) muted_by_user: bool,
    pub(crate) mode: PlaybackMode,
    pub(crate) favorites: BTreeSet<TrackId>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            original_queue: Vec::new(),
            current_index: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted_by_user: false,
            mode: PlaybackMode::Sequential,
            favorites: BTreeSet::new(),
        }
    }
}

impl PlayerState {
    /// Tracks in playback order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Pre-shuffle order
    pub fn original_queue(&self) -> &[Track] {
        &self.original_queue
    }

    /// Index of the current track in [`Self::queue`]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Current track, if one is selected
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// Id of the current track
    pub fn current_track_id(&self) -> Option<TrackId> {
        self.current_track().map(|t| t.id)
    }

    /// Playback intent (not the raw media state)
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position mirror, in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration mirror, in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Volume in `[0, 1]`
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Effective mute: muted by the user, or volume at zero
    pub fn is_muted(&self) -> bool {
        self.muted_by_user || self.volume == 0.0
    }

    /// Whether the user explicitly muted
    pub fn is_muted_by_user(&self) -> bool {
        self.muted_by_user
    }

    /// Playback mode
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Favorite track ids
    pub fn favorites(&self) -> &BTreeSet<TrackId> {
        &self.favorites
    }

    /// Check whether a track is a favorite
    pub fn is_favorite(&self, id: TrackId) -> bool {
        self.favorites.contains(&id)
    }

    /// Whether the current track is the last one in the queue
    pub fn is_at_last_track(&self) -> bool {
        matches!(self.current_index, Some(i) if i + 1 == self.queue.len())
    }

    pub(crate) fn reset_position(&mut self) {
        self.current_time = 0.0;
        self.duration = 0.0;
    }
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Delay before skipping a track that failed to load (default: 1500 ms)
    #[serde(default = "default_error_skip_delay_ms")]
    pub error_skip_delay_ms: u64,

    /// Drift between the position mirror and the media resource that
    /// triggers a re-seek (default: 0.75 s)
    #[serde(default = "default_seek_tolerance_secs")]
    pub seek_tolerance_secs: f64,

    /// Volume used when no preference is stored (default: 1.0)
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

fn default_error_skip_delay_ms() -> u64 {
    1500
}

fn default_seek_tolerance_secs() -> f64 {
    0.75
}

fn default_volume() -> f32 {
    1.0
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            error_skip_delay_ms: default_error_skip_delay_ms(),
            seek_tolerance_secs: default_seek_tolerance_secs(),
            default_volume: default_volume(),
        }
    }
}
