//! Platform-agnostic media backend trait
//!
//! Abstracts the single playable media resource (a browser audio element, a
//! platform playback handle, ...).

use crate::error::{PlaybackError, Result};
use crate::events::MediaEvent;
use std::collections::{HashMap, HashSet};

/// Platform-agnostic media resource
///
/// Implementors load one source at a time and report progress back as
/// [`MediaEvent`]s, which the platform feeds into
/// [`crate::PlayerSession::handle_media_event`].
pub trait MediaBackend {
    /// Start loading a new source
    ///
    /// The resource is not ready until `LoadedMetadata` or `CanPlay` arrives.
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Move to a position, in seconds
    fn seek(&mut self, time: f64) -> Result<()>;

    /// Set output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f32);

    /// Set the mute flag
    fn set_muted(&mut self, muted: bool);

    /// Current position, in seconds
    fn current_time(&self) -> f64;
}

/// Calls recorded by [`SimulatedBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    SetMuted(bool),
}

/// In-process media resource that plays silence on a virtual clock
///
/// Used by the command-line driver and by tests. Loading queues
/// `LoadedMetadata` + `CanPlay` (or `Error` for URLs marked broken);
/// [`SimulatedBackend::advance`] moves the clock and queues `TimeUpdate` /
/// `Ended`. Calls made by the player do not echo `Played`/`Paused`; use
/// [`SimulatedBackend::external_play`] and [`SimulatedBackend::external_pause`]
/// to simulate media keys.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    src: Option<String>,
    position: f64,
    playing: bool,
    volume: f32,
    muted: bool,
    default_duration: f64,
    durations: HashMap<String, f64>,
    broken: HashSet<String>,
    pending: Vec<MediaEvent>,
    calls: Vec<BackendCall>,
}

impl SimulatedBackend {
    /// Create a backend where every source lasts `default_duration` seconds
    pub fn new(default_duration: f64) -> Self {
        Self {
            src: None,
            position: 0.0,
            playing: false,
            volume: 1.0,
            muted: false,
            default_duration,
            durations: HashMap::new(),
            broken: HashSet::new(),
            pending: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Give a specific source its own duration
    pub fn set_duration(&mut self, url: impl Into<String>, seconds: f64) {
        self.durations.insert(url.into(), seconds);
    }

    /// Make loads of `url` fail
    pub fn mark_broken(&mut self, url: impl Into<String>) {
        self.broken.insert(url.into());
    }

    fn source_duration(&self) -> f64 {
        self.src
            .as_ref()
            .and_then(|src| self.durations.get(src))
            .copied()
            .unwrap_or(self.default_duration)
    }

    /// Advance the virtual clock by `seconds` while playing
    pub fn advance(&mut self, seconds: f64) {
        if !self.playing {
            return;
        }

        let duration = self.source_duration();
        self.position += seconds;
        if self.position >= duration {
            self.position = duration;
            self.playing = false;
            self.pending.push(MediaEvent::TimeUpdate { time: duration });
            self.pending.push(MediaEvent::Ended);
        } else {
            self.pending.push(MediaEvent::TimeUpdate {
                time: self.position,
            });
        }
    }

    /// Simulate playback started outside the player (e.g. a media key)
    pub fn external_play(&mut self) {
        if self.src.is_some() && !self.playing {
            self.playing = true;
            self.pending.push(MediaEvent::Played);
        }
    }

    /// Simulate playback paused outside the player (e.g. a media key)
    pub fn external_pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.pending.push(MediaEvent::Paused);
        }
    }

    /// Take queued events
    pub fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Take recorded calls
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Loaded source
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    /// Whether the resource is producing sound (ignoring volume)
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Output volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mute flag
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(180.0)
    }
}

impl MediaBackend for SimulatedBackend {
    fn load(&mut self, url: &str) -> Result<()> {
        self.calls.push(BackendCall::Load(url.to_string()));
        self.src = Some(url.to_string());
        self.position = 0.0;
        self.playing = false;

        if self.broken.contains(url) {
            self.pending.push(MediaEvent::Error {
                message: format!("Failed to load {}", url),
            });
        } else {
            self.pending.push(MediaEvent::LoadedMetadata {
                duration: self.source_duration(),
            });
            self.pending.push(MediaEvent::CanPlay);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.push(BackendCall::Play);
        if self.src.is_none() {
            return Err(PlaybackError::MediaBackend("No source loaded".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(BackendCall::Pause);
        self.playing = false;
    }

    fn seek(&mut self, time: f64) -> Result<()> {
        self.calls.push(BackendCall::Seek(time));
        if self.src.is_none() {
            return Err(PlaybackError::MediaBackend("No source loaded".to_string()));
        }
        self.position = time.clamp(0.0, self.source_duration());
        self.pending.push(MediaEvent::Seeked);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(BackendCall::SetVolume(volume));
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(BackendCall::SetMuted(muted));
        self.muted = muted;
    }

    fn current_time(&self) -> f64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_queues_ready_events() {
        let mut backend = SimulatedBackend::new(60.0);
        backend.load("a.mp3").unwrap();
        assert_eq!(
            backend.take_events(),
            vec![MediaEvent::LoadedMetadata { duration: 60.0 }, MediaEvent::CanPlay]
        );
    }

    #[test]
    fn broken_source_reports_error() {
        let mut backend = SimulatedBackend::default();
        backend.mark_broken("bad.mp3");
        backend.load("bad.mp3").unwrap();
        assert!(matches!(
            backend.take_events().as_slice(),
            [MediaEvent::Error { .. }]
        ));
    }

    #[test]
    fn advance_reaches_end() {
        let mut backend = SimulatedBackend::new(10.0);
        backend.load("a.mp3").unwrap();
        backend.take_events();
        backend.play().unwrap();

        backend.advance(4.0);
        assert_eq!(backend.take_events(), vec![MediaEvent::TimeUpdate { time: 4.0 }]);

        backend.advance(7.0);
        assert_eq!(
            backend.take_events(),
            vec![MediaEvent::TimeUpdate { time: 10.0 }, MediaEvent::Ended]
        );
        assert!(!backend.is_playing());
    }

    #[test]
    fn advance_while_paused_does_nothing() {
        let mut backend = SimulatedBackend::new(10.0);
        backend.load("a.mp3").unwrap();
        backend.take_events();
        backend.advance(3.0);
        assert!(backend.take_events().is_empty());
        assert_eq!(backend.current_time(), 0.0);
    }

    #[test]
    fn play_without_source_fails() {
        let mut backend = SimulatedBackend::default();
        assert!(backend.play().is_err());
    }

    #[test]
    fn per_source_duration() {
        let mut backend = SimulatedBackend::new(100.0);
        backend.set_duration("short.mp3", 5.0);
        backend.load("short.mp3").unwrap();
        assert_eq!(
            backend.take_events()[0],
            MediaEvent::LoadedMetadata { duration: 5.0 }
        );
    }
}
