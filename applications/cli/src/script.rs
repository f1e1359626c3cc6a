//! Scripted player sessions
//!
//! Drives a [`PlayerSession`] over the simulated backend from a list of
//! steps such as `play`, `next`, `advance:30`, `key:s` or `move:3:1`.
//! Backend events are delivered after every step and time only moves when
//! a step says so, which keeps runs reproducible.

use crate::error::{CliError, Result};
use shelf_core::TrackId;
use shelf_playback::{
    Action, Notification, PlaybackError, PlaybackMode, PlayerSession, PreferenceStore,
    SimulatedBackend,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One scripted user or platform interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Play,
    Pause,
    Toggle,
    Next,
    Prev,
    Index(usize),
    Volume(f32),
    Mute,
    Mode(PlaybackMode),
    Favorite(TrackId),
    Seek(f64),
    /// Let the media clock run
    Advance(Duration),
    /// Let wall-clock time pass without playback, in milliseconds
    Wait(u64),
    Key(String),
    /// Drag the first track onto the second
    Move(TrackId, TrackId),
    ExternalPlay,
    ExternalPause,
}

impl Step {
    /// Parse a single step
    pub fn parse(step: &str) -> Result<Self> {
        let (name, arg) = match step.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (step, None),
        };

        let parsed = match (name, arg) {
            ("play", None) => Self::Play,
            ("pause", None) => Self::Pause,
            ("toggle", None) => Self::Toggle,
            ("next", None) => Self::Next,
            ("prev", None) => Self::Prev,
            ("mute", None) => Self::Mute,
            ("external-play", None) => Self::ExternalPlay,
            ("external-pause", None) => Self::ExternalPause,
            ("index", Some(arg)) => Self::Index(number(step, arg)?),
            ("volume", Some(arg)) => Self::Volume(number(step, arg)?),
            ("seek", Some(arg)) => Self::Seek(number(step, arg)?),
            ("advance", Some(arg)) => {
                let seconds: f64 = number(step, arg)?;
                let duration = Duration::try_from_secs_f64(seconds)
                    .map_err(|_| CliError::script(step, "expected a non-negative duration"))?;
                Self::Advance(duration)
            }
            ("wait", Some(arg)) => Self::Wait(number(step, arg)?),
            ("favorite", Some(arg)) => Self::Favorite(TrackId::new(number(step, arg)?)),
            ("mode", Some(arg)) => Self::Mode(
                arg.parse()
                    .map_err(|e: PlaybackError| CliError::script(step, e.to_string()))?,
            ),
            ("key", Some(arg)) => Self::Key(if arg.is_empty() { " " } else { arg }.to_string()),
            ("move", Some(arg)) => {
                let (source, destination) = arg
                    .split_once(':')
                    .ok_or_else(|| CliError::script(step, "expected move:<id>:<id>"))?;
                Self::Move(
                    TrackId::new(number(step, source)?),
                    TrackId::new(number(step, destination)?),
                )
            }
            _ => return Err(CliError::script(step, "unknown step")),
        };
        Ok(parsed)
    }

    /// Parse a comma-separated script
    pub fn parse_script(script: &str) -> Result<Vec<Self>> {
        script
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}

fn number<T: std::str::FromStr>(step: &str, arg: &str) -> Result<T> {
    arg.trim()
        .parse()
        .map_err(|_| CliError::script(step, format!("'{}' is not a valid number", arg)))
}

/// Runs steps against a session on a virtual clock
pub struct ScriptRunner<P: PreferenceStore> {
    session: PlayerSession<SimulatedBackend, P>,
    now: Instant,
    notifications: Vec<Notification>,
}

impl<P: PreferenceStore> ScriptRunner<P> {
    pub fn new(session: PlayerSession<SimulatedBackend, P>) -> Self {
        Self {
            session,
            now: Instant::now(),
            notifications: Vec::new(),
        }
    }

    pub fn session(&self) -> &PlayerSession<SimulatedBackend, P> {
        &self.session
    }

    /// Notifications collected so far
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    fn elapse(&mut self, duration: Duration) {
        match self.now.checked_add(duration) {
            Some(now) => self.now = now,
            None => warn!(?duration, "Virtual clock overflow, time not advanced"),
        }
    }

    /// Deliver queued backend events and run deferred work
    pub fn pump(&mut self) {
        loop {
            self.session.tick_at(self.now);
            let events = self.session.backend_mut().take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                debug!(?event, "Media event");
                self.session.handle_media_event_at(event, self.now);
            }
        }
        self.notifications.extend(self.session.drain_notifications());
    }

    /// Run one step
    ///
    /// Rejected actions are logged and skipped, the same way an interactive
    /// player ignores a button that does nothing.
    pub fn run(&mut self, step: &Step) {
        let now = self.now;
        let result = match step {
            Step::Play => self.session.dispatch_at(Action::Play, now),
            Step::Pause => self.session.dispatch_at(Action::Pause, now),
            Step::Toggle => self.session.dispatch_at(Action::TogglePlay, now),
            Step::Next => self.session.dispatch_at(Action::NextSong, now),
            Step::Prev => self.session.dispatch_at(Action::PrevSong, now),
            Step::Index(index) => self.session.dispatch_at(Action::PlayIndex(*index), now),
            Step::Volume(volume) => self.session.dispatch_at(Action::SetVolume(*volume), now),
            Step::Mute => self.session.dispatch_at(Action::ToggleMute, now),
            Step::Mode(mode) => self.session.dispatch_at(Action::SetMode(*mode), now),
            Step::Favorite(id) => self.session.dispatch_at(Action::ToggleFavorite(*id), now),
            Step::Seek(time) => {
                if let Err(e) = self.session.seek_at(*time, now) {
                    warn!(error = %e, "Seek failed");
                }
                Ok(())
            }
            Step::Advance(duration) => {
                self.session.backend_mut().advance(duration.as_secs_f64());
                self.elapse(*duration);
                Ok(())
            }
            Step::Wait(millis) => {
                self.elapse(Duration::from_millis(*millis));
                Ok(())
            }
            Step::Key(key) => self.session.press_key_at(key, now).unwrap_or_else(|| {
                warn!(key = %key, "No shortcut bound to key");
                Ok(())
            }),
            Step::Move(source, destination) => self
                .session
                .drop_track_at(*source, Some(*destination), now)
                .unwrap_or(Ok(())),
            Step::ExternalPlay => {
                self.session.backend_mut().external_play();
                Ok(())
            }
            Step::ExternalPause => {
                self.session.backend_mut().external_pause();
                Ok(())
            }
        };

        if let Err(rejection) = result {
            warn!(?step, reason = %rejection, "Step rejected");
        }
        self.pump();
    }

    /// Run every step in order
    pub fn run_all(&mut self, steps: &[Step]) {
        for step in steps {
            self.run(step);
        }
    }

    pub fn into_session(self) -> PlayerSession<SimulatedBackend, P> {
        self.session
    }
}
