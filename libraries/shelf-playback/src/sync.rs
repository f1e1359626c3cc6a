//! Media synchronization
//!
//! Keeps one [`MediaBackend`] consistent with [`PlayerState`] (source,
//! transport, position, volume, mute) and turns the backend's events into
//! state-machine actions.
//!
//! The layer is purely reactive: it runs after every dispatch and every
//! media event, and never blocks. The only deferred work is the skip after a
//! playback error, which fires from [`MediaSync::tick`].

use crate::action::Action;
use crate::backend::MediaBackend;
use crate::error::{PlaybackError, Rejection, Result};
use crate::events::{MediaEvent, Notification};
use crate::store::Dispatch;
use crate::types::{PlaybackMode, PlayerConfig, PlayerState};
use shelf_core::{Track, TrackId};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Skip scheduled after a playback error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSkip {
    track_id: TrackId,
    due: Instant,
}

/// Media synchronization layer
#[derive(Debug)]
pub struct MediaSync<B: MediaBackend> {
    backend: B,

    // Source currently handed to the backend
    loaded_src: Option<String>,
    // Metadata or can-play seen for the loaded source
    ready: bool,
    // What we believe the backend is doing
    backend_playing: bool,
    // Explicit seek waiting for its `Seeked` event
    seeking: bool,
    // The loaded source reported an error
    failed: bool,
    // Play intent was dropped since the failure; the next play reloads
    retry_on_play: bool,

    applied_volume: Option<f32>,
    applied_muted: Option<bool>,

    pending_skip: Option<PendingSkip>,
    error_skip_delay: Duration,
    seek_tolerance: f64,

    notifications: Vec<Notification>,
}

impl<B: MediaBackend> MediaSync<B> {
    /// Wrap a backend
    pub fn new(backend: B, config: &PlayerConfig) -> Self {
        Self {
            backend,
            loaded_src: None,
            ready: false,
            backend_playing: false,
            seeking: false,
            failed: false,
            retry_on_play: false,
            applied_volume: None,
            applied_muted: None,
            pending_skip: None,
            error_skip_delay: Duration::from_millis(config.error_skip_delay_ms),
            seek_tolerance: config.seek_tolerance_secs,
            notifications: Vec::new(),
        }
    }

    /// Media backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Media backend (mutable, for platform plumbing)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether the loaded source has reported ready
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether a skip after an error is waiting to fire
    pub fn has_pending_skip(&self) -> bool {
        self.pending_skip.is_some()
    }

    /// Take queued notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drive the backend towards `state`
    pub fn reconcile(&mut self, state: &PlayerState, now: Instant) {
        if self.applied_volume != Some(state.volume()) {
            self.backend.set_volume(state.volume());
            self.applied_volume = Some(state.volume());
        }
        if self.applied_muted != Some(state.is_muted()) {
            self.backend.set_muted(state.is_muted());
            self.applied_muted = Some(state.is_muted());
        }

        let Some(track) = state.current_track() else {
            if self.backend_playing {
                self.backend.pause();
                self.backend_playing = false;
            }
            return;
        };

        if self.failed && !state.is_playing() {
            self.retry_on_play = true;
        }
        let retry = self.failed && self.retry_on_play && state.is_playing();

        if retry || self.loaded_src.as_deref() != Some(track.audio_url.as_str()) {
            info!(track_id = %track.id, url = %track.audio_url, retry, "Loading track");
            self.loaded_src = Some(track.audio_url.clone());
            self.ready = false;
            self.backend_playing = false;
            self.seeking = false;
            self.failed = false;
            self.retry_on_play = false;
            if let Err(e) = self.backend.load(&track.audio_url) {
                self.fail(track, &e.to_string(), now);
            }
            // Play intent waits for the ready event
            return;
        }

        if !self.ready {
            return;
        }

        // Restart semantics: the state jumped (repeat-one, previous-restart,
        // end of queue) and the backend has to follow
        if !self.seeking {
            let drift = (self.backend.current_time() - state.current_time()).abs();
            if drift > self.seek_tolerance {
                debug!(
                    from = self.backend.current_time(),
                    to = state.current_time(),
                    "Re-seeking media to match player position"
                );
                if let Err(e) = self.backend.seek(state.current_time()) {
                    warn!(error = %e, "Failed to re-seek media");
                }
            }
        }

        if state.is_playing() && !self.backend_playing {
            match self.backend.play() {
                Ok(()) => self.backend_playing = true,
                Err(e) => self.fail(track, &e.to_string(), now),
            }
        } else if !state.is_playing() && self.backend_playing {
            self.backend.pause();
            self.backend_playing = false;
        }
    }

    /// React to an event from the media backend
    pub fn handle_event<D: Dispatch>(&mut self, store: &mut D, event: MediaEvent, now: Instant) {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.ready = true;
                send(store, Action::SetDuration(duration));
            }
            MediaEvent::CanPlay => {
                self.ready = true;
            }
            MediaEvent::TimeUpdate { time } => {
                if !self.seeking {
                    send(store, Action::SetCurrentTime(time));
                }
            }
            MediaEvent::Seeked => {
                self.seeking = false;
                // Follow wherever the media actually landed
                send(store, Action::SetCurrentTime(self.backend.current_time()));
            }
            MediaEvent::Ended => {
                self.backend_playing = false;
                self.handle_ended(store);
            }
            MediaEvent::Error { message } => {
                if let Some(track) = store.state().current_track().cloned() {
                    self.fail(&track, &message, now);
                } else {
                    self.ready = false;
                    self.backend_playing = false;
                }
            }
            MediaEvent::Played => {
                self.backend_playing = true;
                if !store.state().is_playing() {
                    debug!("Media started outside the player, following");
                    send(store, Action::Play);
                }
            }
            MediaEvent::Paused => {
                // Source switches pause the element; that is not a user pause
                if self.ready {
                    self.backend_playing = false;
                    if store.state().is_playing() {
                        debug!("Media paused outside the player, following");
                        send(store, Action::Pause);
                    }
                }
            }
        }

        self.reconcile(store.state(), now);
    }

    fn handle_ended<D: Dispatch>(&mut self, store: &mut D) {
        let state = store.state();
        match state.mode() {
            PlaybackMode::RepeatOne => {
                if let Err(e) = self.backend.seek(0.0) {
                    warn!(error = %e, "Failed to rewind for repeat");
                }
                send(store, Action::SetCurrentTime(0.0));
                send(store, Action::Play);
            }
            PlaybackMode::RepeatAll | PlaybackMode::Shuffle => {
                send(store, Action::NextSong);
            }
            PlaybackMode::Sequential => {
                if state.is_at_last_track() {
                    info!("Reached end of queue");
                    send(store, Action::Pause);
                    send(store, Action::SetCurrentTime(0.0));
                } else {
                    send(store, Action::NextSong);
                }
            }
        }
    }

    /// Seek the current track
    ///
    /// Only allowed once the source is ready. The target is clamped to the
    /// known duration. The position mirror is updated immediately; time
    /// updates are ignored until the backend confirms.
    pub fn seek<D: Dispatch>(&mut self, store: &mut D, time: f64, now: Instant) -> Result<()> {
        if !self.ready {
            return Err(PlaybackError::NotReady);
        }
        if !time.is_finite() {
            return Err(Rejection::InvalidTime(time).into());
        }

        let duration = store.state().duration();
        let time = if duration > 0.0 {
            time.clamp(0.0, duration)
        } else {
            time.max(0.0)
        };

        self.backend.seek(time)?;
        self.seeking = true;
        store.dispatch(Action::SetCurrentTime(time))?;
        self.reconcile(store.state(), now);
        Ok(())
    }

    /// Fire the delayed skip after a playback error, if due
    ///
    /// The skip is dropped if the user already moved to another track.
    pub fn tick<D: Dispatch>(&mut self, store: &mut D, now: Instant) {
        let Some(pending) = self.pending_skip else {
            return;
        };
        if now < pending.due {
            return;
        }
        self.pending_skip = None;

        if store.state().current_track_id() != Some(pending.track_id) {
            debug!(track_id = %pending.track_id, "Track changed since error, skip suppressed");
            return;
        }

        info!(track_id = %pending.track_id, "Skipping failed track");
        send(store, Action::NextSong);

        // A one-track queue lands on the same failing track again
        if store.state().current_track_id() == Some(pending.track_id) {
            send(store, Action::Pause);
        }

        self.reconcile(store.state(), now);
    }

    fn fail(&mut self, track: &Track, message: &str, now: Instant) {
        warn!(track_id = %track.id, title = %track.title, error = message, "Playback failed");
        self.ready = false;
        self.backend_playing = false;
        self.seeking = false;
        self.failed = true;
        self.retry_on_play = false;
        self.notifications.push(Notification::PlaybackFailed {
            track_id: track.id,
            title: track.title.clone(),
            message: message.to_string(),
        });
        self.pending_skip = Some(PendingSkip {
            track_id: track.id,
            due: now + self.error_skip_delay,
        });
    }
}

fn send<D: Dispatch>(store: &mut D, action: Action) {
    let name = action.name();
    if let Err(rejection) = store.dispatch(action) {
        debug!(action = name, reason = %rejection, "Sync action rejected");
    }
}
