//! Player session - store and media synchronization wired together
//!
//! Every dispatch and every media event is followed by a reconcile, so the
//! backend always trails the state by at most one event-loop turn.

use crate::action::Action;
use crate::backend::MediaBackend;
use crate::error::{Rejection, Result};
use crate::events::{MediaEvent, Notification};
use crate::preferences::PreferenceStore;
use crate::reorder::reorder_action;
use crate::shortcuts::Shortcut;
use crate::store::{Dispatch, PlayerStore};
use crate::sync::MediaSync;
use crate::types::{PlayerConfig, PlayerState};
use shelf_core::TrackId;
use std::time::Instant;

/// A running player: one state, one media resource
pub struct PlayerSession<B: MediaBackend, P: PreferenceStore> {
    store: PlayerStore<P>,
    sync: MediaSync<B>,
}

impl<B: MediaBackend, P: PreferenceStore> PlayerSession<B, P> {
    /// Create a session, restoring preferences from `preferences`
    pub fn new(backend: B, preferences: P, config: &PlayerConfig) -> Self {
        Self::with_store(backend, PlayerStore::new(preferences, config), config)
    }

    /// Create a session around an existing store
    pub fn with_store(backend: B, store: PlayerStore<P>, config: &PlayerConfig) -> Self {
        let mut sync = MediaSync::new(backend, config);
        sync.reconcile(store.state(), Instant::now());
        Self { store, sync }
    }

    /// Current state
    pub fn state(&self) -> &PlayerState {
        self.store.state()
    }

    /// Player store
    pub fn store(&self) -> &PlayerStore<P> {
        &self.store
    }

    /// Media backend
    pub fn backend(&self) -> &B {
        self.sync.backend()
    }

    /// Media backend (mutable, for platform plumbing)
    pub fn backend_mut(&mut self) -> &mut B {
        self.sync.backend_mut()
    }

    /// Whether the media resource is ready to play / seek
    pub fn is_media_ready(&self) -> bool {
        self.sync.is_ready()
    }

    /// Dispatch an action and bring the backend in line
    pub fn dispatch(&mut self, action: Action) -> std::result::Result<(), Rejection> {
        self.dispatch_at(action, Instant::now())
    }

    /// Dispatch an action as of `now`
    ///
    /// A failure while reconciling schedules its skip relative to `now`.
    pub fn dispatch_at(
        &mut self,
        action: Action,
        now: Instant,
    ) -> std::result::Result<(), Rejection> {
        let result = self.store.dispatch(action);
        self.sync.reconcile(self.store.state(), now);
        result
    }

    /// Feed an event from the media backend
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        self.handle_media_event_at(event, Instant::now());
    }

    /// Feed an event from the media backend at a given instant
    pub fn handle_media_event_at(&mut self, event: MediaEvent, now: Instant) {
        self.sync.handle_event(&mut self.store, event, now);
    }

    /// Seek the current track, in seconds
    pub fn seek(&mut self, time: f64) -> Result<()> {
        self.seek_at(time, Instant::now())
    }

    /// Seek the current track as of `now`
    pub fn seek_at(&mut self, time: f64, now: Instant) -> Result<()> {
        self.sync.seek(&mut self.store, time, now)
    }

    /// Run deferred work (error skip)
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Run deferred work as of `now`
    pub fn tick_at(&mut self, now: Instant) {
        self.sync.tick(&mut self.store, now);
    }

    /// Apply a drag-and-drop result from the queue view
    ///
    /// Returns `None` when the gesture does not translate into a reorder.
    pub fn drop_track(
        &mut self,
        source: TrackId,
        destination: Option<TrackId>,
    ) -> Option<std::result::Result<(), Rejection>> {
        self.drop_track_at(source, destination, Instant::now())
    }

    /// Apply a drag-and-drop result as of `now`
    pub fn drop_track_at(
        &mut self,
        source: TrackId,
        destination: Option<TrackId>,
        now: Instant,
    ) -> Option<std::result::Result<(), Rejection>> {
        let action = reorder_action(self.store.state().queue(), source, destination)?;
        Some(self.dispatch_at(action, now))
    }

    /// Handle a global key press
    ///
    /// Returns `None` for keys without a binding.
    pub fn press_key(&mut self, key: &str) -> Option<std::result::Result<(), Rejection>> {
        self.press_key_at(key, Instant::now())
    }

    /// Handle a global key press as of `now`
    pub fn press_key_at(
        &mut self,
        key: &str,
        now: Instant,
    ) -> Option<std::result::Result<(), Rejection>> {
        let shortcut = Shortcut::from_key(key)?;
        let action = shortcut.action(self.store.state());
        let previous_mode = self.store.state().mode();

        let result = self.dispatch_at(action, now);

        let mode = self.store.state().mode();
        if mode != previous_mode {
            self.sync.notify(Notification::ModeChanged { mode });
        }
        Some(result)
    }

    /// Take notifications for the user
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.sync.drain_notifications()
    }

    /// Consume the session, returning the store
    pub fn into_store(self) -> PlayerStore<P> {
        self.store
    }
}
