//! Player store - the single writer of [`PlayerState`]
//!
//! Owns the state, the random source used by shuffle, and the preference
//! store. Preferences are restored once on construction and written back
//! whenever a persisted field changes.

use crate::action::Action;
use crate::error::Rejection;
use crate::preferences::{PreferenceStore, Preferences};
use crate::reducer::apply;
use crate::types::{PlayerConfig, PlayerState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Read access to the player state plus the ability to dispatch actions
///
/// The synchronization layer is handed one of these explicitly instead of
/// looking the player up from ambient context.
pub trait Dispatch {
    /// Current state
    fn state(&self) -> &PlayerState;

    /// Run an action through the state machine
    fn dispatch(&mut self, action: Action) -> Result<(), Rejection>;
}

/// Player state container
pub struct PlayerStore<P: PreferenceStore> {
    state: PlayerState,
    preferences: P,
    saved: Preferences,
    rng: StdRng,
}

impl<P: PreferenceStore> PlayerStore<P> {
    /// Create a store, restoring preferences from `preferences`
    pub fn new(preferences: P, config: &PlayerConfig) -> Self {
        Self::with_rng(preferences, config, StdRng::from_entropy())
    }

    /// Create a store with a specific random source (deterministic shuffle)
    pub fn with_rng(preferences: P, config: &PlayerConfig, rng: StdRng) -> Self {
        let defaults = Preferences {
            volume: config.default_volume.clamp(0.0, 1.0),
            ..Preferences::default()
        };
        let saved = Preferences::load(&preferences, defaults);

        debug!(
            volume = saved.volume,
            mode = %saved.mode,
            muted = saved.muted,
            favorites = saved.favorites.len(),
            "Restored player preferences"
        );

        Self {
            state: saved.clone().into_state(),
            preferences,
            saved,
            rng,
        }
    }

    /// Preference store
    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Consume the store, returning the preference store
    pub fn into_preferences(self) -> P {
        self.preferences
    }

    fn persist(&mut self) {
        let current = Preferences::from_state(&self.state);
        if current == self.saved {
            return;
        }

        match current.save(&mut self.preferences) {
            Ok(()) => self.saved = current,
            Err(e) => warn!(error = %e, "Failed to persist player preferences"),
        }
    }
}

impl<P: PreferenceStore> Dispatch for PlayerStore<P> {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) -> Result<(), Rejection> {
        let name = action.name();
        let previous_track = self.state.current_track_id();
        let previous_mode = self.state.mode;

        if let Err(rejection) = apply(&mut self.state, action, &mut self.rng) {
            debug!(action = name, reason = %rejection, "Action rejected");
            return Err(rejection);
        }

        if self.state.current_track_id() != previous_track {
            if let Some(track) = self.state.current_track() {
                info!(action = name, track_id = %track.id, title = %track.title, "Current track changed");
            }
        }
        if self.state.mode != previous_mode {
            info!(from = %previous_mode, to = %self.state.mode, "Playback mode changed");
        }

        self.persist();
        Ok(())
    }
}
