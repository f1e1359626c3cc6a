//! Player state machine
//!
//! Every transition validates first and mutates second, so a rejected action
//! never leaves a half-applied state behind.

use crate::action::Action;
use crate::error::Rejection;
use crate::shuffle::{random_index_excluding, shuffle_tracks};
use crate::types::{PlaybackMode, PlayerState};
use rand::Rng;
use shelf_core::{Track, TrackId};

/// Past this position (seconds) `PrevSong` restarts the current track
pub const RESTART_THRESHOLD_SECS: f64 = 3.0;

/// Compute the next state without touching `state`
///
/// Pure apart from the injected random source, which only shuffle mode reads.
pub fn reduce<R: Rng>(
    state: &PlayerState,
    action: Action,
    rng: &mut R,
) -> Result<PlayerState, Rejection> {
    let mut next = state.clone();
    apply(&mut next, action, rng)?;
    Ok(next)
}

/// Apply an action in place
///
/// On `Err` the state is unchanged.
pub fn apply<R: Rng>(state: &mut PlayerState, action: Action, rng: &mut R) -> Result<(), Rejection> {
    match action {
        Action::SetQueue {
            tracks,
            play_immediately,
        } => {
            set_queue(state, tracks, play_immediately);
        }
        Action::ReorderQueue(new_order) => {
            reorder_queue(state, new_order)?;
        }
        Action::PlayIndex(index) => {
            let len = state.queue.len();
            if index >= len {
                return Err(Rejection::IndexOutOfBounds { index, len });
            }
            if state.current_index != Some(index) {
                state.reset_position();
            }
            state.current_index = Some(index);
            state.is_playing = true;
        }
        Action::TogglePlay => match state.current_index {
            Some(_) => state.is_playing = !state.is_playing,
            None => select_first(state)?,
        },
        Action::Play => match state.current_index {
            Some(_) => state.is_playing = true,
            None => select_first(state)?,
        },
        Action::Pause => {
            state.is_playing = false;
        }
        Action::NextSong => {
            next_song(state, rng)?;
        }
        Action::PrevSong => {
            prev_song(state, rng)?;
        }
        Action::SetVolume(volume) => {
            if !volume.is_finite() {
                return Err(Rejection::InvalidVolume(volume));
            }
            state.volume = volume.clamp(0.0, 1.0);
        }
        Action::ToggleMute => {
            state.muted_by_user = !state.muted_by_user;
        }
        Action::SetMode(mode) => {
            set_mode(state, mode, rng);
        }
        Action::SetCurrentTime(time) => {
            state.current_time = non_negative(time)?;
        }
        Action::SetDuration(duration) => {
            state.duration = non_negative(duration)?;
        }
        Action::ToggleFavorite(id) => {
            if !state.favorites.remove(&id) {
                state.favorites.insert(id);
            }
        }
    }

    Ok(())
}

fn non_negative(value: f64) -> Result<f64, Rejection> {
    if value.is_finite() {
        Ok(value.max(0.0))
    } else {
        Err(Rejection::InvalidTime(value))
    }
}

/// Select index 0 and start playing (nothing was selected)
fn select_first(state: &mut PlayerState) -> Result<(), Rejection> {
    if state.queue.is_empty() {
        return Err(Rejection::EmptyQueue);
    }
    state.current_index = Some(0);
    state.is_playing = true;
    state.reset_position();
    Ok(())
}

fn set_queue(state: &mut PlayerState, tracks: Vec<Track>, play_immediately: bool) {
    let previous_id = state.current_track_id();
    let index = resolve_index(&tracks, previous_id);
    let resolved_id = index.map(|i| tracks[i].id);

    state.original_queue.clone_from(&tracks);
    state.queue = tracks;
    state.current_index = index;

    if resolved_id != previous_id || play_immediately {
        state.reset_position();
    }
    state.is_playing = index.is_some() && (play_immediately || state.is_playing);
}

fn reorder_queue(state: &mut PlayerState, new_order: Vec<Track>) -> Result<(), Rejection> {
    if !is_permutation(&state.queue, &new_order) {
        return Err(Rejection::NotAPermutation);
    }

    let previous_id = state.current_track_id();
    state.current_index = previous_id.and_then(|id| new_order.iter().position(|t| t.id == id));

    // In shuffle the pre-shuffle order must survive for the way back
    if state.mode != PlaybackMode::Shuffle {
        state.original_queue.clone_from(&new_order);
    }
    state.queue = new_order;
    Ok(())
}

fn next_song<R: Rng>(state: &mut PlayerState, rng: &mut R) -> Result<(), Rejection> {
    let len = state.queue.len();
    if len == 0 {
        return Err(Rejection::EmptyQueue);
    }

    match (state.mode, state.current_index) {
        (PlaybackMode::RepeatOne, Some(_)) => {
            // Restart; re-seeking the media is the sync layer's job
            state.current_time = 0.0;
        }
        (PlaybackMode::RepeatOne, None) => {
            state.current_index = Some(0);
            state.reset_position();
        }
        (PlaybackMode::Shuffle, current) => {
            state.current_index = Some(random_index_excluding(len, current, rng));
            state.reset_position();
        }
        (PlaybackMode::Sequential | PlaybackMode::RepeatAll, current) => {
            state.current_index = Some(current.map_or(0, |i| (i + 1) % len));
            state.reset_position();
        }
    }

    state.is_playing = true;
    Ok(())
}

fn prev_song<R: Rng>(state: &mut PlayerState, rng: &mut R) -> Result<(), Rejection> {
    let len = state.queue.len();
    if len == 0 {
        return Err(Rejection::EmptyQueue);
    }

    let restart = state.current_index.is_some()
        && state.mode != PlaybackMode::Shuffle
        && state.current_time > RESTART_THRESHOLD_SECS;

    if restart {
        state.current_time = 0.0;
    } else {
        let index = match state.mode {
            PlaybackMode::Shuffle => random_index_excluding(len, state.current_index, rng),
            _ => state.current_index.map_or(len - 1, |i| (i + len - 1) % len),
        };
        state.current_index = Some(index);
        state.reset_position();
    }

    state.is_playing = true;
    Ok(())
}

fn set_mode<R: Rng>(state: &mut PlayerState, mode: PlaybackMode, rng: &mut R) {
    let entering = mode == PlaybackMode::Shuffle && state.mode != PlaybackMode::Shuffle;
    let leaving = mode != PlaybackMode::Shuffle && state.mode == PlaybackMode::Shuffle;

    if entering || leaving {
        let previous_id = state.current_track_id();
        let mut queue = state.original_queue.clone();
        if entering {
            shuffle_tracks(&mut queue, rng);
        }

        let index = resolve_index(&queue, previous_id);
        let resolved_id = index.map(|i| queue[i].id);
        state.queue = queue;
        state.current_index = index;

        if resolved_id != previous_id {
            state.reset_position();
        }
        if index.is_none() {
            state.is_playing = false;
        }
    }

    state.mode = mode;
}

/// Position of `id` in `tracks`, else 0 for a non-empty list
fn resolve_index(tracks: &[Track], id: Option<TrackId>) -> Option<usize> {
    id.and_then(|id| tracks.iter().position(|t| t.id == id))
        .or_else(|| (!tracks.is_empty()).then_some(0))
}

/// Same ids with the same multiplicities
fn is_permutation(current: &[Track], candidate: &[Track]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let mut a: Vec<TrackId> = current.iter().map(|t| t.id).collect();
    let mut b: Vec<TrackId> = candidate.iter().map(|t| t.id).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
