//! Shuffle helpers
//!
//! Unbiased (Fisher-Yates) queue permutation and random track picks.

use rand::seq::SliceRandom;
use rand::Rng;
use shelf_core::Track;

/// Shuffle tracks in place
///
/// Each permutation is equally likely.
pub fn shuffle_tracks<R: Rng>(tracks: &mut [Track], rng: &mut R) {
    tracks.shuffle(rng);
}

/// Pick a uniformly random index in `0..len`, avoiding `exclude`
///
/// With a single track (or none) the answer is always 0.
pub fn random_index_excluding<R: Rng>(len: usize, exclude: Option<usize>, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }

    match exclude {
        Some(current) if current < len => {
            // Draw from len - 1 slots and step over the excluded one
            let pick = rng.gen_range(0..len - 1);
            if pick >= current {
                pick + 1
            } else {
                pick
            }
        }
        _ => rng.gen_range(0..len),
    }
}
