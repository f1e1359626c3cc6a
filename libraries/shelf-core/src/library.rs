//! Library search
//!
//! Filters the library view by a free-text query.

use crate::types::Track;

/// Filter tracks whose title or artist contains `query` (case-insensitive)
///
/// Library order is preserved. A blank query returns every track.
pub fn filter_tracks<'a>(tracks: &'a [Track], query: &str) -> Vec<&'a Track> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tracks.iter().collect();
    }

    tracks
        .iter()
        .filter(|track| track.matches_lowercase(&needle))
        .collect()
}
