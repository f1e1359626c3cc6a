/// Track domain type
use super::TrackId;
use serde::{Deserialize, Serialize};

/// A playable track from the library
///
/// Immutable once loaded into a queue; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Library row id
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Duration in seconds, if known before playback
    #[serde(default)]
    pub duration: Option<f64>,

    /// Public URL of the cover image
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Public URL of the audio file
    pub audio_url: String,
}

impl Track {
    /// Create a track with no duration or cover
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            duration: None,
            cover_url: None,
            audio_url: audio_url.into(),
        }
    }

    /// Set the known duration (builder style)
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Set the cover image URL (builder style)
    #[must_use]
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    /// Case-insensitive substring match on title or artist
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.artist.to_lowercase().contains(needle)
    }

    /// Case-insensitive substring match on title or artist
    pub fn matches(&self, query: &str) -> bool {
        self.matches_lowercase(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_library_row() {
        let json = r#"{
            "id": 3,
            "title": "Windowlicker",
            "artist": "Aphex Twin",
            "duration": null,
            "cover_url": "https://cdn/covers/w.jpg",
            "audio_url": "https://cdn/audio/w.mp3"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, TrackId::new(3));
        assert_eq!(track.duration, None);
        assert_eq!(track.cover_url.as_deref(), Some("https://cdn/covers/w.jpg"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{"id": 1, "title": "A", "artist": "B", "audio_url": "u"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.duration.is_none());
        assert!(track.cover_url.is_none());
    }

    #[test]
    fn matches_title_or_artist_ignoring_case() {
        let track = Track::new(TrackId::new(1), "Teardrop", "Massive Attack", "u");
        assert!(track.matches("TEAR"));
        assert!(track.matches("attack"));
        assert!(!track.matches("portishead"));
    }
}
