//! Upload validation
//!
//! Checks an upload request before any storage I/O happens: required fields,
//! file size limits, and storage-safe object names. Storing the files and
//! inserting the library row is the hosted backend's job.

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default upload limit: 20 MiB per file
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Size limits applied to uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Maximum size of the audio file and of the cover image, in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// A file attached to an upload form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// Client-side file name
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// MIME type reported by the client
    pub content_type: String,
}

/// Raw upload form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub title: String,
    pub artist: String,
    pub audio: Option<UploadFile>,
    pub cover: Option<UploadFile>,
}

/// An upload that passed validation
///
/// Title and artist are trimmed; each file carries the object name it should
/// be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub title: String,
    pub artist: String,
    pub audio: UploadFile,
    pub audio_key: String,
    pub cover: Option<(UploadFile, String)>,
}

impl UploadRequest {
    /// Validate the request against `limits`
    ///
    /// A zero-byte cover counts as no cover.
    pub fn validate(self, limits: &UploadLimits) -> Result<ValidatedUpload> {
        let title = self.title.trim().to_string();
        let artist = self.artist.trim().to_string();

        if title.is_empty() {
            return Err(ShelfError::MissingField("title"));
        }
        if artist.is_empty() {
            return Err(ShelfError::MissingField("artist"));
        }
        let audio = self.audio.ok_or(ShelfError::MissingField("audio"))?;

        check_size("Audio", &audio, limits)?;

        let cover = match self.cover {
            Some(cover) if cover.size > 0 => {
                check_size("Cover image", &cover, limits)?;
                let key = storage_key(&cover.name);
                Some((cover, key))
            }
            _ => None,
        };

        let audio_key = storage_key(&audio.name);

        Ok(ValidatedUpload {
            title,
            artist,
            audio,
            audio_key,
            cover,
        })
    }
}

fn check_size(kind: &'static str, file: &UploadFile, limits: &UploadLimits) -> Result<()> {
    if file.size > limits.max_file_bytes {
        return Err(ShelfError::FileTooLarge {
            kind,
            size: file.size,
            limit: limits.max_file_bytes,
        });
    }
    Ok(())
}

/// Make a client file name safe for object storage
///
/// The stem is lower-cased and every character outside `[a-z0-9_-]` becomes
/// `-`. The last extension is kept, lower-cased, with non-alphanumerics
/// dropped. A name without a dot gets no extension.
pub fn sanitize_file_name(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    match extension {
        Some(ext) => {
            let ext: String = ext
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            format!("{stem}.{ext}")
        }
        None => stem,
    }
}

/// Object name for a stored file: a random UUID prefix plus the sanitized name
pub fn storage_key(name: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_file_name(name))
}
