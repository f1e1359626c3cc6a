/// Upload form assembly from local files
use crate::error::Result;
use serde::Serialize;
use shelf_core::{UploadFile, UploadRequest, ValidatedUpload};
use std::path::Path;

/// MIME type reported for a file, by extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("opus") => "audio/opus",
        Some("m4a") => "audio/mp4",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Describe a local file the way an upload form would
pub fn describe_file(path: &Path) -> Result<UploadFile> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(UploadFile {
        name,
        size: metadata.len(),
        content_type: content_type_for(path).to_string(),
    })
}

/// Build an upload request from form fields and optional local files
pub fn build_request(
    title: &str,
    artist: &str,
    audio: Option<&Path>,
    cover: Option<&Path>,
) -> Result<UploadRequest> {
    Ok(UploadRequest {
        title: title.to_string(),
        artist: artist.to_string(),
        audio: audio.map(describe_file).transpose()?,
        cover: cover.map(describe_file).transpose()?,
    })
}

/// Printable summary of a validated upload
#[derive(Debug, Serialize)]
pub struct UploadPlan {
    pub title: String,
    pub artist: String,
    pub audio_key: String,
    pub audio_bytes: u64,
    pub cover_key: Option<String>,
}

impl From<ValidatedUpload> for UploadPlan {
    fn from(upload: ValidatedUpload) -> Self {
        Self {
            title: upload.title,
            artist: upload.artist,
            audio_key: upload.audio_key,
            audio_bytes: upload.audio.size,
            cover_key: upload.cover.map(|(_, key)| key),
        }
    }
}
