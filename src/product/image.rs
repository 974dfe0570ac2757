//! Product image references and ingestion.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "avif"];

/// Where an image lives: a remote URL or an uploaded local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "lowercase")]
pub enum ImageRef {
    Url(String),
    File(PathBuf),
}

impl ImageRef {
    /// Accept an `http(s)` URL as-is, or a local image file (stored canonicalized).
    pub fn ingest(source: &str) -> Result<Self, ApiError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ApiError::ValidationError(
                "Image source cannot be empty".to_string(),
            ));
        }
        if source.starts_with("http://") || source.starts_with("https://") {
            return Self::from_url(source);
        }
        Self::from_file(Path::new(source))
    }

    fn from_url(url: &str) -> Result<Self, ApiError> {
        let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or_default();
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() || url.chars().any(char::is_whitespace) {
            return Err(ApiError::ValidationError(format!(
                "Invalid image URL: {}",
                url
            )));
        }
        Ok(ImageRef::Url(url.to_string()))
    }

    fn from_file(path: &Path) -> Result<Self, ApiError> {
        let extension_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !extension_ok {
            return Err(ApiError::ValidationError(format!(
                "Unsupported image file type: {} (expected one of {})",
                path.display(),
                IMAGE_EXTENSIONS.join(", ")
            )));
        }
        if !path.is_file() {
            return Err(ApiError::NotFound(format!(
                "Image file not found: {}",
                path.display()
            )));
        }
        let canonical = path.canonicalize().map_err(|e| {
            ApiError::ValidationError(format!(
                "Failed to resolve image path {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(ImageRef::File(canonical))
    }

    pub fn display_source(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::File(path) => path.display().to_string(),
        }
    }
}
