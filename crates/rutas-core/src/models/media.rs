use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Media category enum
///
/// Only images and videos can be attached to activities and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
}

impl MediaCategory {
    /// Classify a declared MIME type by its top-level type.
    ///
    /// Returns `None` for anything that is not `image/*` or `video/*`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let normalized = content_type.trim().to_lowercase();
        let top_level = normalized.split('/').next().unwrap_or_default();
        match top_level {
            "image" => Some(MediaCategory::Image),
            "video" => Some(MediaCategory::Video),
            _ => None,
        }
    }

    /// Multipart field name used by the backend for staged files.
    pub fn wire_field(&self) -> &'static str {
        match self {
            MediaCategory::Image => super::payload::IMAGES,
            MediaCategory::Video => super::payload::VIDEOS,
        }
    }
}

impl FromStr for MediaCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(MediaCategory::Image),
            "video" | "videos" => Ok(MediaCategory::Video),
            _ => Err(anyhow::anyhow!("Invalid media category: {}", s)),
        }
    }
}

impl Display for MediaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaCategory::Image => write!(f, "image"),
            MediaCategory::Video => write!(f, "video"),
        }
    }
}

/// Reference to media already stored by the backend.
///
/// Identity is the `(name, media_type)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef {
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaCategory,
}

impl MediaRef {
    pub fn new(name: impl Into<String>, media_type: MediaCategory) -> Self {
        Self {
            name: name.into(),
            media_type,
        }
    }
}

/// A locally selected file that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size_bytes: data.len() as u64,
            data,
        }
    }

    /// File known only by its declared metadata (no contents loaded).
    pub fn declared(
        name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size_bytes,
            data: Bytes::new(),
        }
    }

    pub fn category(&self) -> Option<MediaCategory> {
        MediaCategory::from_content_type(&self.content_type)
    }
}
