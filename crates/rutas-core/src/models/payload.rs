//! Multipart submission payload.
//!
//! Field names are fixed by the backend and must not change.

use uuid::Uuid;

use super::entity::EntityKind;
use super::media::LocalFile;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";
pub const LOCATION: &str = "location";
pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const PHONE: &str = "phone";
pub const EMAIL: &str = "email";
pub const URL: &str = "url";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const IMAGES: &str = "images";
pub const VIDEOS: &str = "videos";
pub const MEDIA_URLS: &str = "mediaUrls";

/// One staged file to be sent as a file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Either [`IMAGES`] or [`VIDEOS`].
    pub field: &'static str,
    pub file: LocalFile,
}

/// Assembled draft ready for the backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub kind: EntityKind,
    /// Set when the draft edits an existing record.
    pub entity_id: Option<Uuid>,
    /// Text parts in wire order.
    pub fields: Vec<(&'static str, String)>,
    pub files: Vec<FilePart>,
}

impl SubmissionPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn files_for(&self, field: &str) -> impl Iterator<Item = &LocalFile> {
        let field = field.to_string();
        self.files
            .iter()
            .filter(move |part| part.field == field)
            .map(|part| &part.file)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}
