use rutas_core::models::payload::{
    CATEGORY, DESCRIPTION, EMAIL, END_DATE, LAT, LOCATION, LON, MEDIA_URLS, PHONE, START_DATE,
    TITLE, URL,
};
use rutas_core::models::{DraftEntity, EntityKind, FilePart, MediaCategory, SubmissionPayload};
use serde_json::Value;
use uuid::Uuid;

use crate::reconciler::MediaReconciler;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Assemble the multipart payload for a draft and its media.
///
/// Text parts come first in a fixed order, then staged images, then staged
/// videos. `mediaUrls` lists the persisted references that survive.
pub fn build_payload(
    draft: &DraftEntity,
    media: &MediaReconciler,
    entity_id: Option<Uuid>,
) -> SubmissionPayload {
    let categories = Value::Array(
        draft
            .categories
            .iter()
            .map(|category| Value::String(category.clone()))
            .collect(),
    );
    let media_urls = Value::Array(
        media
            .persisted()
            .iter()
            .map(|reference| {
                let mut entry = serde_json::Map::new();
                entry.insert("name".to_string(), Value::String(reference.name.clone()));
                entry.insert(
                    "type".to_string(),
                    Value::String(reference.media_type.to_string()),
                );
                Value::Object(entry)
            })
            .collect(),
    );

    let mut fields = vec![
        (TITLE, draft.title.trim().to_string()),
        (DESCRIPTION, draft.description.trim().to_string()),
        (CATEGORY, categories.to_string()),
        (LOCATION, draft.location().to_string()),
        (LAT, draft.lat().to_string()),
        (LON, draft.lon().to_string()),
        (PHONE, draft.phone.trim().to_string()),
        (EMAIL, draft.email.trim().to_string()),
        (URL, draft.url.trim().to_string()),
    ];

    if draft.kind == EntityKind::Event {
        if let Some(start) = draft.start_date {
            fields.push((START_DATE, start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = draft.end_date {
            fields.push((END_DATE, end.format(DATE_FORMAT).to_string()));
        }
    }

    fields.push((MEDIA_URLS, media_urls.to_string()));

    let mut files: Vec<FilePart> = Vec::new();
    for category in [MediaCategory::Image, MediaCategory::Video] {
        files.extend(
            media
                .staged_files()
                .filter(|file| file.category() == Some(category))
                .map(|file| FilePart {
                    field: category.wire_field(),
                    file: file.clone(),
                }),
        );
    }

    SubmissionPayload {
        kind: draft.kind,
        entity_id,
        fields,
        files,
    }
}
