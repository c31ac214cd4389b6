//! Domain methods for the Rutas API client.
//!
//! The inherent methods return `anyhow::Result` like the generic helpers. The
//! `EntityBackend` and `PlaceSearch` impls convert those errors into the form
//! engine's error types so nothing crosses the collaborator boundary as
//! `anyhow::Error`.

use crate::{api_prefix, ApiClient, ApiStatusError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use rutas_core::models::{
    CreatedEntity, EntityKind, EntitySummary, Page, PersistedEntity, RsvpRequest,
    SubmissionPayload, Suggestion,
};
use rutas_core::{EntityBackend, PlaceSearch, ResolverError, SubmissionError};
use uuid::Uuid;

fn collection_path(kind: EntityKind) -> String {
    format!("{}/{}", api_prefix(), kind.collection())
}

fn entity_path(kind: EntityKind, id: Uuid) -> String {
    format!("{}/{}", collection_path(kind), id)
}

/// Build the multipart form: text parts in payload order, then file parts.
fn build_form(payload: &SubmissionPayload) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in &payload.fields {
        form = form.text(*name, value.clone());
    }
    for part in &payload.files {
        let file = &part.file;
        let body = Part::stream_with_length(file.data.clone(), file.data.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .with_context(|| format!("Invalid content type for {}", file.name))?;
        form = form.part(part.field, body);
    }
    Ok(form)
}

/// Map a client error onto the submission taxonomy.
fn to_submission_error(err: anyhow::Error) -> SubmissionError {
    if let Some(status) = err.downcast_ref::<ApiStatusError>() {
        return SubmissionError::Rejected {
            status: status.status,
            message: status.body.clone(),
        };
    }

    let reqwest_err = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<reqwest::Error>());
    match reqwest_err {
        Some(e) if e.is_decode() => SubmissionError::InvalidResponse(format!("{:#}", err)),
        Some(_) => SubmissionError::Network(format!("{:#}", err)),
        None => SubmissionError::InvalidResponse(format!("{:#}", err)),
    }
}

impl ApiClient {
    /// Create an activity or event from a multipart payload.
    pub async fn create_entity(&self, payload: &SubmissionPayload) -> Result<CreatedEntity> {
        let form = build_form(payload)?;
        self.post_multipart(&collection_path(payload.kind), form)
            .await
    }

    /// Replace an existing record.
    pub async fn update_entity(&self, id: Uuid, payload: &SubmissionPayload) -> Result<()> {
        let form = build_form(payload)?;
        self.put_multipart(&entity_path(payload.kind, id), form)
            .await
    }

    /// Get a single record with its persisted media.
    pub async fn get_entity(&self, kind: EntityKind, id: Uuid) -> Result<PersistedEntity> {
        self.get(&entity_path(kind, id), &[]).await
    }

    /// List one page of records (1-based).
    pub async fn list_entities(&self, kind: EntityKind, page: u32) -> Result<Page<EntitySummary>> {
        self.get(&collection_path(kind), &[("page", page.max(1).to_string())])
            .await
    }

    pub async fn delete_entity(&self, kind: EntityKind, id: Uuid) -> Result<()> {
        self.delete(&entity_path(kind, id)).await
    }

    /// Query the server-side place-search proxy.
    pub async fn search_places(&self, query: &str) -> Result<Vec<Suggestion>> {
        self.get(
            &format!("{}/places/search", api_prefix()),
            &[("q", query.to_string())],
        )
        .await
    }

    /// Register attendance to an event.
    pub async fn send_rsvp(&self, event_id: Uuid, request: &RsvpRequest) -> Result<()> {
        self.post_json(
            &format!("{}/rsvp", entity_path(EntityKind::Event, event_id)),
            request,
        )
        .await
    }
}

#[async_trait]
impl EntityBackend for ApiClient {
    async fn create(&self, payload: &SubmissionPayload) -> Result<CreatedEntity, SubmissionError> {
        self.create_entity(payload)
            .await
            .map_err(to_submission_error)
    }

    async fn update(&self, id: Uuid, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        self.update_entity(id, payload)
            .await
            .map_err(to_submission_error)
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), SubmissionError> {
        self.delete_entity(kind, id)
            .await
            .map_err(to_submission_error)
    }

    async fn list(
        &self,
        kind: EntityKind,
        page: u32,
    ) -> Result<Page<EntitySummary>, SubmissionError> {
        self.list_entities(kind, page)
            .await
            .map_err(to_submission_error)
    }

    async fn rsvp(&self, event_id: Uuid, request: &RsvpRequest) -> Result<(), SubmissionError> {
        self.send_rsvp(event_id, request)
            .await
            .map_err(to_submission_error)
    }
}

#[async_trait]
impl PlaceSearch for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ResolverError> {
        self.search_places(query).await.map_err(|e| {
            tracing::warn!(error = %e, "Place search proxy failed");
            ResolverError::Provider(format!("{:#}", e))
        })
    }
}
