//! Collaborator traits
//!
//! The form engine never talks to the network itself. It is handed
//! implementations of these traits: the HTTP client in production, mocks in
//! tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ResolverError, SubmissionError};
use crate::models::{
    CreatedEntity, EntityKind, EntitySummary, Page, RsvpRequest, SubmissionPayload, Suggestion,
};

/// Backend REST API for activities and events.
#[async_trait]
pub trait EntityBackend: Send + Sync {
    /// Create a new record from a submission payload
    async fn create(&self, payload: &SubmissionPayload) -> Result<CreatedEntity, SubmissionError>;

    /// Replace an existing record
    async fn update(&self, id: Uuid, payload: &SubmissionPayload) -> Result<(), SubmissionError>;

    /// Delete a record
    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), SubmissionError>;

    /// List one page of records (1-based)
    async fn list(
        &self,
        kind: EntityKind,
        page: u32,
    ) -> Result<Page<EntitySummary>, SubmissionError>;

    /// Register attendance to an event
    async fn rsvp(&self, event_id: Uuid, request: &RsvpRequest) -> Result<(), SubmissionError>;
}

/// Place search, proxied server-side so no provider key reaches the client.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ResolverError>;
}
