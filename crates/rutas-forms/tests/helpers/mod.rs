//! Mock collaborators for form integration tests
//!
//! These mocks record every call so tests can assert what reached the
//! backend without any network.

#![allow(dead_code)]

use async_trait::async_trait;
use rutas_core::models::{
    CreatedEntity, EntityKind, EntitySummary, Page, Pagination, RsvpRequest, SubmissionPayload,
    Suggestion,
};
use rutas_core::{EntityBackend, FormsConfig, PlaceSearch, ResolverError, SubmissionError};
use rutas_forms::{BlobPreviewProvider, FormController, PreviewLedger};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mock backend keeping submitted payloads in memory
#[derive(Clone, Default)]
pub struct MockBackend {
    created: Arc<Mutex<Vec<SubmissionPayload>>>,
    updated: Arc<Mutex<Vec<(Uuid, SubmissionPayload)>>>,
    deleted: Arc<Mutex<Vec<(EntityKind, Uuid)>>>,
    rsvps: Arc<Mutex<Vec<(Uuid, RsvpRequest)>>>,
    failure: Arc<Mutex<Option<SubmissionError>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: SubmissionError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn created(&self) -> Vec<SubmissionPayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<(Uuid, SubmissionPayload)> {
        self.updated.lock().unwrap().clone()
    }

    pub fn rsvps(&self) -> Vec<(Uuid, RsvpRequest)> {
        self.rsvps.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.created.lock().unwrap().len()
            + self.updated.lock().unwrap().len()
            + self.deleted.lock().unwrap().len()
            + self.rsvps.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), SubmissionError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EntityBackend for MockBackend {
    async fn create(&self, payload: &SubmissionPayload) -> Result<CreatedEntity, SubmissionError> {
        self.check()?;
        self.created.lock().unwrap().push(payload.clone());
        Ok(CreatedEntity { id: Uuid::new_v4() })
    }

    async fn update(&self, id: Uuid, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        self.check()?;
        self.updated.lock().unwrap().push((id, payload.clone()));
        Ok(())
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<(), SubmissionError> {
        self.check()?;
        self.deleted.lock().unwrap().push((kind, id));
        Ok(())
    }

    async fn list(
        &self,
        _kind: EntityKind,
        page: u32,
    ) -> Result<Page<EntitySummary>, SubmissionError> {
        self.check()?;
        Ok(Page {
            items: Vec::new(),
            pagination: Pagination {
                page,
                per_page: 20,
                total: 0,
            },
        })
    }

    async fn rsvp(&self, event_id: Uuid, request: &RsvpRequest) -> Result<(), SubmissionError> {
        self.check()?;
        self.rsvps.lock().unwrap().push((event_id, request.clone()));
        Ok(())
    }
}

/// Mock place search answering from a fixed table
#[derive(Clone, Default)]
pub struct MockPlaces {
    results: Arc<Mutex<HashMap<String, Vec<Suggestion>>>>,
    queries: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, query: &str, suggestions: Vec<Suggestion>) {
        self.results
            .lock()
            .unwrap()
            .insert(query.to_string(), suggestions);
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearch for MockPlaces {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, ResolverError> {
        self.queries.lock().unwrap().push(query.to_string());
        if *self.failing.lock().unwrap() {
            return Err(ResolverError::Provider("upstream timeout".to_string()));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn suggestion(place: &str, address: &str, lat: &str, lon: &str) -> Suggestion {
    Suggestion {
        place_label: place.to_string(),
        address_label: address.to_string(),
        lat: lat.to_string(),
        lon: lon.to_string(),
        provider_id: format!("{}-{}", place, address),
    }
}

/// Place table covering the scenarios in these tests
pub fn places() -> MockPlaces {
    let places = MockPlaces::new();
    places.add(
        "Gredos",
        vec![suggestion("Sierra de Gredos", "Ávila", "40.25", "-5.20")],
    );
    places.add(
        "Arenas",
        vec![
            suggestion("Arenas de San Pedro", "Ávila", "40.21", "-5.09"),
            suggestion("Arenas", "Málaga", "36.82", "-4.04"),
        ],
    );
    places
}

pub fn form(kind: EntityKind) -> (FormController, PreviewLedger) {
    let provider = BlobPreviewProvider::default();
    let ledger = provider.ledger();
    (
        FormController::new(FormsConfig::default(), kind, Box::new(provider)),
        ledger,
    )
}
