//! Form controller
//!
//! Owns the draft, the location resolver and the media reconciler for one
//! activity or event form. Every edit goes through [`FormController::on_field_change`]
//! and submission follows a fixed state machine:
//!
//! ```text
//! Idle -> Validating -> Idle (error)
//!                    -> Submitting -> Idle (success, draft cleared)
//!                                  -> Idle (error, draft kept)
//! ```
//!
//! The controller never talks to the network. [`FormController::on_submit`]
//! returns a [`SubmissionTicket`] that the caller dispatches against an
//! [`EntityBackend`]; the outcome comes back through
//! [`FormController::on_submit_result`]. Outcomes for a form that has since
//! been cancelled or reopened are ignored.

use chrono::NaiveDate;
use rutas_core::models::{
    DraftEntity, EntityKind, LocalFile, MediaCategory, PersistedEntity, SubmissionPayload,
};
use rutas_core::storage::ScopedStorage;
use rutas_core::validation::{validate_bounded_text, validate_email, validate_phone, validate_url};
use rutas_core::{
    EntityBackend, ErrorMetadata, FieldError, FormError, FormsConfig, LogLevel, PlaceSearch,
    RemovalError, SubmissionError, UploadError,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::payload::build_payload;
use crate::preview::PreviewProvider;
use crate::reconciler::{MediaPreviews, MediaReconciler, RemovedMedia};
use crate::resolver::{LocationResolver, SearchOutcome, SearchRequest};

/// Free-text inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Description,
    Location,
    Phone,
    Email,
    Url,
}

/// One edit from the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Text { field: TextField, value: String },
    FileList { files: Vec<LocalFile> },
    Categories(Vec<String>),
    Dates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// A click on the suggestion at `index`
    LocationSelected { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
}

/// A validated draft on its way to the backend.
#[must_use = "the form stays in Submitting until the ticket is dispatched"]
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    generation: u64,
    payload: SubmissionPayload,
}

impl SubmissionTicket {
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Send the payload: `update` when it edits a record, `create` otherwise.
    pub async fn dispatch(self, backend: &dyn EntityBackend) -> SubmissionOutcome {
        let result = match self.payload.entity_id {
            Some(id) => backend.update(id, &self.payload).await.map(|_| id),
            None => backend.create(&self.payload).await.map(|created| created.id),
        };
        SubmissionOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    generation: u64,
    pub result: Result<Uuid, SubmissionError>,
}

/// What [`FormController::on_submit_result`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The form was cancelled or reopened since dispatch.
    Ignored,
    Succeeded(Uuid),
    Failed(FormError),
}

pub struct FormController {
    config: FormsConfig,
    draft: DraftEntity,
    entity_id: Option<Uuid>,
    resolver: LocationResolver,
    media: MediaReconciler,
    storage: Option<ScopedStorage>,
    state: FormState,
    closed: bool,
    field_errors: HashMap<TextField, FieldError>,
    banner: Option<String>,
    submit_error: Option<FormError>,
    generation: u64,
}

impl FormController {
    pub fn new(config: FormsConfig, kind: EntityKind, previews: Box<dyn PreviewProvider>) -> Self {
        let resolver = LocationResolver::new(config.min_location_query_len);
        let media = MediaReconciler::new(&config, previews);
        Self {
            config,
            draft: DraftEntity::new(kind),
            entity_id: None,
            resolver,
            media,
            storage: None,
            state: FormState::Idle,
            closed: false,
            field_errors: HashMap::new(),
            banner: None,
            submit_error: None,
            generation: 0,
        }
    }

    /// Attach auto-save storage and restore any saved draft.
    pub fn with_storage(mut self, storage: ScopedStorage) -> Self {
        self.storage = Some(storage);
        self.restore_autosave();
        self
    }

    pub fn draft(&self) -> &DraftEntity {
        &self.draft
    }

    pub fn entity_id(&self) -> Option<Uuid> {
        self.entity_id
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub fn media(&self) -> &MediaReconciler {
        &self.media
    }

    /// Display URLs for the media view. A closed form shows nothing.
    pub fn preview_urls(&mut self) -> MediaPreviews {
        if self.closed {
            return MediaPreviews::default();
        }
        self.media.derive_preview_urls()
    }

    /// Inline error for a field, if any
    pub fn field_error(&self, field: TextField) -> Option<&FieldError> {
        self.field_errors.get(&field)
    }

    /// Inline message under the location input
    pub fn location_message(&self) -> Option<String> {
        self.resolver.error().map(|e| e.client_message())
    }

    /// Dismissible banner (media quota, submission failure)
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Form-level error from the last submit attempt
    pub fn submit_error(&self) -> Option<&FormError> {
        self.submit_error.as_ref()
    }

    fn autosave_key(&self) -> String {
        match self.entity_id {
            Some(id) => format!("draft:{}:{}", self.draft.kind, id),
            None => format!("draft:{}", self.draft.kind),
        }
    }

    fn autosave(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.write_json(&self.autosave_key(), &self.draft) {
            tracing::warn!(error = %e, "Failed to auto-save draft");
        }
    }

    fn clear_autosave(&self) {
        if let Some(storage) = &self.storage {
            storage.clear(&self.autosave_key());
        }
    }

    fn restore_autosave(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let Some(saved) = storage.read_json::<DraftEntity>(&self.autosave_key()) else {
            return;
        };
        if saved.kind != self.draft.kind {
            return;
        }
        tracing::debug!(kind = %saved.kind, "Restored auto-saved draft");
        self.draft = saved;
        self.resolver.restore_confirmed(&self.draft);
        self.refresh_field_errors();
    }

    fn reset(&mut self, draft: DraftEntity, entity_id: Option<Uuid>) {
        self.media.clear();
        self.resolver.reset();
        self.draft = draft;
        self.entity_id = entity_id;
        self.state = FormState::Idle;
        self.closed = false;
        self.field_errors.clear();
        self.banner = None;
        self.submit_error = None;
        self.generation += 1;
    }

    /// Start a blank form.
    pub fn open_new(&mut self, kind: EntityKind) {
        self.reset(DraftEntity::new(kind), None);
        self.restore_autosave();
    }

    /// Edit a stored record. Submits through `update`.
    pub fn open_existing(&mut self, record: &PersistedEntity) {
        self.reset(record.to_draft(), Some(record.id));
        self.media.load_persisted(record.media.clone());
        self.resolver.restore_confirmed(&self.draft);
        self.restore_autosave();
    }

    /// Copy a stored record into a new one. Submits through `create`.
    pub fn open_duplicate(&mut self, record: &PersistedEntity) {
        self.reset(record.to_draft(), None);
        self.media.load_persisted(record.media.clone());
        self.resolver.restore_confirmed(&self.draft);
    }

    /// Apply one edit. Returns a place search to run when the location input
    /// changed enough to need one.
    pub fn on_field_change(&mut self, update: FieldUpdate) -> Option<SearchRequest> {
        if self.closed {
            tracing::debug!("Ignoring edit on a closed form");
            return None;
        }

        let mut search = None;
        match update {
            FieldUpdate::Text { field, value } => match field {
                TextField::Title => self.draft.title = value,
                TextField::Description => self.draft.description = value,
                TextField::Phone => self.draft.phone = value,
                TextField::Email => self.draft.email = value,
                TextField::Url => self.draft.url = value,
                TextField::Location => {
                    search = self.resolver.on_input(&value, &mut self.draft);
                }
            },
            FieldUpdate::FileList { files } => {
                // Failure is reported through the banner
                let _ = self.on_media_stage(files);
            }
            FieldUpdate::Categories(categories) => self.draft.set_categories(categories),
            FieldUpdate::Dates { start, end } => {
                self.draft.start_date = start;
                self.draft.end_date = end;
            }
            FieldUpdate::LocationSelected { index } => {
                if self.resolver.select(index, &mut self.draft).is_none() {
                    tracing::warn!(index, "Selected a suggestion that is no longer shown");
                }
            }
        }

        self.refresh_field_errors();
        self.autosave();
        search
    }

    fn refresh_field_errors(&mut self) {
        let checks = [
            (
                TextField::Description,
                validate_bounded_text(&self.draft.description, self.config.description_max_len),
            ),
            (TextField::Phone, validate_phone(&self.draft.phone)),
            (TextField::Email, validate_email(&self.draft.email)),
            (TextField::Url, validate_url(&self.draft.url)),
        ];
        for (field, result) in checks {
            match result {
                Ok(()) => {
                    self.field_errors.remove(&field);
                }
                Err(e) => {
                    self.field_errors.insert(field, e);
                }
            }
        }
    }

    pub fn on_search_result(&mut self, outcome: SearchOutcome) -> bool {
        if self.closed {
            return false;
        }
        self.resolver.apply(outcome)
    }

    pub fn on_media_stage(&mut self, files: Vec<LocalFile>) -> Result<(), UploadError> {
        if self.closed {
            tracing::debug!("Ignoring media on a closed form");
            return Err(UploadError::FormClosed);
        }
        match self.media.stage(files) {
            Ok(()) => {
                self.banner = None;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected media batch");
                self.banner = Some(e.client_message());
                Err(e)
            }
        }
    }

    pub fn on_media_remove(
        &mut self,
        category: MediaCategory,
        index: usize,
    ) -> Result<RemovedMedia, RemovalError> {
        if self.closed {
            return Err(RemovalError::FormClosed);
        }
        self.media.remove_at(category, index).map_err(|e| {
            tracing::warn!(error = %e, "Rejected media removal");
            self.banner = Some(e.client_message());
            e
        })
    }

    fn validate(&self) -> Result<(), FormError> {
        let draft = &self.draft;

        if !self.resolver.is_confirmed() || draft.location().trim().is_empty() {
            return Err(FormError::LocationNotConfirmed);
        }
        if draft.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        match draft.kind {
            EntityKind::Activity => {
                if draft.categories.is_empty() {
                    return Err(FormError::CategoryRequired);
                }
            }
            EntityKind::Event => {
                let start = draft.start_date.ok_or(FormError::StartDateRequired)?;
                if draft.end_date.is_some_and(|end| end < start) {
                    return Err(FormError::EndBeforeStart);
                }
            }
        }
        validate_bounded_text(&draft.description, self.config.description_max_len)
            .map_err(FormError::InvalidDescription)?;
        validate_phone(&draft.phone).map_err(FormError::InvalidPhone)?;
        validate_url(&draft.url).map_err(FormError::InvalidUrl)?;
        validate_email(&draft.email).map_err(FormError::InvalidEmail)?;
        if self.config.require_contact_channel && !draft.has_contact_channel() {
            return Err(FormError::MissingContact);
        }
        Ok(())
    }

    /// Validate the draft and, if it passes, hand out the payload to send.
    ///
    /// Stops at the first failing rule. The draft stays in place either way.
    pub fn on_submit(&mut self) -> Result<SubmissionTicket, FormError> {
        if self.closed {
            return Err(FormError::Closed);
        }
        if self.state == FormState::Submitting {
            return Err(FormError::SubmissionInProgress);
        }

        self.state = FormState::Validating;
        if let Err(e) = self.validate() {
            log_form_error(&e);
            self.state = FormState::Idle;
            if e == FormError::LocationNotConfirmed && self.resolver.error().is_none() {
                self.resolver.require_selection();
            }
            self.submit_error = Some(e.clone());
            return Err(e);
        }

        self.state = FormState::Submitting;
        self.submit_error = None;
        self.banner = None;

        let payload = build_payload(&self.draft, &self.media, self.entity_id);
        tracing::info!(
            kind = %self.draft.kind,
            update = self.entity_id.is_some(),
            files = payload.files.len(),
            "Submitting form"
        );
        Ok(SubmissionTicket {
            generation: self.generation,
            payload,
        })
    }

    pub fn on_submit_result(&mut self, outcome: SubmissionOutcome) -> SubmitStatus {
        if outcome.generation != self.generation || self.state != FormState::Submitting {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "Ignoring submission result for a closed form"
            );
            return SubmitStatus::Ignored;
        }

        match outcome.result {
            Ok(id) => {
                tracing::info!(%id, kind = %self.draft.kind, "Form submitted");
                self.clear_autosave();
                let kind = self.draft.kind;
                self.reset(DraftEntity::new(kind), None);
                SubmitStatus::Succeeded(id)
            }
            Err(e) => {
                let err = FormError::Submission(e);
                log_form_error(&err);
                self.state = FormState::Idle;
                self.banner = Some(err.client_message());
                self.submit_error = Some(err.clone());
                SubmitStatus::Failed(err)
            }
        }
    }

    /// Discard the draft and release every preview. Late results are ignored.
    pub fn on_cancel(&mut self) {
        tracing::debug!(kind = %self.draft.kind, "Form cancelled");
        self.clear_autosave();
        let kind = self.draft.kind;
        self.reset(DraftEntity::new(kind), None);
        self.closed = true;
    }

    /// Validate, send and apply the result in one step.
    pub async fn submit(&mut self, backend: &dyn EntityBackend) -> Result<Uuid, FormError> {
        let ticket = self.on_submit()?;
        let outcome = ticket.dispatch(backend).await;
        match self.on_submit_result(outcome) {
            SubmitStatus::Succeeded(id) => Ok(id),
            SubmitStatus::Failed(e) => Err(e),
            SubmitStatus::Ignored => Err(FormError::Closed),
        }
    }

    /// Type into the location input and run the resulting search, if any.
    pub async fn type_location(&mut self, text: &str, places: &dyn PlaceSearch) -> bool {
        let request = self.on_field_change(FieldUpdate::Text {
            field: TextField::Location,
            value: text.to_string(),
        });
        match request {
            Some(request) => {
                let outcome = request.run(places).await;
                self.on_search_result(outcome)
            }
            None => false,
        }
    }
}

fn log_form_error(err: &FormError) {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(code = err.error_code(), error = %err, "Form submission blocked")
        }
        LogLevel::Warn => {
            tracing::warn!(code = err.error_code(), error = %err, "Form submission failed")
        }
        LogLevel::Error => {
            tracing::error!(code = err.error_code(), error = %err, "Form submission failed")
        }
    }
}
