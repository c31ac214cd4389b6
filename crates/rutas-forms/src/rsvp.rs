//! RSVP form for public event pages.

use rutas_core::models::RsvpRequest;
use rutas_core::validation::{
    validate_bounded_text, validate_email, validate_int_in_range, validate_name,
};
use rutas_core::{
    EntityBackend, ErrorCategory, ErrorMetadata, FieldError, FormsConfig, LogLevel,
    SubmissionError,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsvpField {
    FirstName,
    LastName,
    Email,
    Attendees,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RsvpError {
    #[error("{field:?}: {error}")]
    Field { field: RsvpField, error: FieldError },

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl ErrorMetadata for RsvpError {
    fn error_code(&self) -> &'static str {
        match self {
            RsvpError::Field { error, .. } => error.error_code(),
            RsvpError::Submission(inner) => inner.error_code(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            RsvpError::Field { .. } => ErrorCategory::Validation,
            RsvpError::Submission(_) => ErrorCategory::Submission,
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            RsvpError::Field { error, .. } => error.is_recoverable(),
            RsvpError::Submission(inner) => inner.is_recoverable(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            RsvpError::Field { error, .. } => error.client_message(),
            RsvpError::Submission(inner) => inner.client_message(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            RsvpError::Field { error, .. } => error.log_level(),
            RsvpError::Submission(inner) => inner.log_level(),
        }
    }
}

/// Raw RSVP inputs as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub attendees: String,
    pub message: String,
}

impl RsvpForm {
    /// Check every field in display order; the first failure is returned.
    pub fn validate(&self, config: &FormsConfig) -> Result<RsvpRequest, RsvpError> {
        let field_err =
            |field: RsvpField| move |error: FieldError| RsvpError::Field { field, error };

        validate_name(&self.first_name).map_err(field_err(RsvpField::FirstName))?;
        validate_name(&self.last_name).map_err(field_err(RsvpField::LastName))?;

        if self.email.trim().is_empty() {
            return Err(RsvpError::Field {
                field: RsvpField::Email,
                error: FieldError::Required,
            });
        }
        validate_email(&self.email).map_err(field_err(RsvpField::Email))?;

        let attendees = validate_int_in_range(&self.attendees, 1, config.rsvp_max_attendees)
            .map_err(field_err(RsvpField::Attendees))?;
        let attendees = u32::try_from(attendees).map_err(|_| RsvpError::Field {
            field: RsvpField::Attendees,
            error: FieldError::AboveMaximum {
                max: config.rsvp_max_attendees,
            },
        })?;

        validate_bounded_text(&self.message, config.rsvp_message_max_len)
            .map_err(field_err(RsvpField::Message))?;

        Ok(RsvpRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            attendees,
            message: self.message.trim().to_string(),
        })
    }

    /// Validate and send. The backend is not called if validation fails.
    pub async fn submit(
        &self,
        config: &FormsConfig,
        event_id: Uuid,
        backend: &dyn EntityBackend,
    ) -> Result<RsvpRequest, RsvpError> {
        let request = self.validate(config)?;
        backend.rsvp(event_id, &request).await.map_err(|e| {
            tracing::warn!(%event_id, error = %e, "RSVP submission failed");
            RsvpError::from(e)
        })?;
        tracing::info!(%event_id, attendees = request.attendees, "RSVP submitted");
        Ok(request)
    }
}
