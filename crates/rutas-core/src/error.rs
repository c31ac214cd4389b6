//! Error types module
//!
//! Every failure the form engine can surface is one of the enums below. They
//! are grouped into four categories (validation, quota, resolver, submission)
//! and each one describes how it should be shown to the user through
//! [`ErrorMetadata`]. Client messages are in Spanish; `Display` output is for
//! logs.

use crate::models::MediaCategory;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like provider outages
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Broad family an error belongs to. Decides where the view renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Field-level, fixed by editing the field. Rendered inline.
    Validation,
    /// Media count/size/type exceeded. Rendered as a dismissible banner.
    Quota,
    /// Place search failed. Rendered inline under the location field.
    Resolver,
    /// Backend rejected the submission or the network failed. Banner.
    Submission,
}

/// Metadata for error presentation.
///
/// Lets errors self-describe how the form layer should show them, so the
/// view never needs to match on concrete variants.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "INVALID_PHONE_FORMAT")
    fn error_code(&self) -> &'static str;

    /// Taxonomy bucket
    fn category(&self) -> ErrorCategory;

    /// Whether retrying the same action without edits can succeed
    fn is_recoverable(&self) -> bool;

    /// User-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Field validator failure reasons.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Invalid phone format")]
    InvalidPhoneFormat,

    #[error("URL must start with http:// or https://")]
    MissingScheme,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Field is required")]
    Required,

    #[error("Field contains invalid characters")]
    InvalidCharacters,

    #[error("Too short (min: {min})")]
    TooShort { min: usize },

    #[error("Too long (max: {max})")]
    TooLong { max: usize },

    #[error("Not a number")]
    NotANumber,

    #[error("Below minimum of {min}")]
    BelowMinimum { min: i64 },

    #[error("Above maximum of {max}")]
    AboveMaximum { max: i64 },
}

/// Rejection of a whole `stage` batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Disallowed content type for {file}: {content_type}")]
    DisallowedType { file: String, content_type: String },

    #[error("File too large: {file} is {size} bytes (max: {max} bytes)")]
    FileTooLarge { file: String, size: u64, max: u64 },

    #[error("Too many images: {file} exceeds the limit ({remaining} more allowed)")]
    TooManyImages { file: String, remaining: usize },

    #[error("Too many videos: {file} exceeds the limit ({remaining} more allowed)")]
    TooManyVideos { file: String, remaining: usize },

    #[error("Form is closed")]
    FormClosed,
}

/// Rejection of a `remove_at` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalError {
    #[error("Invalid selection: {category} index {index} out of range (len: {len})")]
    InvalidSelection {
        category: MediaCategory,
        index: usize,
        len: usize,
    },

    #[error("Form is closed")]
    FormClosed,
}

/// Location field failures, including place-search provider failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("Location must be selected from the suggestions")]
    SelectionRequired,

    #[error("No places found for query '{query}'")]
    NoResults { query: String },

    #[error("Place search failed: {0}")]
    Provider(String),
}

/// Backend collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Form-level errors. Submission surfaces exactly one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Location not confirmed")]
    LocationNotConfirmed,

    #[error("Title is required")]
    TitleRequired,

    #[error("At least one category is required")]
    CategoryRequired,

    #[error("Event start date is required")]
    StartDateRequired,

    #[error("Event end date is before its start date")]
    EndBeforeStart,

    #[error("Description: {0}")]
    InvalidDescription(FieldError),

    #[error("Phone: {0}")]
    InvalidPhone(FieldError),

    #[error("URL: {0}")]
    InvalidUrl(FieldError),

    #[error("Email: {0}")]
    InvalidEmail(FieldError),

    #[error("At least one contact channel is required")]
    MissingContact,

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Form is closed")]
    Closed,

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Static metadata per variant: (error_code, recoverable).
fn field_error_static_metadata(err: &FieldError) -> (&'static str, bool) {
    match err {
        FieldError::InvalidPhoneFormat => ("INVALID_PHONE_FORMAT", false),
        FieldError::MissingScheme => ("MISSING_SCHEME", false),
        FieldError::InvalidEmail => ("INVALID_EMAIL", false),
        FieldError::Required => ("REQUIRED", false),
        FieldError::InvalidCharacters => ("INVALID_CHARACTERS", false),
        FieldError::TooShort { .. } => ("TOO_SHORT", false),
        FieldError::TooLong { .. } => ("TOO_LONG", false),
        FieldError::NotANumber => ("NOT_A_NUMBER", false),
        FieldError::BelowMinimum { .. } => ("BELOW_MINIMUM", false),
        FieldError::AboveMaximum { .. } => ("ABOVE_MAXIMUM", false),
    }
}

impl ErrorMetadata for FieldError {
    fn error_code(&self) -> &'static str {
        field_error_static_metadata(self).0
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    fn is_recoverable(&self) -> bool {
        field_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            FieldError::InvalidPhoneFormat => {
                "Formato de teléfono no válido. Use 9 dígitos o el prefijo internacional".to_string()
            }
            FieldError::MissingScheme => "La URL debe comenzar por http:// o https://".to_string(),
            FieldError::InvalidEmail => "Introduzca un correo electrónico válido".to_string(),
            FieldError::Required => "Este campo es obligatorio".to_string(),
            FieldError::InvalidCharacters => "Solo se admiten letras y espacios".to_string(),
            FieldError::TooShort { min } => format!("Debe tener al menos {} caracteres", min),
            FieldError::TooLong { max } => format!("No puede superar los {} caracteres", max),
            FieldError::NotANumber => "Introduzca un número".to_string(),
            FieldError::BelowMinimum { min } => format!("El valor mínimo es {}", min),
            FieldError::AboveMaximum { max } => format!("El valor máximo es {}", max),
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::DisallowedType { .. } => "DISALLOWED_TYPE",
            UploadError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            UploadError::TooManyImages { .. } => "TOO_MANY_IMAGES",
            UploadError::TooManyVideos { .. } => "TOO_MANY_VIDEOS",
            UploadError::FormClosed => "FORM_CLOSED",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            UploadError::FormClosed => ErrorCategory::Validation,
            _ => ErrorCategory::Quota,
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::DisallowedType { file, .. } => {
                format!("El archivo {} no es una imagen ni un vídeo admitido", file)
            }
            UploadError::FileTooLarge { file, max, .. } => format!(
                "El archivo {} supera el tamaño máximo de {} MB",
                file,
                max / (1024 * 1024)
            ),
            UploadError::TooManyImages { remaining, .. } => {
                format!("Demasiadas imágenes. Puede añadir {} más", remaining)
            }
            UploadError::TooManyVideos { remaining, .. } => {
                format!("Demasiados vídeos. Puede añadir {} más", remaining)
            }
            UploadError::FormClosed => "El formulario está cerrado".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

impl ErrorMetadata for RemovalError {
    fn error_code(&self) -> &'static str {
        match self {
            RemovalError::InvalidSelection { .. } => "INVALID_SELECTION",
            RemovalError::FormClosed => "FORM_CLOSED",
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Validation
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn client_message(&self) -> String {
        match self {
            RemovalError::InvalidSelection { .. } => {
                "El elemento seleccionado ya no existe".to_string()
            }
            RemovalError::FormClosed => "El formulario está cerrado".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Warn
    }
}

impl ErrorMetadata for ResolverError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolverError::SelectionRequired => "LOCATION_SELECTION_REQUIRED",
            ResolverError::NoResults { .. } => "LOCATION_NO_RESULTS",
            ResolverError::Provider(_) => "PLACE_SEARCH_FAILED",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            ResolverError::Provider(_) => ErrorCategory::Resolver,
            _ => ErrorCategory::Validation,
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, ResolverError::Provider(_))
    }

    fn client_message(&self) -> String {
        match self {
            ResolverError::SelectionRequired => {
                "Seleccione una ubicación de las sugerencias".to_string()
            }
            ResolverError::NoResults { .. } => {
                "No se encontraron lugares. Pruebe con un municipio, paraje o espacio natural de la provincia de Ávila".to_string()
            }
            ResolverError::Provider(_) => {
                "No se pudo buscar la ubicación. Siga escribiendo para reintentar".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ResolverError::Provider(_) => LogLevel::Warn,
            _ => LogLevel::Debug,
        }
    }
}

impl ErrorMetadata for SubmissionError {
    fn error_code(&self) -> &'static str {
        match self {
            SubmissionError::Rejected { .. } => "SUBMISSION_REJECTED",
            SubmissionError::Network(_) => "NETWORK_ERROR",
            SubmissionError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Submission
    }

    fn is_recoverable(&self) -> bool {
        match self {
            SubmissionError::Rejected { status, .. } => *status >= 500,
            SubmissionError::Network(_) | SubmissionError::InvalidResponse(_) => true,
        }
    }

    fn client_message(&self) -> String {
        match self {
            SubmissionError::Rejected { status, .. } if *status < 500 => {
                "El servidor rechazó los datos. Revíselos e inténtelo de nuevo".to_string()
            }
            SubmissionError::Rejected { .. } | SubmissionError::InvalidResponse(_) => {
                "No se pudo guardar. Inténtelo de nuevo en unos minutos".to_string()
            }
            SubmissionError::Network(_) => {
                "Error de conexión. Compruebe su red e inténtelo de nuevo".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmissionError::Rejected { status, .. } if *status < 500 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl ErrorMetadata for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            FormError::LocationNotConfirmed => "LOCATION_NOT_CONFIRMED",
            FormError::TitleRequired => "TITLE_REQUIRED",
            FormError::CategoryRequired => "CATEGORY_REQUIRED",
            FormError::StartDateRequired => "START_DATE_REQUIRED",
            FormError::EndBeforeStart => "END_BEFORE_START",
            FormError::InvalidDescription(_) => "INVALID_DESCRIPTION",
            FormError::InvalidPhone(_) => "INVALID_PHONE",
            FormError::InvalidUrl(_) => "INVALID_URL",
            FormError::InvalidEmail(_) => "INVALID_EMAIL",
            FormError::MissingContact => "MISSING_CONTACT",
            FormError::SubmissionInProgress => "SUBMISSION_IN_PROGRESS",
            FormError::Closed => "FORM_CLOSED",
            FormError::Submission(inner) => inner.error_code(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            FormError::Submission(_) => ErrorCategory::Submission,
            _ => ErrorCategory::Validation,
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            FormError::Submission(inner) => inner.is_recoverable(),
            FormError::SubmissionInProgress => true,
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            FormError::LocationNotConfirmed => ResolverError::SelectionRequired.client_message(),
            FormError::TitleRequired => "El título es obligatorio".to_string(),
            FormError::CategoryRequired => "Seleccione al menos una categoría".to_string(),
            FormError::StartDateRequired => "Indique la fecha de inicio del evento".to_string(),
            FormError::EndBeforeStart => {
                "La fecha de fin no puede ser anterior a la de inicio".to_string()
            }
            FormError::InvalidDescription(inner)
            | FormError::InvalidPhone(inner)
            | FormError::InvalidUrl(inner)
            | FormError::InvalidEmail(inner) => inner.client_message(),
            FormError::MissingContact => {
                "Indique al menos un teléfono, correo electrónico o web de contacto".to_string()
            }
            FormError::SubmissionInProgress => "El formulario ya se está enviando".to_string(),
            FormError::Closed => "El formulario está cerrado".to_string(),
            FormError::Submission(inner) => inner.client_message(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            FormError::Submission(inner) => inner.log_level(),
            _ => LogLevel::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_metadata() {
        let err = FieldError::InvalidPhoneFormat;
        assert_eq!(err.error_code(), "INVALID_PHONE_FORMAT");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_upload_error_reports_remaining_capacity() {
        let err = UploadError::TooManyImages {
            file: "b.jpg".to_string(),
            remaining: 1,
        };
        assert_eq!(err.error_code(), "TOO_MANY_IMAGES");
        assert_eq!(err.category(), ErrorCategory::Quota);
        assert!(err.client_message().contains('1'));
        assert!(err.to_string().contains("b.jpg"));
    }

    #[test]
    fn test_resolver_error_categories() {
        assert_eq!(
            ResolverError::Provider("timeout".to_string()).category(),
            ErrorCategory::Resolver
        );
        assert!(ResolverError::Provider("timeout".to_string()).is_recoverable());
        assert_eq!(
            ResolverError::NoResults {
                query: "xyz".to_string()
            }
            .category(),
            ErrorCategory::Validation
        );
        assert_ne!(
            ResolverError::Provider("x".to_string()).client_message(),
            ResolverError::NoResults {
                query: "x".to_string()
            }
            .client_message()
        );
    }

    #[test]
    fn test_location_not_confirmed_message() {
        assert_eq!(
            FormError::LocationNotConfirmed.client_message(),
            "Seleccione una ubicación de las sugerencias"
        );
    }

    #[test]
    fn test_submission_error_recoverability() {
        let client_side = SubmissionError::Rejected {
            status: 422,
            message: "bad".to_string(),
        };
        let server_side = SubmissionError::Rejected {
            status: 503,
            message: "down".to_string(),
        };
        assert!(!client_side.is_recoverable());
        assert!(server_side.is_recoverable());
        assert_eq!(client_side.log_level(), LogLevel::Warn);
        assert_eq!(server_side.log_level(), LogLevel::Error);

        let wrapped = FormError::from(server_side);
        assert_eq!(wrapped.category(), ErrorCategory::Submission);
        assert_eq!(wrapped.error_code(), "SUBMISSION_REJECTED");
    }
}
