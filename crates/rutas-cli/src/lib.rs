use rutas_core::models::PersistedEntity;
use rutas_core::{ErrorMetadata, FormsConfig};
use rutas_forms::{BlobPreviewProvider, FormController};
use serde::Serialize;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Result of running the submit checks on a record offline.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DraftReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Text parts that would be sent, in wire order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(&'static str, String)>,
}

/// Load a record into a form as an edit and run the submit checks.
pub fn check_record(config: FormsConfig, record: &PersistedEntity) -> DraftReport {
    let previews = Box::new(BlobPreviewProvider::default());
    let mut form = FormController::new(config, record.kind, previews);
    form.open_existing(record);

    match form.on_submit() {
        Ok(ticket) => DraftReport {
            valid: true,
            code: None,
            message: None,
            fields: ticket.payload().fields.clone(),
        },
        Err(e) => DraftReport {
            valid: false,
            code: Some(e.error_code()),
            message: Some(e.client_message()),
            fields: Vec::new(),
        },
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rutas_core::models::EntityKind;
    use uuid::Uuid;

    fn record() -> PersistedEntity {
        PersistedEntity {
            id: Uuid::new_v4(),
            kind: EntityKind::Activity,
            title: "Vía verde del Valle del Tiétar".to_string(),
            description: String::new(),
            categories: vec!["Cicloturismo".to_string()],
            location: "Candeleda, Ávila".to_string(),
            lat: "40.15".to_string(),
            lon: "-5.24".to_string(),
            phone: String::new(),
            email: String::new(),
            url: String::new(),
            start_date: None,
            end_date: None,
            media: Vec::new(),
        }
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_multibyte() {
        assert_eq!(truncate_string("Ávila y Gredos", 8), "Ávila...");
    }

    #[test]
    fn check_record_valid() {
        let report = check_record(FormsConfig::default(), &record());
        assert!(report.valid);
        assert!(report.fields.iter().any(|(name, _)| *name == "location"));
    }

    #[test]
    fn check_record_reports_first_failure() {
        let mut record = record();
        record.url = "valledeltietar.es".to_string();
        record.phone = "12".to_string();

        let report = check_record(FormsConfig::default(), &record);
        assert!(!report.valid);
        assert_eq!(report.code, Some("INVALID_PHONE"));
    }
}
