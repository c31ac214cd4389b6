#[path = "helpers/mod.rs"]
mod helpers;

use bytes::Bytes;
use helpers::{form, places, MockBackend};
use rutas_core::models::{EntityKind, LocalFile, MediaCategory, MediaRef, PersistedEntity};
use rutas_core::{ErrorMetadata, FormError, ResolverError, SubmissionError};
use rutas_forms::{FieldUpdate, FormState, SubmitStatus, TextField};
use uuid::Uuid;

fn text(field: TextField, value: &str) -> FieldUpdate {
    FieldUpdate::Text {
        field,
        value: value.to_string(),
    }
}

fn jpeg(name: &str) -> LocalFile {
    LocalFile::new(name, "image/jpeg", Bytes::from_static(b"\xff\xd8\xff\xe0"))
}

#[tokio::test]
async fn test_confirmed_location_invalidated_by_edit() {
    let (mut form, _) = form(EntityKind::Activity);
    let places = places();

    assert!(form.type_location("Gredos", &places).await);
    form.on_field_change(FieldUpdate::LocationSelected { index: 0 });
    assert!(form.resolver().is_confirmed());
    assert_eq!(form.draft().location(), "Sierra de Gredos, Ávila");

    // One extra character
    form.on_field_change(text(TextField::Location, "Sierra de Gredos, Ávilaa"));

    assert!(!form.resolver().is_confirmed());
    assert_eq!(form.draft().location(), "");
    assert_eq!(form.draft().lat(), "");
    assert_eq!(
        form.location_message().as_deref(),
        Some("Seleccione una ubicación de las sugerencias")
    );

    form.type_location("Arenas", &places).await;
    form.on_field_change(FieldUpdate::LocationSelected { index: 0 });

    assert!(form.resolver().is_confirmed());
    assert_eq!(form.draft().location(), "Arenas de San Pedro, Ávila");
    assert_eq!(form.draft().lat(), "40.21");
    assert_eq!(form.draft().lon(), "-5.09");
    assert!(form.location_message().is_none());
}

#[tokio::test]
async fn test_unconfirmed_location_blocks_submission() {
    let (mut form, _) = form(EntityKind::Activity);
    let backend = MockBackend::new();
    form.on_field_change(text(TextField::Title, "Ruta del Alberche"));
    form.on_field_change(FieldUpdate::Categories(vec!["Senderismo".to_string()]));
    form.on_field_change(text(TextField::Location, "Burgohondo, Ávila"));

    let err = form.submit(&backend).await.unwrap_err();

    assert_eq!(err, FormError::LocationNotConfirmed);
    assert_eq!(backend.call_count(), 0);
    assert_eq!(
        form.resolver().error(),
        Some(&ResolverError::SelectionRequired)
    );
}

#[tokio::test]
async fn test_stale_search_response_is_discarded() {
    let (mut form, _) = form(EntityKind::Activity);
    let places = places();

    let slow = form
        .on_field_change(text(TextField::Location, "Gredos"))
        .unwrap();
    let fast = form
        .on_field_change(text(TextField::Location, "Arenas"))
        .unwrap();

    let fast_outcome = fast.run(&places).await;
    let slow_outcome = slow.run(&places).await;
    assert!(form.on_search_result(fast_outcome));
    assert!(!form.on_search_result(slow_outcome));

    let labels: Vec<String> = form
        .resolver()
        .suggestions()
        .iter()
        .map(|s| s.display_label())
        .collect();
    assert_eq!(
        labels,
        vec!["Arenas de San Pedro, Ávila", "Arenas, Málaga"]
    );
}

#[tokio::test]
async fn test_short_query_does_not_search() {
    let (mut form, _) = form(EntityKind::Activity);
    let places = places();

    assert!(!form.type_location("Gr", &places).await);
    assert!(places.queries().is_empty());
}

#[tokio::test]
async fn test_provider_failure_is_retry_worthy() {
    let (mut form, _) = form(EntityKind::Activity);
    let places = places();
    places.set_failing(true);

    form.type_location("Gredos", &places).await;

    let err = form.resolver().error().unwrap();
    assert!(matches!(err, ResolverError::Provider(_)));
    assert!(err.is_recoverable());
    assert!(form.resolver().suggestions().is_empty());

    places.set_failing(false);
    form.type_location("Gredos ", &places).await;
    assert_eq!(form.resolver().suggestions().len(), 1);
    assert!(form.resolver().error().is_none());
}

#[tokio::test]
async fn test_successful_submission_clears_draft() {
    let (mut form, ledger) = form(EntityKind::Activity);
    let backend = MockBackend::new();
    let places = places();

    form.type_location("Gredos", &places).await;
    form.on_field_change(FieldUpdate::LocationSelected { index: 0 });
    form.on_field_change(text(TextField::Title, "Laguna Grande"));
    form.on_field_change(FieldUpdate::Categories(vec![
        "Senderismo".to_string(),
        "Senderismo".to_string(),
        "Montaña".to_string(),
    ]));
    form.on_field_change(FieldUpdate::FileList {
        files: vec![jpeg("laguna.jpg")],
    });
    form.preview_urls();
    assert_eq!(ledger.live(), 1);

    let id = form.submit(&backend).await.unwrap();

    let created = backend.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].field("title"), Some("Laguna Grande"));
    assert_eq!(created[0].field("category"), Some(r#"["Senderismo","Montaña"]"#));
    assert_eq!(created[0].files_for("images").count(), 1);
    assert_ne!(id, Uuid::nil());

    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(form.draft().title, "");
    assert_eq!(form.media().count(MediaCategory::Image), 0);
    assert_eq!(ledger.live(), 0);
    assert_eq!(ledger.invalid_releases(), 0);
}

#[tokio::test]
async fn test_failed_submission_retains_draft() {
    let (mut form, _) = form(EntityKind::Activity);
    let backend = MockBackend::new();
    let places = places();
    backend.fail_with(SubmissionError::Rejected {
        status: 503,
        message: "maintenance".to_string(),
    });

    form.type_location("Gredos", &places).await;
    form.on_field_change(FieldUpdate::LocationSelected { index: 0 });
    form.on_field_change(text(TextField::Title, "Laguna Grande"));
    form.on_field_change(FieldUpdate::Categories(vec!["Senderismo".to_string()]));

    let err = form.submit(&backend).await.unwrap_err();
    assert!(matches!(err, FormError::Submission(_)));
    assert!(err.is_recoverable());
    assert_eq!(form.draft().title, "Laguna Grande");
    assert!(form.resolver().is_confirmed());
    assert!(form.banner().is_some());

    backend.recover();
    assert!(form.submit(&backend).await.is_ok());
    assert_eq!(backend.created().len(), 1);
}

#[tokio::test]
async fn test_late_result_after_cancel_is_ignored() {
    let (mut form, ledger) = form(EntityKind::Activity);
    let backend = MockBackend::new();
    let places = places();

    form.type_location("Gredos", &places).await;
    form.on_field_change(FieldUpdate::LocationSelected { index: 0 });
    form.on_field_change(text(TextField::Title, "Laguna Grande"));
    form.on_field_change(FieldUpdate::Categories(vec!["Senderismo".to_string()]));
    form.on_media_stage(vec![jpeg("a.jpg")]).unwrap();
    form.preview_urls();

    let ticket = form.on_submit().unwrap();
    form.on_cancel();
    assert_eq!(ledger.live(), 0);

    // The request still reaches the backend
    let outcome = ticket.dispatch(&backend).await;
    assert_eq!(backend.created().len(), 1);
    assert_eq!(form.on_submit_result(outcome), SubmitStatus::Ignored);
    assert_eq!(form.state(), FormState::Idle);
}

#[tokio::test]
async fn test_edit_existing_record_uses_update() {
    let (mut form, ledger) = form(EntityKind::Event);
    let backend = MockBackend::new();
    let record = PersistedEntity {
        id: Uuid::new_v4(),
        kind: EntityKind::Event,
        title: "Noche de estrellas".to_string(),
        description: "Observación astronómica".to_string(),
        categories: Vec::new(),
        location: "Hoyos del Espino, Ávila".to_string(),
        lat: "40.34".to_string(),
        lon: "-5.17".to_string(),
        phone: "920 123 456".to_string(),
        email: String::new(),
        url: String::new(),
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 12),
        end_date: None,
        media: vec![
            MediaRef::new("cielo.jpg", MediaCategory::Image),
            MediaRef::new("luna.jpg", MediaCategory::Image),
            MediaRef::new("timelapse.mp4", MediaCategory::Video),
        ],
    };
    form.open_existing(&record);

    form.on_media_stage(vec![jpeg("nueva.jpg")]).unwrap();
    let previews = form.preview_urls();
    assert_eq!(previews.images.len(), 3);
    assert!(previews.images[2].starts_with("blob:"));

    // Index 2 of images is the staged file, index 0 of videos the persisted one
    form.on_media_remove(MediaCategory::Image, 2).unwrap();
    form.on_media_remove(MediaCategory::Video, 0).unwrap();
    assert_eq!(ledger.live(), 0);
    assert!(form.on_media_remove(MediaCategory::Video, 0).is_err());

    form.submit(&backend).await.unwrap();

    let updated = backend.updated();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, record.id);
    let payload = &updated[0].1;
    assert_eq!(payload.field("startDate"), Some("2026-08-12"));
    assert!(!payload.has_files());
    let refs: Vec<MediaRef> = serde_json::from_str(payload.field("mediaUrls").unwrap()).unwrap();
    assert_eq!(
        refs,
        vec![
            MediaRef::new("cielo.jpg", MediaCategory::Image),
            MediaRef::new("luna.jpg", MediaCategory::Image),
        ]
    );
    assert!(backend.created().is_empty());
}
