//! Rutas form engine
//!
//! Keeps a draft activity or event consistent while it is edited: field
//! validation, location confirmation, media staging and removal, and the
//! submit state machine. Network access goes through the collaborator traits
//! in `rutas_core::hooks`.

pub mod controller;
pub mod payload;
pub mod preview;
pub mod reconciler;
pub mod resolver;
pub mod rsvp;
pub mod validator;

pub use controller::{
    FieldUpdate, FormController, FormState, SubmissionOutcome, SubmissionTicket, SubmitStatus,
    TextField,
};
pub use payload::build_payload;
pub use preview::{BlobPreviewProvider, PreviewHandle, PreviewLedger, PreviewProvider};
pub use reconciler::{MediaPreviews, MediaReconciler, RemovedMedia};
pub use resolver::{LocationResolver, SearchOutcome, SearchRequest};
pub use rsvp::{RsvpError, RsvpField, RsvpForm};
pub use validator::MediaValidator;
