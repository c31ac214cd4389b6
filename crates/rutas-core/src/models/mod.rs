pub mod entity;
pub mod location;
pub mod media;
pub mod payload;
pub mod rsvp;

pub use entity::{
    CreatedEntity, DraftEntity, EntityKind, EntitySummary, Page, Pagination, PersistedEntity,
};
pub use location::{ConfirmedLocation, Suggestion};
pub use media::{LocalFile, MediaCategory, MediaRef};
pub use payload::{FilePart, SubmissionPayload};
pub use rsvp::RsvpRequest;
