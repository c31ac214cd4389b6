use serde::{Deserialize, Serialize};

/// RSVP submitted from the public event page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub attendees: u32,
    #[serde(default)]
    pub message: String,
}
