use serde::{Deserialize, Serialize};

/// One place-search result as returned by the place-search proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub place_label: String,
    pub address_label: String,
    pub lat: String,
    pub lon: String,
    #[serde(rename = "id")]
    pub provider_id: String,
}

impl Suggestion {
    /// Label committed to the draft's `location` field.
    pub fn display_label(&self) -> String {
        format!("{}, {}", self.place_label, self.address_label)
    }
}

/// Location values committed together from a single suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedLocation {
    pub label: String,
    pub lat: String,
    pub lon: String,
}

impl From<&Suggestion> for ConfirmedLocation {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            label: suggestion.display_label(),
            lat: suggestion.lat.clone(),
            lon: suggestion.lon.clone(),
        }
    }
}
