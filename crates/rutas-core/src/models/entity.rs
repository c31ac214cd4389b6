use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use super::location::ConfirmedLocation;
use super::media::MediaRef;

/// Kind of record a form authors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Activity,
    Event,
}

impl EntityKind {
    /// Collection path segment on the backend API.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Activity => "activities",
            EntityKind::Event => "events",
        }
    }
}

impl FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "activity" | "activities" => Ok(EntityKind::Activity),
            "event" | "events" => Ok(EntityKind::Event),
            _ => Err(anyhow::anyhow!("Invalid entity kind: {}", s)),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EntityKind::Activity => write!(f, "activity"),
            EntityKind::Event => write!(f, "event"),
        }
    }
}

/// In-progress activity or event record.
///
/// Media attachments are owned by the media reconciler, not by the draft.
/// `location`, `lat` and `lon` only change together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntity {
    pub kind: EntityKind,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    location: String,
    lat: String,
    lon: String,
    pub phone: String,
    pub email: String,
    pub url: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DraftEntity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn lat(&self) -> &str {
        &self.lat
    }

    pub fn lon(&self) -> &str {
        &self.lon
    }

    pub fn commit_location(&mut self, location: &ConfirmedLocation) {
        self.location = location.label.clone();
        self.lat = location.lat.clone();
        self.lon = location.lon.clone();
    }

    pub fn clear_location(&mut self) {
        self.location.clear();
        self.lat.clear();
        self.lon.clear();
    }

    /// Add a category unless it is already selected. Returns whether it was added.
    pub fn add_category(&mut self, category: &str) -> bool {
        let category = category.trim();
        if category.is_empty() || self.categories.iter().any(|c| c == category) {
            return false;
        }
        self.categories.push(category.to_string());
        true
    }

    /// Replace the category selection, dropping blanks and duplicates.
    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.categories.clear();
        for category in categories {
            self.add_category(category.as_ref());
        }
    }

    pub fn has_contact_channel(&self) -> bool {
        [&self.phone, &self.email, &self.url]
            .iter()
            .any(|value| !value.trim().is_empty())
    }
}

/// Record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntity {
    pub id: Uuid,
    pub kind: EntityKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "category")]
    pub categories: Vec<String>,
    pub location: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
}

impl PersistedEntity {
    /// Draft pre-filled from this record, location committed.
    pub fn to_draft(&self) -> DraftEntity {
        let mut draft = DraftEntity {
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            categories: Vec::new(),
            location: String::new(),
            lat: String::new(),
            lon: String::new(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            url: self.url.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        };
        draft.set_categories(&self.categories);
        if !self.location.trim().is_empty() {
            draft.commit_location(&ConfirmedLocation {
                label: self.location.clone(),
                lat: self.lat.clone(),
                lon: self.lon.clone(),
            });
        }
        draft
    }
}

/// List item used by the public directory (map and calendar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySummary {
    pub id: Uuid,
    pub kind: EntityKind,
    pub title: String,
    pub location: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }
}

/// Page of list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Response body of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntity {
    pub id: Uuid,
}
