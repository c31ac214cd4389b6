//! Directory adapters
//!
//! Turn list results into the marker and calendar-entry lists consumed by the
//! map and calendar widgets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{EntityKind, EntitySummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub label: String,
}

fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value.abs() <= limit).then_some(value)
}

/// Map markers for every item with usable coordinates.
pub fn map_markers(items: &[EntitySummary]) -> Vec<Marker> {
    items
        .iter()
        .filter_map(|item| {
            let lat = parse_coordinate(&item.lat, 90.0);
            let lon = parse_coordinate(&item.lon, 180.0);
            match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Marker {
                    id: item.id,
                    lat,
                    lon,
                    label: item.title.clone(),
                }),
                _ => {
                    tracing::debug!(id = %item.id, "Skipping item without usable coordinates");
                    None
                }
            }
        })
        .collect()
}

/// Calendar entries for dated events, earliest first.
pub fn calendar_entries(items: &[EntitySummary]) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = items
        .iter()
        .filter(|item| item.kind == EntityKind::Event)
        .filter_map(|item| {
            item.start_date.map(|date| CalendarEntry {
                id: item.id,
                date,
                label: item.title.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.label.cmp(&b.label)));
    entries
}
