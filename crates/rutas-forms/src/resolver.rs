//! Location resolver
//!
//! The location field only accepts values picked from place-search
//! suggestions. Typing never produces a valid location; it only issues
//! searches and invalidates whatever was confirmed before.
//!
//! Searches run outside the resolver. [`LocationResolver::on_input`] hands out
//! a [`SearchRequest`] tagged with a sequence number, the caller runs it
//! against a [`PlaceSearch`] and feeds the [`SearchOutcome`] back through
//! [`LocationResolver::apply`]. Outcomes older than the latest request are
//! dropped, so a slow query can never overwrite fresher suggestions.

use rutas_core::models::{ConfirmedLocation, DraftEntity, Suggestion};
use rutas_core::{PlaceSearch, ResolverError};

/// A place search the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

impl SearchRequest {
    pub async fn run(self, places: &dyn PlaceSearch) -> SearchOutcome {
        let result = places.search(&self.query).await;
        SearchOutcome {
            seq: self.seq,
            query: self.query,
            result,
        }
    }
}

/// Completed search, ready for [`LocationResolver::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Suggestion>, ResolverError>,
}

#[derive(Debug)]
pub struct LocationResolver {
    min_query_len: usize,
    confirmed: bool,
    error: Option<ResolverError>,
    suggestions: Vec<Suggestion>,
    latest_seq: u64,
}

impl LocationResolver {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            confirmed: false,
            error: None,
            suggestions: Vec::new(),
            latest_seq: 0,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn error(&self) -> Option<&ResolverError> {
        self.error.as_ref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Mark the draft's existing location as confirmed (edit and duplicate flows).
    pub fn restore_confirmed(&mut self, draft: &DraftEntity) {
        self.confirmed = !draft.location().trim().is_empty();
        self.error = None;
        self.suggestions.clear();
        self.latest_seq += 1;
    }

    /// Flag the field when a submit finds no confirmed location.
    pub fn require_selection(&mut self) {
        if !self.confirmed {
            self.error = Some(ResolverError::SelectionRequired);
        }
    }

    /// Drop all state, including any search still in flight.
    pub fn reset(&mut self) {
        self.confirmed = false;
        self.error = None;
        self.suggestions.clear();
        self.latest_seq += 1;
    }

    /// Handle a keystroke in the location input.
    ///
    /// Returns the search to run, if the query is long enough.
    pub fn on_input(&mut self, text: &str, draft: &mut DraftEntity) -> Option<SearchRequest> {
        if self.confirmed {
            tracing::debug!("Location edited after confirmation, clearing committed value");
            self.confirmed = false;
            draft.clear_location();
            self.error = Some(ResolverError::SelectionRequired);
        }

        self.latest_seq += 1;
        let query = text.trim();
        if query.chars().count() < self.min_query_len {
            self.suggestions.clear();
            if query.is_empty() || !matches!(self.error, Some(ResolverError::SelectionRequired)) {
                self.error = None;
            }
            return None;
        }

        Some(SearchRequest {
            seq: self.latest_seq,
            query: query.to_string(),
        })
    }

    /// Apply a completed search. Returns `false` if it was stale and ignored.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.seq != self.latest_seq {
            tracing::debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                query = %outcome.query,
                "Discarding stale place search result"
            );
            return false;
        }

        match outcome.result {
            Ok(suggestions) if suggestions.is_empty() => {
                self.suggestions.clear();
                self.error = Some(ResolverError::NoResults {
                    query: outcome.query,
                });
            }
            Ok(suggestions) => {
                self.suggestions = suggestions;
                if !matches!(self.error, Some(ResolverError::SelectionRequired)) {
                    self.error = None;
                }
            }
            Err(e) => {
                tracing::warn!(query = %outcome.query, error = %e, "Place search failed");
                self.suggestions.clear();
                self.error = Some(match e {
                    ResolverError::Provider(message) => ResolverError::Provider(message),
                    other => ResolverError::Provider(other.to_string()),
                });
            }
        }
        true
    }

    /// Commit the suggestion at `index` to the draft.
    ///
    /// Returns `None` (and changes nothing) if no suggestion is shown there.
    pub fn select(&mut self, index: usize, draft: &mut DraftEntity) -> Option<ConfirmedLocation> {
        let suggestion = self.suggestions.get(index)?;
        let location = ConfirmedLocation::from(suggestion);
        draft.commit_location(&location);

        self.confirmed = true;
        self.error = None;
        self.suggestions.clear();
        self.latest_seq += 1;

        tracing::debug!(location = %location.label, "Location confirmed");
        Some(location)
    }
}
