//! Local preview handles for staged files.
//!
//! A staged file has no server URL yet, so the view displays it through a
//! short-lived local handle (a `blob:` URL in a browser). Each handle must be
//! released exactly once and never outlive its file. [`PreviewLedger`] keeps
//! the counts so tests can assert that.

use rutas_core::models::LocalFile;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Opaque displayable handle for one staged file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source of preview handles.
pub trait PreviewProvider: Send {
    fn acquire(&mut self, file: &LocalFile) -> PreviewHandle;
    fn release(&mut self, handle: &PreviewHandle);
}

#[derive(Debug, Default)]
struct LedgerState {
    live: HashSet<PreviewHandle>,
    acquired: usize,
    released: usize,
    invalid_releases: usize,
}

/// Shared record of handles acquired and released.
#[derive(Debug, Clone, Default)]
pub struct PreviewLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl PreviewLedger {
    fn state(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_acquire(&self, handle: &PreviewHandle) {
        let mut state = self.state();
        state.acquired += 1;
        state.live.insert(handle.clone());
    }

    fn record_release(&self, handle: &PreviewHandle) {
        let mut state = self.state();
        if state.live.remove(handle) {
            state.released += 1;
        } else {
            state.invalid_releases += 1;
            tracing::error!(handle = %handle.as_str(), "Released a preview handle that is not live");
        }
    }

    /// Handles acquired and not yet released
    pub fn live(&self) -> usize {
        self.state().live.len()
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.state().live.contains(handle)
    }

    pub fn acquired(&self) -> usize {
        self.state().acquired
    }

    pub fn released(&self) -> usize {
        self.state().released
    }

    /// Releases of unknown or already released handles
    pub fn invalid_releases(&self) -> usize {
        self.state().invalid_releases
    }
}

/// Provider minting `blob:` style URLs, tracked in a [`PreviewLedger`].
#[derive(Debug, Clone)]
pub struct BlobPreviewProvider {
    origin: String,
    ledger: PreviewLedger,
}

impl BlobPreviewProvider {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ledger: PreviewLedger::default(),
        }
    }

    pub fn ledger(&self) -> PreviewLedger {
        self.ledger.clone()
    }
}

impl Default for BlobPreviewProvider {
    fn default() -> Self {
        Self::new("rutas")
    }
}

impl PreviewProvider for BlobPreviewProvider {
    fn acquire(&mut self, file: &LocalFile) -> PreviewHandle {
        let handle = PreviewHandle::new(format!("blob:{}/{}", self.origin, Uuid::new_v4()));
        tracing::trace!(file = %file.name, handle = %handle.as_str(), "Acquired preview handle");
        self.ledger.record_acquire(&handle);
        handle
    }

    fn release(&mut self, handle: &PreviewHandle) {
        self.ledger.record_release(handle);
    }
}
