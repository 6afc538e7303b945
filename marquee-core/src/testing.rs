//! In-memory [`CatalogApi`] for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use marquee_model::{
    Availability, CatalogEntity, CatalogKind, ContentGroups, EntityId,
    IdentityKey,
};
use parking_lot::Mutex;
use tokio::sync::{Semaphore, watch};

use crate::api::{CatalogApi, RequestAck};
use crate::error::ApiError;

/// Scriptable stand-in for the remote service.
///
/// Responses are set per operation; every call is counted. Catalog listings
/// and submissions can be held open with a gate until the test releases it.
#[derive(Debug, Clone)]
pub struct StubCatalogApi {
    state: Arc<Mutex<StubState>>,
    calls: Arc<watch::Sender<CallCounts>>,
}

/// Number of calls the stub has received, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub networks: usize,
    pub studios: usize,
    pub content: usize,
    pub submissions: usize,
    pub status_checks: usize,
}

#[derive(Debug)]
struct StubState {
    networks: Result<Vec<CatalogEntity>, ApiError>,
    studios: Result<Vec<CatalogEntity>, ApiError>,
    content: HashMap<(CatalogKind, EntityId), Result<ContentGroups, ApiError>>,
    library_status: HashMap<IdentityKey, Availability>,
    submission_failure: Option<ApiError>,
    submitted: Vec<IdentityKey>,
    catalog_gate: Option<Arc<Semaphore>>,
    submission_gate: Option<Arc<Semaphore>>,
}

impl Default for StubCatalogApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StubCatalogApi {
    pub fn new() -> Self {
        let (calls, _) = watch::channel(CallCounts::default());
        Self {
            state: Arc::new(Mutex::new(StubState {
                networks: Ok(Vec::new()),
                studios: Ok(Vec::new()),
                content: HashMap::new(),
                library_status: HashMap::new(),
                submission_failure: None,
                submitted: Vec::new(),
                catalog_gate: None,
                submission_gate: None,
            })),
            calls: Arc::new(calls),
        }
    }

    pub fn set_catalog(&self, kind: CatalogKind, entities: Vec<CatalogEntity>) {
        let mut state = self.state.lock();
        match kind {
            CatalogKind::Networks => state.networks = Ok(entities),
            CatalogKind::Studios => state.studios = Ok(entities),
        }
    }

    pub fn fail_catalog(&self, kind: CatalogKind, error: ApiError) {
        let mut state = self.state.lock();
        match kind {
            CatalogKind::Networks => state.networks = Err(error),
            CatalogKind::Studios => state.studios = Err(error),
        }
    }

    pub fn set_content(&self, kind: CatalogKind, id: EntityId, groups: ContentGroups) {
        self.state.lock().content.insert((kind, id), Ok(groups));
    }

    pub fn fail_content(&self, kind: CatalogKind, id: EntityId, error: ApiError) {
        self.state.lock().content.insert((kind, id), Err(error));
    }

    pub fn set_library_status(&self, key: IdentityKey, availability: Availability) {
        self.state.lock().library_status.insert(key, availability);
    }

    /// Fail every following submission with `error`; `None` accepts again.
    pub fn fail_submissions(&self, error: Option<ApiError>) {
        self.state.lock().submission_failure = error;
    }

    /// Keys submitted so far, in call order.
    pub fn submitted(&self) -> Vec<IdentityKey> {
        self.state.lock().submitted.clone()
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.borrow()
    }

    /// Wait until the counts satisfy `predicate`.
    pub async fn wait_for_calls(&self, predicate: impl Fn(&CallCounts) -> bool) {
        let mut receiver = self.calls.subscribe();
        // The sender lives as long as `self`, so this only ends on success.
        let _ = receiver.wait_for(|counts| predicate(counts)).await;
    }

    /// Hold catalog listings open until [`release_catalogs`](Self::release_catalogs).
    pub fn hold_catalogs(&self) {
        self.state.lock().catalog_gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_catalogs(&self) {
        if let Some(gate) = self.state.lock().catalog_gate.take() {
            gate.close();
        }
    }

    /// Hold submissions open until [`release_submissions`](Self::release_submissions).
    pub fn hold_submissions(&self) {
        self.state.lock().submission_gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_submissions(&self) {
        if let Some(gate) = self.state.lock().submission_gate.take() {
            gate.close();
        }
    }

    fn record(&self, bump: impl FnOnce(&mut CallCounts)) {
        self.calls.send_modify(bump);
    }

    async fn catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntity>, ApiError> {
        self.record(|counts| match kind {
            CatalogKind::Networks => counts.networks += 1,
            CatalogKind::Studios => counts.studios += 1,
        });
        let gate = self.state.lock().catalog_gate.clone();
        pass(gate).await;

        let state = self.state.lock();
        match kind {
            CatalogKind::Networks => state.networks.clone(),
            CatalogKind::Studios => state.studios.clone(),
        }
    }
}

/// Wait for a closed gate; an absent gate passes immediately.
async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        let _ = gate.acquire().await;
    }
}

#[async_trait]
impl CatalogApi for StubCatalogApi {
    async fn list_networks(&self) -> Result<Vec<CatalogEntity>, ApiError> {
        self.catalog(CatalogKind::Networks).await
    }

    async fn list_studios(&self) -> Result<Vec<CatalogEntity>, ApiError> {
        self.catalog(CatalogKind::Studios).await
    }

    async fn list_content_for_entity(
        &self,
        kind: CatalogKind,
        id: &EntityId,
    ) -> Result<ContentGroups, ApiError> {
        self.record(|counts| counts.content += 1);
        self.state
            .lock()
            .content
            .get(&(kind, id.clone()))
            .cloned()
            .unwrap_or_else(|| Ok(ContentGroups::default()))
    }

    async fn submit_request(
        &self,
        key: IdentityKey,
    ) -> Result<RequestAck, ApiError> {
        let gate = {
            let mut state = self.state.lock();
            state.submitted.push(key);
            state.submission_gate.clone()
        };
        self.record(|counts| counts.submissions += 1);
        pass(gate).await;

        let state = self.state.lock();
        match &state.submission_failure {
            Some(error) => Err(error.clone()),
            None => Ok(RequestAck {
                id: Some(state.submitted.len() as u64),
                status: Some(1),
            }),
        }
    }

    async fn check_library_status(
        &self,
        key: IdentityKey,
    ) -> Result<Availability, ApiError> {
        self.record(|counts| counts.status_checks += 1);
        Ok(self
            .state
            .lock()
            .library_status
            .get(&key)
            .copied()
            .unwrap_or(Availability::NotAvailable))
    }
}
