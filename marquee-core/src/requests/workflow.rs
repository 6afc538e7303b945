use std::sync::Arc;

use marquee_model::{Availability, ContentItem, IdentityKey};
use tracing::{info, warn};

use super::store::AvailabilityStore;
use crate::api::CatalogApi;
use crate::error::{MarqueeError, Result};
use crate::notify::NotificationService;

/// Result of one submission, consumed by notifications and rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure(String),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success)
    }
}

/// Drives the per-item request state machine:
/// `NotAvailable -> RequestPending -> Requested | RequestFailed -> NotAvailable`.
#[derive(Debug, Clone)]
pub struct RequestWorkflow {
    api: Arc<dyn CatalogApi>,
    store: Arc<AvailabilityStore>,
    notifications: Arc<NotificationService>,
}

impl RequestWorkflow {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        store: Arc<AvailabilityStore>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            api,
            store,
            notifications,
        }
    }

    pub fn store(&self) -> &Arc<AvailabilityStore> {
        &self.store
    }

    /// Submit a request for `item`.
    ///
    /// Fails without contacting the service when the item is not requestable
    /// or a submission for the same key is already in flight. Otherwise every
    /// representation moves to `RequestPending` before the call, and to
    /// `Requested` or back to `NotAvailable` after it.
    pub async fn submit(&self, item: &ContentItem) -> Result<RequestOutcome> {
        let key = item.key();
        self.store.begin_submission(item)?;
        let guard = InFlightGuard::new(&self.store, key);

        info!(%key, title = %item.title, "submitting request");
        let result = self.api.submit_request(key).await;
        guard.disarm();

        match result {
            Ok(ack) => {
                self.store
                    .complete_submission(key, Availability::Requested);
                info!(%key, ack_id = ?ack.id, "request accepted");
                self.notifications
                    .success(item.title.clone(), "Request submitted");
                Ok(RequestOutcome::Success)
            }
            Err(error) => {
                self.store.roll_back_submission(key);
                warn!(%key, %error, "request failed; rolled back");
                let reason = error.reason();
                self.notifications.error(
                    item.title.clone(),
                    format!("Request failed: {reason}"),
                );
                Ok(RequestOutcome::Failure(reason))
            }
        }
    }

    /// Ask the service for the current availability of `item` and publish it
    /// to every representation, unless a submission is in flight.
    pub async fn reconcile(&self, item: &ContentItem) -> Result<Availability> {
        let key = item.key();
        let reported = self
            .api
            .check_library_status(key)
            .await
            .map_err(MarqueeError::from)?;
        Ok(self.store.apply_reported(key, reported))
    }
}

/// Rolls the key back if the submission future is dropped mid-call.
struct InFlightGuard<'a> {
    store: &'a AvailabilityStore,
    key: IdentityKey,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(store: &'a AvailabilityStore, key: IdentityKey) -> Self {
        Self {
            store,
            key,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(key = %self.key, "request submission abandoned; rolling back");
            self.store.roll_back_submission(self.key);
        }
    }
}
