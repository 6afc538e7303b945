use std::fmt;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use marquee_model::{Availability, ContentItem, IdentityKey};
use tokio::sync::{broadcast, watch};
use tracing::trace;

use crate::error::MarqueeError;

const TRANSITION_CHANNEL_CAPACITY: usize = 256;

/// One availability change of one identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub key: IdentityKey,
    pub from: Availability,
    pub to: Availability,
}

struct Slot {
    state: watch::Sender<Availability>,
    in_flight: bool,
}

impl Slot {
    fn new(initial: Availability) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            in_flight: false,
        }
    }

    fn current(&self) -> Availability {
        *self.state.borrow()
    }

    fn set(&self, key: IdentityKey, to: Availability) -> Option<TransitionEvent> {
        let from = self.state.send_replace(to);
        (from != to).then_some(TransitionEvent { key, from, to })
    }
}

/// Authoritative availability per identity key.
///
/// Every on-screen representation of an item holds a [`Representation`]
/// subscribed to its key, so a single write fans out to all of them.
pub struct AvailabilityStore {
    slots: DashMap<IdentityKey, Slot>,
    transitions: broadcast::Sender<TransitionEvent>,
}

impl fmt::Debug for AvailabilityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityStore")
            .field("keys", &self.slots.len())
            .finish_non_exhaustive()
    }
}

impl Default for AvailabilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityStore {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            slots: DashMap::new(),
            transitions,
        }
    }

    pub fn subscribe_transitions(&self) -> broadcast::Receiver<TransitionEvent> {
        self.transitions.subscribe()
    }

    fn publish(&self, event: Option<TransitionEvent>) {
        if let Some(event) = event {
            trace!(key = %event.key, from = ?event.from, to = ?event.to, "availability transition");
            let _ = self.transitions.send(event);
        }
    }

    /// Register a representation of `item`.
    ///
    /// The fetched availability only seeds a key the store does not hold yet.
    /// A key already held keeps its state and the new representation adopts
    /// it, so a stale fetch never rewrites what other views show.
    pub fn attach(&self, item: &ContentItem) -> Representation {
        let key = item.key();
        let receiver = self
            .slots
            .entry(key)
            .or_insert_with(|| Slot::new(item.availability))
            .state
            .subscribe();
        Representation { key, receiver }
    }

    pub fn current(&self, key: &IdentityKey) -> Option<Availability> {
        self.slots.get(key).map(|slot| slot.current())
    }

    pub fn is_in_flight(&self, key: &IdentityKey) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.in_flight)
    }

    /// Number of live representations of a key.
    pub fn representation_count(&self, key: &IdentityKey) -> usize {
        self.slots
            .get(key)
            .map(|slot| slot.state.receiver_count())
            .unwrap_or(0)
    }

    /// Atomically move `item` from `NotAvailable` to `RequestPending`.
    ///
    /// The check and the write happen under the key's map entry, so of two
    /// concurrent submissions for one key exactly one wins.
    pub fn begin_submission(&self, item: &ContentItem) -> Result<(), MarqueeError> {
        let key = item.key();
        let event = {
            let mut slot = self
                .slots
                .entry(key)
                .or_insert_with(|| Slot::new(item.availability));

            let current = slot.current();
            if slot.in_flight || current == Availability::RequestPending {
                return Err(MarqueeError::DuplicateSubmission(key));
            }
            if !current.is_requestable() {
                return Err(MarqueeError::NotRequestable {
                    key,
                    availability: current,
                });
            }

            slot.in_flight = true;
            slot.set(key, Availability::RequestPending)
        };
        self.publish(event);
        Ok(())
    }

    /// Settle a successful submission.
    pub fn complete_submission(&self, key: IdentityKey, to: Availability) {
        let event = self.slots.get_mut(&key).and_then(|mut slot| {
            slot.in_flight = false;
            slot.set(key, to)
        });
        self.publish(event);
    }

    /// Roll a failed submission back through `RequestFailed` to
    /// `NotAvailable`.
    pub fn roll_back_submission(&self, key: IdentityKey) {
        let events = self.slots.get_mut(&key).map(|mut slot| {
            slot.in_flight = false;
            let failed = slot.set(key, Availability::RequestFailed);
            let settled = slot.set(key, Availability::RequestFailed.settle());
            [failed, settled]
        });
        for event in events.into_iter().flatten() {
            self.publish(event);
        }
    }

    /// Publish availability reported by the service unless a submission for
    /// the key is in flight. Returns the state the key ends up in.
    pub fn apply_reported(
        &self,
        key: IdentityKey,
        reported: Availability,
    ) -> Availability {
        let (event, resulting) = match self.slots.entry(key) {
            Entry::Occupied(occupied) => {
                let slot = occupied.get();
                if slot.in_flight {
                    (None, slot.current())
                } else {
                    (slot.set(key, reported), reported)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::new(reported));
                (None, reported)
            }
        };
        self.publish(event);
        resulting
    }

    /// Drop keys that no representation observes and no submission holds.
    pub fn prune(&self) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|_, slot| slot.in_flight || slot.state.receiver_count() > 0);
        before.saturating_sub(self.slots.len())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A subscription to one item's availability, held by each place the item is
/// shown.
#[derive(Debug, Clone)]
pub struct Representation {
    key: IdentityKey,
    receiver: watch::Receiver<Availability>,
}

impl Representation {
    pub fn key(&self) -> IdentityKey {
        self.key
    }

    pub fn availability(&self) -> Availability {
        *self.receiver.borrow()
    }

    /// Whether the request affordance is shown for this item.
    pub fn shows_request_affordance(&self) -> bool {
        self.availability().is_requestable()
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Availability> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_model::{MediaId, MediaType};

    fn item(id: u64, availability: Availability) -> ContentItem {
        ContentItem {
            id: MediaId(id),
            media_type: MediaType::Movie,
            title: format!("Movie {id}"),
            poster_ref: None,
            release_date: None,
            library_ref: None,
            availability,
        }
    }

    #[test]
    fn attach_shares_state_between_representations() {
        let store = AvailabilityStore::new();
        let first = store.attach(&item(42, Availability::NotAvailable));
        let second = store.attach(&item(42, Availability::NotAvailable));
        assert_eq!(store.representation_count(&first.key()), 2);

        store.begin_submission(&item(42, Availability::NotAvailable)).unwrap();
        assert_eq!(first.availability(), Availability::RequestPending);
        assert_eq!(second.availability(), Availability::RequestPending);
        assert!(!second.shows_request_affordance());
    }

    #[test]
    fn second_submission_is_rejected() {
        let store = AvailabilityStore::new();
        let movie = item(7, Availability::NotAvailable);
        store.begin_submission(&movie).unwrap();
        assert!(matches!(
            store.begin_submission(&movie),
            Err(MarqueeError::DuplicateSubmission(key)) if key == movie.key()
        ));
    }

    #[test]
    fn available_items_never_enter_the_machine() {
        let store = AvailabilityStore::new();
        let movie = item(8, Availability::Available);
        assert!(matches!(
            store.begin_submission(&movie),
            Err(MarqueeError::NotRequestable {
                availability: Availability::Available,
                ..
            })
        ));
        assert!(!store.is_in_flight(&movie.key()));
    }

    #[test]
    fn rollback_passes_through_request_failed() {
        let store = AvailabilityStore::new();
        let movie = item(9, Availability::NotAvailable);
        let representation = store.attach(&movie);
        let mut transitions = store.subscribe_transitions();

        store.begin_submission(&movie).unwrap();
        store.roll_back_submission(movie.key());

        let seen: Vec<_> = std::iter::from_fn(|| transitions.try_recv().ok())
            .map(|event| event.to)
            .collect();
        assert_eq!(
            seen,
            vec![
                Availability::RequestPending,
                Availability::RequestFailed,
                Availability::NotAvailable,
            ]
        );
        assert!(representation.shows_request_affordance());
    }

    #[test]
    fn fetched_availability_does_not_override_held_state() {
        let store = AvailabilityStore::new();
        let movie = item(10, Availability::NotAvailable);
        let mut transitions = store.subscribe_transitions();
        store.begin_submission(&movie).unwrap();

        let late = store.attach(&movie);
        assert_eq!(late.availability(), Availability::RequestPending);

        store.complete_submission(movie.key(), Availability::Requested);
        let refetched = store.attach(&item(10, Availability::NotAvailable));
        assert_eq!(late.availability(), Availability::Requested);
        assert_eq!(refetched.availability(), Availability::Requested);
        assert!(!refetched.shows_request_affordance());

        let seen: Vec<_> = std::iter::from_fn(|| transitions.try_recv().ok())
            .map(|event| event.to)
            .collect();
        assert_eq!(
            seen,
            vec![Availability::RequestPending, Availability::Requested]
        );
    }

    #[test]
    fn attach_seeds_a_key_again_once_pruned() {
        let store = AvailabilityStore::new();
        drop(store.attach(&item(11, Availability::NotAvailable)));
        assert_eq!(store.prune(), 1);

        let fresh = store.attach(&item(11, Availability::Available));
        assert_eq!(fresh.availability(), Availability::Available);
    }

    #[test]
    fn prune_keeps_observed_and_in_flight_keys() {
        let store = AvailabilityStore::new();
        let watched = store.attach(&item(1, Availability::NotAvailable));
        drop(store.attach(&item(2, Availability::NotAvailable)));
        store.begin_submission(&item(3, Availability::NotAvailable)).unwrap();

        assert_eq!(store.prune(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.current(&watched.key()), Some(Availability::NotAvailable));
    }
}
