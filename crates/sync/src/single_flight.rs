//! Per-resource single-flight coordination.
//!
//! The first caller for a key becomes the leader and runs the fetch; callers
//! arriving while it is in flight subscribe to a one-shot completion signal
//! (a `watch` channel) and receive the same outcome. No polling.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

/// Outcome handed to every caller of one flight.
pub type Shared<T, E> = Result<T, Arc<E>>;

/// What happens to a key once its flight settles successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Keep the value; later requests return it without fetching.
    Session,
    /// Forget the value; the next request after settlement fetches again.
    Ephemeral,
}

/// Observable state of one resource key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Idle,
    InFlight,
    Settled,
}

enum Slot<T, E> {
    InFlight(watch::Receiver<Option<Shared<T, E>>>),
    Settled(T),
}

enum Join<T, E> {
    Cached(T),
    Wait(watch::Receiver<Option<Shared<T, E>>>),
    Lead(watch::Sender<Option<Shared<T, E>>>),
}

/// At most one in-flight fetch per key; concurrent callers share its result.
///
/// Failed outcomes are broadcast to the callers of that flight and then
/// forgotten, so the next request fetches again.
pub struct SingleFlight<K, T, E> {
    slots: Mutex<HashMap<K, Slot<T, E>>>,
}

impl<K, T, E> Default for SingleFlight<K, T, E> {
    fn default() -> Self {
        Self { slots: Mutex::new(HashMap::new()) }
    }
}

impl<K, T, E> SingleFlight<K, T, E>
where
    K: Eq + Hash + Clone + Debug,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, running `fetch` only if no flight is
    /// in progress and no retained value exists.
    ///
    /// If the leader is dropped before settling, its waiters start over and
    /// one of them leads a fresh fetch.
    pub async fn run<F, Fut>(&self, key: K, retention: Retention, fetch: F) -> Shared<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        loop {
            match self.join(&key) {
                Join::Cached(value) => {
                    tracing::trace!(?key, "single-flight: retained value");
                    return Ok(value);
                },
                Join::Wait(mut rx) => {
                    tracing::debug!(?key, "single-flight: joining in-flight fetch");
                    let settled =
                        rx.wait_for(Option::is_some).await.ok().and_then(|outcome| (*outcome).clone());
                    match settled {
                        Some(outcome) => return outcome,
                        None => tracing::debug!(?key, "single-flight: leader abandoned, retrying"),
                    }
                },
                Join::Lead(tx) => return self.lead(key, retention, tx, fetch).await,
            }
        }
    }

    pub fn state(&self, key: &K) -> FlightState {
        match self.lock().get(key) {
            None => FlightState::Idle,
            Some(Slot::InFlight(_)) => FlightState::InFlight,
            Some(Slot::Settled(_)) => FlightState::Settled,
        }
    }

    /// Drops a retained value. In-flight entries are left alone.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut slots = self.lock();
        if matches!(slots.get(key), Some(Slot::Settled(_))) {
            slots.remove(key);
            true
        } else {
            false
        }
    }

    fn join(&self, key: &K) -> Join<T, E> {
        let mut slots = self.lock();
        match slots.get(key) {
            Some(Slot::Settled(value)) => Join::Cached(value.clone()),
            Some(Slot::InFlight(rx)) => Join::Wait(rx.clone()),
            None => {
                let (tx, rx) = watch::channel(None);
                slots.insert(key.clone(), Slot::InFlight(rx));
                Join::Lead(tx)
            },
        }
    }

    async fn lead<F, Fut>(
        &self,
        key: K,
        retention: Retention,
        tx: watch::Sender<Option<Shared<T, E>>>,
        fetch: F,
    ) -> Shared<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        tracing::debug!(?key, ?retention, "single-flight: starting fetch");
        let mut abandon = AbandonGuard { flight: self, key: Some(key) };
        let outcome = fetch().await.map_err(Arc::new);

        if let Some(key) = abandon.key.take() {
            let mut slots = self.lock();
            match (&outcome, retention) {
                (Ok(value), Retention::Session) => {
                    slots.insert(key, Slot::Settled(value.clone()));
                },
                _ => {
                    slots.remove(&key);
                },
            }
        }
        tx.send_replace(Some(outcome.clone()));
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<T, E>>> {
        // Slot updates are single inserts/removes, so a poisoned map is still consistent.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight slot if the leader's future is dropped mid-fetch.
struct AbandonGuard<'a, K, T, E>
where
    K: Eq + Hash,
{
    flight: &'a SingleFlight<K, T, E>,
    key: Option<K>,
}

impl<K, T, E> Drop for AbandonGuard<'_, K, T, E>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            let mut slots = self.flight.slots.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(slots.get(&key), Some(Slot::InFlight(_))) {
                slots.remove(&key);
            }
        }
    }
}
