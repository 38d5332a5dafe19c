//! In-process idempotency cache with an atomic claim primitive.
//!
//! Keys follow the `{scope}:{subject}:{key}` convention. A caller first
//! `claim()`s a key: the first claimant gets [`Claim::Acquired`] and must
//! later `fulfill()` (store the result) or `release()` (abort). Any caller
//! arriving while the claim is open observes [`Claim::InFlight`]; after
//! fulfillment, [`Claim::Replay`] with the stored value. This closes the
//! check-then-act race of a plain get/put cache: at most one claimant ever
//! executes the side effect per key within the TTL window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of attempting to claim a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Claim<V> {
    /// The caller owns the key and must fulfill or release it.
    Acquired,
    /// Another claimant holds the key and has not finished.
    InFlight,
    /// The key was already fulfilled; the stored value is returned.
    Replay(V),
}

enum Entry<V> {
    InFlight { claimed_at: Instant },
    Done { value: V, stored_at: Instant },
}

/// TTL-bounded idempotency cache.
pub struct IdempotencyCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    ttl: Duration,
}

impl<V: Clone> IdempotencyCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Atomically claim `key`, or observe its current state.
    ///
    /// Expired entries (fulfilled or stale in-flight claims) are treated as
    /// absent and re-claimed.
    pub fn claim(&self, key: &str) -> Claim<V> {
        let mut entries = self.entries.lock().expect("idempotency cache poisoned");
        let now = Instant::now();

        match entries.get(key) {
            Some(Entry::Done { value, stored_at }) if now.duration_since(*stored_at) < self.ttl => {
                return Claim::Replay(value.clone());
            }
            Some(Entry::InFlight { claimed_at })
                if now.duration_since(*claimed_at) < self.ttl =>
            {
                return Claim::InFlight;
            }
            _ => {}
        }

        entries.insert(key.to_string(), Entry::InFlight { claimed_at: now });
        Claim::Acquired
    }

    /// Store the result for a claimed key, making it replayable.
    pub fn fulfill(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().expect("idempotency cache poisoned");
        entries.insert(
            key.to_string(),
            Entry::Done {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Abort a claim so the key can be retried immediately.
    pub fn release(&self, key: &str) {
        let mut entries = self.entries.lock().expect("idempotency cache poisoned");
        if let Some(Entry::InFlight { .. }) = entries.get(key) {
            entries.remove(key);
        }
    }

    /// Look up a fulfilled value without claiming.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock().expect("idempotency cache poisoned");
        match entries.get(key) {
            Some(Entry::Done { value, stored_at })
                if stored_at.elapsed() < self.ttl =>
            {
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// Drop expired entries. Called opportunistically by housekeeping.
    pub fn purge_expired(&self) {
        let mut entries = self.entries.lock().expect("idempotency cache poisoned");
        let ttl = self.ttl;
        entries.retain(|_, entry| match entry {
            Entry::InFlight { claimed_at } => claimed_at.elapsed() < ttl,
            Entry::Done { stored_at, .. } => stored_at.elapsed() < ttl,
        });
    }
}

/// Build the cache key for an archetype application.
pub fn archetype_key(project_id: i64, idempotency_key: &str) -> String {
    format!("idempotency:{project_id}:{idempotency_key}")
}
