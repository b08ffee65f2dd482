//! Persistent key-value storage and the typed helpers that keep the subscription
//! collection in it.

pub mod exchange;
pub mod json_file;

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::{debug, warn};

use crate::errors::{Result, TrackerError};
use crate::subscription::Subscription;

pub use exchange::{export_json, import_json};
pub use json_file::JsonFileStore;

/// Key under which the ordered subscription collection is persisted.
pub const SUBSCRIPTIONS_KEY: &str = "subtracker_subscriptions";

/// Abstraction over string key-value persistence (browser local storage, a JSON file, memory).
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> TrackerError {
    TrackerError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Loads the persisted collection in stored order; a missing key is an empty collection.
///
/// The stored value must be a JSON array. Elements that do not form a record are skipped
/// with a warning so the rest of the collection still loads.
pub fn load_subscriptions<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Subscription>> {
    let Some(data) = store.load(SUBSCRIPTIONS_KEY)? else {
        return Ok(Vec::new());
    };
    let items: Vec<serde_json::Value> = serde_json::from_str(&data)?;
    let mut subs = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Subscription>(item) {
            Ok(sub) => subs.push(sub),
            Err(err) => warn!(index, error = %err, "skipping unreadable stored subscription"),
        }
    }
    debug!(count = subs.len(), "subscriptions loaded");
    Ok(subs)
}

pub fn save_subscriptions<S: KeyValueStore + ?Sized>(
    store: &S,
    subscriptions: &[Subscription],
) -> Result<()> {
    let data = serde_json::to_string(subscriptions)?;
    store.save(SUBSCRIPTIONS_KEY, &data)?;
    debug!(count = subscriptions.len(), "subscriptions saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{BillingFrequency, SubscriptionDraft};

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn collection_is_saved_under_the_shared_key() {
        let store = MemoryStore::new();
        assert!(load_subscriptions(&store).unwrap().is_empty());

        let subs = vec![Subscription::with_id(
            "1",
            SubscriptionDraft::new("Netflix", 10.0, BillingFrequency::Monthly, "Streaming")
                .renewing("2024-03-01"),
        )];
        save_subscriptions(&store, &subs).unwrap();

        let raw = store.load(SUBSCRIPTIONS_KEY).unwrap().unwrap();
        assert!(raw.contains("Netflix"));
        assert_eq!(load_subscriptions(&store).unwrap(), subs);
    }

    #[test]
    fn bad_records_do_not_block_the_rest() {
        let store = MemoryStore::new();
        let payload = r#"[
            {"id":"good","name":"Gym","price":10,"frequency":"monthly","category":"Health"},
            {"id":"nullprice","name":"Odd","price":null,"frequency":"monthly","category":"X"},
            {"name":"no id or frequency"},
            42
        ]"#;
        store.save(SUBSCRIPTIONS_KEY, payload).unwrap();

        let subs = load_subscriptions(&store).unwrap();
        let ids: Vec<_> = subs.iter().map(|sub| sub.id.as_str()).collect();
        assert_eq!(ids, ["good", "nullprice"]);
        assert_eq!(subs[1].price, 0.0);
    }

    #[test]
    fn non_array_payload_is_an_error() {
        let store = MemoryStore::new();
        store.save(SUBSCRIPTIONS_KEY, r#"{"id":"1"}"#).unwrap();
        assert!(matches!(
            load_subscriptions(&store),
            Err(TrackerError::Serde(_))
        ));
    }
}
