use std::collections::HashSet;

use super::NotifyError;
use crate::storage::KeyValueStore;

const FIRED_VALUE: &str = "true";

/// Remembers which (subscription, renewal date) pairs have been announced.
pub trait MarkerStore {
    fn has_fired(&self, key: &str) -> Result<bool, NotifyError>;
    fn mark_fired(&mut self, key: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryMarkerStore {
    fired: HashSet<String>,
}

impl MarkerStore for MemoryMarkerStore {
    fn has_fired(&self, key: &str) -> Result<bool, NotifyError> {
        Ok(self.fired.contains(key))
    }

    fn mark_fired(&mut self, key: &str) -> Result<(), NotifyError> {
        self.fired.insert(key.to_string());
        Ok(())
    }
}

/// Persists markers in a key-value store, one entry per dedupe key.
pub struct KeyValueMarkerStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> KeyValueMarkerStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + ?Sized> MarkerStore for KeyValueMarkerStore<'_, S> {
    fn has_fired(&self, key: &str) -> Result<bool, NotifyError> {
        self.store
            .load(key)
            .map(|value| value.is_some())
            .map_err(|err| NotifyError::Markers(err.to_string()))
    }

    fn mark_fired(&mut self, key: &str) -> Result<(), NotifyError> {
        self.store
            .save(key, FIRED_VALUE)
            .map_err(|err| NotifyError::Markers(err.to_string()))
    }
}
