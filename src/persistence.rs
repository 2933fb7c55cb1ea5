use crate::storage::KeyValueStore;
use crate::store::{CollectionKey, EntityStore};
use tracing::{debug, error, warn};

/// Mirrors store collections into a key-value namespace.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Builds a store from whatever the namespace holds. Absent keys keep
    /// their defaults; unreadable or malformed values are logged and also
    /// fall back to defaults.
    pub fn load(&self) -> EntityStore {
        let mut store = EntityStore::new();
        for key in CollectionKey::ALL {
            match self.storage.get(key.storage_key()) {
                Ok(Some(text)) => {
                    if let Err(err) = store.decode(key, &text) {
                        warn!(key = key.storage_key(), %err, "malformed stored value, using default");
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(key = key.storage_key(), %err, "failed to read stored value"),
            }
        }
        store.settle();
        store
    }

    /// Writes every collection changed since the last flush. Failures are
    /// logged and counted, never propagated.
    pub fn flush(&mut self, store: &mut EntityStore) -> usize {
        let changes = store.take_changes();
        self.write(store, &changes)
    }

    /// Writes every collection regardless of change marks.
    pub fn save_all(&mut self, store: &mut EntityStore) -> usize {
        store.take_changes();
        self.write(store, &CollectionKey::ALL)
    }

    fn write(&mut self, store: &EntityStore, keys: &[CollectionKey]) -> usize {
        let mut failures = 0;
        for &key in keys {
            let result = store
                .encode(key)
                .map_err(Into::into)
                .and_then(|text| self.storage.set(key.storage_key(), text));
            match result {
                Ok(()) => debug!(key = key.storage_key(), "persisted collection"),
                Err(err) => {
                    failures += 1;
                    error!(key = key.storage_key(), %err, "failed to persist collection");
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DashboardError;
    use crate::models::MetricSection;
    use crate::storage::MemoryStore;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, DashboardError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), DashboardError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let mut storage = MemoryStore::new();
        storage.set("charts", "[{\"broken\": true}".to_string()).unwrap();
        storage.set("dashboardTitle", "Продажи".to_string()).unwrap();
        storage.set("clientMetrics", "[]".to_string()).unwrap();

        let store = Persistence::new(storage).load();
        assert_eq!(store.charts(), EntityStore::new().charts());
        assert_eq!(store.title(), "Продажи");
        assert!(store.section_metrics(MetricSection::Client).is_empty());
        assert!(!store.has_changes());
    }

    #[test]
    fn flush_writes_only_changed_collections() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let mut store = persistence.load();
        store.set_title("Ops");
        assert_eq!(persistence.flush(&mut store), 0);

        let keys: Vec<_> = persistence.storage().entries().keys().cloned().collect();
        assert_eq!(keys, vec!["dashboardMeta".to_string(), "dashboardTitle".to_string()]);
        assert_eq!(persistence.storage().entries()["dashboardTitle"], "Ops");
    }

    #[test]
    fn write_failures_are_counted_not_raised() {
        let mut persistence = Persistence::new(FailingStore);
        let mut store = persistence.load();
        store.add_chart();
        assert_eq!(persistence.flush(&mut store), 2);
        assert!(!store.has_changes());
    }
}
