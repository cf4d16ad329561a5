use std::sync::Arc;

use battlecard_core::{CompetitorProfile, ProfileMap};
use chrono::{DateTime, Utc};

use crate::{default_profiles, KeyValueStorage, StoreError, PROFILES_KEY};

/// In-memory profile map mirrored to storage on every mutation.
///
/// The in-memory copy is authoritative: a failed write is logged and the
/// session carries on with the values it already holds.
pub struct ProfileStore {
    storage: Arc<dyn KeyValueStorage>,
    profiles: ProfileMap,
}

impl ProfileStore {
    /// Load the persisted map, falling back to the built-in defaults when the
    /// stored value is absent, unreadable, or empty.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStorage>, now: DateTime<Utc>) -> Self {
        let profiles = match read_persisted(storage.as_ref()) {
            Some(profiles) => profiles,
            None => defaults_or_empty(now),
        };
        Self { storage, profiles }
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileMap {
        &self.profiles
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CompetitorProfile> {
        self.profiles.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// First id in key order, used as the fallback selection.
    #[must_use]
    pub fn first_id(&self) -> Option<&str> {
        self.profiles.keys().next().map(String::as_str)
    }

    /// Insert or fully replace the entry at `profile.id`, then persist.
    pub fn upsert(&mut self, profile: CompetitorProfile) {
        self.profiles.insert(profile.id.clone(), profile);
        self.save();
    }

    /// Delete `id`, then persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids and
    /// [`StoreError::LastProfile`] if `id` is the only remaining entry.
    pub fn remove(&mut self, id: &str) -> Result<CompetitorProfile, StoreError> {
        if !self.profiles.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if self.profiles.len() == 1 {
            return Err(StoreError::LastProfile);
        }
        let removed = self
            .profiles
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.save();
        Ok(removed)
    }

    /// Write the whole map. Failures are logged and otherwise ignored.
    pub fn save(&self) {
        let encoded = match serde_json::to_string(&self.profiles) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode competitor profiles");
                return;
            }
        };
        if let Err(e) = self.storage.set(PROFILES_KEY, &encoded) {
            tracing::error!(error = %e, count = self.profiles.len(), "failed to persist competitor profiles");
        }
    }
}

fn read_persisted(storage: &dyn KeyValueStorage) -> Option<ProfileMap> {
    let raw = match storage.get(PROFILES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read stored competitors; using defaults");
            return None;
        }
    };

    let mut profiles: ProfileMap = match serde_json::from_str(&raw) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!(error = %e, "stored competitors are corrupt; using defaults");
            return None;
        }
    };
    if profiles.is_empty() {
        return None;
    }

    // The key is the identity; an entry whose id drifted from its key is
    // brought back in line rather than dropped.
    for (key, profile) in &mut profiles {
        if profile.id != *key {
            tracing::debug!(key = %key, id = %profile.id, "realigning profile id with storage key");
            profile.id.clone_from(key);
        }
    }
    Some(profiles)
}

fn defaults_or_empty(now: DateTime<Utc>) -> ProfileMap {
    default_profiles(now).unwrap_or_else(|e| {
        tracing::error!(error = %e, "built-in competitor defaults failed to parse");
        ProfileMap::new()
    })
}

#[cfg(test)]
mod tests {
    use battlecard_core::CompetitorProfile;

    use super::*;
    use crate::MemoryStorage;

    fn store_with(raw: Option<&str>) -> (Arc<MemoryStorage>, ProfileStore) {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(raw) = raw {
            storage.set(PROFILES_KEY, raw).unwrap();
        }
        let store = ProfileStore::load(storage.clone(), Utc::now());
        (storage, store)
    }

    fn sample(id: &str) -> CompetitorProfile {
        let mut profile = default_profiles(Utc::now()).unwrap()["buffer"].clone();
        profile.id = id.to_string();
        profile.name = id.to_string();
        profile
    }

    #[test]
    fn absent_key_loads_defaults() {
        let (_, store) = store_with(None);
        assert_eq!(store.len(), 3);
        assert!(store.contains("hootsuite"));
    }

    #[test]
    fn corrupt_value_loads_defaults() {
        let (_, store) = store_with(Some("{not json"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn empty_map_loads_defaults() {
        let (_, store) = store_with(Some("{}"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn persisted_map_is_loaded_and_ids_match_keys() {
        let mut map = ProfileMap::new();
        let mut drifted = sample("acme_1");
        drifted.id = "something_else".to_string();
        map.insert("acme_1".to_string(), drifted);
        let raw = serde_json::to_string(&map).unwrap();

        let (_, store) = store_with(Some(&raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("acme_1").unwrap().id, "acme_1");
    }

    #[test]
    fn upsert_persists_whole_map() {
        let (storage, mut store) = store_with(None);
        store.upsert(sample("acme_1"));

        let raw = storage.get(PROFILES_KEY).unwrap().unwrap();
        let persisted: ProfileMap = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 4);
        assert!(persisted.contains_key("acme_1"));
    }

    #[test]
    fn upsert_replaces_existing_entry() {
        let (_, mut store) = store_with(None);
        let mut replacement = sample("buffer");
        replacement.title = "Replaced".to_string();
        store.upsert(replacement);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("buffer").unwrap().title, "Replaced");
    }

    #[test]
    fn remove_rejects_last_profile() {
        let mut map = ProfileMap::new();
        map.insert("only".to_string(), sample("only"));
        let raw = serde_json::to_string(&map).unwrap();
        let (_, mut store) = store_with(Some(&raw));

        assert_eq!(store.remove("only").unwrap_err(), StoreError::LastProfile);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let (_, mut store) = store_with(None);
        assert_eq!(
            store.remove("nope").unwrap_err(),
            StoreError::NotFound("nope".to_string())
        );
    }

    #[test]
    fn remove_persists_and_first_id_follows_key_order() {
        let (storage, mut store) = store_with(None);
        assert_eq!(store.first_id(), Some("buffer"));
        store.remove("buffer").unwrap();
        assert_eq!(store.first_id(), Some("hootsuite"));

        let raw = storage.get(PROFILES_KEY).unwrap().unwrap();
        let persisted: ProfileMap = serde_json::from_str(&raw).unwrap();
        assert!(!persisted.contains_key("buffer"));
    }
}
