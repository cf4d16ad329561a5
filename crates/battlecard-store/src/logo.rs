use std::sync::Arc;

use battlecard_core::LogoDataUri;

use crate::{KeyValueStorage, LOGO_KEY};

/// The single brand logo override. `None` means the default logo.
pub struct LogoStore {
    storage: Arc<dyn KeyValueStorage>,
    current: Option<LogoDataUri>,
}

impl LogoStore {
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let current = match storage.get(LOGO_KEY) {
            Ok(value) => value
                .filter(|v| !v.trim().is_empty())
                .map(LogoDataUri::from_stored),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored logo; using default");
                None
            }
        };
        Self { storage, current }
    }

    #[must_use]
    pub fn current(&self) -> Option<&LogoDataUri> {
        self.current.as_ref()
    }

    /// Replace or clear the logo with one write. The in-memory value changes
    /// even if the write fails.
    pub fn set(&mut self, logo: Option<LogoDataUri>) {
        let result = match &logo {
            Some(uri) => self.storage.set(LOGO_KEY, uri.as_str()),
            None => self.storage.remove(LOGO_KEY),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to persist brand logo");
        }
        self.current = logo;
    }
}

#[cfg(test)]
mod tests {
    use battlecard_core::validate_logo;

    use super::*;
    use crate::MemoryStorage;

    #[test]
    fn starts_with_default_logo() {
        let store = LogoStore::load(Arc::new(MemoryStorage::new()));
        assert!(store.current().is_none());
    }

    #[test]
    fn set_and_clear_round_trip_through_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let uri = validate_logo("image/svg+xml", b"<svg></svg>").unwrap();

        let mut store = LogoStore::load(storage.clone());
        store.set(Some(uri.clone()));
        assert_eq!(LogoStore::load(storage.clone()).current(), Some(&uri));

        store.set(None);
        assert!(store.current().is_none());
        assert_eq!(storage.get(LOGO_KEY).unwrap(), None);
        assert!(LogoStore::load(storage).current().is_none());
    }
}
