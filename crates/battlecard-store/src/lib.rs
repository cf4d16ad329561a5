//! Durable local storage for competitor profiles and the brand logo.
//!
//! Everything persists through the [`KeyValueStorage`] boundary so the
//! controller can run against [`MemoryStorage`] in tests and
//! [`FileStorage`] on disk.

pub mod defaults;
pub mod logo;
pub mod profiles;
pub mod storage;

pub use defaults::default_profiles;
pub use logo::LogoStore;
pub use profiles::ProfileStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use thiserror::Error;

/// Storage key holding the JSON-encoded profile map.
pub const PROFILES_KEY: &str = "competitors";
/// Storage key holding the logo data URI.
pub const LOGO_KEY: &str = "customLogo";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("competitor not found: {0}")]
    NotFound(String),

    #[error("cannot delete the last remaining competitor")]
    LastProfile,
}
