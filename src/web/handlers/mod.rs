//! API handlers for the filestash HTTP surface.

pub mod file;

pub use file::*;

use crate::storage::LocalStorage;

/// Shared application state, injected into handlers at router construction.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File storage backend.
    pub storage: LocalStorage,
    /// Maximum accepted file size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create application state over the given storage.
    pub fn new(storage: LocalStorage, max_upload_size: u64) -> Self {
        Self {
            storage,
            max_upload_size,
        }
    }
}
