// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use depscan_db::{DbError, ScanStore};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

/// Global application state for the API server.
pub struct AppState {
    /// Persistent scan database.
    pub store: Mutex<ScanStore>,
    /// SHA-256 hash of the API key (if configured). The plaintext key is
    /// never kept in memory, only its hash.
    pub api_key_hash: Option<[u8; 32]>,
}

/// Hash a plaintext API key to a 32-byte SHA-256 digest.
fn hash_api_key(key: &str) -> [u8; 32] {
    let digest = Sha256::digest(key.as_bytes());
    digest.into()
}

impl AppState {
    pub fn new(api_key: Option<String>, db_path: Option<PathBuf>) -> Result<Self, DbError> {
        let store = match db_path {
            Some(path) => ScanStore::open(&path)?,
            None => ScanStore::open_default()?,
        };
        Ok(Self {
            store: Mutex::new(store),
            api_key_hash: api_key.as_deref().map(hash_api_key),
        })
    }

    /// Create an AppState with an in-memory database (for testing).
    pub fn new_in_memory(api_key: Option<String>) -> Self {
        let store = ScanStore::open_in_memory().expect("failed to open in-memory database");
        Self {
            store: Mutex::new(store),
            api_key_hash: api_key.as_deref().map(hash_api_key),
        }
    }
}
