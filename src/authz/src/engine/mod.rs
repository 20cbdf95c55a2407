//! Privilege engine
//!
//! Owns no data: every operation validates its input, then reads or writes
//! through the injected storage port. Split by concern:
//!
//! - [`matching`]: `has_privilege`, `has_privilege_value`, `has`, `can`
//! - [`grants`]: `grant`, `revoke`, `register`, `exists`, `pluck`
//! - [`roles`]: `register_role`, `assign_role`, `is`
//!
//! ```text
//! caller → PrivilegeEngine (validation::prepare) → StoragePort
//! ```

pub mod matching;
pub mod grants;
pub mod roles;

pub use matching::{field_matches, grant_satisfies};

use crate::storage::InMemoryStorage;
use privileges_core::error::{PrivilegeError, Result};
use privileges_core::traits::StoragePort;
use std::sync::Arc;

/// Access-control engine over a storage port
#[derive(Clone)]
pub struct PrivilegeEngine {
    store: Arc<dyn StoragePort>,
}

impl PrivilegeEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<dyn StoragePort>) -> Self {
        Self { store }
    }

    /// Create an engine backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()))
    }

    /// The storage port this engine reads and writes through
    pub fn store(&self) -> &Arc<dyn StoragePort> {
        &self.store
    }
}

/// Grant/revoke/role calls reject an empty user id up front
pub(crate) fn ensure_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(PrivilegeError::invalid_user_id(
            "Expected \"userId\" to be a non-empty string, empty string given",
        ));
    }
    Ok(())
}
