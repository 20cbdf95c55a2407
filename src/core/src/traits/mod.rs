//! Storage ports consumed by the matching engine and its collaborators

pub mod storage;

// Re-export commonly used traits
pub use storage::{GroupStore, PrivilegeStore, RoleStore, StoragePort};
