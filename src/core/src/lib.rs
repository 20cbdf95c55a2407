//! # Privileges Core
//!
//! Shared types, storage ports and error handling for the privileges
//! access-control library. The matching engine lives in `privileges-authz`;
//! this crate only defines what it consumes.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{PrivilegeError, Result};
pub use types::{
    FieldValue, GrantedPrivilege, OneOrMany, Privilege, PrivilegeId, PrivilegeProperty,
    RawPrivilege, Selector, UserId, WILDCARD,
};
pub use traits::{GroupStore, PrivilegeStore, RoleStore, StoragePort};
