//! # Privileges Authorization Engine
//!
//! Wildcard-aware privilege matching with grant/revoke orchestration over a
//! pluggable storage port.
//!
//! ## Features
//!
//! - **Wildcard grants** on name, component and group (`*` on the granted side)
//! - **Async storage port** so any backend can hold the grants
//! - **Batch operations** that process lists in order and fail fast
//! - **Roles and groups** as bookkeeping alongside grants
//!
//! ## Example
//!
//! ```rust
//! use privileges_authz::PrivilegeEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = PrivilegeEngine::in_memory();
//!
//!     engine.grant("chris", "read", Some("*"), Some("ajax"), None).await?;
//!
//!     assert!(engine.has("chris", "read", Some("matches"), Some("ajax")).await?);
//!     assert!(!engine.has("chris", "read", Some("matches"), Some("zcfc")).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod validation;
pub mod engine;
pub mod storage;
pub mod group;
pub mod config;
pub mod api;

// Re-export commonly used types
pub use engine::{field_matches, grant_satisfies, PrivilegeEngine};
pub use storage::InMemoryStorage;
pub use group::Group;
pub use config::ServerConfig;
pub use privileges_core::{
    FieldValue, OneOrMany, Privilege, PrivilegeError, PrivilegeProperty, RawPrivilege, Result,
    Selector, WILDCARD,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
