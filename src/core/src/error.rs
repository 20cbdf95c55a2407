//! Error types for the privileges library
//!
//! Every failure the engine, the orchestrator or a storage adapter can raise
//! is a variant of [`PrivilegeError`]. Shape, validation, empty-collection and
//! selector errors are always raised before any storage call is made.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrivilegeError>;

/// Privileges library error type
#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// Wrong argument shape (e.g. a privilege that is not an object)
    #[error("Type error: {0}")]
    InvalidType(String),

    /// Missing or blank required field, or blank optional field
    #[error("Validation error: {0}")]
    Validation(String),

    /// A list argument that must be non-empty was empty
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Selector contains a key outside name/component/group/role
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Missing or empty user identifier
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Record not found in storage
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record already present in storage
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage adapter failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PrivilegeError {
    /// Create a type/shape error
    pub fn invalid_type<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::InvalidType(msg.into())
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::Validation(msg.into())
    }

    /// Create an empty collection error
    pub fn empty_collection<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::EmptyCollection(msg.into())
    }

    /// Create a selector error
    pub fn invalid_selector<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::InvalidSelector(msg.into())
    }

    /// Create a user id error
    pub fn invalid_user_id<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::InvalidUserId(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::NotFound(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::AlreadyExists(msg.into())
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        PrivilegeError::Storage(msg.into())
    }

    /// True for errors caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PrivilegeError::InvalidType(_)
                | PrivilegeError::Validation(_)
                | PrivilegeError::EmptyCollection(_)
                | PrivilegeError::InvalidSelector(_)
                | PrivilegeError::InvalidUserId(_)
        )
    }
}
