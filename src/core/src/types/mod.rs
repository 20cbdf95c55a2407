//! Shared types for the privileges library

pub mod privilege;
pub mod selector;
pub mod one_or_many;
pub mod role;
pub mod group;

// Re-export commonly used types
pub use privilege::{FieldValue, GrantedPrivilege, Privilege, PrivilegeId, RawPrivilege, UserId, WILDCARD};
pub use selector::{PrivilegeProperty, Selector, SELECTOR_KEYS};
pub use one_or_many::OneOrMany;
pub use role::{AssignmentId, RoleAssignment, RoleId, RoleRecord};
pub use group::{GroupId, GroupRecord};
