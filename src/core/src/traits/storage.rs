//! Storage port traits
//!
//! The engine never owns data: every grant, role and group lives behind these
//! traits. Adapters decide their own atomicity; the engine adds no locking,
//! retries or transactions on top.

use crate::error::Result;
use crate::types::{
    AssignmentId, GrantedPrivilege, GroupId, GroupRecord, Privilege, PrivilegeId, RoleAssignment,
    RoleId, Selector,
};
use async_trait::async_trait;
use serde_json::Value;

/// Persistence of registered and granted privileges
#[async_trait]
pub trait PrivilegeStore: Send + Sync {
    /// Register a privilege without attaching it to a user.
    /// Re-registering an identical privilege returns the existing id.
    async fn register(&self, privilege: Privilege) -> Result<PrivilegeId>;

    /// Exact-match existence check over registered privileges
    async fn exists(&self, selector: &Selector) -> Result<bool>;

    /// Exact-match filter over registered privileges, in registration order
    async fn filter(&self, selector: &Selector) -> Result<Vec<Privilege>>;

    /// Every privilege granted to a user, in grant order.
    /// Fails on an empty user id; returns an empty list for unknown users.
    async fn get_all_user_privileges(&self, user_id: &str) -> Result<Vec<GrantedPrivilege>>;

    /// Grant a privilege to a user. Granting an identical privilege twice
    /// returns the id of the first grant.
    async fn set_user_privilege(&self, user_id: &str, privilege: Privilege) -> Result<PrivilegeId>;

    /// Remove a granted privilege. Adapters document whether an unknown id is
    /// a no-op or an error.
    async fn remove_user_privilege(&self, user_id: &str, privilege_id: &str) -> Result<()>;

    /// Exact-match lookup of a user's grant
    async fn user_has_privilege(&self, user_id: &str, privilege: &Privilege) -> Result<bool> {
        let granted = self.get_all_user_privileges(user_id).await?;
        Ok(granted.iter().any(|g| g.privilege == *privilege))
    }
}

/// Role bookkeeping, outside the matching path
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Register a role, optionally scoped to a group, with an optional template
    async fn register_role(
        &self,
        name: &str,
        group: Option<&str>,
        privilege: Option<Privilege>,
    ) -> Result<RoleId>;

    /// Assign a role to a user
    async fn assign_role(&self, user_id: &str, role: &str, group: Option<&str>) -> Result<AssignmentId>;

    /// Look up an assignment; the group must match exactly
    async fn get_role(
        &self,
        user_id: &str,
        role: &str,
        group: Option<&str>,
    ) -> Result<Option<RoleAssignment>>;
}

/// Group hierarchy persistence for the optional `Group` collaborator
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Persist arbitrary group properties
    async fn register_group(&self, props: Value) -> Result<GroupId>;

    /// Fetch a group by id
    async fn fetch_group(&self, id: &str) -> Result<Option<GroupRecord>>;

    /// Make `parent_id` the parent of `child_id`
    async fn set_group_parent(&self, child_id: &str, parent_id: &str) -> Result<()>;
}

/// Everything the privileges engine needs from storage
pub trait StoragePort: PrivilegeStore + RoleStore {}

impl<T: PrivilegeStore + RoleStore + ?Sized> StoragePort for T {}
