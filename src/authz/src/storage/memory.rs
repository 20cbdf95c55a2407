//! In-memory storage adapter
//!
//! Useful for tests, for the bundled server, and for caching grants loaded
//! from elsewhere. All state sits behind one `RwLock`, so every operation is
//! atomic with respect to the others and reads observe earlier writes.
//!
//! Removing an unknown grant is a no-op.

use chrono::Utc;
use privileges_core::error::{PrivilegeError, Result};
use privileges_core::traits::{GroupStore, PrivilegeStore, RoleStore};
use privileges_core::types::{
    AssignmentId, GrantedPrivilege, GroupId, GroupRecord, Privilege, PrivilegeId, RoleAssignment,
    RoleId, RoleRecord, Selector, UserId,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    /// Registered privileges in registration order
    privileges: Vec<(PrivilegeId, Privilege)>,
    user_privileges: HashMap<UserId, Vec<GrantedPrivilege>>,
    roles: Vec<RoleRecord>,
    assignments: Vec<RoleAssignment>,
    groups: HashMap<GroupId, GroupRecord>,
}

/// In-memory implementation of every storage port
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(PrivilegeError::invalid_user_id(
            "Invalid userId. Expected non-empty string, empty string given",
        ));
    }
    Ok(())
}

#[async_trait]
impl PrivilegeStore for InMemoryStorage {
    async fn register(&self, privilege: Privilege) -> Result<PrivilegeId> {
        let mut state = self.state.write().await;

        if let Some((id, _)) = state.privileges.iter().find(|(_, p)| *p == privilege) {
            return Ok(id.clone());
        }

        let id = new_id();
        state.privileges.push((id.clone(), privilege));
        Ok(id)
    }

    async fn exists(&self, selector: &Selector) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.privileges.iter().any(|(_, p)| selector.matches(p)))
    }

    async fn filter(&self, selector: &Selector) -> Result<Vec<Privilege>> {
        let state = self.state.read().await;
        Ok(state
            .privileges
            .iter()
            .filter(|(_, p)| selector.matches(p))
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn get_all_user_privileges(&self, user_id: &str) -> Result<Vec<GrantedPrivilege>> {
        require_user_id(user_id)?;
        let state = self.state.read().await;
        Ok(state.user_privileges.get(user_id).cloned().unwrap_or_default())
    }

    async fn set_user_privilege(&self, user_id: &str, privilege: Privilege) -> Result<PrivilegeId> {
        require_user_id(user_id)?;
        let mut state = self.state.write().await;
        let grants = state.user_privileges.entry(user_id.to_string()).or_default();

        if let Some(existing) = grants.iter().find(|g| g.privilege == privilege) {
            debug!(user_id, privilege_id = %existing.id, "Privilege already granted");
            return Ok(existing.id.clone());
        }

        let id = new_id();
        grants.push(GrantedPrivilege {
            id: id.clone(),
            user_id: user_id.to_string(),
            privilege,
            granted_at: Utc::now(),
        });
        Ok(id)
    }

    async fn remove_user_privilege(&self, user_id: &str, privilege_id: &str) -> Result<()> {
        require_user_id(user_id)?;
        let mut state = self.state.write().await;

        let Some(grants) = state.user_privileges.get_mut(user_id) else {
            debug!(user_id, privilege_id, "No grants for user, nothing to remove");
            return Ok(());
        };

        let before = grants.len();
        grants.retain(|g| g.id != privilege_id);
        if grants.len() == before {
            debug!(user_id, privilege_id, "Privilege not granted, nothing to remove");
        }
        if grants.is_empty() {
            state.user_privileges.remove(user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for InMemoryStorage {
    async fn register_role(
        &self,
        name: &str,
        group: Option<&str>,
        privilege: Option<Privilege>,
    ) -> Result<RoleId> {
        let mut state = self.state.write().await;

        let existing = state.roles.iter().find(|r| {
            r.name == name && r.group.as_deref() == group && r.privilege == privilege
        });
        if let Some(role) = existing {
            return Ok(role.id.clone());
        }

        let id = new_id();
        state.roles.push(RoleRecord {
            id: id.clone(),
            name: name.to_string(),
            group: group.map(str::to_string),
            privilege,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn assign_role(&self, user_id: &str, role: &str, group: Option<&str>) -> Result<AssignmentId> {
        require_user_id(user_id)?;
        let mut state = self.state.write().await;

        let existing = state.assignments.iter().find(|a| {
            a.user_id == user_id && a.role == role && a.group.as_deref() == group
        });
        if let Some(assignment) = existing {
            return Ok(assignment.id.clone());
        }

        let id = new_id();
        state.assignments.push(RoleAssignment {
            id: id.clone(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            group: group.map(str::to_string),
            assigned_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_role(
        &self,
        user_id: &str,
        role: &str,
        group: Option<&str>,
    ) -> Result<Option<RoleAssignment>> {
        require_user_id(user_id)?;
        let state = self.state.read().await;
        Ok(state
            .assignments
            .iter()
            .find(|a| a.user_id == user_id && a.role == role && a.group.as_deref() == group)
            .cloned())
    }
}

#[async_trait]
impl GroupStore for InMemoryStorage {
    async fn register_group(&self, props: Value) -> Result<GroupId> {
        let mut state = self.state.write().await;
        let id = new_id();
        state.groups.insert(
            id.clone(),
            GroupRecord {
                id: id.clone(),
                parent_id: None,
                props,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn fetch_group(&self, id: &str) -> Result<Option<GroupRecord>> {
        let state = self.state.read().await;
        Ok(state.groups.get(id).cloned())
    }

    async fn set_group_parent(&self, child_id: &str, parent_id: &str) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.groups.contains_key(parent_id) {
            return Err(PrivilegeError::not_found(format!("group {}", parent_id)));
        }
        if !state.groups.contains_key(child_id) {
            return Err(PrivilegeError::not_found(format!("group {}", child_id)));
        }

        // Walk up from the new parent; reaching the child would close a cycle
        let mut cursor = Some(parent_id.to_string());
        while let Some(current) = cursor {
            if current == child_id {
                return Err(PrivilegeError::validation(format!(
                    "Group {} cannot become a descendant of itself",
                    child_id
                )));
            }
            cursor = state.groups.get(&current).and_then(|g| g.parent_id.clone());
        }

        if let Some(child) = state.groups.get_mut(child_id) {
            child.parent_id = Some(parent_id.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let store = InMemoryStorage::new();
        let first = store.register(Privilege::new("read")).await.unwrap();
        let second = store.register(Privilege::new("read")).await.unwrap();
        let other = store.register(Privilege::new("write")).await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(store.filter(&Selector::new()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_user_privilege_is_idempotent() {
        let store = InMemoryStorage::new();
        let privilege = Privilege::new("read").with_group("ajax");

        let first = store.set_user_privilege("chris", privilege.clone()).await.unwrap();
        let second = store.set_user_privilege("chris", privilege).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get_all_user_privileges("chris").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_privileges() {
        let store = InMemoryStorage::new();
        assert!(store.get_all_user_privileges("nobody").await.unwrap().is_empty());
        assert!(store.get_all_user_privileges("").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_unknown_privilege_is_noop() {
        let store = InMemoryStorage::new();
        store.remove_user_privilege("chris", "missing").await.unwrap();

        let id = store.set_user_privilege("chris", Privilege::new("read")).await.unwrap();
        store.remove_user_privilege("chris", "missing").await.unwrap();
        assert_eq!(store.get_all_user_privileges("chris").await.unwrap().len(), 1);

        store.remove_user_privilege("chris", &id).await.unwrap();
        assert!(store.get_all_user_privileges("chris").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grants_keep_insertion_order() {
        let store = InMemoryStorage::new();
        let a = store.set_user_privilege("chris", Privilege::new("a")).await.unwrap();
        let b = store.set_user_privilege("chris", Privilege::new("b")).await.unwrap();

        let ids: Vec<_> = store
            .get_all_user_privileges("chris")
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn test_group_parent_cycle_is_rejected() {
        let store = InMemoryStorage::new();
        let club = store.register_group(serde_json::json!({"name": "ajax"})).await.unwrap();
        let team = store.register_group(serde_json::json!({"name": "ajax-selection"})).await.unwrap();

        store.set_group_parent(&team, &club).await.unwrap();
        assert!(store.set_group_parent(&club, &team).await.is_err());
        assert!(store.set_group_parent(&club, &club).await.is_err());
        assert!(matches!(
            store.set_group_parent(&team, "missing").await,
            Err(PrivilegeError::NotFound(_))
        ));
    }
}
