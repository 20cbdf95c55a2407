//! Group hierarchy collaborator
//!
//! A `Group` is a handle on one stored group record. Hierarchy links are kept
//! for callers to navigate; they do not propagate grants to subgroups.

use privileges_core::error::{PrivilegeError, Result};
use privileges_core::traits::GroupStore;
use privileges_core::types::{GroupId, GroupRecord, OneOrMany};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Handle on a stored group
#[derive(Clone)]
pub struct Group {
    store: Arc<dyn GroupStore>,
    id: Option<GroupId>,
}

impl Group {
    /// Unregistered handle; call [`Group::register`] to persist it
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store, id: None }
    }

    /// Handle on an already stored group
    pub fn with_id(store: Arc<dyn GroupStore>, id: impl Into<GroupId>) -> Self {
        Self {
            store,
            id: Some(id.into()),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| PrivilegeError::not_found("group has not been registered"))
    }

    /// Persist the group with the given properties.
    ///
    /// Fails with `AlreadyExists` when this handle points at a stored group.
    pub async fn register(&mut self, props: Value) -> Result<GroupId> {
        if let Some(id) = &self.id {
            if self.store.fetch_group(id).await?.is_some() {
                return Err(PrivilegeError::already_exists(format!("group {}", id)));
            }
        }

        let id = self.store.register_group(props).await?;
        info!(group_id = %id, "Registered group");
        self.id = Some(id.clone());
        Ok(id)
    }

    /// The stored record for this group
    pub async fn details(&self) -> Result<GroupRecord> {
        let id = self.require_id()?;
        self.store
            .fetch_group(id)
            .await?
            .ok_or_else(|| PrivilegeError::not_found(format!("group {}", id)))
    }

    /// Make this group the parent of one or more groups, in order
    pub async fn make_parent_of(&self, children: impl Into<OneOrMany<GroupId>>) -> Result<()> {
        let parent = self.require_id()?;

        for child in children.into().into_vec() {
            self.store.set_group_parent(&child, parent).await?;
            info!(parent_id = parent, child_id = %child, "Linked group to parent");
        }
        Ok(())
    }

    /// Make `parent_id` the parent of this group
    pub async fn make_child_of(&self, parent_id: &str) -> Result<()> {
        let child = self.require_id()?;
        self.store.set_group_parent(child, parent_id).await?;
        info!(parent_id, child_id = child, "Linked group to parent");
        Ok(())
    }
}
