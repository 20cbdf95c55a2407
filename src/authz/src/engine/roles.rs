//! Role registration and assignment
//!
//! Roles are bookkeeping only: assigning a role does not grant its template
//! privileges, and `has_privilege` never consults roles.

use super::PrivilegeEngine;
use crate::validation::{self, validate_non_empty_string};
use privileges_core::error::Result;
use privileges_core::types::{AssignmentId, FieldValue, OneOrMany, Privilege, RawPrivilege, RoleId};
use tracing::info;

impl PrivilegeEngine {
    /// Register a role globally (`group: None`) or for a group, with zero or
    /// more privilege templates.
    ///
    /// Each template is stored with `role` set to the role name and, when it
    /// has no group of its own, the role's group:
    ///
    /// ```text
    /// register_role("player", Some("ajax-selection"), {name: read, component: matches})
    ///   → template {name: read, component: matches, group: ajax-selection, role: player}
    /// ```
    ///
    /// A list of templates registers one record per template and returns the
    /// ids in order.
    pub async fn register_role(
        &self,
        name: &str,
        group: Option<&str>,
        privileges: Option<OneOrMany<RawPrivilege>>,
    ) -> Result<OneOrMany<RoleId>> {
        validate_non_empty_string("name", Some(name), false)?;
        validate_non_empty_string("group", group, true)?;

        match privileges {
            None => {
                let id = self.store.register_role(name, group, None).await?;
                info!(role = name, group = ?group, role_id = %id, "Registered role");
                Ok(OneOrMany::Single(id))
            }
            Some(OneOrMany::Single(raw)) => {
                let id = self.register_role_template(name, group, &raw).await?;
                Ok(OneOrMany::Single(id))
            }
            Some(OneOrMany::Many(list)) => {
                let mut ids = Vec::with_capacity(list.len());
                for raw in &list {
                    ids.push(self.register_role_template(name, group, raw).await?);
                }
                Ok(OneOrMany::Many(ids))
            }
        }
    }

    async fn register_role_template(
        &self,
        name: &str,
        group: Option<&str>,
        raw: &RawPrivilege,
    ) -> Result<RoleId> {
        let template = role_template(name, group, raw)?;
        let id = self.store.register_role(name, group, Some(template.clone())).await?;
        info!(role = name, template = %template, role_id = %id, "Registered role template");
        Ok(id)
    }

    /// Assign one or more roles to a user, optionally within a group
    pub async fn assign_role(
        &self,
        user_id: &str,
        role: impl Into<OneOrMany<String>>,
        group: Option<&str>,
    ) -> Result<OneOrMany<AssignmentId>> {
        validate_non_empty_string("userId", Some(user_id), false)?;
        validate_non_empty_string("group", group, true)?;

        match role.into() {
            OneOrMany::Single(role) => {
                let id = self.assign_one_role(user_id, &role, group).await?;
                Ok(OneOrMany::Single(id))
            }
            OneOrMany::Many(roles) => {
                let mut ids = Vec::with_capacity(roles.len());
                for role in &roles {
                    ids.push(self.assign_one_role(user_id, role, group).await?);
                }
                Ok(OneOrMany::Many(ids))
            }
        }
    }

    async fn assign_one_role(&self, user_id: &str, role: &str, group: Option<&str>) -> Result<AssignmentId> {
        validate_non_empty_string("role", Some(role), false)?;

        let id = self.store.assign_role(user_id, role, group).await?;
        info!(user_id, role, group = ?group, assignment_id = %id, "Assigned role");
        Ok(id)
    }

    /// Check whether a user was assigned a role. A group-scoped assignment
    /// does not make the user a global holder of the role, and vice versa.
    pub async fn is(&self, user_id: &str, role: &str, group: Option<&str>) -> Result<bool> {
        validate_non_empty_string("userId", Some(user_id), false)?;
        validate_non_empty_string("role", Some(role), false)?;
        validate_non_empty_string("group", group, true)?;

        Ok(self.store.get_role(user_id, role, group).await?.is_some())
    }
}

fn role_template(name: &str, group: Option<&str>, raw: &RawPrivilege) -> Result<Privilege> {
    let mut template = validation::prepare(raw)?;

    if template.group.is_absent() {
        template.group = FieldValue::from(group);
    }
    template.role = Some(name.to_string());

    Ok(template)
}
