//! Grant, revoke and registry operations

use super::{ensure_user_id, PrivilegeEngine};
use crate::validation;
use privileges_core::error::{PrivilegeError, Result};
use privileges_core::types::{
    FieldValue, OneOrMany, PrivilegeId, PrivilegeProperty, RawPrivilege, Selector,
};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

impl PrivilegeEngine {
    /// Register a privilege without attaching it to a user, e.g. to offer it
    /// in a selection UI.
    pub async fn register(&self, raw: &RawPrivilege) -> Result<PrivilegeId> {
        let privilege = validation::prepare(raw)?;
        let id = self.store.register(privilege).await?;
        debug!(privilege_id = %id, "Registered privilege");
        Ok(id)
    }

    /// Exact-match check over registered privileges. Wildcards stored on a
    /// privilege are literals here, unlike in [`PrivilegeEngine::has_privilege`].
    pub async fn exists(&self, selector: &Selector) -> Result<bool> {
        self.store.exists(selector).await
    }

    /// [`PrivilegeEngine::exists`] for untyped selectors; any key other than
    /// name, component, group or role is rejected before storage is touched.
    pub async fn exists_value(&self, selector: &Value) -> Result<bool> {
        let selector = Selector::from_value(selector)?;
        self.exists(&selector).await
    }

    /// Unique values of `property` across registered privileges matching
    /// `filter`, in first-seen order.
    ///
    /// ```text
    /// pluck(Group, {component: "A"})  // every group with a privilege on component A
    /// ```
    pub async fn pluck(&self, property: PrivilegeProperty, filter: &Selector) -> Result<Vec<FieldValue>> {
        let privileges = self.store.filter(filter).await?;

        let mut seen = HashSet::new();
        let values: Vec<FieldValue> = privileges
            .iter()
            .map(|privilege| property.project(privilege))
            .filter(|value| seen.insert(value.clone()))
            .collect();

        Ok(values)
    }

    /// Grant one or more privilege names to a user.
    ///
    /// `Many` names are granted in order and the ids come back in the same
    /// order. Processing stops at the first failure; earlier grants stay.
    pub async fn grant(
        &self,
        user_id: &str,
        name: impl Into<OneOrMany<String>>,
        component: Option<&str>,
        group: Option<&str>,
        role: Option<&str>,
    ) -> Result<OneOrMany<PrivilegeId>> {
        ensure_user_id(user_id)?;

        let build = |name: String| RawPrivilege {
            name: Some(name),
            component: component.map(str::to_string),
            group: group.map(str::to_string),
            role: role.map(str::to_string),
        };

        match name.into() {
            OneOrMany::Single(name) => {
                let id = self.grant_privilege(user_id, &build(name)).await?;
                Ok(OneOrMany::Single(id))
            }
            OneOrMany::Many(names) => {
                if names.is_empty() {
                    return Err(PrivilegeError::empty_collection(
                        "Expected \"privilege\" to be a name or an array of names, empty array given",
                    ));
                }
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    ids.push(self.grant_privilege(user_id, &build(name)).await?);
                }
                Ok(OneOrMany::Many(ids))
            }
        }
    }

    /// Grant a single fully specified privilege
    pub async fn grant_privilege(&self, user_id: &str, raw: &RawPrivilege) -> Result<PrivilegeId> {
        ensure_user_id(user_id)?;
        let privilege = validation::prepare(raw)?;

        let id = self.store.set_user_privilege(user_id, privilege.clone()).await?;
        info!(user_id, privilege = %privilege, privilege_id = %id, "Granted privilege");
        Ok(id)
    }

    /// Revoke one or more granted privileges by id, in order.
    ///
    /// Whether an unknown id is a no-op is up to the store; the in-memory
    /// store ignores it.
    pub async fn revoke(&self, user_id: &str, privilege_id: impl Into<OneOrMany<String>>) -> Result<()> {
        ensure_user_id(user_id)?;

        match privilege_id.into() {
            OneOrMany::Single(id) => self.revoke_one(user_id, &id).await,
            OneOrMany::Many(ids) => {
                if ids.is_empty() {
                    return Err(PrivilegeError::empty_collection(
                        "Expected \"privilegeId\" to be a string or an array of strings, empty array given",
                    ));
                }
                for id in &ids {
                    self.revoke_one(user_id, id).await?;
                }
                Ok(())
            }
        }
    }

    async fn revoke_one(&self, user_id: &str, privilege_id: &str) -> Result<()> {
        if !validation::is_non_empty_string(privilege_id) {
            return Err(PrivilegeError::validation(format!(
                "Expected \"privilegeId\" to be a non-empty string, \"{}\" given",
                privilege_id
            )));
        }

        self.store.remove_user_privilege(user_id, privilege_id).await?;
        info!(user_id, privilege_id, "Revoked privilege");
        Ok(())
    }
}
