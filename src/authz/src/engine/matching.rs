//! Wildcard-aware privilege matching
//!
//! A grant satisfies a request when name, component and group each match.
//! Role is carried on grants but never compared.
//!
//! Combinations a single grant can express:
//!
//! ```text
//! { name: *, component: *, group: * }  every privilege everywhere
//! { name,    component: *, group: * }  one privilege everywhere
//! { name: *, component,    group: * }  everything on one component, in every group
//! { name: *, component: *, group    }  everything within one group
//! { name,    component,    group: * }  one privilege on one component, in every group
//! { name,    component: *, group    }  one privilege on every component of one group
//! { name: *, component,    group    }  everything on one component of one group
//! { name,    component,    group    }  exactly one privilege
//! ```

use super::PrivilegeEngine;
use crate::validation;
use privileges_core::error::{PrivilegeError, Result};
use privileges_core::types::{FieldValue, OneOrMany, Privilege, RawPrivilege, WILDCARD};
use serde_json::Value;
use tracing::debug;

/// Match one requested field against one granted field.
///
/// Only the granted side expands `*`; a requested `*` is compared literally,
/// so it never broadens a concrete grant.
pub fn field_matches(requested: &FieldValue, granted: &FieldValue) -> bool {
    granted == requested || granted.is_wildcard()
}

/// True when `granted` satisfies `requested` on name, component and group
pub fn grant_satisfies(granted: &Privilege, requested: &Privilege) -> bool {
    let name_matches = granted.name == requested.name || granted.name == WILDCARD;

    name_matches
        && field_matches(&requested.component, &granted.component)
        && field_matches(&requested.group, &granted.group)
}

impl PrivilegeEngine {
    /// Check whether a user holds a privilege.
    ///
    /// A blank `user_id` returns `Ok(false)` without touching storage. With
    /// `Many`, requests are checked in order and the scan stops at the first
    /// match; an empty list is `false`. Each single check validates the
    /// request and reads the user's full grant set once.
    pub async fn has_privilege(
        &self,
        user_id: &str,
        requested: impl Into<OneOrMany<RawPrivilege>>,
    ) -> Result<bool> {
        if !validation::is_non_empty_string(user_id) {
            debug!("has_privilege called without a usable user id, denying");
            return Ok(false);
        }

        match requested.into() {
            OneOrMany::Single(raw) => self.check_privilege(user_id, &raw).await,
            OneOrMany::Many(list) => {
                for raw in &list {
                    if self.check_privilege(user_id, raw).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// [`PrivilegeEngine::has_privilege`] for untyped input: an object or an
    /// array of objects.
    ///
    /// Elements are shape-checked one at a time as the scan reaches them, so a
    /// malformed element after the first match is never looked at. A blank
    /// user is `Ok(false)` whatever the input.
    pub async fn has_privilege_value(&self, user_id: &str, requested: &Value) -> Result<bool> {
        if !validation::is_non_empty_string(user_id) {
            debug!("has_privilege_value called without a usable user id, denying");
            return Ok(false);
        }

        match requested {
            Value::Array(items) => {
                for item in items {
                    let raw = RawPrivilege::from_value(item)?;
                    if self.check_privilege(user_id, &raw).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            other => {
                let raw = RawPrivilege::from_value(other)?;
                self.check_privilege(user_id, &raw).await
            }
        }
    }

    async fn check_privilege(&self, user_id: &str, raw: &RawPrivilege) -> Result<bool> {
        let requested = validation::prepare(raw)?;

        let granted = self.store.get_all_user_privileges(user_id).await?;
        let allowed = granted
            .iter()
            .any(|grant| grant_satisfies(&grant.privilege, &requested));

        debug!(
            user_id,
            privilege = %requested,
            grants = granted.len(),
            allowed,
            "Privilege check"
        );

        Ok(allowed)
    }

    /// Check one or more privilege names for a user with OR semantics.
    ///
    /// Names are validated and checked in input order, stopping at the first
    /// success. An empty list is an error.
    pub async fn has(
        &self,
        user_id: &str,
        name: impl Into<OneOrMany<String>>,
        component: Option<&str>,
        group: Option<&str>,
    ) -> Result<bool> {
        match name.into() {
            OneOrMany::Single(name) => self.has_one(user_id, name, component, group).await,
            OneOrMany::Many(names) => {
                if names.is_empty() {
                    return Err(PrivilegeError::empty_collection(
                        "Expected \"name\" to be a non-empty string or an array of non-empty strings, empty array given",
                    ));
                }
                for name in names {
                    if self.has_one(user_id, name, component, group).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Alias of [`PrivilegeEngine::has`]
    pub async fn can(
        &self,
        user_id: &str,
        name: impl Into<OneOrMany<String>>,
        component: Option<&str>,
        group: Option<&str>,
    ) -> Result<bool> {
        self.has(user_id, name, component, group).await
    }

    async fn has_one(
        &self,
        user_id: &str,
        name: String,
        component: Option<&str>,
        group: Option<&str>,
    ) -> Result<bool> {
        let raw = RawPrivilege {
            name: Some(name),
            component: component.map(str::to_string),
            group: group.map(str::to_string),
            role: None,
        };
        validation::validate(&raw)?;

        self.has_privilege(user_id, raw).await
    }
}
