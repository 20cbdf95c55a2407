//! Exact-match selectors over registered privileges

use super::privilege::{json_type_name, FieldValue, Privilege};
use crate::error::{PrivilegeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Keys a selector may contain
pub const SELECTOR_KEYS: [&str; 4] = ["name", "component", "group", "role"];

/// Partial privilege used for exact-match lookups.
///
/// Unlike the matching engine, a selector never expands wildcards: a stored
/// `group: "*"` only matches a selector asking for `group: "*"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldValue>,
}

impl Selector {
    /// Selector matching every privilege
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<FieldValue>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<FieldValue>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<FieldValue>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<FieldValue>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// True when no key is constrained
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.component.is_none() && self.group.is_none() && self.role.is_none()
    }

    /// Parse a selector from untyped JSON, rejecting unknown keys.
    ///
    /// A key present with `null` selects privileges whose field is absent.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(PrivilegeError::invalid_type(format!(
                "Expected selector to be an object. {} given",
                json_type_name(value)
            )));
        };

        if !map.keys().all(|key| SELECTOR_KEYS.contains(&key.as_str())) {
            return Err(PrivilegeError::invalid_selector(
                "Invalid selector. Only \"name\", \"group\", \"component\" and \"role\" are allowed",
            ));
        }

        let field = |key: &str| -> Result<Option<FieldValue>> {
            match map.get(key) {
                None => Ok(None),
                Some(Value::Null) => Ok(Some(FieldValue::Absent)),
                Some(Value::String(s)) => Ok(Some(FieldValue::from(s.as_str()))),
                Some(other) => Err(PrivilegeError::invalid_selector(format!(
                    "Expected selector key \"{}\" to be a string or null. {} given",
                    key,
                    json_type_name(other)
                ))),
            }
        };

        Ok(Self {
            name: field("name")?,
            component: field("component")?,
            group: field("group")?,
            role: field("role")?,
        })
    }

    /// Exact match on every constrained key
    pub fn matches(&self, privilege: &Privilege) -> bool {
        let role = FieldValue::from(privilege.role.as_deref());

        self.name.as_ref().map_or(true, |name| *name == privilege.name_value())
            && self.component.as_ref().map_or(true, |c| *c == privilege.component)
            && self.group.as_ref().map_or(true, |g| *g == privilege.group)
            && self.role.as_ref().map_or(true, |r| *r == role)
    }
}

impl TryFrom<&Value> for Selector {
    type Error = PrivilegeError;

    fn try_from(value: &Value) -> Result<Self> {
        Selector::from_value(value)
    }
}

impl From<&Privilege> for Selector {
    fn from(privilege: &Privilege) -> Self {
        Self {
            name: Some(privilege.name_value()),
            component: Some(privilege.component.clone()),
            group: Some(privilege.group.clone()),
            role: Some(FieldValue::from(privilege.role.as_deref())),
        }
    }
}

/// Field that can be projected by `pluck`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeProperty {
    Name,
    Component,
    Group,
}

impl PrivilegeProperty {
    /// Project this property out of a privilege
    pub fn project(&self, privilege: &Privilege) -> FieldValue {
        match self {
            PrivilegeProperty::Name => privilege.name_value(),
            PrivilegeProperty::Component => privilege.component.clone(),
            PrivilegeProperty::Group => privilege.group.clone(),
        }
    }
}

impl FromStr for PrivilegeProperty {
    type Err = PrivilegeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(PrivilegeProperty::Name),
            "component" => Ok(PrivilegeProperty::Component),
            "group" => Ok(PrivilegeProperty::Group),
            other => Err(PrivilegeError::validation(format!(
                "Expected property to be one of \"name\", \"component\" or \"group\". \"{}\" given",
                other
            ))),
        }
    }
}

impl fmt::Display for PrivilegeProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrivilegeProperty::Name => "name",
            PrivilegeProperty::Component => "component",
            PrivilegeProperty::Group => "group",
        };
        write!(f, "{}", s)
    }
}
