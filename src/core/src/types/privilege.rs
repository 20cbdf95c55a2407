//! Privilege value types

use crate::error::{PrivilegeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Token that makes a granted field match any requested value
pub const WILDCARD: &str = "*";

/// Storage-assigned privilege identifier
pub type PrivilegeId = String;

/// User identifier
pub type UserId = String;

/// Value of an optional privilege field.
///
/// `Absent` and `Wildcard` are distinct: a grant with an absent group only
/// satisfies requests without a group, while a wildcard group satisfies any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldValue {
    /// Field not supplied
    #[default]
    Absent,
    /// The `*` token
    Wildcard,
    /// Any other string
    Concrete(String),
}

impl FieldValue {
    /// Build a field value from an optional string
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => FieldValue::Absent,
            Some(WILDCARD) => FieldValue::Wildcard,
            Some(other) => FieldValue::Concrete(other.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldValue::Wildcard)
    }

    /// String form of the value; `None` when absent
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Wildcard => Some(WILDCARD),
            FieldValue::Concrete(value) => Some(value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "null"),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            None => FieldValue::Absent,
            Some(value) if value == WILDCARD => FieldValue::Wildcard,
            Some(value) => FieldValue::Concrete(value),
        }
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        FieldValue::parse(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::parse(Some(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::from(Some(value))
    }
}

impl From<FieldValue> for Option<String> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Absent => None,
            FieldValue::Wildcard => Some(WILDCARD.to_string()),
            FieldValue::Concrete(value) => Some(value),
        }
    }
}

/// Unvalidated privilege input as supplied by a caller.
///
/// Unknown keys are dropped on deserialization. Use
/// [`RawPrivilege::from_value`] on untyped JSON to get shape errors instead of
/// serde errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPrivilege {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl RawPrivilege {
    /// Create a raw privilege with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Parse untyped JSON into a raw privilege.
    ///
    /// Fails with [`PrivilegeError::InvalidType`] if `value` is not an object
    /// and with [`PrivilegeError::Validation`] if a known field holds something
    /// other than a string or null. Blank strings pass here; rejecting them is
    /// the validator's job.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(PrivilegeError::invalid_type(format!(
                "Expected privilege to be an object. {} with value \"{}\" given",
                json_type_name(value),
                value
            )));
        };

        let field = |key: &str| -> Result<Option<String>> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(PrivilegeError::validation(format!(
                    "Expected \"{}\" to be a non-empty string, null or undefined. {} with value \"{}\" given",
                    key,
                    json_type_name(other),
                    other
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
}

impl From<&Privilege> for RawPrivilege {
    fn from(privilege: &Privilege) -> Self {
        Self {
            name: Some(privilege.name.clone()),
            component: privilege.component.clone().into(),
            group: privilege.group.clone().into(),
            role: privilege.role.clone(),
        }
    }
}

/// Canonical privilege with every field present
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Privilege {
    /// Privilege name, possibly `*`
    pub name: String,

    /// Component (feature or API endpoint) the privilege applies to
    #[serde(default)]
    pub component: FieldValue,

    /// Group (team, tenant, customer) the privilege applies to
    #[serde(default)]
    pub group: FieldValue,

    /// Role the privilege was derived from; carried, never matched
    #[serde(default)]
    pub role: Option<String>,
}

impl Privilege {
    /// Create a privilege with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component: FieldValue::Absent,
            group: FieldValue::Absent,
            role: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<FieldValue>) -> Self {
        self.component = component.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<FieldValue>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Name as a field value (`*` becomes [`FieldValue::Wildcard`])
    pub fn name_value(&self) -> FieldValue {
        FieldValue::from(self.name.as_str())
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name: {}, component: {}, group: {}}}",
            self.name, self.component, self.group
        )
    }
}

/// A privilege granted to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPrivilege {
    pub id: PrivilegeId,
    pub user_id: UserId,
    pub privilege: Privilege,
    pub granted_at: DateTime<Utc>,
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_parse() {
        assert_eq!(FieldValue::parse(None), FieldValue::Absent);
        assert_eq!(FieldValue::parse(Some("*")), FieldValue::Wildcard);
        assert_eq!(
            FieldValue::parse(Some("matches")),
            FieldValue::Concrete("matches".to_string())
        );
        assert_ne!(FieldValue::Absent, FieldValue::Wildcard);
    }

    #[test]
    fn test_field_value_serde() {
        let privilege = Privilege::new("read").with_component("*");
        let json = serde_json::to_value(&privilege).unwrap();
        assert_eq!(
            json,
            json!({"name": "read", "component": "*", "group": null, "role": null})
        );

        let back: Privilege = serde_json::from_value(json).unwrap();
        assert_eq!(back.component, FieldValue::Wildcard);
        assert_eq!(back.group, FieldValue::Absent);
    }

    #[test]
    fn test_raw_privilege_from_value() {
        let raw = RawPrivilege::from_value(&json!({
            "name": "kickMember",
            "component": "matches",
            "group": null,
            "extra": "ignored"
        }))
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("kickMember"));
        assert_eq!(raw.component.as_deref(), Some("matches"));
        assert!(raw.group.is_none());
        assert!(raw.role.is_none());
    }

    #[test]
    fn test_raw_privilege_rejects_non_object() {
        let err = RawPrivilege::from_value(&json!("read")).unwrap_err();
        assert!(matches!(err, PrivilegeError::InvalidType(_)));

        let err = RawPrivilege::from_value(&json!(42)).unwrap_err();
        assert!(matches!(err, PrivilegeError::InvalidType(_)));
    }

    #[test]
    fn test_raw_privilege_rejects_non_string_field() {
        let err = RawPrivilege::from_value(&json!({"name": "read", "group": 1})).unwrap_err();
        assert!(matches!(err, PrivilegeError::Validation(_)));
        assert!(err.to_string().contains("\"group\""));
    }
}
