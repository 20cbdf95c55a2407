//! Role bookkeeping types

use super::privilege::{Privilege, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned role identifier
pub type RoleId = String;

/// Storage-assigned role assignment identifier
pub type AssignmentId = String;

/// A registered role, optionally scoped to a group, carrying at most one
/// privilege template. Registering several templates yields several records
/// sharing the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub privilege: Option<Privilege>,
    pub created_at: DateTime<Utc>,
}

/// A role assigned to a user, globally (`group: None`) or within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub role: String,
    #[serde(default)]
    pub group: Option<String>,
    pub assigned_at: DateTime<Utc>,
}
