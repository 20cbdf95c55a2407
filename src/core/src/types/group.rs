//! Group records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage-assigned group identifier
pub type GroupId = String;

/// A group is an opaque bag of properties with an optional parent link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    #[serde(default)]
    pub parent_id: Option<GroupId>,
    pub props: Value,
    pub created_at: DateTime<Utc>,
}
