//! Single-or-list arguments

use super::privilege::RawPrivilege;
use serde::{Deserialize, Serialize};

/// Either one value or an ordered list of values.
///
/// Batch operations process `Many` in order and return results in the same
/// order. Deserializes from a bare value or a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::Single(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    /// Only a `Many` can be empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_single(&self) -> Option<&T> {
        match self {
            OneOrMany::Single(value) => Some(value),
            OneOrMany::Many(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Single(value) => vec![value],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> OneOrMany<U> {
        match self {
            OneOrMany::Single(value) => OneOrMany::Single(f(value)),
            OneOrMany::Many(items) => OneOrMany::Many(items.into_iter().map(f).collect()),
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl From<String> for OneOrMany<String> {
    fn from(value: String) -> Self {
        OneOrMany::Single(value)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany::Single(value.to_string())
    }
}

impl From<&String> for OneOrMany<String> {
    fn from(value: &String) -> Self {
        OneOrMany::Single(value.clone())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(items: Vec<&str>) -> Self {
        OneOrMany::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(items: [&str; N]) -> Self {
        OneOrMany::Many(items.iter().map(|s| s.to_string()).collect())
    }
}

impl From<RawPrivilege> for OneOrMany<RawPrivilege> {
    fn from(value: RawPrivilege) -> Self {
        OneOrMany::Single(value)
    }
}
