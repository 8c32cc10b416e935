//! Todo record and partial-update patch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries in [`Todo::mode`]
pub const MAX_MODE_ENTRIES: usize = 5;

/// A todo record.
///
/// `id`, `created_at` and `version` belong to the store: they are assigned on
/// insert and ignored on input. A todo that has not been inserted has `id == 0`.
///
/// `version` is the optimistic-concurrency token. It starts at 0 and grows by
/// exactly one per successful update; an update must carry the version the
/// caller last read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    /// Title, searched with full-text matching by the list query
    pub name: String,
    /// Category, searched with full-text matching by the list query
    pub level: String,
    pub contact: String,
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub website: String,
    pub address: String,
    /// Ordered tags with set semantics (1 to 5 entries, no duplicates)
    pub mode: Vec<String>,
    pub version: i32,
}

impl Todo {
    /// Whether the store has assigned an id yet.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// Partial update for a [`Todo`].
///
/// Fields left as `None` keep their current value. Identity and version are
/// not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TodoPatch {
    pub name: Option<String>,
    pub level: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub mode: Option<Vec<String>>,
}

impl TodoPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields present in the patch.
    ///
    /// The todo keeps its `version`, so the store still rejects the write if
    /// someone else updated the record after it was read.
    pub fn apply(self, todo: &mut Todo) {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(level) = self.level {
            todo.level = level;
        }
        if let Some(contact) = self.contact {
            todo.contact = contact;
        }
        if let Some(phone) = self.phone {
            todo.phone = phone;
        }
        if let Some(email) = self.email {
            todo.email = email;
        }
        if let Some(website) = self.website {
            todo.website = website;
        }
        if let Some(address) = self.address {
            todo.address = address;
        }
        if let Some(mode) = self.mode {
            todo.mode = mode;
        }
    }
}
