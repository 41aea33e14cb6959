//! Composite identifier for indexed items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when an `ItemUUID` is rendered as a single document id.
pub const UUID_SEPARATOR: char = '~';

/// Escapes a separator or itself inside a part of a composed id.
pub const UUID_ESCAPE: char = '\\';

/// Composite key identifying an item inside a repository.
///
/// Two items with the same `(id, type)` pair are the same document: adding the
/// second one replaces the first once both reach a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemUUID {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl ItemUUID {
    /// Create a new UUID from an id and a type.
    ///
    /// # Example
    ///
    /// ```
    /// use search_repository_shared::ItemUUID;
    ///
    /// let uuid = ItemUUID::new("42", "product");
    /// assert_eq!(uuid.composed_uuid(), "42~product");
    /// ```
    pub fn new(id: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: item_type.into(),
        }
    }

    /// Render the UUID as the document id used by backends: `{id}~{type}`.
    ///
    /// A `~` or `\` inside either part is prefixed with `\`, so distinct pairs
    /// never share a document id.
    pub fn composed_uuid(&self) -> String {
        let mut composed = String::with_capacity(self.id.len() + self.item_type.len() + 1);
        push_escaped(&mut composed, &self.id);
        composed.push(UUID_SEPARATOR);
        push_escaped(&mut composed, &self.item_type);
        composed
    }

    /// Whether both parts of the key are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.item_type.is_empty()
    }
}

fn push_escaped(out: &mut String, part: &str) {
    for c in part.chars() {
        if c == UUID_SEPARATOR || c == UUID_ESCAPE {
            out.push(UUID_ESCAPE);
        }
        out.push(c);
    }
}

impl fmt::Display for ItemUUID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed_uuid())
    }
}
