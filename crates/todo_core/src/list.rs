//! TodoList - a named grouping of todo items
//!
//! Lists own items by reference: items carry a `list_id`, the list itself
//! holds no item collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of todo items
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TodoList {
    /// Unique identifier
    pub id: Uuid,

    /// Display name
    pub name: String,
}

impl TodoList {
    /// Create a new list with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
