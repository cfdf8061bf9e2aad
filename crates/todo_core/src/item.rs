//! TodoItem - a single task record
//!
//! An item lives in exactly one of the two board collections (active or
//! completed); completion moves it across and stamps `completed_at` once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TodoItem {
    /// Unique identifier
    pub id: Uuid,

    /// List this item belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Uuid>,

    /// Short title
    pub title: String,

    /// Longer description
    pub description: String,

    /// Optional due time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,

    /// Set exactly once, when the item is completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Create a new active item from a draft
    pub fn new(draft: TodoDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_id: draft.list_id,
            title: draft.title,
            description: draft.description,
            due_at: draft.due_at,
            completed_at: None,
        }
    }

    /// Stamp the completion time. Returns false if already completed.
    pub fn complete(&mut self) -> bool {
        if self.completed_at.is_some() {
            return false;
        }
        self.completed_at = Some(Utc::now());
        true
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Human-readable completion stamp, e.g. "28-02-2025 at 14:03:09"
    pub fn completed_on(&self) -> Option<String> {
        self.completed_at
            .map(|t| t.format("%d-%m-%Y at %H:%M:%S").to_string())
    }
}

/// Input for creating a new item
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            list_id: None,
            due_at: None,
        }
    }

    pub fn with_list(mut self, list_id: Uuid) -> Self {
        self.list_id = Some(list_id);
        self
    }

    pub fn with_due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}
