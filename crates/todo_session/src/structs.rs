//! Board data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_core::{TodoDraft, TodoItem, TodoList};
use uuid::Uuid;

use crate::error::{Result, SessionError};

/// The in-memory todo state: active and completed collections plus list
/// metadata. An item is in exactly one of the two collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoBoard {
    /// Items not yet completed
    pub active: Vec<TodoItem>,

    /// Items completed, each carrying its completion stamp
    pub completed: Vec<TodoItem>,

    /// Known lists. Empty for the flat (list-less) local board.
    pub lists: Vec<TodoList>,

    /// Currently selected list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_list: Option<Uuid>,

    /// Last time the board changed
    pub last_updated: DateTime<Utc>,
}

impl Default for TodoBoard {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            completed: Vec::new(),
            lists: Vec::new(),
            selected_list: None,
            last_updated: Utc::now(),
        }
    }
}

impl TodoBoard {
    /// Create a new empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from previously persisted collections
    pub fn from_collections(active: Vec<TodoItem>, completed: Vec<TodoItem>) -> Self {
        Self {
            active,
            completed,
            ..Self::default()
        }
    }

    /// Add a new active item. When the board has lists, the draft must name
    /// one (explicitly or via the current selection).
    pub fn add_item(&mut self, mut draft: TodoDraft) -> Result<&TodoItem> {
        if draft.list_id.is_none() {
            draft.list_id = self.selected_list;
        }
        if !self.lists.is_empty() {
            match draft.list_id {
                None => return Err(SessionError::NoListSelected),
                Some(list_id) if !self.has_list(list_id) => {
                    return Err(SessionError::ListNotFound(list_id))
                }
                Some(_) => {}
            }
        }

        let item = TodoItem::new(draft);
        self.active.push(item);
        self.last_updated = Utc::now();
        Ok(self.active.last().expect("just pushed"))
    }

    /// Move an item from active to completed, stamping the completion time.
    pub fn complete_item(&mut self, id: Uuid) -> Result<TodoItem> {
        if self.completed.iter().any(|i| i.id == id) {
            return Err(SessionError::AlreadyCompleted(id));
        }
        let pos = self
            .active
            .iter()
            .position(|i| i.id == id)
            .ok_or(SessionError::ItemNotFound(id))?;

        let mut item = self.active.remove(pos);
        item.complete();
        self.completed.push(item);
        self.last_updated = Utc::now();
        Ok(self.completed.last().expect("just pushed").clone())
    }

    /// Remove an item from whichever collection holds it.
    pub fn remove_item(&mut self, id: Uuid) -> Result<TodoItem> {
        if let Some(pos) = self.active.iter().position(|i| i.id == id) {
            self.last_updated = Utc::now();
            return Ok(self.active.remove(pos));
        }
        if let Some(pos) = self.completed.iter().position(|i| i.id == id) {
            self.last_updated = Utc::now();
            return Ok(self.completed.remove(pos));
        }
        Err(SessionError::ItemNotFound(id))
    }

    /// Get an item from either collection
    pub fn get_item(&self, id: Uuid) -> Option<&TodoItem> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|i| i.id == id)
    }

    pub fn has_list(&self, id: Uuid) -> bool {
        self.lists.iter().any(|l| l.id == id)
    }

    pub fn add_list(&mut self, list: TodoList) {
        self.lists.push(list);
        self.last_updated = Utc::now();
    }

    /// Remove a list and every item that belonged to it.
    pub fn remove_list(&mut self, id: Uuid) -> Result<TodoList> {
        let pos = self
            .lists
            .iter()
            .position(|l| l.id == id)
            .ok_or(SessionError::ListNotFound(id))?;

        let list = self.lists.remove(pos);
        self.active.retain(|i| i.list_id != Some(id));
        self.completed.retain(|i| i.list_id != Some(id));
        if self.selected_list == Some(id) {
            self.selected_list = None;
        }
        self.last_updated = Utc::now();
        Ok(list)
    }

    /// Select a list (or clear the selection)
    pub fn select_list(&mut self, id: Option<Uuid>) -> Result<()> {
        if let Some(list_id) = id {
            if !self.has_list(list_id) {
                return Err(SessionError::ListNotFound(list_id));
            }
        }
        self.selected_list = id;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Active items for the given list (all items when `list_id` is None)
    pub fn active_in(&self, list_id: Option<Uuid>) -> Vec<&TodoItem> {
        self.active
            .iter()
            .filter(|i| list_id.is_none() || i.list_id == list_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_board_is_empty() {
        let board = TodoBoard::new();
        assert!(board.active.is_empty());
        assert!(board.completed.is_empty());
        assert!(board.lists.is_empty());
        assert!(board.selected_list.is_none());
    }

    #[test]
    fn test_add_item_flat_board() {
        let mut board = TodoBoard::new();
        let item = board
            .add_item(TodoDraft::new("Buy milk", "Two liters"))
            .unwrap()
            .clone();

        assert_eq!(board.active.len(), 1);
        assert_eq!(item.title, "Buy milk");
        assert_eq!(item.description, "Two liters");
        assert!(item.list_id.is_none());
    }

    #[test]
    fn test_add_item_requires_selection_with_lists() {
        let mut board = TodoBoard::new();
        let list = TodoList::new("Groceries");
        let list_id = list.id;
        board.add_list(list);

        let err = board.add_item(TodoDraft::new("Buy milk", "")).unwrap_err();
        assert!(matches!(err, SessionError::NoListSelected));

        board.select_list(Some(list_id)).unwrap();
        let item = board
            .add_item(TodoDraft::new("Buy milk", ""))
            .unwrap()
            .clone();
        assert_eq!(item.list_id, Some(list_id));
    }

    #[test]
    fn test_add_item_unknown_list_rejected() {
        let mut board = TodoBoard::new();
        board.add_list(TodoList::new("Groceries"));

        let stray = Uuid::new_v4();
        let err = board
            .add_item(TodoDraft::new("x", "").with_list(stray))
            .unwrap_err();
        assert!(matches!(err, SessionError::ListNotFound(id) if id == stray));
    }

    #[test]
    fn test_complete_moves_item_exactly_once() {
        let mut board = TodoBoard::new();
        let id = board
            .add_item(TodoDraft::new("Buy milk", ""))
            .unwrap()
            .id;

        let done = board.complete_item(id).unwrap();
        assert!(done.completed_at.is_some());
        assert!(board.active.is_empty());
        assert_eq!(board.completed.len(), 1);

        let err = board.complete_item(id).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyCompleted(i) if i == id));
        assert_eq!(board.completed.len(), 1);
    }

    #[test]
    fn test_remove_from_either_collection() {
        let mut board = TodoBoard::new();
        let a = board.add_item(TodoDraft::new("a", "")).unwrap().id;
        let b = board.add_item(TodoDraft::new("b", "")).unwrap().id;
        board.complete_item(b).unwrap();

        board.remove_item(a).unwrap();
        assert!(board.active.is_empty());

        board.remove_item(b).unwrap();
        assert!(board.completed.is_empty());

        let err = board.remove_item(a).unwrap_err();
        assert!(matches!(err, SessionError::ItemNotFound(_)));
    }

    #[test]
    fn test_remove_list_drops_its_items() {
        let mut board = TodoBoard::new();
        let list = TodoList::new("Groceries");
        let list_id = list.id;
        board.add_list(list);
        board.select_list(Some(list_id)).unwrap();

        let id = board.add_item(TodoDraft::new("Buy milk", "")).unwrap().id;
        board.complete_item(id).unwrap();
        board
            .add_item(TodoDraft::new("Buy bread", ""))
            .unwrap();

        board.remove_list(list_id).unwrap();
        assert!(board.lists.is_empty());
        assert!(board.active.is_empty());
        assert!(board.completed.is_empty());
        assert!(board.selected_list.is_none());
    }

    #[test]
    fn test_select_unknown_list_rejected() {
        let mut board = TodoBoard::new();
        let err = board.select_list(Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, SessionError::ListNotFound(_)));
    }

    #[test]
    fn test_active_in_filters_by_list() {
        let mut board = TodoBoard::new();
        let groceries = TodoList::new("Groceries");
        let chores = TodoList::new("Chores");
        let (g, c) = (groceries.id, chores.id);
        board.add_list(groceries);
        board.add_list(chores);

        board
            .add_item(TodoDraft::new("Buy milk", "").with_list(g))
            .unwrap();
        board
            .add_item(TodoDraft::new("Vacuum", "").with_list(c))
            .unwrap();

        assert_eq!(board.active_in(Some(g)).len(), 1);
        assert_eq!(board.active_in(None).len(), 2);
    }
}
