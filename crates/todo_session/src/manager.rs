//! Todo session manager service

use crate::error::{Result, SessionError};
use crate::storage::{StorageKey, TodoStorage};
use crate::structs::TodoBoard;
use std::sync::Arc;
use todo_core::{TodoDraft, TodoItem, TodoList};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Todo Session Manager - owns the board and keeps it persisted
pub struct TodoSessionManager<S: TodoStorage> {
    storage: Arc<S>,
    board: Arc<RwLock<TodoBoard>>,
}

impl<S: TodoStorage> TodoSessionManager<S> {
    /// Create a manager, loading both collections from storage. Missing
    /// entries yield an empty board.
    pub async fn new(storage: S) -> Result<Self> {
        let storage = Arc::new(storage);

        let active = match storage.load(StorageKey::Active).await {
            Ok(items) => items,
            Err(SessionError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        let completed = match storage.load(StorageKey::Completed).await {
            Ok(items) => items,
            Err(SessionError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        debug!(
            active = active.len(),
            completed = completed.len(),
            "Loaded board from storage"
        );

        Ok(Self {
            storage,
            board: Arc::new(RwLock::new(TodoBoard::from_collections(active, completed))),
        })
    }

    /// Snapshot of the current board
    pub async fn board(&self) -> TodoBoard {
        self.board.read().await.clone()
    }

    /// Overwrite both persisted collections from the given board.
    async fn persist(&self, board: &TodoBoard) -> Result<()> {
        self.storage.save(StorageKey::Active, &board.active).await?;
        self.storage
            .save(StorageKey::Completed, &board.completed)
            .await
    }

    /// Add a new active item
    pub async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem> {
        let mut board = self.board.write().await;
        let item = board.add_item(draft)?.clone();
        self.persist(&board).await?;
        info!(id = %item.id, title = %item.title, "Added todo");
        Ok(item)
    }

    /// Move an item to the completed collection
    pub async fn complete_todo(&self, id: Uuid) -> Result<TodoItem> {
        let mut board = self.board.write().await;
        let item = board.complete_item(id)?;
        self.persist(&board).await?;
        info!(id = %item.id, "Completed todo");
        Ok(item)
    }

    /// Remove an item from whichever collection holds it
    pub async fn delete_todo(&self, id: Uuid) -> Result<TodoItem> {
        let mut board = self.board.write().await;
        let item = board.remove_item(id)?;
        self.persist(&board).await?;
        info!(id = %item.id, "Deleted todo");
        Ok(item)
    }

    /// Create a list. Lists live in memory only; the persisted entries hold
    /// the item collections.
    pub async fn create_list(&self, name: &str) -> Result<TodoList> {
        let mut board = self.board.write().await;
        let list = TodoList::new(name);
        board.add_list(list.clone());
        info!(id = %list.id, name = %list.name, "Created list");
        Ok(list)
    }

    /// Delete a list and every item that belonged to it
    pub async fn delete_list(&self, id: Uuid) -> Result<TodoList> {
        let mut board = self.board.write().await;
        let list = board.remove_list(id)?;
        self.persist(&board).await?;
        info!(id = %list.id, "Deleted list");
        Ok(list)
    }

    /// Select a list (or clear the selection)
    pub async fn select_list(&self, id: Option<Uuid>) -> Result<()> {
        let mut board = self.board.write().await;
        board.select_list(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileTodoStorage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_manager_starts_empty() {
        let dir = tempdir().unwrap();
        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();

        let board = manager.board().await;
        assert!(board.active.is_empty());
        assert!(board.completed.is_empty());
    }

    #[tokio::test]
    async fn test_add_yields_one_more_active_item() {
        let dir = tempdir().unwrap();
        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();

        let item = manager
            .add_todo(TodoDraft::new("Buy milk", "Two liters"))
            .await
            .unwrap();

        let board = manager.board().await;
        assert_eq!(board.active.len(), 1);
        assert_eq!(board.active[0].id, item.id);
        assert_eq!(board.active[0].title, "Buy milk");
        assert_eq!(board.active[0].description, "Two liters");
    }

    #[tokio::test]
    async fn test_complete_moves_item_with_stamp() {
        let dir = tempdir().unwrap();
        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();

        let item = manager
            .add_todo(TodoDraft::new("Buy milk", ""))
            .await
            .unwrap();
        let done = manager.complete_todo(item.id).await.unwrap();

        assert!(done.completed_at.is_some());
        let board = manager.board().await;
        assert!(board.active.is_empty());
        assert_eq!(board.completed.len(), 1);

        // Completing again must fail, not duplicate
        assert!(manager.complete_todo(item.id).await.is_err());
        assert_eq!(manager.board().await.completed.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_does_not_survive_reload() {
        let dir = tempdir().unwrap();

        let kept;
        {
            let storage = FileTodoStorage::new(dir.path());
            let manager = TodoSessionManager::new(storage).await.unwrap();
            kept = manager
                .add_todo(TodoDraft::new("keep", ""))
                .await
                .unwrap();
            let gone = manager
                .add_todo(TodoDraft::new("drop", ""))
                .await
                .unwrap();
            manager.delete_todo(gone.id).await.unwrap();
        }

        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();
        let board = manager.board().await;

        assert_eq!(board.active.len(), 1);
        assert_eq!(board.active[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_reload_reproduces_collections() {
        let dir = tempdir().unwrap();

        let (active_id, done_id);
        {
            let storage = FileTodoStorage::new(dir.path());
            let manager = TodoSessionManager::new(storage).await.unwrap();
            active_id = manager
                .add_todo(TodoDraft::new("open", ""))
                .await
                .unwrap()
                .id;
            done_id = manager
                .add_todo(TodoDraft::new("done", ""))
                .await
                .unwrap()
                .id;
            manager.complete_todo(done_id).await.unwrap();
        }

        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();
        let board = manager.board().await;

        assert_eq!(board.active.len(), 1);
        assert_eq!(board.active[0].id, active_id);
        assert_eq!(board.completed.len(), 1);
        assert_eq!(board.completed[0].id, done_id);
        assert!(board.completed[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_list_drops_items_from_storage() {
        let dir = tempdir().unwrap();
        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();

        let list = manager.create_list("Groceries").await.unwrap();
        manager.select_list(Some(list.id)).await.unwrap();
        manager
            .add_todo(TodoDraft::new("Buy milk", ""))
            .await
            .unwrap();

        manager.delete_list(list.id).await.unwrap();
        assert!(manager.board().await.active.is_empty());

        // Reload sees the emptied collection
        let storage = FileTodoStorage::new(dir.path());
        let manager = TodoSessionManager::new(storage).await.unwrap();
        assert!(manager.board().await.active.is_empty());
    }
}
