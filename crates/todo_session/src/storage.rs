//! Board storage trait and implementations

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use todo_core::TodoItem;
use tokio::fs;

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Active,
    Completed,
}

impl StorageKey {
    pub fn file_name(self) -> &'static str {
        match self {
            StorageKey::Active => "todolist.json",
            StorageKey::Completed => "completed_todos.json",
        }
    }
}

/// Board storage trait
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Load a persisted collection
    async fn load(&self, key: StorageKey) -> Result<Vec<TodoItem>>;

    /// Overwrite a persisted collection
    async fn save(&self, key: StorageKey, items: &[TodoItem]) -> Result<()>;

    /// Check whether a collection has been persisted
    async fn exists(&self, key: StorageKey) -> bool;

    /// Delete a persisted collection
    async fn clear(&self, key: StorageKey) -> Result<()>;
}

/// File-based board storage: one JSON file per collection
#[derive(Debug, Clone)]
pub struct FileTodoStorage {
    base_path: PathBuf,
}

impl FileTodoStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: StorageKey) -> PathBuf {
        self.base_path.join(key.file_name())
    }
}

#[async_trait]
impl TodoStorage for FileTodoStorage {
    async fn load(&self, key: StorageKey) -> Result<Vec<TodoItem>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Err(SessionError::NotFound(key));
        }

        let contents = fs::read_to_string(&path).await?;
        let items: Vec<TodoItem> = serde_json::from_str(&contents)?;

        Ok(items)
    }

    async fn save(&self, key: StorageKey, items: &[TodoItem]) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.entry_path(key);
        let contents = serde_json::to_string_pretty(items)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn exists(&self, key: StorageKey) -> bool {
        self.entry_path(key).exists()
    }

    async fn clear(&self, key: StorageKey) -> Result<()> {
        let path = self.entry_path(key);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}
