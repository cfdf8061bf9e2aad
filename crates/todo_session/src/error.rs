//! Session manager error types

use crate::storage::StorageKey;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No saved entry for {0:?}")]
    NotFound(StorageKey),

    #[error("No list selected")]
    NoListSelected,

    #[error("Todo item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Todo item already completed: {0}")]
    AlreadyCompleted(Uuid),

    #[error("List not found: {0}")]
    ListNotFound(Uuid),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
