use async_trait::async_trait;
use todo_core::{TodoDraft, TodoItem, TodoList};
use uuid::Uuid;

use crate::auth::session::Session;
use crate::error::Result;

#[async_trait]
pub trait TodoClientTrait: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> Result<()>;

    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    fn logout(&self) -> Result<()>;

    async fn lists(&self) -> Result<Vec<TodoList>>;

    async fn create_list(&self, name: &str) -> Result<TodoList>;

    async fn delete_list(&self, id: Uuid) -> Result<()>;

    async fn todos(&self, list_id: Option<Uuid>) -> Result<Vec<TodoItem>>;

    async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem>;

    async fn complete_todo(&self, id: Uuid) -> Result<TodoItem>;

    async fn delete_todo(&self, id: Uuid) -> Result<()>;
}
