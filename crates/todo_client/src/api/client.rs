use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, Method, Response, StatusCode};
use todo_core::{TodoDraft, TodoItem, TodoList};
use uuid::Uuid;

use crate::api::models::{
    ApiErrorBody, CreateListRequest, CreateTodoRequest, Credentials, LoginResponse,
};
use crate::auth::session::{Session, SessionStore};
use crate::client_trait::TodoClientTrait;
use crate::error::{ClientError, Result};
use crate::utils::http_utils::execute_request;

// Main todo backend client
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: Arc<Client>,
    api_base: String,
    session_store: SessionStore,
}

impl TodoClient {
    pub fn new(api_base: impl Into<String>, data_dir: PathBuf) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        TodoClient {
            client: Arc::new(Client::new()),
            api_base,
            session_store: SessionStore::new(data_dir),
        }
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session_store
    }

    /// Currently cached session, valid or not.
    pub fn current_session(&self) -> Option<Session> {
        self.session_store.load()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Token for the next request. A cached session past its expiry is
    /// cleared here, before any request is issued.
    fn bearer_token(&self) -> Result<String> {
        let Some(session) = self.session_store.load() else {
            return Err(ClientError::NotAuthenticated);
        };
        if !session.is_valid() {
            warn!("Cached session is expired, clearing it");
            self.session_store.clear()?;
            return Err(ClientError::TokenExpired);
        }
        Ok(session.token)
    }

    async fn api_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);
        ClientError::Api { status, message }
    }

    /// Map non-success responses on authenticated endpoints. A 401 means the
    /// server no longer accepts the token, so the cached session goes too.
    async fn check_authed(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Server rejected the session token, clearing it");
            self.session_store.clear()?;
            return Err(ClientError::TokenExpired);
        }
        Err(Self::api_error(response).await)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = execute_request(
            &self.client,
            Method::POST,
            self.url("/users/register"),
            None,
            Some(&body),
        )
        .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        info!("Registered {email}");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = execute_request(
            &self.client,
            Method::POST,
            self.url("/users/login"),
            None,
            Some(&body),
        )
        .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::BAD_REQUEST
        {
            return Err(ClientError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        let login: LoginResponse = response.json().await?;
        let session = Session::from_token(login.token)?;
        if !session.is_valid() {
            // The server handed out a token that is already stale
            self.session_store.clear()?;
            return Err(ClientError::TokenExpired);
        }
        self.session_store.save(&session)?;
        info!("Logged in as {email}");
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.session_store.clear()
    }

    pub async fn lists(&self) -> Result<Vec<TodoList>> {
        let token = self.bearer_token()?;
        let response = execute_request(
            &self.client,
            Method::GET,
            self.url("/lists"),
            Some(&token),
            None::<&()>,
        )
        .await?;
        let response = self.check_authed(response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_list(&self, name: &str) -> Result<TodoList> {
        let token = self.bearer_token()?;
        let body = CreateListRequest {
            name: name.to_string(),
        };
        let response = execute_request(
            &self.client,
            Method::POST,
            self.url("/lists"),
            Some(&token),
            Some(&body),
        )
        .await?;
        let response = self.check_authed(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_list(&self, id: Uuid) -> Result<()> {
        let token = self.bearer_token()?;
        let response = execute_request(
            &self.client,
            Method::DELETE,
            self.url(&format!("/lists/{id}")),
            Some(&token),
            None::<&()>,
        )
        .await?;
        self.check_authed(response).await?;
        Ok(())
    }

    pub async fn todos(&self, list_id: Option<Uuid>) -> Result<Vec<TodoItem>> {
        let token = self.bearer_token()?;
        let url = match list_id {
            Some(id) => self.url(&format!("/todos?list_id={id}")),
            None => self.url("/todos"),
        };
        let response =
            execute_request(&self.client, Method::GET, url, Some(&token), None::<&()>).await?;
        let response = self.check_authed(response).await?;
        Ok(response.json().await?)
    }

    pub async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem> {
        let Some(list_id) = draft.list_id else {
            return Err(ClientError::NoListSelected);
        };
        let token = self.bearer_token()?;
        let body = CreateTodoRequest {
            title: draft.title,
            description: draft.description,
            list_id,
            due_time: draft.due_at,
        };
        let response = execute_request(
            &self.client,
            Method::POST,
            self.url("/todos"),
            Some(&token),
            Some(&body),
        )
        .await?;
        let response = self.check_authed(response).await?;
        Ok(response.json().await?)
    }

    pub async fn complete_todo(&self, id: Uuid) -> Result<TodoItem> {
        let token = self.bearer_token()?;
        let response = execute_request(
            &self.client,
            Method::PUT,
            self.url(&format!("/todos/{id}/complete")),
            Some(&token),
            None::<&()>,
        )
        .await?;
        let response = self.check_authed(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<()> {
        let token = self.bearer_token()?;
        let response = execute_request(
            &self.client,
            Method::DELETE,
            self.url(&format!("/todos/{id}")),
            Some(&token),
            None::<&()>,
        )
        .await?;
        self.check_authed(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoClientTrait for TodoClient {
    async fn register(&self, email: &str, password: &str) -> Result<()> {
        TodoClient::register(self, email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        TodoClient::login(self, email, password).await
    }

    fn logout(&self) -> Result<()> {
        TodoClient::logout(self)
    }

    async fn lists(&self) -> Result<Vec<TodoList>> {
        TodoClient::lists(self).await
    }

    async fn create_list(&self, name: &str) -> Result<TodoList> {
        TodoClient::create_list(self, name).await
    }

    async fn delete_list(&self, id: Uuid) -> Result<()> {
        TodoClient::delete_list(self, id).await
    }

    async fn todos(&self, list_id: Option<Uuid>) -> Result<Vec<TodoItem>> {
        TodoClient::todos(self, list_id).await
    }

    async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem> {
        TodoClient::add_todo(self, draft).await
    }

    async fn complete_todo(&self, id: Uuid) -> Result<TodoItem> {
        TodoClient::complete_todo(self, id).await
    }

    async fn delete_todo(&self, id: Uuid) -> Result<()> {
        TodoClient::delete_todo(self, id).await
    }
}
