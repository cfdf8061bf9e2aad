//! Wire models for the consumed backend contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: String,
    pub list_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<DateTime<Utc>>,
}

/// Error payload some endpoints return. Body text is used as a fallback
/// when this doesn't parse.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}
