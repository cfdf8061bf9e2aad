//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session token has expired, please log in again")]
    TokenExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("No list selected")]
    NoListSelected,

    #[error("Unusable session token: {0}")]
    InvalidToken(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
