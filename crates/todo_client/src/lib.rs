pub mod api;
pub mod auth;
pub mod client_trait;
pub mod error;
pub mod utils;

pub use api::client::TodoClient;
pub use auth::session::{Session, SessionStore};
pub use client_trait::TodoClientTrait;
pub use error::{ClientError, Result};
