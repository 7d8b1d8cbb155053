//! External collaborators: the identity provider and the ticket list service.
//!
//! Both sit behind traits so the controller receives them explicitly and
//! tests can substitute in-memory versions.
//!
//! Modules:
//! - auth: bearer token acquisition
//! - http: SharePoint list read over reqwest
//! - fixture: list envelope read from a local JSON file

pub mod auth;
pub mod fixture;
pub mod http;

use async_trait::async_trait;

use crate::error::AppError;
use crate::parser::types::RawTicketRecord;

pub use auth::{ClientCredentialsProvider, StaticTokenProvider};
pub use fixture::FixtureTicketSource;
pub use http::{fetch_with_auth, HttpTicketSource};

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Acquire a bearer token for the current account without user
    /// interaction. Any failure is an `AppError::AuthFailure`.
    async fn acquire_token_silent(&self, scopes: &[String]) -> Result<String, AppError>;
}

#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn fetch_raw(&self, token: &str) -> Result<Vec<RawTicketRecord>, AppError>;
}
