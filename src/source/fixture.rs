use std::path::PathBuf;

use async_trait::async_trait;

use super::TicketSource;
use crate::error::AppError;
use crate::parser::pipeline::parse_list_response;
use crate::parser::types::RawTicketRecord;

/// Reads a list envelope (`{"items": [...]}`) from disk. The token is ignored.
pub struct FixtureTicketSource {
    path: PathBuf,
}

impl FixtureTicketSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TicketSource for FixtureTicketSource {
    async fn fetch_raw(&self, _token: &str) -> Result<Vec<RawTicketRecord>, AppError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_list_response(&body)
    }
}
