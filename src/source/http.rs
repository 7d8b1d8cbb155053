//! SharePoint list read over HTTP.
//!
//! Uses reqwest with Bearer token auth. The target is either the list's
//! `_api/web/lists(guid'…')/items` endpoint or a proxy route answering
//! the same record shape.

use async_trait::async_trait;

use super::TicketSource;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::parser::pipeline::parse_list_response;
use crate::parser::types::RawTicketRecord;

const ACCEPT_NOMETADATA: &str = "application/json;odata=nometadata";

/// Attach the bearer token to one request. Composed at the call site
/// instead of registered as a hook on a shared client.
pub fn fetch_with_auth(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
    request.bearer_auth(token)
}

pub struct HttpTicketSource {
    client: reqwest::Client,
    items_url: String,
}

impl HttpTicketSource {
    pub fn new(client: reqwest::Client, items_url: &str) -> Self {
        Self {
            client,
            items_url: items_url.to_string(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &AppConfig) -> Result<Self, AppError> {
        Ok(Self::new(client, &config.items_url()?))
    }
}

#[async_trait]
impl TicketSource for HttpTicketSource {
    async fn fetch_raw(&self, token: &str) -> Result<Vec<RawTicketRecord>, AppError> {
        let request = self
            .client
            .get(&self.items_url)
            .header(reqwest::header::ACCEPT, ACCEPT_NOMETADATA);

        let resp = fetch_with_auth(request, token).send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            log::warn!("Ticket list request failed with HTTP {}", status.as_u16());
            return Err(AppError::FetchFailure {
                message: extract_server_message(&body),
            });
        }

        parse_list_response(&body)
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts the proxy shape `{"error": "..."}` and the OData shapes
/// `{"error": {"message": "..."}}`, `{"error": {"message": {"value": "..."}}}`
/// and `{"odata.error": {"message": {"value": "..."}}}`.
pub fn extract_server_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = json.get("error").or_else(|| json.get("odata.error"))?;

    let message = match error {
        serde_json::Value::String(s) => Some(s.as_str()),
        serde_json::Value::Object(obj) => match obj.get("message") {
            Some(serde_json::Value::String(s)) => Some(s.as_str()),
            Some(serde_json::Value::Object(m)) => m.get("value").and_then(|v| v.as_str()),
            _ => None,
        },
        _ => None,
    }?;

    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
