use async_trait::async_trait;

use super::AuthProvider;
use crate::config::AppConfig;
use crate::error::AppError;

/// Hands out a token obtained elsewhere (CLI login, CI secret).
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn acquire_token_silent(&self, _scopes: &[String]) -> Result<String, AppError> {
        if self.token.trim().is_empty() {
            return Err(AppError::AuthFailure("No access token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// Client-credentials grant against the identity provider's v2 token
/// endpoint. One form POST per acquisition, no local token cache.
pub struct ClientCredentialsProvider {
    client: reqwest::Client,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsProvider {
    pub fn new(client: reqwest::Client, token_endpoint: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            client,
            token_endpoint: token_endpoint.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &AppConfig) -> Result<Self, AppError> {
        let secret = config
            .client_secret
            .as_deref()
            .ok_or_else(|| AppError::Config("DASH_CLIENT_SECRET is required".to_string()))?;
        if config.client_id.is_empty() || config.tenant_id.is_empty() {
            return Err(AppError::Config(
                "DASH_CLIENT_ID and DASH_TENANT_ID are required".to_string(),
            ));
        }
        Ok(Self::new(client, &config.token_endpoint(), &config.client_id, secret))
    }
}

#[async_trait]
impl AuthProvider for ClientCredentialsProvider {
    async fn acquire_token_silent(&self, scopes: &[String]) -> Result<String, AppError> {
        let scope = scopes.join(" ");
        let resp = self
            .client
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthFailure(format!("Token request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::AuthFailure(format!("Token response unreadable: {}", e)))?;
        if !status.is_success() {
            return Err(AppError::AuthFailure(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| AppError::AuthFailure(format!("Invalid token response: {}", e)))?;

        json["access_token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::AuthFailure("No access_token in response".to_string()))
    }
}
