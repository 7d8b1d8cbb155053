use serde::{Deserialize, Serialize};

use crate::analyzer::breakdown::DEFAULT_TEAM_PREFIX;
use crate::analyzer::dashboard::DashboardSettings;
use crate::analyzer::filter::FilterState;
use crate::analyzer::kpi::TerminalStatuses;
use crate::error::AppError;

/// Environment variable prefix for every configuration key.
pub const ENV_PREFIX: &str = "DASH_";

const SELECT_FIELDS: &str =
    "Id,Title,Status,Created,DataConclusao,SquadResponsavel/Title,ProdutoServico";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub client_id: String,
    pub tenant_id: String,
    pub client_secret: Option<String>,
    /// Pre-acquired bearer token; skips the identity provider entirely.
    pub access_token: Option<String>,
    pub site_url: String,
    pub list_id: String,
    /// Overrides the SharePoint items endpoint (e.g. a proxy route).
    pub api_url: Option<String>,
    pub scopes: Vec<String>,
    /// Serve tickets from a local list-envelope JSON file instead of HTTP.
    pub fixture_path: Option<String>,
    pub terminal_statuses: TerminalStatuses,
    pub team_label_prefix: String,
    pub filters: FilterState,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            client_id: String::new(),
            tenant_id: String::new(),
            client_secret: None,
            access_token: None,
            site_url: String::new(),
            list_id: String::new(),
            api_url: None,
            scopes: Vec::new(),
            fixture_path: None,
            terminal_statuses: TerminalStatuses::default(),
            team_label_prefix: DEFAULT_TEAM_PREFIX.to_string(),
            filters: FilterState::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> Result<AppConfig, AppError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads every `DASH_*` variable from the process environment.
    pub fn from_env() -> AppConfig {
        Self::from_pairs(
            std::env::vars().filter_map(|(k, v)| k.strip_prefix(ENV_PREFIX).map(|k| (k.to_string(), v))),
        )
    }

    /// Builds a config from (KEY, value) pairs, keys without the prefix.
    /// Unknown keys are ignored; unparseable values keep their default.
    pub fn from_pairs<I>(pairs: I) -> AppConfig
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = AppConfig::default();

        for (key, value) in pairs {
            let value = value.trim().to_string();
            match key.as_str() {
                "CLIENT_ID" => config.client_id = value,
                "TENANT_ID" => config.tenant_id = value,
                "CLIENT_SECRET" => config.client_secret = Some(value).filter(|v| !v.is_empty()),
                "ACCESS_TOKEN" => config.access_token = Some(value).filter(|v| !v.is_empty()),
                "SITE_URL" => config.site_url = value.trim_end_matches('/').to_string(),
                "LIST_ID" => config.list_id = value,
                "API_URL" => config.api_url = Some(value).filter(|v| !v.is_empty()),
                "SCOPES" => {
                    config.scopes = value
                        .split([',', ' '])
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                }
                "FIXTURE_PATH" => config.fixture_path = Some(value).filter(|v| !v.is_empty()),
                "STATUS_COMPLETED" if !value.is_empty() => config.terminal_statuses.completed = value,
                "STATUS_CANCELLED" if !value.is_empty() => config.terminal_statuses.cancelled = value,
                "TEAM_PREFIX" => config.team_label_prefix = value,
                "PERIOD" => {
                    if let Ok(p) = value.parse() {
                        config.filters.period = p;
                    }
                }
                "FILTER_STATUS" => {
                    if let Ok(s) = value.parse() {
                        config.filters.status = s;
                    }
                }
                "FILTER_TEAM" => {
                    if let Ok(s) = value.parse() {
                        config.filters.team = s;
                    }
                }
                "FILTER_PRODUCT" => {
                    if let Ok(s) = value.parse() {
                        config.filters.product = s;
                    }
                }
                _ => {}
            }
        }

        config
    }

    /// "https://login.microsoftonline.com/{tenant}"
    pub fn authority(&self) -> String {
        format!("https://login.microsoftonline.com/{}", self.tenant_id)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority())
    }

    /// Configured scopes, or the dashboard's default pair: basic profile
    /// read plus read access to the SharePoint tenant.
    pub fn resolved_scopes(&self) -> Vec<String> {
        if !self.scopes.is_empty() {
            return self.scopes.clone();
        }
        let mut scopes = vec!["User.Read".to_string()];
        if let Some(origin) = site_origin(&self.site_url) {
            scopes.push(format!("{}/Sites.Read.All", origin));
        }
        scopes
    }

    /// The list items endpoint, `api_url` taking precedence.
    pub fn items_url(&self) -> Result<String, AppError> {
        if let Some(url) = &self.api_url {
            return Ok(url.clone());
        }
        if self.site_url.is_empty() || self.list_id.is_empty() {
            return Err(AppError::Config(
                "DASH_SITE_URL and DASH_LIST_ID are required without DASH_API_URL".to_string(),
            ));
        }
        Ok(format!(
            "{}/_api/web/lists(guid'{}')/items?$select={}&$expand=SquadResponsavel",
            self.site_url, self.list_id, SELECT_FIELDS
        ))
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            terminal: self.terminal_statuses.clone(),
            team_prefix: self.team_label_prefix.clone(),
        }
    }
}

/// "https://tenant.sharepoint.com/sites/x" → "https://tenant.sharepoint.com"
fn site_origin(site_url: &str) -> Option<String> {
    let (scheme, rest) = site_url.split_once("://")?;
    let host = rest.split('/').next().filter(|h| !h.is_empty())?;
    Some(format!("{}://{}", scheme, host))
}
