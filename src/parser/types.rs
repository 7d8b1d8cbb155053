use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when a ticket has no team or product.
pub const NOT_AVAILABLE: &str = "N/A";

/// One item of the SharePoint ticket list, as returned by the list service.
///
/// Every field is optional at the serde level so that a record missing a
/// required column reaches the normalizer and fails there with a precise
/// `MalformedRecord` instead of an opaque JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTicketRecord {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Created")]
    pub created: Option<String>,
    #[serde(rename = "DataConclusao")]
    pub completed: Option<String>,
    #[serde(rename = "SquadResponsavel")]
    pub team: Option<RawLookup>,
    #[serde(rename = "ProdutoServico")]
    pub product: Option<String>,
}

/// Expanded lookup column; only its display name is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLookup {
    #[serde(rename = "Title")]
    pub title: Option<String>,
}

/// List envelope. The proxy route answers `{ "items": [...] }`, a direct
/// OData call answers `{ "value": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketListResponse {
    #[serde(default, alias = "value")]
    pub items: Vec<RawTicketRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub team: String,
    pub product: String,
}
