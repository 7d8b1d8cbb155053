//! Dashboard view: runs the filter engine and every aggregation for one
//! evaluation time and bundles the results for the presentation layer.
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::breakdown::{
    breakdown_by_product, breakdown_by_team, count_by_first_seen, ProductCount, TeamCount,
    DEFAULT_TEAM_PREFIX,
};
use super::filter::{apply_filters, FilterState};
use super::kpi::{compute_kpis, KpiSummary, TerminalStatuses};
use super::temporal::{daily_series, DailyPoint};
use crate::parser::deserializers::format_display_datetime;
use crate::parser::types::Ticket;

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub meta: DashboardMeta,
    pub filters: FilterState,
    pub kpis: KpiSummary,
    pub daily: Vec<DailyPoint>,
    pub by_team: Vec<TeamCount>,
    pub by_product: Vec<ProductCount>,
    pub active_tickets: Vec<ActiveTicketRow>,
    pub options: FilterOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub evaluated_at: DateTime<Utc>,
    pub total_loaded: usize,
    pub total_filtered: usize,
    pub calcul_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTicketRow {
    pub id: u64,
    pub title: String,
    pub status: String,
    pub team: String,
    /// "dd/MM/yyyy HH:mm", UTC
    pub opened_at: String,
}

/// Selector choices, taken from the unfiltered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub teams: Vec<String>,
    pub products: Vec<String>,
}

/// Knobs of the aggregation that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub terminal: TerminalStatuses,
    pub team_prefix: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            terminal: TerminalStatuses::default(),
            team_prefix: DEFAULT_TEAM_PREFIX.to_string(),
        }
    }
}

// ─── Builders ────────────────────────────────────────────────────────────────

/// Non-terminal tickets for the follow-up table, input order kept.
pub fn active_tickets(tickets: &[Ticket], terminal: &TerminalStatuses) -> Vec<ActiveTicketRow> {
    tickets
        .iter()
        .filter(|t| !terminal.is_terminal(&t.status))
        .map(|t| ActiveTicketRow {
            id: t.id,
            title: t.title.clone(),
            status: t.status.clone(),
            team: t.team.clone(),
            opened_at: format_display_datetime(&t.opened_at),
        })
        .collect()
}

pub fn filter_options(tickets: &[Ticket]) -> FilterOptions {
    let distinct = |key: fn(&Ticket) -> &str| -> Vec<String> {
        count_by_first_seen(tickets, key)
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect()
    };

    FilterOptions {
        statuses: distinct(|t| t.status.as_str()),
        teams: distinct(|t| t.team.as_str()),
        products: distinct(|t| t.product.as_str()),
    }
}

/// Builds the complete dashboard for `tickets` under `filters`.
///
/// # Arguments
/// * `tickets` - The full normalized collection
/// * `filters` - Selector state, read only
/// * `now` - Evaluation time, sampled once by the caller
/// * `settings` - Terminal labels and team display prefix
pub fn build_dashboard(
    tickets: &[Ticket],
    filters: &FilterState,
    now: DateTime<Utc>,
    settings: &DashboardSettings,
) -> DashboardView {
    let start = Instant::now();

    let filtered = apply_filters(tickets, filters, now);

    let kpis = compute_kpis(&filtered, &settings.terminal);
    let daily = daily_series(&filtered, now);
    let by_team = breakdown_by_team(&filtered, &settings.team_prefix);
    let by_product = breakdown_by_product(&filtered);
    let active = active_tickets(&filtered, &settings.terminal);
    let options = filter_options(tickets);

    DashboardView {
        meta: DashboardMeta {
            evaluated_at: now,
            total_loaded: tickets.len(),
            total_filtered: filtered.len(),
            calcul_duration_ms: start.elapsed().as_millis() as u64,
        },
        filters: filters.clone(),
        kpis,
        daily,
        by_team,
        by_product,
        active_tickets: active,
        options,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
