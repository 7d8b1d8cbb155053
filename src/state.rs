use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzer::dashboard::{build_dashboard, DashboardSettings, DashboardView};
use crate::analyzer::filter::FilterState;
use crate::config::AppConfig;
use crate::error::{AppError, FailureKind, GENERIC_FETCH_MESSAGE};
use crate::parser::pipeline::normalize_records;
use crate::parser::types::Ticket;
use crate::source::{AuthProvider, TicketSource};

/// Shown for failures whose detail is not meant for the user.
pub const GENERIC_LOAD_MESSAGE: &str = "Unable to load tickets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&AppError> for LoadFailure {
    fn from(err: &AppError) -> Self {
        let message = match err {
            AppError::AuthFailure(_) => GENERIC_LOAD_MESSAGE.to_string(),
            AppError::Http(_) => GENERIC_FETCH_MESSAGE.to_string(),
            other => other.to_string(),
        };
        LoadFailure {
            kind: err.kind(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "failure")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(LoadFailure),
}

/// Identifies one load request. Only the most recent one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadToken(u64);

/// Token → raw records → tickets. Suspends only on the two network calls.
pub async fn fetch_tickets(
    auth: &dyn AuthProvider,
    source: &dyn TicketSource,
    scopes: &[String],
) -> Result<Vec<Ticket>, AppError> {
    let token = auth.acquire_token_silent(scopes).await?;
    let raw = source.fetch_raw(&token).await?;
    normalize_records(&raw)
}

/// Owns the injected collaborators, the loaded tickets and the filter state.
pub struct DashboardController {
    auth: Arc<dyn AuthProvider>,
    source: Arc<dyn TicketSource>,
    scopes: Vec<String>,
    settings: DashboardSettings,
    tickets: Vec<Ticket>,
    filters: FilterState,
    load_state: LoadState,
    generation: u64,
}

impl DashboardController {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        source: Arc<dyn TicketSource>,
        scopes: Vec<String>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            auth,
            source,
            scopes,
            settings,
            tickets: Vec::new(),
            filters: FilterState::default(),
            load_state: LoadState::Idle,
            generation: 0,
        }
    }

    pub fn from_config(
        auth: Arc<dyn AuthProvider>,
        source: Arc<dyn TicketSource>,
        config: &AppConfig,
    ) -> Self {
        let mut controller = Self::new(
            auth,
            source,
            config.resolved_scopes(),
            config.dashboard_settings(),
        );
        controller.filters = config.filters.clone();
        controller
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Apply a selector change atomically: the closure edits a copy, which
    /// replaces the live state only once complete.
    pub fn update_filters<F>(&mut self, f: F)
    where
        F: FnOnce(&mut FilterState),
    {
        let mut next = self.filters.clone();
        f(&mut next);
        self.filters = next;
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Starts a load. Any earlier request still in flight is superseded.
    pub fn begin_load(&mut self) -> LoadToken {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        log::info!("Loading tickets (request {})", self.generation);
        LoadToken(self.generation)
    }

    /// The network part of a load, detached from `self` so several may be
    /// in flight at once.
    pub fn fetch(&self) -> impl Future<Output = Result<Vec<Ticket>, AppError>> + Send + 'static {
        let auth = Arc::clone(&self.auth);
        let source = Arc::clone(&self.source);
        let scopes = self.scopes.clone();
        async move { fetch_tickets(auth.as_ref(), source.as_ref(), &scopes).await }
    }

    /// Lands a load result. Returns false when `token` was superseded, in
    /// which case nothing changes. Tickets are replaced only on success.
    pub fn complete_load(&mut self, token: LoadToken, result: Result<Vec<Ticket>, AppError>) -> bool {
        if token.0 != self.generation {
            log::debug!(
                "Discarding stale load result (request {}, current {})",
                token.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(tickets) => {
                log::info!("Loaded {} tickets (request {})", tickets.len(), token.0);
                self.tickets = tickets;
                self.load_state = LoadState::Ready;
            }
            Err(err) => {
                log::warn!("Ticket load failed (request {}): {}", token.0, err);
                self.load_state = LoadState::Failed(LoadFailure::from(&err));
            }
        }
        true
    }

    /// begin → fetch → complete, no retry.
    pub async fn load(&mut self) -> &LoadState {
        let token = self.begin_load();
        let result = self.fetch().await;
        self.complete_load(token, result);
        &self.load_state
    }

    /// Recompute every view with a single evaluation time.
    pub fn view_at(&self, now: DateTime<Utc>) -> DashboardView {
        let view = build_dashboard(&self.tickets, &self.filters, now, &self.settings);
        log::debug!(
            "Dashboard recomputed: {}/{} tickets in {} ms",
            view.meta.total_filtered,
            view.meta.total_loaded,
            view.meta.calcul_duration_ms
        );
        view
    }

    pub fn view(&self) -> DashboardView {
        self.view_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::filter::{Period, Selector};
    use crate::parser::types::{RawLookup, RawTicketRecord};
    use async_trait::async_trait;

    struct FixedAuth(Result<String, String>);

    #[async_trait]
    impl AuthProvider for FixedAuth {
        async fn acquire_token_silent(&self, _scopes: &[String]) -> Result<String, AppError> {
            self.0.clone().map_err(AppError::AuthFailure)
        }
    }

    struct MemorySource {
        expected_token: String,
        records: Vec<RawTicketRecord>,
    }

    #[async_trait]
    impl TicketSource for MemorySource {
        async fn fetch_raw(&self, token: &str) -> Result<Vec<RawTicketRecord>, AppError> {
            if token != self.expected_token {
                return Err(AppError::FetchFailure {
                    message: Some("Token de autorização não fornecido".to_string()),
                });
            }
            Ok(self.records.clone())
        }
    }

    struct FailingSource(Option<String>);

    #[async_trait]
    impl TicketSource for FailingSource {
        async fn fetch_raw(&self, _token: &str) -> Result<Vec<RawTicketRecord>, AppError> {
            Err(AppError::FetchFailure {
                message: self.0.clone(),
            })
        }
    }

    fn record(id: i64, status: Option<&str>, created: &str) -> RawTicketRecord {
        RawTicketRecord {
            id: Some(id),
            title: Some(format!("Chamado {}", id)),
            status: status.map(str::to_string),
            created: Some(created.to_string()),
            completed: None,
            team: Some(RawLookup {
                title: Some("Squad Infra".to_string()),
            }),
            product: None,
        }
    }

    fn controller(auth: FixedAuth, source: impl TicketSource + 'static) -> DashboardController {
        DashboardController::new(
            Arc::new(auth),
            Arc::new(source),
            vec!["User.Read".to_string()],
            DashboardSettings::default(),
        )
    }

    fn ticket(id: u64) -> Ticket {
        Ticket {
            id,
            title: format!("Chamado {}", id),
            status: "Aberto".to_string(),
            opened_at: Utc::now(),
            closed_at: None,
            team: "Squad Infra".to_string(),
            product: "N/A".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = MemorySource {
            expected_token: "tok".to_string(),
            records: vec![
                record(1, Some("Aberto"), "2024-01-15T08:30:00"),
                record(2, Some("Concluído"), "2024-01-14T08:30:00"),
            ],
        };
        let mut c = controller(FixedAuth(Ok("tok".to_string())), source);
        assert_eq!(c.load_state(), &LoadState::Idle);

        let state = c.load().await.clone();
        assert_eq!(state, LoadState::Ready);
        assert_eq!(c.tickets().len(), 2);
        assert_eq!(c.tickets()[0].product, "N/A");
    }

    #[tokio::test]
    async fn test_auth_failure_is_generic_load_failure() {
        let source = MemorySource {
            expected_token: "tok".to_string(),
            records: vec![],
        };
        let mut c = controller(FixedAuth(Err("interaction_required".to_string())), source);
        let state = c.load().await.clone();
        assert_eq!(
            state,
            LoadState::Failed(LoadFailure {
                kind: FailureKind::Auth,
                message: GENERIC_LOAD_MESSAGE.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_server_message() {
        let mut c = controller(
            FixedAuth(Ok("tok".to_string())),
            FailingSource(Some("List does not exist.".to_string())),
        );
        match c.load().await {
            LoadState::Failed(f) => {
                assert_eq!(f.kind, FailureKind::Fetch);
                assert_eq!(f.message, "List does not exist.");
            }
            other => panic!("expected failure, got {:?}", other),
        }

        let mut generic = controller(FixedAuth(Ok("tok".to_string())), FailingSource(None));
        match generic.load().await {
            LoadState::Failed(f) => assert_eq!(f.message, GENERIC_FETCH_MESSAGE),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_record_fails_whole_load() {
        let source = MemorySource {
            expected_token: "tok".to_string(),
            records: vec![
                record(1, Some("Aberto"), "2024-01-15T08:30:00"),
                record(2, None, "2024-01-14T08:30:00"),
            ],
        };
        let mut c = controller(FixedAuth(Ok("tok".to_string())), source);
        match c.load().await {
            LoadState::Failed(f) => assert_eq!(f.kind, FailureKind::Malformed),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(c.tickets().is_empty());
    }

    #[test]
    fn test_latest_request_wins() {
        let source = MemorySource {
            expected_token: "tok".to_string(),
            records: vec![],
        };
        let mut c = controller(FixedAuth(Ok("tok".to_string())), source);

        let first = c.begin_load();
        let second = c.begin_load();

        assert!(c.complete_load(second, Ok(vec![ticket(2)])));
        assert!(!c.complete_load(first, Ok(vec![ticket(1), ticket(3)])));

        assert_eq!(c.tickets().len(), 1);
        assert_eq!(c.tickets()[0].id, 2);
        assert_eq!(c.load_state(), &LoadState::Ready);
    }

    #[test]
    fn test_stale_failure_does_not_clobber_state() {
        let source = FailingSource(None);
        let mut c = controller(FixedAuth(Ok("tok".to_string())), source);

        let first = c.begin_load();
        let second = c.begin_load();
        assert!(c.complete_load(second, Ok(vec![ticket(7)])));
        assert!(!c.complete_load(first, Err(AppError::FetchFailure { message: None })));
        assert_eq!(c.load_state(), &LoadState::Ready);
    }

    #[test]
    fn test_failed_reload_keeps_previous_tickets() {
        let mut c = controller(FixedAuth(Ok("tok".to_string())), FailingSource(None));
        let token = c.begin_load();
        c.complete_load(token, Ok(vec![ticket(1)]));

        let token = c.begin_load();
        c.complete_load(token, Err(AppError::FetchFailure { message: None }));
        assert_eq!(c.tickets().len(), 1);
        assert!(matches!(c.load_state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_update_filters_and_view() {
        let mut c = controller(FixedAuth(Ok("tok".to_string())), FailingSource(None));
        let token = c.begin_load();
        c.complete_load(token, Ok(vec![ticket(1), ticket(2)]));

        c.update_filters(|f| {
            f.status = Selector::Exact("Concluído".to_string());
            f.period = Period::All;
        });
        assert_eq!(c.filters().period, Period::All);
        assert_eq!(c.view().kpis.total, 0);

        c.set_filters(FilterState::unfiltered());
        let view = c.view();
        assert_eq!(view.kpis.total, 2);
        assert_eq!(view.daily.len(), 15);
        assert_eq!(view.kpis.open_count, 2);
    }

    #[test]
    fn test_load_state_json() {
        let failed = LoadState::Failed(LoadFailure {
            kind: FailureKind::Fetch,
            message: "x".to_string(),
        });
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["failure"]["kind"], "fetch");
        assert_eq!(serde_json::to_value(&LoadState::Ready).unwrap()["state"], "ready");
    }
}
