pub mod breakdown;
pub mod dashboard;
pub mod filter;
pub mod kpi;
pub mod temporal;

pub use breakdown::{breakdown_by_product, breakdown_by_team, ProductCount, TeamCount};
pub use dashboard::{build_dashboard, DashboardSettings, DashboardView};
pub use filter::{apply_filters, FilterState, Period, Selector};
pub use kpi::{compute_kpis, KpiSummary, TerminalStatuses};
pub use temporal::{daily_series, DailyPoint, DAILY_WINDOW_DAYS};
