use std::collections::HashSet;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::parser::types::Ticket;

/// The two terminal labels excluded from "open" counts.
///
/// A closed pair, unlike the open status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalStatuses {
    pub completed: String,
    pub cancelled: String,
}

impl Default for TerminalStatuses {
    fn default() -> Self {
        TerminalStatuses {
            completed: "Concluído".to_string(),
            cancelled: "Cancelado".to_string(),
        }
    }
}

impl TerminalStatuses {
    pub fn is_terminal(&self, status: &str) -> bool {
        status == self.completed || status == self.cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub open_count: usize,
    pub weekend_count: usize,
    /// Tickets per distinct opening day, one decimal; "0" for an empty set.
    pub daily_average: String,
    pub total: usize,
}

pub fn compute_kpis(tickets: &[Ticket], terminal: &TerminalStatuses) -> KpiSummary {
    let open_count = tickets
        .iter()
        .filter(|t| !terminal.is_terminal(&t.status))
        .count();

    let weekend_count = tickets
        .iter()
        .filter(|t| matches!(t.opened_at.weekday(), Weekday::Sat | Weekday::Sun))
        .count();

    let distinct_days: HashSet<_> = tickets.iter().map(|t| t.opened_at.date_naive()).collect();

    KpiSummary {
        open_count,
        weekend_count,
        daily_average: format_daily_average(tickets.len(), distinct_days.len()),
        total: tickets.len(),
    }
}

fn format_daily_average(total: usize, distinct_days: usize) -> String {
    if distinct_days == 0 {
        return "0".to_string();
    }
    // Half-up on ties: 5 over 4 days reads "1.3"
    let tenths = (total as f64 * 10.0 / distinct_days as f64).round();
    format!("{:.1}", tenths / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::deserializers::parse_timestamp;

    fn ticket(id: u64, status: &str, opened: &str) -> Ticket {
        Ticket {
            id,
            title: format!("Ticket {}", id),
            status: status.to_string(),
            opened_at: parse_timestamp(opened).unwrap(),
            closed_at: None,
            team: "Squad Infra".to_string(),
            product: "Banco de Dados".to_string(),
        }
    }

    #[test]
    fn test_empty_set() {
        let kpi = compute_kpis(&[], &TerminalStatuses::default());
        assert_eq!(kpi.total, 0);
        assert_eq!(kpi.open_count, 0);
        assert_eq!(kpi.weekend_count, 0);
        assert_eq!(kpi.daily_average, "0");
    }

    #[test]
    fn test_open_count_excludes_terminal_pair() {
        let tickets = vec![
            ticket(1, "Aberto", "2024-01-15T08:30:00"),
            ticket(2, "Pendente", "2024-01-15T09:30:00"),
            ticket(3, "Concluído", "2024-01-15T10:30:00"),
            ticket(4, "Cancelado", "2024-01-15T11:30:00"),
            ticket(5, "Reaberto", "2024-01-15T12:30:00"),
        ];
        let kpi = compute_kpis(&tickets, &TerminalStatuses::default());
        assert_eq!(kpi.open_count, 3);
        assert_eq!(kpi.total, 5);
    }

    #[test]
    fn test_weekend_count_uses_utc_day() {
        // 2024-01-13 is a Saturday, 2024-01-14 a Sunday, 2024-01-15 a Monday.
        let tickets = vec![
            ticket(1, "Aberto", "2024-01-13T09:15:00"),
            ticket(2, "Aberto", "2024-01-14T23:59:00"),
            ticket(3, "Aberto", "2024-01-15T00:00:00"),
            // Sunday evening in São Paulo is Monday in UTC.
            ticket(4, "Aberto", "2024-01-14T22:00:00-03:00"),
        ];
        let kpi = compute_kpis(&tickets, &TerminalStatuses::default());
        assert_eq!(kpi.weekend_count, 2);
    }

    #[test]
    fn test_daily_average_one_decimal() {
        // 4 tickets over 3 distinct days → 1.333… → "1.3"
        let tickets = vec![
            ticket(1, "Aberto", "2024-01-13T09:15:00"),
            ticket(2, "Aberto", "2024-01-13T11:00:00"),
            ticket(3, "Aberto", "2024-01-14T13:45:00"),
            ticket(4, "Aberto", "2024-01-15T08:30:00"),
        ];
        let kpi = compute_kpis(&tickets, &TerminalStatuses::default());
        assert_eq!(kpi.daily_average, "1.3");

        let single = compute_kpis(&tickets[..1], &TerminalStatuses::default());
        assert_eq!(single.daily_average, "1.0");
    }

    #[test]
    fn test_daily_average_tie_rounds_up() {
        // 5 tickets over 4 distinct days → 1.25 → "1.3"
        let tickets = vec![
            ticket(1, "Aberto", "2024-01-12T09:00:00"),
            ticket(2, "Aberto", "2024-01-12T15:00:00"),
            ticket(3, "Aberto", "2024-01-13T10:00:00"),
            ticket(4, "Aberto", "2024-01-14T11:00:00"),
            ticket(5, "Aberto", "2024-01-15T12:00:00"),
        ];
        let kpi = compute_kpis(&tickets, &TerminalStatuses::default());
        assert_eq!(kpi.daily_average, "1.3");

        // 10 over 8 lands on the same tie
        assert_eq!(format_daily_average(10, 8), "1.3");
        assert_eq!(format_daily_average(7, 4), "1.8");
    }

    #[test]
    fn test_custom_terminal_labels() {
        let terminal = TerminalStatuses {
            completed: "Completed".to_string(),
            cancelled: "Cancelled".to_string(),
        };
        let tickets = vec![
            ticket(1, "Completed", "2024-01-15T08:30:00"),
            ticket(2, "Concluído", "2024-01-15T08:30:00"),
        ];
        assert_eq!(compute_kpis(&tickets, &terminal).open_count, 1);
    }
}
