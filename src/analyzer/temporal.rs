use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::parser::types::Ticket;

/// Length of the trend window, evaluation day included.
pub const DAILY_WINDOW_DAYS: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// "2024-01-15"
    pub date: String,
    /// "15/01"
    pub label: String,
    pub opened: usize,
    pub closed: usize,
    pub net: i64,
}

/// Generates (day_key, day_label, day) for `days` consecutive UTC days
/// ending at `end` inclusive, in chronological order.
pub fn generate_day_keys(end: NaiveDate, days: i64) -> Vec<(String, String, NaiveDate)> {
    let mut result = Vec::with_capacity(days.max(0) as usize);
    let mut current = end - Duration::days(days - 1);

    while current <= end {
        let day_key = current.format("%Y-%m-%d").to_string();
        let day_label = format!("{:02}/{:02}", current.day(), current.month());
        result.push((day_key, day_label, current));
        current += Duration::days(1);
    }

    result
}

/// Opened/closed counts for the 15 UTC days ending at `now`.
///
/// The window is anchored to `now`, never to the data's own range, so it
/// always has exactly 15 points.
pub fn daily_series(tickets: &[Ticket], now: DateTime<Utc>) -> Vec<DailyPoint> {
    let mut opened_by_day: HashMap<NaiveDate, usize> = HashMap::new();
    let mut closed_by_day: HashMap<NaiveDate, usize> = HashMap::new();

    for t in tickets {
        *opened_by_day.entry(t.opened_at.date_naive()).or_insert(0) += 1;
        if let Some(closed) = t.closed_at {
            *closed_by_day.entry(closed.date_naive()).or_insert(0) += 1;
        }
    }

    generate_day_keys(now.date_naive(), DAILY_WINDOW_DAYS)
        .into_iter()
        .map(|(date, label, day)| {
            let opened = opened_by_day.get(&day).copied().unwrap_or(0);
            let closed = closed_by_day.get(&day).copied().unwrap_or(0);
            DailyPoint {
                date,
                label,
                opened,
                closed,
                net: opened as i64 - closed as i64,
            }
        })
        .collect()
}
