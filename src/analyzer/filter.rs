use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parser::types::Ticket;

/// A single-field selector: everything, or one exact label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    #[default]
    All,
    Exact(String),
}

impl Selector {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Exact(expected) => expected == value,
        }
    }
}

impl FromStr for Selector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" | "todos" => Selector::All,
            other => Selector::Exact(other.to_string()),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Exact(v) => f.write_str(v),
        }
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Look-back window on `opened_at`, relative to the evaluation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "7d", alias = "7dias")]
    Last7Days,
    #[serde(rename = "30d", alias = "30dias")]
    Last30Days,
    #[serde(rename = "all", alias = "todos")]
    All,
}

impl Period {
    /// Earliest `opened_at` kept, or None when the window is disabled.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Last7Days => Some(now - Duration::days(7)),
            Period::Last30Days => Some(now - Duration::days(30)),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" | "7dias" => Ok(Period::Last7Days),
            "30d" | "30dias" => Ok(Period::Last30Days),
            "all" | "todos" => Ok(Period::All),
            other => Err(format!("Unknown period: {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub status: Selector,
    pub team: Selector,
    pub product: Selector,
    pub period: Period,
}

impl FilterState {
    /// Every selector open and no period window.
    pub fn unfiltered() -> Self {
        FilterState {
            period: Period::All,
            ..FilterState::default()
        }
    }

    pub fn matches(&self, ticket: &Ticket, cutoff: Option<DateTime<Utc>>) -> bool {
        self.status.matches(&ticket.status)
            && self.team.matches(&ticket.team)
            && self.product.matches(&ticket.product)
            && cutoff.map_or(true, |c| ticket.opened_at >= c)
    }
}

/// Keep the tickets matching every active predicate, in input order.
///
/// `now` is sampled once by the caller so the whole pass shares one cutoff.
pub fn apply_filters(tickets: &[Ticket], filters: &FilterState, now: DateTime<Utc>) -> Vec<Ticket> {
    let cutoff = filters.period.cutoff(now);
    tickets
        .iter()
        .filter(|t| filters.matches(t, cutoff))
        .cloned()
        .collect()
}
