use std::collections::HashMap;

use serde::Serialize;

use crate::parser::types::Ticket;

/// Display prefix stripped from team names by default ("Squad Infra" → "Infra").
pub const DEFAULT_TEAM_PREFIX: &str = "Squad ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCount {
    /// Grouping key, untouched.
    pub team: String,
    /// Rendered label, display prefix removed.
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCount {
    pub product: String,
    pub count: usize,
}

/// Counts per key in order of first appearance.
pub fn count_by_first_seen<'a, F>(tickets: &'a [Ticket], key: F) -> Vec<(&'a str, usize)>
where
    F: Fn(&'a Ticket) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for t in tickets {
        let k = key(t);
        match index.get(k) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(k, counts.len());
                counts.push((k, 1));
            }
        }
    }

    counts
}

pub fn breakdown_by_team(tickets: &[Ticket], prefix: &str) -> Vec<TeamCount> {
    count_by_first_seen(tickets, |t| t.team.as_str())
        .into_iter()
        .map(|(team, count)| TeamCount {
            team: team.to_string(),
            label: team_label(team, prefix).to_string(),
            count,
        })
        .collect()
}

/// Counts per product, most frequent first; ties keep first-seen order.
pub fn breakdown_by_product(tickets: &[Ticket]) -> Vec<ProductCount> {
    let mut products: Vec<ProductCount> = count_by_first_seen(tickets, |t| t.product.as_str())
        .into_iter()
        .map(|(product, count)| ProductCount {
            product: product.to_string(),
            count,
        })
        .collect();
    // sort_by is stable
    products.sort_by(|a, b| b.count.cmp(&a.count));
    products
}

fn team_label<'a>(team: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return team;
    }
    team.strip_prefix(prefix).unwrap_or(team)
}
