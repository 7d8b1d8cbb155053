use crate::error::AppError;
use crate::parser::deserializers::{non_blank, parse_timestamp};
use crate::parser::types::{RawTicketRecord, Ticket, TicketListResponse, NOT_AVAILABLE};

/// Decode a list-service JSON body (`items` or `value` envelope).
pub fn parse_list_response(body: &str) -> Result<Vec<RawTicketRecord>, AppError> {
    let response: TicketListResponse = serde_json::from_str(body)?;
    Ok(response.items)
}

/// Normalize a batch of raw records, preserving length and order.
///
/// Fails the whole batch on the first malformed record: a partially
/// populated collection must never reach the charts.
pub fn normalize_records(raw: &[RawTicketRecord]) -> Result<Vec<Ticket>, AppError> {
    log::debug!("Normalizing {} raw records", raw.len());
    raw.iter()
        .enumerate()
        .map(|(index, record)| {
            normalize_ticket(record).map_err(|reason| AppError::MalformedRecord { index, reason })
        })
        .collect()
}

fn normalize_ticket(raw: &RawTicketRecord) -> Result<Ticket, String> {
    // Id (required, positive)
    let id = match raw.id {
        Some(id) if id > 0 => id as u64,
        Some(id) => return Err(format!("invalid Id: {}", id)),
        None => return Err("missing Id".to_string()),
    };

    // Title (required)
    let title = non_blank(raw.title.as_deref())
        .ok_or_else(|| "missing Title".to_string())?
        .to_string();

    // Status (required, opaque label)
    let status = non_blank(raw.status.as_deref())
        .ok_or_else(|| "missing Status".to_string())?
        .to_string();

    // Created (required)
    let created_str = raw
        .created
        .as_deref()
        .ok_or_else(|| "missing Created".to_string())?;
    let opened_at = parse_timestamp(created_str)
        .ok_or_else(|| format!("invalid Created: {:?}", created_str))?;

    // DataConclusao (optional, but never before Created)
    let closed_at = match non_blank(raw.completed.as_deref()) {
        Some(s) => {
            let dt = parse_timestamp(s).ok_or_else(|| format!("invalid DataConclusao: {:?}", s))?;
            if dt < opened_at {
                return Err(format!("DataConclusao {:?} precedes Created {:?}", s, created_str));
            }
            Some(dt)
        }
        None => None,
    };

    let team = raw
        .team
        .as_ref()
        .and_then(|lookup| non_blank(lookup.title.as_deref()))
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let product = non_blank(raw.product.as_deref())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    Ok(Ticket {
        id,
        title,
        status,
        opened_at,
        closed_at,
        team,
        product,
    })
}
