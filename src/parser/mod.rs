pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{normalize_records, parse_list_response};
pub use types::{RawLookup, RawTicketRecord, Ticket, TicketListResponse, NOT_AVAILABLE};
