//! Ticket record wire format.
//!
//! The record is produced once per successful submission, stored as a single
//! JSON string under [`TICKET_DATA_KEY`], and read back by the ticket page.
//! Once stored it is treated as fully valid; the reader tolerates missing
//! fields rather than re-validating.

use serde::{Deserialize, Serialize};

/// Store key the serialized record lives under.
pub const TICKET_DATA_KEY: &str = "ticketData";

/// Validated, normalized attendee payload handed from intake to render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketRecord {
    /// Trimmed attendee name.
    pub name: String,
    /// Trimmed attendee email.
    pub email: String,
    /// GitHub handle with exactly one leading `@`.
    pub github: String,
    /// Avatar image as a `data:` URI.
    pub avatar_data_url: String,
}

impl TicketRecord {
    /// Serialize the record to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored record, tolerating missing fields.
    ///
    /// Returns `None` only when the payload is not a JSON object at all;
    /// partial records deserialize with empty strings for absent fields.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
