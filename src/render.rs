//! Ticket view hydration.
//!
//! One-shot population of the ticket page from the session store. Each
//! display target is filled independently, so a partial record degrades per
//! field instead of failing the page. The ticket identifier is drawn fresh
//! on every hydration; reloading the view reuses the stored record but shows
//! a new identifier.

use rand::Rng as _;

use crate::store::SessionStore;
use crate::ticket::{TICKET_DATA_KEY, TicketRecord};

/// Notice shown when no record is present in the store.
pub const MISSING_TICKET_NOTICE: &str =
    "Oops! Ticket data not found. Please generate your ticket again.";

/// Inclusive range ticket identifiers are drawn from.
pub const TICKET_ID_MIN: u32 = 10_000;
/// Upper bound of the identifier range, inclusive.
pub const TICKET_ID_MAX: u32 = 99_999;

/// Display targets on the ticket page.
///
/// Implementations may lack individual targets; a missing target simply
/// ignores its setter. `show_missing_notice` replaces the main content
/// region when no record exists.
pub trait TicketSurface {
    /// Set the greeting headline.
    fn set_greeting(&mut self, text: &str);
    /// Set the attendee email line.
    fn set_email(&mut self, text: &str);
    /// Set the avatar image from a `data:` URI.
    fn set_avatar(&mut self, data_url: &str);
    /// Set the attendee name on the ticket body.
    fn set_name(&mut self, text: &str);
    /// Set the GitHub handle on the ticket body.
    fn set_github(&mut self, text: &str);
    /// Set the ticket identifier text.
    fn set_ticket_id(&mut self, text: &str);
    /// Replace the main content region with a fallback notice.
    fn show_missing_notice(&mut self, text: &str);
}

/// Whether hydration found a record to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// A record was found and rendered.
    Rendered,
    /// No usable record; the fallback notice was shown.
    Missing,
}

/// Read the stored record and populate the ticket page.
///
/// The record is deliberately left in the store so a reload renders the same
/// data under a newly drawn identifier.
pub fn hydrate(store: &dyn SessionStore, surface: &mut dyn TicketSurface) -> HydrateOutcome {
    let record = store
        .get(TICKET_DATA_KEY)
        .and_then(|raw| TicketRecord::parse(&raw));
    match record {
        Some(record) => {
            populate(&record, fresh_ticket_id(), surface);
            HydrateOutcome::Rendered
        }
        None => {
            tracing::info!("No ticket record in the session store");
            surface.show_missing_notice(MISSING_TICKET_NOTICE);
            HydrateOutcome::Missing
        }
    }
}

/// Fill every display target that has data, plus the fresh identifier.
pub fn populate(record: &TicketRecord, ticket_id: u32, surface: &mut dyn TicketSurface) {
    if !record.name.is_empty() {
        surface.set_greeting(&greeting_for(&record.name));
        surface.set_name(&record.name);
    }
    if !record.email.is_empty() {
        surface.set_email(&record.email);
    }
    if !record.avatar_data_url.is_empty() {
        surface.set_avatar(&record.avatar_data_url);
    }
    if !record.github.is_empty() {
        surface.set_github(&record.github);
    }
    surface.set_ticket_id(&format_ticket_id(ticket_id));
}

/// The greeting headline for a given attendee name.
pub fn greeting_for(name: &str) -> String {
    format!("Congrats, {name}! Your ticket is ready.")
}

/// Draw a ticket identifier uniformly from the five-digit range.
pub fn fresh_ticket_id() -> u32 {
    rand::rng().random_range(TICKET_ID_MIN..=TICKET_ID_MAX)
}

/// Render an identifier as displayed on the ticket.
pub fn format_ticket_id(id: u32) -> String {
    format!("#{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakePage {
        greeting: Option<String>,
        email: Option<String>,
        avatar: Option<String>,
        name: Option<String>,
        github: Option<String>,
        ticket_id: Option<String>,
        missing_notice: Option<String>,
    }

    impl TicketSurface for FakePage {
        fn set_greeting(&mut self, text: &str) {
            self.greeting = Some(text.to_string());
        }

        fn set_email(&mut self, text: &str) {
            self.email = Some(text.to_string());
        }

        fn set_avatar(&mut self, data_url: &str) {
            self.avatar = Some(data_url.to_string());
        }

        fn set_name(&mut self, text: &str) {
            self.name = Some(text.to_string());
        }

        fn set_github(&mut self, text: &str) {
            self.github = Some(text.to_string());
        }

        fn set_ticket_id(&mut self, text: &str) {
            self.ticket_id = Some(text.to_string());
        }

        fn show_missing_notice(&mut self, text: &str) {
            self.missing_notice = Some(text.to_string());
        }
    }

    fn stored(record: &TicketRecord) -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .set(TICKET_DATA_KEY, &record.to_json().unwrap())
            .unwrap();
        store
    }

    fn sample_record() -> TicketRecord {
        TicketRecord {
            name: "Ada Lovelace".into(),
            email: "ada@gmail.com".into(),
            github: "@ada".into(),
            avatar_data_url: "data:image/png;base64,AAAA".into(),
        }
    }

    fn assert_is_ticket_id(text: &str) {
        let digits = text.strip_prefix('#').expect("leading #");
        assert_eq!(digits.len(), 5);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn hydrate_fills_every_target_from_the_record() {
        let store = stored(&sample_record());
        let mut page = FakePage::default();
        assert_eq!(hydrate(&store, &mut page), HydrateOutcome::Rendered);

        assert_eq!(
            page.greeting.as_deref(),
            Some("Congrats, Ada Lovelace! Your ticket is ready.")
        );
        assert_eq!(page.email.as_deref(), Some("ada@gmail.com"));
        assert_eq!(page.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(page.github.as_deref(), Some("@ada"));
        assert_eq!(page.avatar.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_is_ticket_id(page.ticket_id.as_deref().unwrap());
        assert!(page.missing_notice.is_none());
    }

    #[test]
    fn empty_store_shows_the_fallback_notice() {
        let store = MemoryStore::new();
        let mut page = FakePage::default();
        assert_eq!(hydrate(&store, &mut page), HydrateOutcome::Missing);
        assert_eq!(page.missing_notice.as_deref(), Some(MISSING_TICKET_NOTICE));
        assert!(page.ticket_id.is_none());
        assert!(page.greeting.is_none());
    }

    #[test]
    fn malformed_record_is_treated_as_missing() {
        let mut store = MemoryStore::new();
        store.set(TICKET_DATA_KEY, "not json").unwrap();
        let mut page = FakePage::default();
        assert_eq!(hydrate(&store, &mut page), HydrateOutcome::Missing);
    }

    #[test]
    fn partial_record_skips_absent_fields_only() {
        let record = TicketRecord {
            name: String::new(),
            email: "ada@gmail.com".into(),
            github: String::new(),
            avatar_data_url: String::new(),
        };
        let mut page = FakePage::default();
        populate(&record, 12_345, &mut page);

        assert!(page.greeting.is_none());
        assert!(page.name.is_none());
        assert!(page.github.is_none());
        assert!(page.avatar.is_none());
        assert_eq!(page.email.as_deref(), Some("ada@gmail.com"));
        assert_eq!(page.ticket_id.as_deref(), Some("#12345"));
    }

    #[test]
    fn identifiers_stay_in_the_five_digit_range() {
        for _ in 0..256 {
            let id = fresh_ticket_id();
            assert!((TICKET_ID_MIN..=TICKET_ID_MAX).contains(&id));
        }
    }

    #[test]
    fn reloading_draws_a_new_identifier_from_the_same_record() {
        let store = stored(&sample_record());
        let mut ids = HashSet::new();
        for _ in 0..8 {
            let mut page = FakePage::default();
            assert_eq!(hydrate(&store, &mut page), HydrateOutcome::Rendered);
            ids.insert(page.ticket_id.unwrap());
        }
        // The record is reused; the identifier is re-randomized per load.
        assert!(ids.len() > 1);
    }
}
