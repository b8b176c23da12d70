//! Ticket list filtering: a status filter plus a free-text search box.

use std::str::FromStr;

use helpdesk_core::model::{ParseEnumError, Status, Ticket};
use serde::Serialize;

/// Filter applied to the ticket list. Both parts must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketQuery {
    /// `None` shows every status.
    pub status: Option<Status>,
    /// Case-insensitive substring of title or department, or a substring of
    /// the decimal id. Empty matches everything.
    pub search: String,
}

impl TicketQuery {
    #[must_use]
    pub fn new(status: Option<Status>, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    /// Parse a status filter where `all` (or empty) means no filter.
    pub fn parse_status(raw: &str) -> Result<Option<Status>, ParseEnumError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        Status::from_str(trimmed).map(Some)
    }

    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|status| status != ticket.status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        ticket.title.to_lowercase().contains(&needle)
            || ticket.department.to_lowercase().contains(&needle)
            || ticket.id.to_string().contains(&self.search)
    }

    /// Matching tickets in snapshot order.
    #[must_use]
    pub fn filter(&self, tickets: &[Ticket]) -> Vec<Ticket> {
        let hits: Vec<Ticket> = tickets.iter().filter(|t| self.matches(t)).cloned().collect();
        tracing::trace!(
            total = tickets.len(),
            matched = hits.len(),
            "filtered ticket list"
        );
        hits
    }
}
