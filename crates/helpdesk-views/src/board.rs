//! Dashboard tiles, the recent-tickets list, and the status board.

use helpdesk_core::model::{Status, Ticket};
use serde::Serialize;

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub total: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut stats = Self {
            total: tickets.len(),
            ..Self::default()
        };
        for ticket in tickets {
            match ticket.status {
                Status::Open => stats.open += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Resolved => stats.resolved += 1,
                Status::Closed => {}
            }
        }
        stats
    }
}

/// The `limit` most recently created tickets, newest first.
///
/// Ties on `created_at` keep snapshot order.
#[must_use]
pub fn recent(tickets: &[Ticket], limit: usize) -> Vec<Ticket> {
    let mut sorted: Vec<&Ticket> = tickets.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.into_iter().take(limit).cloned().collect()
}

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub status: Status,
    pub label: String,
    pub tickets: Vec<Ticket>,
}

/// Tickets partitioned into one column per status, in lifecycle order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBoard {
    pub columns: Vec<Column>,
}

impl StatusBoard {
    /// Every status gets a column, even when empty. Within a column tickets
    /// keep their snapshot order.
    #[must_use]
    pub fn partition(tickets: &[Ticket]) -> Self {
        let columns = Status::ALL
            .iter()
            .map(|&status| Column {
                status,
                label: status.label(),
                tickets: tickets
                    .iter()
                    .filter(|t| t.status == status)
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn column(&self, status: Status) -> &[Ticket] {
        match self.columns.iter().find(|c| c.status == status) {
            Some(column) => &column.tickets,
            None => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.tickets.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
