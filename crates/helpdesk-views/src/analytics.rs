//! Analytics bundle: every count dimension computed from one snapshot.

use helpdesk_core::TicketStore;
use helpdesk_core::model::Ticket;
use serde::Serialize;

use crate::counts::{
    NamedCount, counts_by_department, counts_by_priority, counts_by_requester, counts_by_status,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub by_department: Vec<NamedCount>,
    pub by_status: Vec<NamedCount>,
    pub by_priority: Vec<NamedCount>,
    pub by_requester: Vec<NamedCount>,
}

impl Analytics {
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            by_department: counts_by_department(tickets),
            by_status: counts_by_status(tickets),
            by_priority: counts_by_priority(tickets),
            by_requester: counts_by_requester(tickets),
        }
    }

    /// Analytics for the store's current view. Empty while the store is
    /// still loading.
    #[must_use]
    pub fn for_store(store: &TicketStore) -> Self {
        if store.is_loading() {
            tracing::debug!("analytics requested before tickets loaded");
            return Self::default();
        }
        Self::from_tickets(store.tickets())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_department.is_empty()
    }
}
