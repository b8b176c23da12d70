//! helpdesk-views: pure derived views over a ticket snapshot.
//!
//! Nothing here touches storage. Every function takes the scoped slice the
//! ticket store exposes and returns a fresh value, so views recompute on
//! every call and never drift from the snapshot.

pub mod analytics;
pub mod board;
pub mod counts;
pub mod query;

pub use analytics::Analytics;
pub use board::{DashboardStats, StatusBoard, recent};
pub use counts::{
    NamedCount, counts_by_department, counts_by_priority, counts_by_requester, counts_by_status,
};
pub use query::TicketQuery;

#[cfg(test)]
pub(crate) mod test_support;
