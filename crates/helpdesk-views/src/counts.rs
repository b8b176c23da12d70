//! Group-and-count reductions over a ticket snapshot.
//!
//! Each dimension is returned as an ordered list of [`NamedCount`] in the
//! order the group key is first seen in the snapshot, which is what the
//! charts render left to right.

use helpdesk_core::model::Ticket;
use serde::Serialize;

/// One bar or slice: a group name and how many tickets fell into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub value: usize,
}

/// Count tickets by `key`, keeping first-seen group order.
///
/// Linear scan over the groups seen so far; the number of distinct groups is
/// small for every dimension we chart.
pub fn count_by<F>(tickets: &[Ticket], mut key: F) -> Vec<NamedCount>
where
    F: FnMut(&Ticket) -> String,
{
    let mut counts: Vec<NamedCount> = Vec::new();
    for ticket in tickets {
        let name = key(ticket);
        match counts.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.value += 1,
            None => counts.push(NamedCount { name, value: 1 }),
        }
    }
    counts
}

#[must_use]
pub fn counts_by_department(tickets: &[Ticket]) -> Vec<NamedCount> {
    count_by(tickets, |t| t.department.clone())
}

/// Grouped by display label, e.g. `"In Progress"`.
#[must_use]
pub fn counts_by_status(tickets: &[Ticket]) -> Vec<NamedCount> {
    count_by(tickets, |t| t.status.label())
}

#[must_use]
pub fn counts_by_priority(tickets: &[Ticket]) -> Vec<NamedCount> {
    count_by(tickets, |t| t.priority.label())
}

/// Grouped by the requester name snapshotted on each ticket.
#[must_use]
pub fn counts_by_requester(tickets: &[Ticket]) -> Vec<NamedCount> {
    count_by(tickets, |t| t.requester_name.clone())
}
