//! Views computed over a live ticket store.

use std::sync::Arc;

use helpdesk_core::model::{NewTicket, Priority, Role, SessionUser, Status, TicketPatch};
use helpdesk_core::{ManualClock, Persistence, TicketStore};
use helpdesk_views::{Analytics, DashboardStats, StatusBoard, TicketQuery, recent};
use proptest::prelude::*;

fn user(id: i64, name: &str, role: Role) -> SessionUser {
    SessionUser {
        id,
        name: name.to_string(),
        email: format!("{id}@example.com"),
        role,
    }
}

#[test]
fn analytics_empty_until_store_loads() {
    let store = TicketStore::new(Persistence::in_memory(), Arc::new(ManualClock::default()));
    assert!(store.is_loading());
    assert!(Analytics::for_store(&store).is_empty());
}

#[test]
fn dashboard_and_analytics_follow_scope() {
    let persistence = Persistence::in_memory();
    let clock = Arc::new(ManualClock::default());
    let mut store = TicketStore::new(persistence, clock.clone());
    let admin = user(1, "Admin User", Role::Admin);
    let client = user(3, "Client User", Role::Client);

    store.load(Some(&admin)).unwrap();
    for (who, dept) in [(&client, "IT"), (&admin, "IT"), (&client, "HR")] {
        clock.advance_millis(1_000);
        store
            .create(NewTicket::filed_by(who, "t", "d", dept, Priority::Medium))
            .unwrap();
    }
    store
        .update(2, &TicketPatch::status(Status::InProgress))
        .unwrap();

    let stats = DashboardStats::from_tickets(store.tickets());
    assert_eq!((stats.open, stats.in_progress, stats.total), (2, 1, 3));
    let analytics = Analytics::for_store(&store);
    let departments: Vec<(&str, usize)> = analytics
        .by_department
        .iter()
        .map(|c| (c.name.as_str(), c.value))
        .collect();
    assert_eq!(departments, [("IT", 2), ("HR", 1)]);
    assert_eq!(recent(store.tickets(), 5)[0].id, 3);

    store.load(Some(&client)).unwrap();
    let stats = DashboardStats::from_tickets(store.tickets());
    assert_eq!((stats.open, stats.total), (2, 2));
    let board = StatusBoard::partition(store.tickets());
    assert!(board.column(Status::InProgress).is_empty());
    assert_eq!(
        TicketQuery::new(None, "hr").filter(store.tickets()).len(),
        1
    );
}

proptest! {
    #[test]
    fn board_partition_preserves_every_ticket(statuses in prop::collection::vec(0usize..4, 0..40)) {
        let persistence = Persistence::in_memory();
        let mut store = TicketStore::new(persistence, Arc::new(ManualClock::default()));
        let agent = user(2, "Employee User", Role::Agent);
        store.load(Some(&agent)).unwrap();
        for (i, s) in statuses.iter().enumerate() {
            let t = store
                .create(NewTicket::filed_by(&agent, format!("t{i}"), "", "Other", Priority::Low))
                .unwrap();
            store.update(t.id, &TicketPatch::status(Status::ALL[*s])).unwrap();
        }

        let board = StatusBoard::partition(store.tickets());
        prop_assert_eq!(board.len(), statuses.len());
        for column in &board.columns {
            prop_assert!(column.tickets.iter().all(|t| t.status == column.status));
            prop_assert!(column.tickets.windows(2).all(|w| w[0].id < w[1].id));
        }

        let stats = DashboardStats::from_tickets(store.tickets());
        prop_assert_eq!(stats.total, statuses.len());
        prop_assert_eq!(stats.open, board.column(Status::Open).len());
    }
}
