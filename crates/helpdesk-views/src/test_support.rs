use chrono::{DateTime, TimeZone, Utc};
use helpdesk_core::model::{Priority, Status, Ticket};

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, minute, 0).unwrap()
}

pub fn ticket(id: u64, department: &str, status: Status) -> Ticket {
    let created = at(u32::try_from(id % 60).unwrap());
    Ticket {
        id,
        title: format!("Ticket {id}"),
        description: String::new(),
        department: department.to_string(),
        priority: Priority::Medium,
        status,
        requester_id: 3,
        requester_name: "Client User".to_string(),
        requester_email: "client@example.com".to_string(),
        created_at: created,
        updated_at: created,
        comments: Vec::new(),
    }
}
