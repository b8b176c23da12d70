use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, SessionUser, display_label, normalize};

/// Ticket urgency as chosen by the requester or an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Display label used by charts and cards (`High`).
    #[must_use]
    pub fn label(self) -> String {
        display_label(self.as_str())
    }
}

/// The four lifecycle states, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Display label used by board headings (`In Progress`).
    #[must_use]
    pub fn label(self) -> String {
        display_label(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "open" => Ok(Self::Open),
            // accept the board heading spelling too
            "in-progress" | "in progress" | "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// A single entry in a ticket's discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// A support ticket as persisted under the `tickets` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TicketRecord")]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub department: String,
    pub priority: Priority,
    pub status: Status,
    pub requester_id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

/// Wire shape accepted on read. Older records omit the requester snapshot,
/// `updatedAt`, or the comment list; those are defaulted here so the rest of
/// the crate only ever sees the canonical [`Ticket`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketRecord {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    department: String,
    #[serde(default)]
    priority: Priority,
    status: Status,
    #[serde(default)]
    requester_id: i64,
    #[serde(default)]
    requester_name: String,
    #[serde(default)]
    requester_email: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl From<TicketRecord> for Ticket {
    fn from(record: TicketRecord) -> Self {
        let updated_at = record
            .updated_at
            .map_or(record.created_at, |at| at.max(record.created_at));
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            department: record.department,
            priority: record.priority,
            status: record.status,
            requester_id: record.requester_id,
            requester_name: record.requester_name,
            requester_email: record.requester_email,
            created_at: record.created_at,
            updated_at,
            comments: record.comments,
        }
    }
}

impl Ticket {
    /// Comments newest-first, the order detail views present them in.
    pub fn comments_newest_first(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().rev()
    }
}

/// Caller-supplied fields for a new ticket. The store assigns id, status,
/// timestamps, and the empty comment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub department: String,
    #[serde(default)]
    pub priority: Priority,
    pub requester_id: i64,
    pub requester_name: String,
    pub requester_email: String,
}

impl NewTicket {
    /// Build a ticket filed by `requester`, snapshotting their name and email.
    #[must_use]
    pub fn filed_by(
        requester: &SessionUser,
        title: impl Into<String>,
        description: impl Into<String>,
        department: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            department: department.into(),
            priority,
            requester_id: requester.id,
            requester_name: requester.name.clone(),
            requester_email: requester.email.clone(),
        }
    }
}

/// Partial update merged into an existing ticket. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub requester_id: Option<i64>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
}

impl TicketPatch {
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `ticket`. Timestamps are the store's job.
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(title) = &self.title {
            ticket.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            ticket.description.clone_from(description);
        }
        if let Some(department) = &self.department {
            ticket.department.clone_from(department);
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(requester_id) = self.requester_id {
            ticket.requester_id = requester_id;
        }
        if let Some(name) = &self.requester_name {
            ticket.requester_name.clone_from(name);
        }
        if let Some(email) = &self.requester_email {
            ticket.requester_email.clone_from(email);
        }
    }
}
