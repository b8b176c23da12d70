//! Persisted record shapes: users, tickets, and comments.

pub mod ticket;
pub mod user;

use std::fmt;

pub use ticket::{Comment, NewTicket, Priority, Status, Ticket, TicketPatch};
pub use user::{Credential, NewUser, Role, SessionUser, User};

/// Departments offered by ticket forms. Advisory only: the store accepts any string.
pub const KNOWN_DEPARTMENTS: [&str; 10] = [
    "IT Support",
    "HR",
    "Finance",
    "Operations",
    "Marketing",
    "Sales",
    "Customer Service",
    "Facilities",
    "Legal",
    "Other",
];

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

/// Title-case a wire value for display: `in-progress` becomes `In Progress`.
pub(crate) fn display_label(raw: &str) -> String {
    raw.split(['-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
