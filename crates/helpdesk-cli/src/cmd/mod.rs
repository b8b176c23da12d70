//! One module per `hd` subcommand.

pub mod analytics;
pub mod auth;
pub mod board;
pub mod comment;
pub mod create;
pub mod dashboard;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;
pub mod users;

use chrono::{DateTime, Local, Utc};
use helpdesk_core::error::{HelpdeskError, StorageError};
use helpdesk_core::model::SessionUser;
use helpdesk_core::Helpdesk;

use crate::output::{OutputMode, fail};

/// The signed-in user, or a rendered `NotSignedIn` error.
pub fn require_user(hd: &Helpdesk, output: OutputMode) -> anyhow::Result<SessionUser> {
    hd.sessions()
        .require_user()
        .cloned()
        .map_err(|err| fail(output, &err))
}

/// Map a storage failure to a rendered error.
pub fn storage_failure(output: OutputMode) -> impl FnOnce(StorageError) -> anyhow::Error {
    move |err| fail(output, &HelpdeskError::from(err))
}

pub fn ticket_not_found(output: OutputMode, id: u64) -> anyhow::Error {
    fail(output, &HelpdeskError::TicketNotFound(id))
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
