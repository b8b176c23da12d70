//! `hd update`: edit ticket fields. Unset flags leave fields unchanged.

use std::io::Write;

use clap::Args;
use helpdesk_core::Helpdesk;
use helpdesk_core::model::{Priority, Status, TicketPatch};

use super::{require_user, storage_failure, ticket_not_found};
use crate::output::{CliError, OutputMode, render, render_error};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: u64,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New status: open, in-progress, resolved, or closed.
    #[arg(short, long)]
    pub status: Option<Status>,
}

impl UpdateArgs {
    fn patch(&self) -> TicketPatch {
        TicketPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            department: self.department.clone(),
            priority: self.priority,
            status: self.status,
            ..TicketPatch::default()
        }
    }
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let patch = args.patch();
    if patch.is_empty() {
        render_error(
            output,
            &CliError::new("nothing to update: pass at least one field flag"),
        )?;
        anyhow::bail!("empty update");
    }
    if hd.tickets().get_ticket_by_id(args.id).is_none() {
        return Err(ticket_not_found(output, args.id));
    }

    let Some(ticket) = hd
        .tickets_mut()
        .update(args.id, &patch)
        .map_err(storage_failure(output))?
    else {
        return Err(ticket_not_found(output, args.id));
    };

    render(output, &ticket, |t, w| {
        writeln!(
            w,
            "✓ Updated ticket #{} ({}, {})",
            t.id,
            t.status.label(),
            t.priority.label()
        )
    })
}
