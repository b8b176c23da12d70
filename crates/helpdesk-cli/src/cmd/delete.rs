//! `hd delete`: remove a ticket permanently.

use clap::Args;
use helpdesk_core::Helpdesk;

use super::{require_user, storage_failure, ticket_not_found};
use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: u64,
}

/// Execute `hd delete <id>`. Tickets outside the caller's view report not found.
pub fn run_delete(args: &DeleteArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    if hd.tickets().get_ticket_by_id(args.id).is_none() {
        return Err(ticket_not_found(output, args.id));
    }

    hd.tickets_mut()
        .delete(args.id)
        .map_err(storage_failure(output))?;
    render_success(output, &format!("Deleted ticket #{}", args.id))
}
