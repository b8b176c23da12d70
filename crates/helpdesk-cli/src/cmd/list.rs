//! `hd list`: the ticket list with status filter and search.

use std::io::Write;

use clap::Args;
use helpdesk_core::Helpdesk;
use helpdesk_core::error::HelpdeskError;
use helpdesk_views::TicketQuery;

use super::require_user;
use crate::output::{OutputMode, fail, pretty_section, render_mode, ticket_line, ticket_row};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Status filter: all, open, in-progress, resolved, or closed.
    #[arg(short, long, default_value = "all")]
    pub status: String,

    /// Match title or department (case-insensitive) or ticket id.
    #[arg(long, default_value = "")]
    pub search: String,
}

pub fn run_list(args: &ListArgs, output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let status = TicketQuery::parse_status(&args.status)
        .map_err(|err| fail(output, &HelpdeskError::from(err)))?;
    let tickets = TicketQuery::new(status, args.search.clone()).filter(hd.tickets().tickets());

    render_mode(
        output,
        &tickets,
        |tickets, w| {
            for t in tickets {
                ticket_row(w, t)?;
            }
            Ok(())
        },
        |tickets, w| {
            pretty_section(w, &format!("Tickets ({})", tickets.len()))?;
            if tickets.is_empty() {
                writeln!(w, "No tickets found.")?;
            }
            for t in tickets {
                ticket_line(w, t)?;
            }
            Ok(())
        },
    )
}
