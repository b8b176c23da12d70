//! `hd show`: full ticket detail with the comment thread.

use std::io::Write;

use clap::Args;
use helpdesk_core::Helpdesk;

use super::{local_time, require_user, ticket_not_found};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render};

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: u64,
}

/// Execute `hd show <id>`. Comments print newest first.
pub fn run_show(args: &ShowArgs, output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let Some(ticket) = hd.tickets().get_ticket_by_id(args.id) else {
        return Err(ticket_not_found(output, args.id));
    };

    render(output, ticket, |t, w| {
        pretty_section(w, &format!("#{} {}", t.id, t.title))?;
        pretty_kv(w, "Status", t.status.label())?;
        pretty_kv(w, "Priority", t.priority.label())?;
        pretty_kv(w, "Department", &t.department)?;
        pretty_kv(w, "Requester", format!("{} <{}>", t.requester_name, t.requester_email))?;
        pretty_kv(w, "Created", local_time(t.created_at))?;
        pretty_kv(w, "Updated", local_time(t.updated_at))?;
        if !t.description.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", t.description)?;
        }
        writeln!(w)?;
        writeln!(w, "Comments ({})", t.comments.len())?;
        pretty_rule(w)?;
        for c in t.comments_newest_first() {
            writeln!(w, "{} · {}", c.author, local_time(c.timestamp))?;
            writeln!(w, "  {}", c.text)?;
        }
        Ok(())
    })
}
