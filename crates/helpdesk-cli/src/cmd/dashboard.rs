//! `hd dashboard`: headline counters plus the most recent tickets.

use std::io::Write;

use helpdesk_core::Helpdesk;
use helpdesk_core::model::Ticket;
use helpdesk_views::{DashboardStats, recent};
use serde::Serialize;

use super::{local_time, require_user};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, ticket_line, ticket_row};

#[derive(Debug, Serialize)]
struct Dashboard {
    stats: DashboardStats,
    recent: Vec<Ticket>,
}

pub fn run_dashboard(output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    let user = require_user(hd, output)?;
    let tickets = hd.tickets().tickets();
    let dashboard = Dashboard {
        stats: DashboardStats::from_tickets(tickets),
        recent: recent(tickets, hd.config().tickets.recent_limit),
    };

    render_mode(
        output,
        &dashboard,
        |d, w| {
            writeln!(
                w,
                "open={} in_progress={} resolved={} total={}",
                d.stats.open, d.stats.in_progress, d.stats.resolved, d.stats.total
            )?;
            for t in &d.recent {
                ticket_row(w, t)?;
            }
            Ok(())
        },
        |d, w| {
            pretty_section(w, &format!("Welcome back, {}", user.name))?;
            pretty_kv(w, "Open", d.stats.open.to_string())?;
            pretty_kv(w, "In progress", d.stats.in_progress.to_string())?;
            pretty_kv(w, "Resolved", d.stats.resolved.to_string())?;
            pretty_kv(w, "Total", d.stats.total.to_string())?;
            writeln!(w)?;
            pretty_section(w, "Recent tickets")?;
            if d.recent.is_empty() {
                writeln!(w, "No tickets yet.")?;
            }
            for t in &d.recent {
                ticket_line(w, t)?;
                writeln!(w, "       filed {}", local_time(t.created_at))?;
            }
            Ok(())
        },
    )
}
