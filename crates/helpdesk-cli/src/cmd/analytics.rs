//! `hd analytics`: ticket counts by department, status, priority, and requester.

use std::io::{self, Write};

use helpdesk_core::Helpdesk;
use helpdesk_views::{Analytics, NamedCount};

use super::require_user;
use crate::output::{OutputMode, pretty_section, render_mode};

const BAR_WIDTH: usize = 30;

fn bars(w: &mut dyn Write, heading: &str, counts: &[NamedCount]) -> io::Result<()> {
    pretty_section(w, heading)?;
    let max = counts.iter().map(|c| c.value).max().unwrap_or(0).max(1);
    for c in counts {
        let len = (c.value * BAR_WIDTH).div_ceil(max);
        writeln!(w, "{:<20} {:<width$} {}", c.name, "█".repeat(len), c.value, width = BAR_WIDTH)?;
    }
    writeln!(w)
}

fn rows(w: &mut dyn Write, dimension: &str, counts: &[NamedCount]) -> io::Result<()> {
    for c in counts {
        writeln!(w, "{dimension}\t{}\t{}", c.name, c.value)?;
    }
    Ok(())
}

pub fn run_analytics(output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let analytics = Analytics::for_store(hd.tickets());

    render_mode(
        output,
        &analytics,
        |a, w| {
            rows(w, "department", &a.by_department)?;
            rows(w, "status", &a.by_status)?;
            rows(w, "priority", &a.by_priority)?;
            rows(w, "requester", &a.by_requester)
        },
        |a, w| {
            if a.is_empty() {
                return writeln!(w, "No ticket data to chart yet.");
            }
            bars(w, "Tickets by department", &a.by_department)?;
            bars(w, "Tickets by status", &a.by_status)?;
            bars(w, "Tickets by priority", &a.by_priority)?;
            bars(w, "Tickets by requester", &a.by_requester)
        },
    )
}
