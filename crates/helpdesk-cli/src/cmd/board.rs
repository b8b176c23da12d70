//! `hd board`: tickets grouped into status columns.

use std::io::Write;

use helpdesk_core::Helpdesk;
use helpdesk_views::StatusBoard;

use super::require_user;
use crate::output::{OutputMode, pretty_section, render_mode, ticket_line, ticket_row};

pub fn run_board(output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let board = StatusBoard::partition(hd.tickets().tickets());

    render_mode(
        output,
        &board,
        |b, w| {
            for column in &b.columns {
                for t in &column.tickets {
                    ticket_row(w, t)?;
                }
            }
            Ok(())
        },
        |b, w| {
            for column in &b.columns {
                pretty_section(w, &format!("{} ({})", column.label, column.tickets.len()))?;
                for t in &column.tickets {
                    ticket_line(w, t)?;
                }
                writeln!(w)?;
            }
            Ok(())
        },
    )
}
