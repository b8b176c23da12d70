//! `hd users`: list the user directory without credentials.

use std::io::Write;

use helpdesk_core::Helpdesk;

use super::{require_user, storage_failure};
use crate::output::{OutputMode, pretty_section, render_mode};

pub fn run_users(output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    require_user(hd, output)?;
    let users = hd.sessions().users().map_err(storage_failure(output))?;

    render_mode(
        output,
        &users,
        |users, w| {
            for u in users {
                writeln!(w, "{}\t{}\t{}\t{}", u.id, u.role, u.email, u.name)?;
            }
            Ok(())
        },
        |users, w| {
            pretty_section(w, &format!("Users ({})", users.len()))?;
            for u in users {
                writeln!(w, "{:<8} {:<28} {}", u.role.as_str(), u.email, u.name)?;
            }
            Ok(())
        },
    )
}
