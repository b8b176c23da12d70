//! `hd create`: file a new ticket as the signed-in user.

use std::io::Write;
use std::sync::Arc;

use clap::Args;
use helpdesk_core::Helpdesk;
use helpdesk_core::error::ErrorCode;
use helpdesk_core::model::{KNOWN_DEPARTMENTS, NewTicket, Priority, Ticket};
use helpdesk_core::suggest::{StaticSuggester, Suggestion, suggest_with_timeout};
use serde::Serialize;

use super::{require_user, storage_failure};
use crate::output::{CliError, OutputMode, pretty_kv, render, render_error};

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Department, e.g. "IT Support". Required unless `--suggest` is given.
    #[arg(long, required_unless_present = "suggest")]
    pub department: Option<String>,

    /// Priority: low, medium, or high.
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,

    /// Ask the suggestion service for a department from the description.
    #[arg(long)]
    pub suggest: bool,
}

#[derive(Debug, Serialize)]
struct Created {
    ticket: Ticket,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<Suggestion>,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    let user = require_user(hd, output)?;

    let suggestion = if args.suggest {
        suggest_with_timeout(
            Arc::new(StaticSuggester),
            &args.description,
            hd.config().suggest.timeout(),
        )
    } else {
        None
    };

    let department = match (&args.department, &suggestion) {
        (Some(explicit), _) => explicit.clone(),
        (None, Some(suggested)) => suggested.department.clone(),
        (None, None) => {
            render_error(
                output,
                &CliError::with_details(
                    "no department given and no suggestion available",
                    format!("Pass --department (one of: {})", KNOWN_DEPARTMENTS.join(", ")),
                    ErrorCode::SuggestionUnavailable.code(),
                ),
            )?;
            anyhow::bail!("department required");
        }
    };

    if !KNOWN_DEPARTMENTS.contains(&department.as_str()) {
        tracing::debug!(department = %department, "filing ticket under an unlisted department");
    }

    let ticket = hd
        .tickets_mut()
        .create(NewTicket::filed_by(
            &user,
            &args.title,
            &args.description,
            department,
            args.priority,
        ))
        .map_err(storage_failure(output))?;

    render(output, &Created { ticket, suggestion }, |created, w| {
        if let Some(s) = &created.suggestion {
            writeln!(w, "Suggested department: {} ({})", s.department, s.justification)?;
        }
        writeln!(w, "✓ Created ticket #{}", created.ticket.id)?;
        pretty_kv(w, "Title", &created.ticket.title)?;
        pretty_kv(w, "Department", &created.ticket.department)?;
        pretty_kv(w, "Priority", created.ticket.priority.label())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CreateArgs,
    }

    #[test]
    fn defaults() {
        let w = Wrapper::parse_from(["test", "--title", "VPN down", "--department", "IT Support"]);
        assert_eq!(w.args.title, "VPN down");
        assert_eq!(w.args.priority, Priority::Medium);
        assert!(w.args.description.is_empty());
        assert!(!w.args.suggest);
    }

    #[test]
    fn department_required_without_suggest() {
        assert!(Wrapper::try_parse_from(["test", "--title", "VPN down"]).is_err());
        let w = Wrapper::parse_from(["test", "--title", "VPN down", "--suggest"]);
        assert!(w.args.department.is_none());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        let w = Wrapper::parse_from(["test", "-t", "x", "--department", "HR", "-p", "HIGH"]);
        assert_eq!(w.args.priority, Priority::High);
    }
}
