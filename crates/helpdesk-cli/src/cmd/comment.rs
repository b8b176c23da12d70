//! `hd comment`: append a comment as the signed-in user.

use std::io::Write;

use clap::Args;
use helpdesk_core::Helpdesk;

use super::{require_user, storage_failure, ticket_not_found};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct CommentArgs {
    pub id: u64,

    /// Comment body.
    pub text: String,
}

pub fn run_comment(args: &CommentArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    let user = require_user(hd, output)?;
    if hd.tickets().get_ticket_by_id(args.id).is_none() {
        return Err(ticket_not_found(output, args.id));
    }

    let Some(comment) = hd
        .tickets_mut()
        .add_comment(args.id, &args.text, &user.name)
        .map_err(storage_failure(output))?
    else {
        return Err(ticket_not_found(output, args.id));
    };

    render(output, &comment, |c, w| {
        writeln!(w, "✓ Comment added to #{} by {}", args.id, c.author)
    })
}
