//! `hd signin`, `hd signup`, `hd signout`, `hd whoami`: session management.

use std::io::Write;

use clap::Args;
use helpdesk_core::Helpdesk;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::model::{NewUser, Role, SessionUser};

use super::storage_failure;
use crate::output::{OutputMode, fail, pretty_kv, render, render_success};

#[derive(Args, Debug)]
pub struct SigninArgs {
    /// Account email.
    pub email: String,

    #[arg(short, long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Display name.
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,

    /// Role: client, agent, or admin.
    #[arg(short, long, default_value = "client")]
    pub role: Role,
}

fn render_user(output: OutputMode, user: &SessionUser) -> anyhow::Result<()> {
    render(output, user, |u, w| {
        pretty_kv(w, "Name", &u.name)?;
        pretty_kv(w, "Email", &u.email)?;
        pretty_kv(w, "Role", u.role.as_str())?;
        pretty_kv(w, "Id", u.id.to_string())
    })
}

/// Execute `hd signin <email> --password <pw>`.
pub fn run_signin(args: &SigninArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    let Some(user) = hd
        .sign_in(&args.email, &args.password)
        .map_err(storage_failure(output))?
    else {
        return Err(fail(output, &HelpdeskError::InvalidCredentials));
    };
    render_user(output, &user)
}

/// Execute `hd signup`. Signs the new account in.
pub fn run_signup(args: &SignupArgs, output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    let new_user = NewUser::new(&args.name, &args.email, &args.password, args.role);
    let Some(user) = hd.sign_up(new_user).map_err(storage_failure(output))? else {
        return Err(fail(
            output,
            &HelpdeskError::DuplicateEmail(args.email.clone()),
        ));
    };
    render_user(output, &user)
}

pub fn run_signout(output: OutputMode, hd: &mut Helpdesk) -> anyhow::Result<()> {
    hd.sign_out().map_err(storage_failure(output))?;
    render_success(output, "Signed out")
}

/// Execute `hd whoami`. Prints nothing but a note when signed out.
pub fn run_whoami(output: OutputMode, hd: &Helpdesk) -> anyhow::Result<()> {
    match hd.current_user() {
        Some(user) => render_user(output, user),
        None => render(output, &serde_json::Value::Null, |_, w| {
            writeln!(w, "Not signed in")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SignupArgs,
    }

    #[test]
    fn signup_role_defaults_to_client() {
        let w = Wrapper::parse_from(["test", "-n", "Ana", "-e", "ana@x.com", "-p", "pw"]);
        assert_eq!(w.args.role, Role::Client);
    }

    #[test]
    fn signup_rejects_unknown_role() {
        let result = Wrapper::try_parse_from([
            "test", "-n", "Ana", "-e", "ana@x.com", "-p", "pw", "--role", "owner",
        ]);
        assert!(result.is_err());
    }
}
