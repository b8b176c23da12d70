#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use helpdesk_core::Helpdesk;
use helpdesk_core::config::{DATA_DIR_ENV, load_config, resolve_data_dir};
use helpdesk_core::error::HelpdeskError;
use output::{OutputMode, fail, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hd: local-first helpdesk ticket tracker",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Data directory (default: $HELPDESK_DATA_DIR or the platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Session",
        about = "Sign in to an account",
        after_help = "EXAMPLES:\n    # Sign in as the demo agent\n    hd signin agent@example.com --password password"
    )]
    Signin(cmd::auth::SigninArgs),

    #[command(
        next_help_heading = "Session",
        about = "Register a new account and sign in",
        after_help = "EXAMPLES:\n    # Register a client account\n    hd signup --name \"Ana Diaz\" --email ana@example.com --password s3cret"
    )]
    Signup(cmd::auth::SignupArgs),

    #[command(next_help_heading = "Session", about = "End the current session")]
    Signout,

    #[command(next_help_heading = "Session", about = "Show the signed-in user")]
    Whoami,

    #[command(next_help_heading = "Session", about = "List registered users")]
    Users,

    #[command(
        next_help_heading = "Tickets",
        about = "File a new ticket",
        long_about = "File a new ticket as the signed-in user. With --suggest and no \
                      --department, the suggestion service picks one.",
        after_help = "EXAMPLES:\n    # File a ticket\n    hd create --title \"VPN drops\" --department \"IT Support\" --priority high\n\n    # Let the suggestion service pick a department\n    hd create --title \"VPN drops\" -d \"every hour\" --suggest"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets",
        after_help = "EXAMPLES:\n    # Open tickets mentioning printers\n    hd list --status open --search printer\n\n    # Emit machine-readable output\n    hd list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Tickets", about = "Show one ticket with its comments")]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Update ticket fields",
        after_help = "EXAMPLES:\n    # Start work on a ticket\n    hd update 4 --status in-progress\n\n    # Raise priority\n    hd update 4 --priority high"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(next_help_heading = "Tickets", about = "Delete a ticket")]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Comment on a ticket",
        after_help = "EXAMPLES:\n    hd comment 4 \"Restarted the router, watching it\""
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(next_help_heading = "Reports", about = "Status counters and recent tickets")]
    Dashboard,

    #[command(next_help_heading = "Reports", about = "Tickets grouped by status")]
    Board,

    #[command(
        next_help_heading = "Reports",
        about = "Ticket counts by department, status, priority, and requester"
    )]
    Analytics,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HELPDESK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "helpdesk=debug,info"
        } else {
            "helpdesk=info,warn"
        })
    });

    let format = env::var("HELPDESK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let data_dir = resolve_data_dir(cli.data_dir.clone(), env::var(DATA_DIR_ENV).ok());
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    let config = load_config(&data_dir)
        .map_err(|err| fail(output, &HelpdeskError::Config(format!("{err:#}"))))?;
    let mut hd = Helpdesk::open_with(config, &data_dir)?;

    match &cli.command {
        Commands::Signin(args) => cmd::auth::run_signin(args, output, &mut hd),
        Commands::Signup(args) => cmd::auth::run_signup(args, output, &mut hd),
        Commands::Signout => cmd::auth::run_signout(output, &mut hd),
        Commands::Whoami => cmd::auth::run_whoami(output, &hd),
        Commands::Users => cmd::users::run_users(output, &hd),
        Commands::Create(args) => cmd::create::run_create(args, output, &mut hd),
        Commands::List(args) => cmd::list::run_list(args, output, &hd),
        Commands::Show(args) => cmd::show::run_show(args, output, &hd),
        Commands::Update(args) => cmd::update::run_update(args, output, &mut hd),
        Commands::Delete(args) => cmd::delete::run_delete(args, output, &mut hd),
        Commands::Comment(args) => cmd::comment::run_comment(args, output, &mut hd),
        Commands::Dashboard => cmd::dashboard::run_dashboard(output, &hd),
        Commands::Board => cmd::board::run_board(output, &hd),
        Commands::Analytics => cmd::analytics::run_analytics(output, &hd),
    }
}
