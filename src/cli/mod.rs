//! `pm`: terminal front end for ProjectMarket.
//!
//! Each subcommand is one screen or one screen action. Destructive actions
//! ask for confirmation unless `--yes` is given, and `--json` prints the
//! loaded data instead of text.

pub mod commands;
mod handlers;
pub mod output;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::routing::Route;
use crate::state::App;

pub use commands::{
    AdminCommand, BuyerCommand, MarketCommand, PaymentsCommand, SignupRole, SolverCommand,
    SubmissionsCommand,
};
pub use output::Output;

#[derive(Debug, Parser)]
#[command(name = "pm")]
#[command(about = "ProjectMarket client: post projects, apply, submit work, manage users")]
#[command(
    after_help = "Environment:\n  PM_API_URL            Backend base URL\n  PM_SESSION_FILE       Where the login is kept\n  PM_HTTP_TIMEOUT_SECS  Request timeout\n  RUST_LOG              Log filter"
)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,
    /// Backend base URL, overrides PM_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        password_confirm: Option<String>,
        #[arg(long, value_enum, default_value = "buyer")]
        role: SignupRole,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Open a screen by path, e.g. /buyer/dashboard
    Open { route: Route },
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    Buyer {
        #[command(subcommand)]
        command: BuyerCommand,
    },
    Solver {
        #[command(subcommand)]
        command: SolverCommand,
    },
    Market {
        #[command(subcommand)]
        command: MarketCommand,
    },
    Submissions {
        #[command(subcommand)]
        command: SubmissionsCommand,
    },
    Payments {
        #[command(subcommand)]
        command: PaymentsCommand,
    },
    /// Public profile of a problem solver
    Profile { solver_id: i64 },
}

impl Cli {
    pub fn output(&self) -> Output {
        Output {
            json: self.json,
            assume_yes: self.yes,
        }
    }

    /// Configuration from the environment with the `--api-url` override applied
    pub fn config(&self) -> anyhow::Result<Config> {
        let config = Config::from_env()?;
        Ok(match &self.api_url {
            Some(url) => config.with_api_url(url)?,
            None => config,
        })
    }
}

/// Execute one parsed command against `app`
pub async fn run(app: &mut App, command: Commands, out: Output) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => handlers::login(app, out, &email, password).await,
        Commands::Register {
            email,
            full_name,
            password,
            password_confirm,
            role,
        } => handlers::register(app, out, email, full_name, password, password_confirm, role).await,
        Commands::Logout => handlers::logout(app, out).await,
        Commands::Whoami => handlers::whoami(app, out),
        Commands::Open { route } => handlers::open(app, out, route).await,
        Commands::Admin { command } => handlers::admin(app, out, command).await,
        Commands::Buyer { command } => handlers::buyer(app, out, command).await,
        Commands::Solver { command } => handlers::solver(app, out, command).await,
        Commands::Market { command } => handlers::market(app, out, command).await,
        Commands::Submissions { command } => handlers::submissions(app, out, command).await,
        Commands::Payments { command } => handlers::payments(app, out, command).await,
        Commands::Profile { solver_id } => handlers::profile(app, out, solver_id).await,
    }
}
