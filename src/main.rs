mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fairdesk_core::MeetingStatus;
use tracing_subscriber::EnvFilter;

use commands::Session;

#[derive(Parser)]
#[command(name = "fairdesk")]
#[command(about = "Plan your trade-fair visits: fairs, meetings and AI-prepared briefs")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a fair and look up its dates, location and description on the web
    Add {
        /// Fair name (e.g. "MWC Barcelona 2025")
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// List your upcoming fairs
    List,
    /// Show a fair's meetings and AI-gathered details
    Show {
        /// Fair id, id prefix or name
        fair: String,
    },
    /// Schedule a meeting at a fair
    Meet {
        /// Fair id, id prefix or name
        fair: String,

        /// Contact name (prompted for when omitted)
        contact: Option<String>,

        /// Contact's company
        #[arg(short, long)]
        company: Option<String>,
    },
    /// Prepare a meeting: AI summary and key questions
    Prep {
        /// Meeting id or id prefix
        meeting: String,
    },
    /// Change a meeting's status
    Status {
        /// Meeting id or id prefix
        meeting: String,

        /// scheduled, completed or cancelled
        status: MeetingStatus,
    },
    /// Show configuration paths and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Config => commands::config::run(),
        Commands::Add { name } => {
            let session = Session::open()?;
            commands::add::run(&session, &name.join(" ")).await
        }
        Commands::List => {
            let session = Session::open()?;
            commands::list::run(&session)
        }
        Commands::Show { fair } => {
            let session = Session::open()?;
            commands::show::run(&session, &fair)
        }
        Commands::Meet {
            fair,
            contact,
            company,
        } => {
            let session = Session::open()?;
            commands::meet::run(&session, &fair, contact, company)
        }
        Commands::Prep { meeting } => {
            let session = Session::open()?;
            commands::prep::run(&session, &meeting).await
        }
        Commands::Status { meeting, status } => {
            let session = Session::open()?;
            commands::status::run(&session, &meeting, status)
        }
    }
}

/// Logs go to stderr so they never interleave with rendered output.
/// `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "fairdesk=debug,fairdesk_core=debug"
    } else {
        "fairdesk=warn,fairdesk_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
