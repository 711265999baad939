use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use fxledger::core::ledger::{DEFAULT_ENTRY_CURRENCY, EntryDraft, EntryKind};
use fxledger::core::log::init_logging;
use fxledger::{AppCommand, OutputFormat};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print machine readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Income,
    Expense,
}

impl From<Kind> for EntryKind {
    fn from(kind: Kind) -> EntryKind {
        match kind {
            Kind::Income => EntryKind::Income,
            Kind::Expense => EntryKind::Expense,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Show the current exchange rate between currencies
    Rate {
        /// Source currency
        #[arg(long, default_value = "USD")]
        from: String,
        /// Target currency, repeat for several
        #[arg(long, default_value = "ILS", num_args = 1..)]
        to: Vec<String>,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Normalize an income or expense entry into the base currency
    Entry {
        #[arg(value_enum)]
        kind: Kind,
        /// Income source or expense category
        #[arg(long)]
        label: String,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = DEFAULT_ENTRY_CURRENCY)]
        currency: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        icon: Option<String>,
    },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Currencies => AppCommand::Currencies,
            Commands::Rate { from, to } => AppCommand::Rate { from, to },
            Commands::Convert { amount, from, to } => AppCommand::Convert { amount, from, to },
            Commands::Entry {
                kind,
                label,
                amount,
                currency,
                date,
                icon,
            } => AppCommand::Entry(EntryDraft {
                kind: kind.into(),
                label,
                icon,
                amount,
                currency: Some(currency),
                date: date.unwrap_or_else(|| Utc::now().date_naive()),
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let result = match cli.command {
        Some(Commands::Setup) => fxledger::cli::setup::setup(),
        Some(cmd) => fxledger::run_command(cmd.into(), cli.config_path.as_deref(), format).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
