use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dhraviq_application::AppContext;
use dhraviq_core::config::ClearSessionMode;
use dhraviq_infrastructure::{ConfigService, DhraviqPaths};

mod commands;
mod output;

use output::Output;

#[derive(Parser)]
#[command(name = "dhraviq")]
#[command(about = "Dhraviq - resume analysis and interview coaching", long_about = None)]
struct Cli {
    /// Data directory (overrides DHRAVIQ_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this .env file
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a resume, or a target domain and level, and start a new session
    Analyze {
        /// Resume file (.pdf or .txt)
        #[arg(long, conflicts_with_all = ["domain", "level"])]
        resume: Option<PathBuf>,
        /// Target domain, e.g. backend
        #[arg(long, requires = "level")]
        domain: Option<String>,
        /// Role level, e.g. senior
        #[arg(long, requires = "domain")]
        level: Option<String>,
    },
    /// Show the scores of the current session
    Score,
    /// List practice questions
    Questions {
        /// analysis, company, hr or all
        #[arg(long, default_value = "all")]
        source: String,
        /// Limit company questions to one company id
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive text or tag search
        #[arg(long)]
        search: Option<String>,
    },
    /// Get coaching for a question, e.g. analysis:q1 or company:google:q2
    Coach {
        question: String,
        /// Email to unlock coaching if none is on file yet
        #[arg(long)]
        email: Option<String>,
    },
    /// Manage the contact email that unlocks coaching
    Contact {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Inspect or clear the current session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Company and HR question packs
    Packs {
        #[command(subcommand)]
        action: PacksAction,
    },
    /// Delete sessions not used for a number of days
    Prune {
        #[arg(long)]
        days: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Save the contact email
    Set { email: String },
    /// Show the saved contact email
    Show,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the current session
    Show,
    /// Forget the current session
    Clear {
        /// Also delete the stored session
        #[arg(long)]
        purge: bool,
    },
}

#[derive(Subcommand)]
enum PacksAction {
    /// Import packs from a JSON file with `companies` and `hrBank`
    Import { file: PathBuf },
    /// List imported company packs
    List,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("dhraviq error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.env_file {
        Some(path) => ConfigService::with_env_file(path),
        None => ConfigService::new(),
    };
    let mut config = config_service.load().context("failed to load configuration")?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    if let Commands::Session {
        action: SessionAction::Clear { purge: true },
    } = &cli.command
    {
        config.clear_session_mode = ClearSessionMode::PurgePersisted;
    }

    let _guard = init_tracing(&DhraviqPaths::new(config.data_dir.as_deref()), cli.verbose)?;

    let ctx = AppContext::bootstrap(config)
        .await
        .context("failed to initialize dhraviq")?;
    tracing::debug!(data_dir = ?ctx.config.data_dir, "Context ready");
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Analyze {
            resume,
            domain,
            level,
        } => commands::analyze::run(&ctx, resume, domain, level, out).await,
        Commands::Score => commands::analyze::score(&ctx, out),
        Commands::Questions {
            source,
            company,
            difficulty,
            category,
            search,
        } => {
            let query = commands::questions::Query {
                source,
                company,
                difficulty,
                category,
                search,
            };
            commands::questions::run(&ctx, query, out).await
        }
        Commands::Coach { question, email } => {
            commands::coach::run(&ctx, &question, email.as_deref(), out).await
        }
        Commands::Contact { action } => match action {
            ContactAction::Set { email } => commands::contact::set(&ctx, &email, out).await,
            ContactAction::Show => commands::contact::show(&ctx, out).await,
        },
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(&ctx, out),
            SessionAction::Clear { .. } => commands::session::clear(&ctx, out).await,
        },
        Commands::Packs { action } => match action {
            PacksAction::Import { file } => commands::packs::import(&ctx, &file, out).await,
            PacksAction::List => commands::packs::list(&ctx, out).await,
        },
        Commands::Prune { days } => commands::session::prune(&ctx, days, out).await,
    }
}

/// Logs to stderr and to a daily file under `<data>/logs`.
///
/// `RUST_LOG` overrides the default level. The returned guard flushes the
/// file writer when dropped.
fn init_tracing(paths: &DhraviqPaths, verbose: bool) -> Result<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("failed to create log directory {}", logs_dir.display()))?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&logs_dir, "dhraviq.log"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(stderr_filter),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(guard)
}
