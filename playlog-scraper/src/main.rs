//! playlog-scraper - radio playlist scraper
//!
//! `scrape` polls every configured station once and appends new plays to the
//! database. `setup` creates a fresh database with the default stations.
//!
//! Settings resolve in priority order: command line, environment variable,
//! TOML config file, compiled default.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playlog_common::config::{resolve_log_level, LoggingConfig, RunOverrides, RunSettings, TomlConfig};
use playlog_common::db::{init_database, open_database, seed_default_stations};
use playlog_scraper::backup::backup_database;
use playlog_scraper::headers::load_headers;
use playlog_scraper::{AdapterRegistry, IngestionEngine, RunParams, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for playlog-scraper
#[derive(Parser, Debug)]
#[command(name = "playlog-scraper")]
#[command(about = "Record radio station playlists into a SQLite database")]
#[command(version)]
struct Cli {
    /// TOML config file (default: <config dir>/playlog/config.toml)
    #[arg(long, global = true, env = "PLAYLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. "debug" or "playlog_scraper=trace"
    #[arg(short = 'l', long, global = true, env = "PLAYLOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll all stations once and record new plays
    Scrape {
        /// Database file to scrape into
        #[arg(env = "PLAYLOG_DATABASE")]
        database: Option<PathBuf>,

        /// Download attempts per station
        #[arg(short = 'c', long, env = "PLAYLOG_CONNECTION_ATTEMPTS")]
        connection_attempts: Option<u32>,

        /// Per-attempt timeout in seconds
        #[arg(short = 't', long, env = "PLAYLOG_TIMEOUT")]
        timeout: Option<u64>,

        /// Back up the database first, optionally into DIR
        #[arg(short = 'b', long, value_name = "DIR", num_args = 0..=1, require_equals = true)]
        backup: Option<Option<PathBuf>>,

        /// JSON file of extra HTTP request headers
        #[arg(long, value_name = "PATH", env = "PLAYLOG_HEADERS")]
        headers: Option<PathBuf>,

        /// Fetch stations one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Create a new database, replacing any existing file
    Setup {
        /// Database file to create
        database: PathBuf,

        /// Back up an existing file before replacing it
        #[arg(short = 'b', long)]
        backup: bool,

        /// Create the tables only, without the default stations
        #[arg(long)]
        no_seed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loaded before logging exists; errors are reported once it does
    let (toml_config, config_error) = match TomlConfig::discover(cli.config.as_deref()) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (TomlConfig::default(), Some(err)),
    };

    init_tracing(cli.log_level.as_deref(), cli.log_file.as_deref(), &toml_config.logging)?;

    info!("playlog-scraper {}", env!("CARGO_PKG_VERSION"));
    if let Some(err) = config_error {
        warn!("Ignoring config file, using defaults: {}", err);
    }

    match cli.command {
        Command::Scrape {
            database,
            connection_attempts,
            timeout,
            backup,
            headers,
            sequential,
        } => {
            let overrides = RunOverrides {
                database,
                connection_attempts,
                timeout_secs: timeout,
                headers_file: headers,
            };
            let settings = RunSettings::resolve(overrides, &toml_config)?;
            run_scrape(settings, backup, sequential).await
        }
        Command::Setup {
            database,
            backup,
            no_seed,
        } => run_setup(&database, backup, !no_seed).await,
    }
}

/// Initialize tracing.
///
/// Filter: `--log-level`, else `RUST_LOG`, else the config file level.
fn init_tracing(cli_level: Option<&str>, log_file: Option<&Path>, logging: &LoggingConfig) -> Result<()> {
    let env_filter = match cli_level {
        Some(_) => None,
        None => EnvFilter::try_from_default_env().ok(),
    };
    let filter = match env_filter {
        Some(filter) => filter,
        None => EnvFilter::try_new(resolve_log_level(cli_level, logging)).context("Invalid log level")?,
    };

    match log_file.or(logging.file.as_deref()) {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn run_scrape(settings: RunSettings, backup: Option<Option<PathBuf>>, sequential: bool) -> Result<()> {
    info!(
        database = %settings.database.display(),
        attempts = settings.connection_attempts,
        timeout_secs = settings.timeout.as_secs(),
        "Starting scrape"
    );

    if let Some(target_dir) = backup {
        backup_database(&settings.database, target_dir.as_deref(), playlog_common::time::now())
            .context("Backup failed")?;
    }

    let params = RunParams {
        max_attempts: settings.connection_attempts,
        timeout: settings.timeout,
        headers: load_headers(&settings.headers_file),
        parallel_fetch: !sequential,
    };

    let pool = open_database(&settings.database)
        .await
        .context("Failed to open database")?;

    let registry = AdapterRegistry::with_defaults().context("Failed to set up adapters")?;
    let engine = IngestionEngine::new(registry, params);

    let mut store = SqliteStore::begin(&pool).await?;
    let report = engine.run(&mut store).await.context("Scrape run failed")?;

    info!(
        inserted = report.total_inserted(),
        failed = report.failed_count(),
        "Scrape finished"
    );

    pool.close().await;
    Ok(())
}

async fn run_setup(database: &Path, backup: bool, seed: bool) -> Result<()> {
    if database.exists() {
        if backup {
            backup_database(database, None, playlog_common::time::now()).context("Backup failed")?;
        }
        std::fs::remove_file(database)
            .with_context(|| format!("Failed to remove {}", database.display()))?;
        info!("Removed existing database {}", database.display());
    }

    let pool = init_database(database)
        .await
        .context("Failed to create database")?;

    if seed {
        let added = seed_default_stations(&pool).await?;
        info!("Added {} default stations", added);
    }

    pool.close().await;
    info!("Database ready: {}", database.display());
    Ok(())
}
