use anyhow::{anyhow, Context, Result};
use api_ingress::ApiIngressConfig;
use clap::{Parser, Subcommand};
use db::{ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::time::Duration;
use users::UsersModule;

/// Users API server - CRUD over a single `users` table
#[derive(Parser)]
#[command(name = "users-server")]
#[command(about = "Users API server - CRUD over a single users table")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database instead of PostgreSQL
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Create the users table and exit
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let args = CliArgs {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Users server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config),
        Commands::InitDb => init_db(&config, &args).await,
    }
}

/// Build the pool. Failure here is fatal: the server never starts without a store.
async fn connect(config: &AppConfig, args: &CliArgs) -> Result<DbHandle> {
    if args.mock {
        tracing::warn!("--mock: using in-memory SQLite, data is discarded on exit");
        return Ok(DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?);
    }

    let db_config = config
        .database
        .as_ref()
        .filter(|c| !c.is_unset())
        .ok_or_else(|| {
            anyhow!(
                "No database configured: set DB_HOST/DB_USER/DB_PASSWORD/DB_NAME, \
                 add a `database:` section, or pass --mock"
            )
        })?;

    tracing::info!(database = ?db_config.redacted(), "Connecting to database");
    let db = DbHandle::connect_with_config(db_config)
        .await
        .context("Failed to establish database pool")?;
    tracing::info!(engine = ?db.engine(), dsn = db.dsn(), "Database pool ready");
    Ok(db)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let db = connect(&config, &args).await?;

    // Table must exist before the first request is accepted.
    UsersModule::migrate(&db).await?;
    let users = UsersModule::from_db(&db)?;

    let mut ingress_cfg: ApiIngressConfig = config.module_config("api_ingress")?;
    if config.server.timeout_sec > 0 {
        ingress_cfg.request_timeout = Duration::from_secs(config.server.timeout_sec);
    }

    let router = api_ingress::build_router(&ingress_cfg, users.router());
    let listener =
        api_ingress::bind(&ingress_cfg, &config.server.host, config.server.port).await?;

    let served = api_ingress::serve(listener, router, async {
        if let Err(e) = runtime::wait_for_shutdown().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
    })
    .await;

    db.close().await;
    tracing::info!("Users server stopped");
    served
}

async fn init_db(config: &AppConfig, args: &CliArgs) -> Result<()> {
    let db = connect(config, args).await?;
    UsersModule::migrate(&db).await?;
    db.close().await;
    println!("Users table is ready");
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: ApiIngressConfig = config.module_config("api_ingress")?;
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
