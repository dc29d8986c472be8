//! Warden server binary: environment-driven configuration, a CLI for the
//! common overrides, and an axum server with graceful shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use warden::auth::{AuthService, PasswordHasher, TokenService};
use warden::users::{StoreProvider, UserService};
use warden::utils::config::Config;
use warden::{create_app, AppState};

/// Warden - Identity and Access Server
#[derive(Parser, Debug)]
#[command(
    name = "warden-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Warden - Identity and Access Server",
    long_about = "An authentication and authorization server with argon2id credential checks,\n\
                  HS256 JWT issuance, role-gated routes, and pluggable user stores.\n\n\
                  Configuration comes from the environment (and .env); flags override it."
)]
struct Cli {
    /// Host address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides DATABASE_PATH; omit both for the in-memory store)
    #[arg(long)]
    database_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env must be loaded before the filter reads RUST_LOG.
    dotenvy::dotenv().ok();
    init_tracing(&cli);

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = Arc::new(config);

    let provider = match cli.database_path {
        Some(path) => StoreProvider::Sqlite { path },
        None => StoreProvider::from_env(),
    };
    tracing::info!(store = %provider, "initializing user store");
    let repo = provider
        .create_repository()
        .await
        .context("failed to initialize the user store")?;

    let user_service = Arc::new(UserService::new(repo.into(), PasswordHasher::new()?));
    let auth_service = Arc::new(AuthService::new(
        user_service.clone(),
        TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl_secs)?,
    ));

    match config.admin {
        Some(ref admin) => user_service
            .bootstrap_admin(admin)
            .await
            .context("admin bootstrap failed")?,
        None => tracing::info!("admin bootstrap skipped, no admin account configured"),
    }

    let state = AppState {
        config: config.clone(),
        user_service,
        auth_service,
    };
    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "warden listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
