//! Shopfront CLI - terminal client for the storefront API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account, then log in (registration does not log in)
//! shopfront register -u alice -p hunter2
//! shopfront login -u alice -p hunter2
//!
//! # Show the dashboard for the saved session
//! shopfront status
//!
//! # Browse and buy
//! shopfront products
//! shopfront buy prod-1
//! shopfront orders
//!
//! shopfront logout
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_API_URL` - API gateway base URL (default: <http://localhost:8080>)
//! - `SHOPFRONT_SESSION_FILE` - Session file location
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Per-request timeout
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `RUST_LOG` - Log filter (default: `shopfront=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_client::{
    ApiConfig, AuthOutcome, ClientConfig, ClientError, ConfigError, FileSessionStore,
    HttpTransport, MemorySessionStore, OrderOutcome, SessionStore, Storefront, TransportError,
};
use shopfront_core::{Credentials, ProductId};

mod render;

use render::TerminalRenderer;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// API gateway base URL (overrides `SHOPFRONT_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `SHOPFRONT_SESSION_FILE`)
    #[arg(long, global = true, conflicts_with = "ephemeral")]
    session_file: Option<PathBuf>,

    /// Keep the session in memory only for this invocation
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (does not log in)
    Register {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Log in and save the session
    Login {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
    /// Forget the saved session
    Logout,
    /// Show the dashboard for the saved session, or the login prompt
    Status,
    /// List products
    Products,
    /// List your orders
    Orders,
    /// Order one unit of a product
    Buy {
        /// Product ID as shown by `products`
        product_id: String,
    },
}

#[derive(clap::Args)]
struct CredentialArgs {
    /// Username
    #[arg(short, long)]
    username: String,

    /// Password
    #[arg(short, long)]
    password: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Self::new(args.username, args.password)
    }
}

/// Errors that prevent the client from starting.
#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shopfront_client=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;

    if let Some(api_url) = &cli.api_url {
        config.api = ApiConfig {
            request_timeout: config.api.request_timeout,
            ..ApiConfig::new(api_url)?
        };
    }
    if let Some(session_file) = &cli.session_file {
        config.session_file.clone_from(session_file);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<ExitCode, CliError> {
    let transport = HttpTransport::new(&config.api)?;
    let store: Box<dyn SessionStore> = if cli.ephemeral {
        Box::new(MemorySessionStore::new())
    } else {
        Box::new(FileSessionStore::new(&config.session_file))
    };
    tracing::debug!(api = %transport.base_url(), "Client ready");

    let mut app = Storefront::new(transport, store, TerminalRenderer::stdout());

    let succeeded = match cli.command {
        Commands::Register { credentials } => {
            let outcome = app.register(&credentials.into()).await;
            outcome == AuthOutcome::Registered
        }
        Commands::Login { credentials } => {
            let outcome = app.login(&credentials.into()).await;
            outcome == AuthOutcome::LoggedIn
        }
        Commands::Logout => match app.logout().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to remove saved session: {e}");
                false
            }
        },
        Commands::Status => {
            app.start().await;
            true
        }
        Commands::Products => app.load_products().await.is_ok(),
        Commands::Orders => match app.load_orders().await {
            Ok(_) => true,
            Err(ClientError::NotLoggedIn) => {
                app.renderer_mut().hint("Log in with `shopfront login` to see your orders.");
                false
            }
            Err(_) => false,
        },
        Commands::Buy { product_id } => {
            let outcome = app.place_order(&ProductId::new(product_id)).await;
            outcome == OrderOutcome::Placed
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
