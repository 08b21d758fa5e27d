mod app;
mod config;
mod context;
mod handlers;
mod seed;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use chrono::Utc;
use fanzone_auth::{AuthConfig, AuthState, LogNotifier, SqliteSessionStore};
use fanzone_core::auth::SessionRepository;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    seed::{FakeCounts, Repositories},
    state::AppState,
    storage::sqlite::SqliteRepository,
};

/// Fanzone - News, players and teams for sports fans
#[derive(Parser, Debug)]
#[command(name = "fanzone")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Create the schema and the standard roles
    Deploy,
    /// Load the JSON seed files from a directory
    Import {
        /// Directory holding teams.json, players.json, news.json, users.json and comments.json
        #[arg(long, short, default_value = "data")]
        dir: PathBuf,
    },
    /// Generate random development data
    Fake {
        #[arg(long, default_value_t = 20)]
        users: usize,
        #[arg(long, default_value_t = 6)]
        teams: usize,
        #[arg(long, default_value_t = 30)]
        players: usize,
        #[arg(long, default_value_t = 50)]
        news: usize,
        #[arg(long, default_value_t = 100)]
        comments: usize,
    },
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST", global = true)]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT", global = true)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fanzone=debug,fanzone_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let repo = Arc::new(
        SqliteRepository::new(&config.sqlite_path)
            .await
            .with_context(|| format!("opening database {}", config.sqlite_path))?,
    );

    match cli.command {
        None | Some(Command::Serve) => serve(cli.serve, config, repo).await,
        Some(Command::Deploy) => {
            let roles = seed::insert_roles(repo.as_ref()).await?;
            tracing::info!(roles = roles.len(), path = %config.sqlite_path, "Deployed");
            Ok(())
        }
        Some(Command::Import { dir }) => {
            seed::insert_roles(repo.as_ref()).await?;
            let auth_config = AuthConfig::from_env()?;
            let summary = seed::import_dir(
                &Repositories::new(repo.as_ref()),
                &dir,
                auth_config.admin_email.as_deref(),
            )
            .await?;
            println!("{summary}");
            Ok(())
        }
        Some(Command::Fake {
            users,
            teams,
            players,
            news,
            comments,
        }) => {
            seed::insert_roles(repo.as_ref()).await?;
            let counts = FakeCounts {
                users,
                teams,
                players,
                news,
                comments,
            };
            let summary =
                seed::generate(&Repositories::new(repo.as_ref()), &mut rand::rng(), counts)
                    .await?;
            println!("{summary}");
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs, config: Config, repo: Arc<SqliteRepository>) -> Result<()> {
    let sessions = SqliteSessionStore::open(&config.session_db_path)
        .await
        .with_context(|| format!("opening session store {}", config.session_db_path))?;
    let purged = sessions.purge_expired(Utc::now()).await?;
    tracing::debug!(purged, "Dropped expired sessions");
    let auth = AuthState::new(
        Arc::new(sessions),
        repo.clone(),
        repo.clone(),
        Arc::new(LogNotifier),
        AuthConfig::from_env()?,
    );

    let state = AppState::new(repo, auth, config);

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", args.host, args.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
