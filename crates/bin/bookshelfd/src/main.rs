//! # bookshelfd — bookshelf daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` logging
//! - Select the storage backend; for `SQLite`, open the pool and run migrations
//! - Construct the application service, injecting the repository via its port trait
//! - Build the axum router, injecting the application service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use tracing_subscriber::EnvFilter;

use bookshelf_adapter_http_axum::router;
use bookshelf_adapter_http_axum::state::AppState;
use bookshelf_adapter_storage_memory::InMemoryBookRepository;
use bookshelf_adapter_storage_sqlite_sqlx::SqliteBookRepository;
use bookshelf_app::ports::BookRepository;
use bookshelf_app::services::book_service::{BookService, UpdatePolicy};

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let policy = if config.api.strict_put {
        UpdatePolicy::Strict
    } else {
        UpdatePolicy::Lenient
    };
    let bind_addr = config.bind_addr();

    match config.database.backend {
        StorageBackend::Sqlite => {
            let db = bookshelf_adapter_storage_sqlite_sqlx::Config::new(config.database_url())
                .build()
                .await?;
            tracing::info!(url = %config.database_url(), "using sqlite storage");
            serve(SqliteBookRepository::new(db.pool().clone()), policy, &bind_addr).await
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, books are lost on exit");
            serve(InMemoryBookRepository::new(), policy, &bind_addr).await
        }
    }
}

async fn serve<BR>(
    repo: BR,
    policy: UpdatePolicy,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let service = BookService::new(repo).with_update_policy(policy);
    let app = router::build(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, ?policy, "bookshelfd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bookshelfd stopped");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
