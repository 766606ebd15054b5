//! Skymates API server binary.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use skymates_api::config::{ApiConfig, jwt_secret_from, parse_timeout_secs};
use skymates_core::store::postgres::PgStore;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "skymates_server", about = "Skymates glossary API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/skymates"
    )]
    database_url: String,

    /// Secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Deadline for each database query, in seconds.
    #[arg(long, env = "QUERY_TIMEOUT_SECS", default_value = "10")]
    query_timeout_secs: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,skymates_api=debug,skymates_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let jwt_secret = match jwt_secret_from(args.jwt_secret) {
        Ok(secret) => secret,
        Err(e) => {
            error!("{e}; refusing to start");
            return Err(e.into());
        }
    };
    let query_timeout = parse_timeout_secs(&args.query_timeout_secs)?;

    let config = ApiConfig {
        bind_addr: args.bind,
        pg_connection_url: args.database_url,
        jwt_secret,
        query_timeout,
    };

    info!(
        bind = %config.bind_addr,
        max_connections = args.max_connections,
        query_timeout = ?config.query_timeout,
        "starting skymates_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.pg_connection_url)
        .await?;

    info!("running database migrations");
    skymates_api::migrate(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let state = skymates_api::AppState::new(config.clone(), store.clone(), store);
    let app = skymates_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down");
            }
            shutdown.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}
