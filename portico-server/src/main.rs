//! Portico server binary.
//!
//! Wires the Postgres user repository and the Redis session store into the
//! router and serves it. Configuration comes from CLI flags with environment
//! fallbacks; a `.env` file is honored when present.

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portico_core::repository::PostgresUserRepository;
use portico_core::session::RedisSessionStore;
use portico_server::routes::create_app;
use portico_server::{AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "portico-server", about = "User account service")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Redis connection string
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Allowed CORS origins (repeatable)
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "portico_server=info,portico_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config {
        server_host: cli.host,
        server_port: cli.port,
        database_url: cli.database_url,
        redis_url: cli.redis_url,
        ..Config::default()
    };
    if !cli.cors_origins.is_empty() {
        config.cors_allowed_origins = cli.cors_origins;
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    let users = PostgresUserRepository::new(pool);
    users
        .initialize_schema()
        .await
        .context("failed to initialize database schema")?;

    let sessions = RedisSessionStore::connect(&config.redis_url)
        .await
        .context("failed to connect to Redis")?;

    let addr = config.listen_addr();
    let state = AppState::new(
        std::sync::Arc::new(config),
        std::sync::Arc::new(users),
        std::sync::Arc::new(sessions),
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
