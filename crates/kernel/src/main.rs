//! Pagedesk server binary.
//!
//! Serves the page API, or runs an administrative command.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use clap::Parser;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pagedesk_kernel::cli::{self, Cli, Command, UserCommand, WebsiteCommand};
use pagedesk_kernel::{AppState, Config, db, routes, session};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::User(UserCommand::Add {
            username,
            name,
            password,
            admin,
        }) => {
            let pool = open_database(&config).await?;
            cli::cmd_user_add(&pool, &username, &name, &password, admin).await
        }
        Command::User(UserCommand::List) => {
            let pool = open_database(&config).await?;
            cli::cmd_user_list(&pool).await
        }
        Command::Website(WebsiteCommand::SetName { name }) => {
            let pool = open_database(&config).await?;
            cli::cmd_website_set_name(&pool, &name).await
        }
    }
}

/// Open and migrate the database for an administrative command.
async fn open_database(config: &Config) -> Result<SqlitePool> {
    let pool = db::create_pool(config)
        .await
        .context("failed to create database pool")?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting Pagedesk");
    info!(port = config.port, "Configuration loaded");

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    info!("Database ready");

    let session_layer = session::session_layer_from_config(&config);
    let cors = build_cors_layer(&config);

    // TraceLayer → CORS → session → routes
    let app = routes::router()
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.cors_allowed_origins.len() == 1 && config.cors_allowed_origins[0] == "*" {
        // Credentialed requests cannot use a wildcard origin.
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
