mod config;
mod error;
mod handler;
mod middleware;
mod model;
mod route;
mod schema;
mod session;
mod view;

use std::sync::Arc;

use dotenv::dotenv;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::route::create_router;
use crate::session::SessionKey;

// Per-request context: the data-store handle and the session signing key.
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub sessions: SessionKey,
}

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    // Check if the database exists, if not, create it
    if !Sqlite::database_exists(&config.database_url)
        .await
        .unwrap_or(false)
    {
        info!("creating database {}", config.database_url);
        if let Err(err) = Sqlite::create_database(&config.database_url).await {
            error!("failed to create database: {err}");
            std::process::exit(1);
        }
    }

    let pool = match SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            error!("failed to connect to the database: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = init_db(&pool).await {
        error!("failed to initialize schema: {err}");
        std::process::exit(1);
    }

    let app_state = Arc::new(AppState {
        db: pool,
        sessions: SessionKey::new(&config.secret_key),
    });
    let app = create_router(app_state);

    info!("listening on {}", config.bind_addr);
    if let Err(err) = axum::Server::bind(&config.bind_addr)
        .serve(app.into_make_service())
        .await
    {
        error!("server error: {err}");
        std::process::exit(1);
    }
}

/// Creates the two tables if they don't exist. Also used by the test harness
/// against an in-memory database.
pub async fn init_db(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        due_date TEXT,
        completed BOOLEAN NOT NULL DEFAULT 0,
        priority TEXT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    );"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
