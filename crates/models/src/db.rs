use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use tracing::{info, warn};

fn options(url: String, cfg: &DatabaseConfig) -> ConnectOptions {
    // Every connection to an in-memory SQLite URL opens its own empty database.
    let (max, min) = if url.contains(":memory:") { (1, 1) } else { (cfg.max_connections, cfg.min_connections) };
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opts
}

/// Connect to the target database described by `cfg`.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(options(cfg.target_url()?, cfg)).await?;
    Ok(db)
}

/// Connect to an explicit URL with default pool settings.
pub async fn connect_url(url: &str) -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: url.to_string(), ..Default::default() };
    connect(&cfg).await
}

/// Quote a PostgreSQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Authenticate against the administrative database with the root
/// credentials and create the target database when it does not exist yet.
///
/// Only meaningful when the connection is described by discrete fields;
/// an explicit `url` is used as-is.
pub async fn ensure_database(cfg: &DatabaseConfig) -> anyhow::Result<()> {
    if !cfg.uses_discrete_fields() {
        return Ok(());
    }
    let admin = Database::connect(options(cfg.admin_url()?, cfg)).await?;
    let exists = admin
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT 1 FROM pg_database WHERE datname = $1",
            [cfg.name.clone().into()],
        ))
        .await?
        .is_some();
    if exists {
        info!(database = %cfg.name, "target database present");
    } else {
        warn!(database = %cfg.name, "target database missing; creating it");
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE {}", quote_ident(&cfg.name)),
            ))
            .await?;
    }
    admin.close().await?;
    Ok(())
}
