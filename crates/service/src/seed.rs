//! Catalog bootstrap: make sure the database exists, migrate it, and load the
//! fixed list of installable service types.

use configs::{AppConfig, SeedMode};
use migration::MigratorTrait;
use models::catalog::{self, NewEntry};
use models::db;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::ServiceError;

/// Installable service types written by the seed routine.
pub const CATALOG: [NewEntry<'static>; 7] = [
    NewEntry { name: "PostgreSQL", slug: "postgres", description: "Relational database server", image: "postgres:16-alpine", tag: "database" },
    NewEntry { name: "MongoDB", slug: "mongodb", description: "Document database server", image: "mongo:7", tag: "database" },
    NewEntry { name: "Squid Proxy", slug: "squid", description: "Caching forward proxy", image: "ubuntu/squid:latest", tag: "proxy" },
    NewEntry { name: "CoreDNS", slug: "coredns", description: "Custom sub-DNS server", image: "coredns/coredns:1.11.1", tag: "dns" },
    NewEntry { name: "Gitea", slug: "gitea", description: "Self-hosted GIT remote repository", image: "gitea/gitea:1.21", tag: "git" },
    NewEntry { name: "Jenkins", slug: "jenkins", description: "CI/CD automation server", image: "jenkins/jenkins:lts", tag: "ci" },
    NewEntry { name: "Nginx", slug: "nginx", description: "Web server and reverse proxy", image: "nginx:1.25-alpine", tag: "web" },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub updated: usize,
}

/// Write [`CATALOG`] into an already migrated database.
///
/// `Append` inserts every entry on every run. `UpsertBySlug` refreshes the
/// oldest row carrying a slug and inserts only slugs that are missing.
#[instrument(skip(db))]
pub async fn seed_catalog(db: &DatabaseConnection, mode: SeedMode) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();
    for entry in &CATALOG {
        match mode {
            SeedMode::Append => {
                catalog::insert(db, entry).await?;
                report.inserted += 1;
            }
            SeedMode::UpsertBySlug => match catalog::find_by_slug(db, entry.slug).await?.into_iter().next() {
                Some(existing) => {
                    catalog::update(db, existing, entry).await?;
                    report.updated += 1;
                }
                None => {
                    catalog::insert(db, entry).await?;
                    report.inserted += 1;
                }
            },
        }
    }
    info!(event = "catalog_seeded", ?mode, inserted = report.inserted, updated = report.updated, "catalog seed finished");
    Ok(report)
}

/// Full bootstrap used by the `seed` binary.
pub async fn run(cfg: &AppConfig) -> anyhow::Result<SeedReport> {
    cfg.database.validate()?;
    db::ensure_database(&cfg.database).await?;
    let conn = db::connect(&cfg.database).await?;
    migration::Migrator::up(&conn, None).await?;
    info!(service = "seed", event = "migrated", "catalog schema up to date");
    let report = seed_catalog(&conn, cfg.seed.mode).await?;
    conn.close().await?;
    Ok(report)
}
