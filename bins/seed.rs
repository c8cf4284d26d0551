use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "seed", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "seed", event = "start", mode = ?cfg.seed.mode, database = %cfg.database.name, "seeding service catalog");
    match service::seed::run(&cfg).await {
        Ok(report) => {
            info!(service = "seed", event = "done", inserted = report.inserted, updated = report.updated, "catalog seeded");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "seed", event = "failed", error = %e, "catalog seed failed");
            std::process::ExitCode::FAILURE
        }
    }
}
