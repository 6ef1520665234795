use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!("Starting up InsightBoard [{}]...", config.runtime_env());
    if config.gemini_mock {
        if config.is_production() {
            warn!("Gemini mock mode is enabled in production, every transcript yields demo tasks");
        } else {
            info!("Gemini mock mode is enabled, transcripts will not be sent to a model");
        }
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let app_state = AppState::new(config, &db);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with an error: {e}");
        std::process::exit(1);
    }
}
