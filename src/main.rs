use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxrates_backend::jobs;
use fxrates_backend::scrapers;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fxrates_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let source_keys = source_keys_from_env();

    // Pool and worker count are bounded together: one connection per worker
    let workers = jobs::worker_count(source_keys.len());

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!(
        "Connecting to database with a pool of {} connections...",
        workers
    );

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(workers as u32)
        .min_connections(workers as u32);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");

    // Run migrations (schema plus seeded source rows)
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    match jobs::rates_sync::run_ingestion(&db, &source_keys, workers).await {
        Ok(report) => {
            tracing::info!(
                "Ingestion run finished. {} sources succeeded, {} failed.",
                report.succeeded,
                report.failed
            );
        }
        Err(error) => {
            tracing::error!("Ingestion could not be started: {}", error);

            std::process::exit(1);
        }
    }
}

/// Comma-separated source keys from `SOURCES`, defaulting to every
/// registered adapter. Unknown keys are rejected before the pool starts.
fn source_keys_from_env() -> Vec<String> {
    match env::var("SOURCES") {
        Ok(value) => value
            .split(',')
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect(),
        Err(_) => scrapers::REGISTERED_SOURCES
            .iter()
            .map(|key| key.to_string())
            .collect(),
    }
}
