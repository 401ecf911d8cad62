// src/bin/seed_directory.rs
use directory_backend::config::Config;
use directory_backend::db::{create_db_pool, run_migrations};
use directory_backend::logging::init_tracing;
use directory_backend::seed::{seed_database, SeedOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let app_config = Config::from_env()?;
    let db_pool = create_db_pool(&app_config).await?;

    if app_config.run_migrations {
        run_migrations(&db_pool).await?;
    }

    match seed_database(&db_pool).await? {
        SeedOutcome::Seeded(summary) => tracing::info!(
            buildings = summary.buildings,
            activities = summary.activities,
            organizations = summary.organizations,
            "Seed data inserted"
        ),
        SeedOutcome::AlreadySeeded => {
            tracing::info!("Organizations already exist, skipping seed")
        }
    }

    db_pool.close().await?;
    Ok(())
}
