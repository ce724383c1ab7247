//! Shared application state

use crate::{config::Config, db::PersonStore, services::PersonService, Result};
use census_lookup::LookupClient;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppStateOptions {
    pub run_migrations: bool,
}

impl Default for AppStateOptions {
    fn default() -> Self {
        Self {
            run_migrations: true,
        }
    }
}

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub persons: Arc<PersonService>,
}

impl AppState {
    /// Initialize the application state
    pub async fn new(config: Config) -> Result<Self> {
        Self::new_with_options(config, AppStateOptions::default()).await
    }

    pub async fn new_with_options(config: Config, options: AppStateOptions) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let config_arc = Arc::new(config);

        // Create database connection pool
        let db_pool = create_db_pool(config_arc.as_ref()).await?;

        // Run migrations
        if options.run_migrations {
            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&db_pool)
                .await
                .map_err(|e| crate::Error::Internal(format!("Migration failed: {}", e)))?;
        }

        let lookups = LookupClient::new(census_lookup::LookupConfig {
            age_url: config_arc.lookup.age_url.clone(),
            gender_url: config_arc.lookup.gender_url.clone(),
            nationality_url: config_arc.lookup.nationality_url.clone(),
            timeout: Duration::from_secs(config_arc.lookup.timeout_seconds),
        })
        .map_err(|e| crate::Error::Internal(format!("Failed to build lookup client: {}", e)))?;

        let store = PersonStore::new(db_pool.clone());
        let persons = Arc::new(PersonService::new(store, lookups, config_arc.search.clone()));

        tracing::info!("Application state initialized");

        Ok(Self {
            config: config_arc,
            db_pool,
            persons,
        })
    }
}

async fn create_db_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Creating database connection pool...");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.database.pool_min_size)
        .max_connections(config.database.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
        .connect(&config.database.url)
        .await
        .map_err(crate::Error::Database)?;

    tracing::info!(
        "Database pool created (min: {}, max: {})",
        config.database.pool_min_size,
        config.database.pool_max_size
    );

    Ok(pool)
}
