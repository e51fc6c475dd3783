//! Catalog Engine - Main entry point.
//!
//! Connects to the configured store, makes sure the schema exists, and logs a
//! summary of the category trees it finds.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_engine::infrastructure::{
    clock::SystemClock,
    config::{load_dotenv, EngineConfig},
    ports::{ClockPort, TaxonomyRepo},
    sqlite::{self, SqliteTaxonomyRepo},
};
use catalog_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Working directory first, then the repo root as a fallback.
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Catalog Engine");

    let config = EngineConfig::from_env();
    tracing::info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Connecting to store"
    );

    let pool = sqlite::connect(&config).await?;
    sqlite::ensure_schema(&pool).await?;

    let repo: Arc<dyn TaxonomyRepo> = Arc::new(SqliteTaxonomyRepo::new(pool));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let app = App::new(repo, clock);

    let taxonomy = &app.use_cases.taxonomy;
    let categories = taxonomy.categories.list().await?;
    for category in &categories {
        let roots = taxonomy.reader.list_roots(Some(category.id)).await?;
        tracing::info!(
            category_id = %category.id,
            name = %category.name,
            root_attributes = roots.len(),
            "Category loaded"
        );
    }

    tracing::info!(categories = categories.len(), "Catalog Engine ready");
    Ok(())
}
