use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use pharma_forecast::{
    build_router,
    config::Config,
    db,
    forecast::{AdditiveForecaster, Clock, RandomSource, SystemClock},
    init_tracing, seed, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    info!(database_url = %config.database_url, "Opening SQLite store...");
    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .context("failed to open store and apply schema")?;
    info!("Store ready.");

    let mut rng = RandomSource::Entropy.rng();
    seed::seed_store(&pool, &seed::default_seed(), SystemClock.today(), &mut rng)
        .await
        .context("failed to seed store")?;

    let state = AppState {
        db: pool,
        forecaster: Arc::new(AdditiveForecaster::default()),
    };

    let app = build_router(state);

    let addr = config.bind_addr();
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
