use std::sync::Arc;

use tracing::info;

use pharma_forecast::{
    build_simulated_router,
    catalog::Catalog,
    config::Config,
    forecast::{RandomSource, SystemClock, TrendSimulation},
    init_tracing, SimulatedState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state = SimulatedState {
        catalog: Arc::new(Catalog::default()),
        forecaster: Arc::new(TrendSimulation::new(RandomSource::Entropy)),
        clock: Arc::new(SystemClock),
    };

    let addr = Config::simulated_addr();
    info!("Simulated inventory server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_simulated_router(state)).await?;

    Ok(())
}
