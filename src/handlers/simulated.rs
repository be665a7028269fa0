//! Handlers of the in-memory service. Same routes, no store.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    forecast::{confidence, project, ForecastInput},
    models::{InventoryStatus, InventorySummary, SimulatedForecast},
    SimulatedState,
};

pub async fn list_inventory(State(state): State<SimulatedState>) -> Json<Vec<InventoryStatus>> {
    info!("API hit: /api/inventory");
    Json(
        state
            .catalog
            .items()
            .iter()
            .cloned()
            .map(InventoryStatus::from)
            .collect(),
    )
}

pub async fn inventory_summary(State(state): State<SimulatedState>) -> Json<InventorySummary> {
    Json(InventorySummary::from_items(state.catalog.items()))
}

pub async fn forecast(
    State(state): State<SimulatedState>,
    Path(drug_id): Path<String>,
) -> AppResult<Json<SimulatedForecast>> {
    info!(drug_id = %drug_id, "API hit: /api/forecast");

    let Some(item) = state.catalog.find(&drug_id) else {
        warn!(drug_id = %drug_id, "Unknown drug");
        return Err(AppError::NotFound("Drug not found".to_string()));
    };

    let input = ForecastInput {
        item_id: item.id.clone(),
        reorder_point: item.reorder_point,
        history: Vec::new(),
        anchor: state.clock.today(),
    };
    let forecast = project(state.forecaster.as_ref(), &input)?;

    Ok(Json(SimulatedForecast {
        drug_name: item.name.clone(),
        id: drug_id,
        confidence: confidence(&forecast),
        forecast,
    }))
}
