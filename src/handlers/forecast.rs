use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};

use crate::{
    db,
    error::{AppError, AppResult},
    forecast::{confidence, project, ForecastInput, Observation},
    models::StoredForecast,
    AppState,
};

// ── GET /api/forecast/:id ─────────────────────────────────────────────────────

pub async fn forecast(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
) -> AppResult<Json<StoredForecast>> {
    let start = Instant::now();

    // The connection goes back to the pool before the model is fitted.
    let (records, item) = {
        let mut conn = state.db.acquire().await?;
        let records = db::fetch_sales_for(&mut conn, &drug_id).await?;
        if records.is_empty() {
            warn!(drug_id = %drug_id, "No sales history");
            return Err(AppError::NotFound(
                "Sales data not found for this drug".to_string(),
            ));
        }
        let item = db::fetch_inventory_item(&mut conn, &drug_id).await?;
        (records, item)
    };

    let history: Vec<Observation> = records
        .iter()
        .map(|r| Observation {
            date: r.date,
            value: r.sales as f64,
        })
        .collect();
    let Some(anchor) = history.iter().map(|o| o.date).max() else {
        return Err(AppError::NotFound("Sales data not found for this drug".to_string()));
    };

    let input = ForecastInput {
        item_id: drug_id.clone(),
        reorder_point: item.as_ref().map_or(0, |i| i.reorder_point),
        history,
        anchor,
    };
    let forecast = project(state.forecaster.as_ref(), &input).map_err(|e| {
        warn!(drug_id = %drug_id, error = %e, "Forecast failed");
        AppError::from(e)
    })?;

    info!(
        drug_id = %drug_id,
        observations = records.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Generated forecast"
    );

    Ok(Json(StoredForecast {
        drug_name: item.map_or_else(|| drug_id.clone(), |i| i.name),
        drug_id,
        confidence: confidence(&forecast),
        forecast,
    }))
}
