use std::time::Instant;

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    db,
    error::AppResult,
    models::{InventoryStatus, InventorySummary},
    AppState,
};

// ── GET /api/inventory ────────────────────────────────────────────────────────

pub async fn list_inventory(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryStatus>>> {
    let start = Instant::now();
    let items = {
        let mut conn = state.db.acquire().await?;
        db::fetch_inventory(&mut conn).await?
    };

    let statuses: Vec<InventoryStatus> = items.into_iter().map(InventoryStatus::from).collect();
    info!(
        count = statuses.len(),
        alerts = statuses.iter().filter(|s| s.alert).count(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed inventory"
    );

    Ok(Json(statuses))
}

// ── GET /api/inventory/summary ────────────────────────────────────────────────

pub async fn inventory_summary(State(state): State<AppState>) -> AppResult<Json<InventorySummary>> {
    let items = {
        let mut conn = state.db.acquire().await?;
        db::fetch_inventory(&mut conn).await?
    };

    let summary = InventorySummary::from_items(&items);
    info!(total = summary.total, alerts = summary.alert_count, "Summarized inventory");

    Ok(Json(summary))
}
