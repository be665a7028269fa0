use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::StandardNormal;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::error::AppResult;
use crate::models::{InventoryItem, NewSalesRecord};

/// Days of synthetic history generated per item.
pub const HISTORY_DAYS: i64 = 90;

/// Standard deviation of the multiplicative noise on synthetic sales.
const NOISE_STD_DEV: f64 = 0.1;

/// A default inventory item and the daily sales rate its history oscillates around.
#[derive(Debug, Clone)]
pub struct SeedItem {
    pub item: InventoryItem,
    pub base_sales: f64,
}

/// Three items; `D002` starts below its reorder point so an alert is always visible.
pub fn default_seed() -> Vec<SeedItem> {
    vec![
        SeedItem {
            item: InventoryItem::new("D001", "Drug-X Pain Reliever", 5500, 5000, "Warehouse A"),
            base_sales: 100.0,
        },
        SeedItem {
            item: InventoryItem::new("D002", "Drug-Y Antiviral", 1200, 1500, "Warehouse B"),
            base_sales: 30.0,
        },
        SeedItem {
            item: InventoryItem::new("D003", "Drug-Z Vaccine", 8900, 10000, "Warehouse A"),
            base_sales: 150.0,
        },
    ]
}

/// One row per day for the `days` days ending yesterday.
///
/// Day `i` sells `round(base * (1 + N(0, 0.1) + 0.5 * sin(i / 7)))`. Values are
/// not clamped, so a small base can go negative.
pub fn synthetic_sales(
    drug_id: &str,
    base_sales: f64,
    days: i64,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Vec<NewSalesRecord> {
    let start = today - Duration::days(days);
    (0..days)
        .map(|i| {
            let noise: f64 = rng.sample(StandardNormal);
            let factor = 1.0 + NOISE_STD_DEV * noise + 0.5 * (i as f64 / 7.0).sin();
            NewSalesRecord {
                drug_id: drug_id.to_string(),
                date: start + Duration::days(i),
                sales: (base_sales * factor).round() as i64,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inventory_inserted: usize,
    pub sales_inserted: usize,
}

/// Populate each empty table. Tables that already hold rows are left untouched,
/// whatever they contain.
pub async fn seed_store(
    pool: &SqlitePool,
    seed: &[SeedItem],
    today: NaiveDate,
    rng: &mut impl Rng,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    if db::count_inventory(&mut tx).await? == 0 {
        let items: Vec<InventoryItem> = seed.iter().map(|s| s.item.clone()).collect();
        db::insert_inventory(&mut tx, &items).await?;
        report.inventory_inserted = items.len();
    } else {
        info!("Inventory table already populated, skipping");
    }

    if db::count_sales(&mut tx).await? == 0 {
        let records: Vec<NewSalesRecord> = seed
            .iter()
            .flat_map(|s| synthetic_sales(&s.item.id, s.base_sales, HISTORY_DAYS, today, &mut *rng))
            .collect();
        db::insert_sales(&mut tx, &records).await?;
        report.sales_inserted = records.len();
    } else {
        info!("Sales table already populated, skipping");
    }

    tx.commit().await?;

    info!(
        inventory = report.inventory_inserted,
        sales = report.sales_inserted,
        "Seeding complete"
    );
    Ok(report)
}
