use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};

use crate::error::AppResult;
use crate::models::*;

/// Open (creating if absent) the SQLite file and bring its schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// ── Inventory ─────────────────────────────────────────────────────────────────

/// All items in natural storage order.
pub async fn fetch_inventory(conn: &mut SqliteConnection) -> AppResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(
        "SELECT id, name, stock, reorder_point, location FROM inventory ORDER BY rowid",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

pub async fn fetch_inventory_item(
    conn: &mut SqliteConnection,
    id: &str,
) -> AppResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(
        "SELECT id, name, stock, reorder_point, location FROM inventory WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

pub async fn count_inventory(conn: &mut SqliteConnection) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inventory")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.0)
}

pub async fn insert_inventory(conn: &mut SqliteConnection, items: &[InventoryItem]) -> AppResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO inventory (id, name, stock, reorder_point, location) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.stock)
        .bind(item.reorder_point)
        .bind(&item.location)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// ── Sales ─────────────────────────────────────────────────────────────────────

pub async fn fetch_sales_for(
    conn: &mut SqliteConnection,
    drug_id: &str,
) -> AppResult<Vec<SalesRecord>> {
    let records = sqlx::query_as::<_, SalesRecord>(
        "SELECT id, drug_id, date, sales FROM sales WHERE drug_id = ? ORDER BY id",
    )
    .bind(drug_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records)
}

pub async fn count_sales(conn: &mut SqliteConnection) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.0)
}

pub async fn insert_sales(conn: &mut SqliteConnection, records: &[NewSalesRecord]) -> AppResult<()> {
    for record in records {
        sqlx::query("INSERT INTO sales (drug_id, date, sales) VALUES (?, ?, ?)")
            .bind(&record.drug_id)
            .bind(record.date)
            .bind(record.sales)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
