use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of units sold for one inventory item.
///
/// `sales` is signed: the synthetic history generator is allowed to produce
/// negative values and the store keeps them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesRecord {
    pub id: i64,
    pub drug_id: String,
    pub date: NaiveDate,
    pub sales: i64,
}

/// A sales row before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalesRecord {
    pub drug_id: String,
    pub date: NaiveDate,
    pub sales: i64,
}
