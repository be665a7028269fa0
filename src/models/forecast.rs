use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One predicted day. `lower <= predicted_sales <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub predicted_sales: i64,
    pub lower: i64,
    pub upper: i64,
}

impl ForecastPoint {
    pub fn contains_prediction(&self) -> bool {
        self.lower <= self.predicted_sales && self.predicted_sales <= self.upper
    }
}

/// Forecast payload of the store-backed service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredForecast {
    pub drug_id: String,
    pub drug_name: String,
    pub forecast: Vec<ForecastPoint>,
    /// In `[0.6, 0.95]`, two decimals.
    pub confidence: f64,
}

/// Forecast payload of the in-memory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedForecast {
    pub drug_name: String,
    pub id: String,
    pub forecast: Vec<ForecastPoint>,
    pub confidence: f64,
}
