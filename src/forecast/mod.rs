//! Demand forecasting behind a narrow fit/predict seam.
//!
//! Two engines implement [`Forecaster`]:
//! - [`AdditiveForecaster`]: piecewise-linear trend plus Fourier seasonality,
//!   fitted to stored sales history.
//! - [`TrendSimulation`]: ignores history and projects a jittered trend from
//!   the item's reorder threshold.

mod additive;
mod trend;

use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::ForecastPoint;

pub use additive::AdditiveForecaster;
pub use trend::{base_sales, trend_factor, TrendSimulation};

/// Number of future days every forecast covers.
pub const FORECAST_HORIZON: usize = 7;

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("need at least 2 distinct dates to fit a trend, got {observed} observation(s)")]
    InsufficientHistory { observed: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("design matrix is not positive definite")]
    Singular,
}

/// One dated observation of units sold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything an engine may look at when fitting one item.
#[derive(Debug, Clone)]
pub struct ForecastInput {
    pub item_id: String,
    pub reorder_point: i64,
    pub history: Vec<Observation>,
    /// Last day before the horizon; the first prediction is `anchor + 1`.
    pub anchor: NaiveDate,
}

pub trait Forecaster: Send + Sync {
    fn fit(&self, input: &ForecastInput) -> Result<Box<dyn FittedModel>, ForecastError>;
}

pub trait FittedModel: Send {
    /// Predict `horizon` consecutive days after the input's anchor.
    fn predict(&mut self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError>;
}

/// Fit `input` and predict the standard horizon.
pub fn project(
    forecaster: &dyn Forecaster,
    input: &ForecastInput,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    forecaster.fit(input)?.predict(FORECAST_HORIZON)
}

const MIN_CONFIDENCE: f64 = 0.6;
const MAX_CONFIDENCE: f64 = 0.95;

/// Overall confidence in a forecast: `1 - cv` of the predicted values, clamped
/// to `[0.6, 0.95]` and rounded to two decimals. A forecast with no positive
/// mean gets the minimum.
pub fn confidence(points: &[ForecastPoint]) -> f64 {
    if points.is_empty() {
        return MIN_CONFIDENCE;
    }
    let n = points.len() as f64;
    let mean = points.iter().map(|p| p.predicted_sales as f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return MIN_CONFIDENCE;
    }
    let variance = points
        .iter()
        .map(|p| (p.predicted_sales as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let score = (1.0 - variance.sqrt() / mean).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    (score * 100.0).round() / 100.0
}

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Where randomness comes from. `Seeded` yields the same stream on every call.
#[derive(Debug, Clone, Copy, Default)]
pub enum RandomSource {
    #[default]
    Entropy,
    Seeded(u64),
}

impl RandomSource {
    pub fn rng(&self) -> StdRng {
        match *self {
            RandomSource::Entropy => StdRng::from_entropy(),
            RandomSource::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }
}
