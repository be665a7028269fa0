use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;

use super::{FittedModel, ForecastError, ForecastInput, Forecaster, RandomSource};
use crate::models::ForecastPoint;

const UPWARD_TREND: f64 = 1.05;
const DOWNWARD_TREND: f64 = 0.98;
const JITTER_LOW: f64 = 0.9;
const JITTER_HIGH: f64 = 1.1;

/// Daily demand estimate used as the day-0 level: one fiftieth of the reorder threshold.
pub fn base_sales(reorder_point: i64) -> i64 {
    reorder_point / 50
}

/// Per-day growth multiplier: upward when the id ends in an even number.
/// Ids without a trailing number count as odd. Only the last digit decides,
/// so suffixes of any length work.
pub fn trend_factor(item_id: &str) -> f64 {
    match item_id.bytes().last() {
        Some(b) if b.is_ascii_digit() && (b - b'0') % 2 == 0 => UPWARD_TREND,
        _ => DOWNWARD_TREND,
    }
}

/// Projects `base * trend^i * U(0.9, 1.1)` for each future day, never below 1.
/// The band is the same expression at the jitter bounds. Sales history is ignored.
#[derive(Debug, Clone, Default)]
pub struct TrendSimulation {
    random: RandomSource,
}

impl TrendSimulation {
    pub fn new(random: RandomSource) -> Self {
        Self { random }
    }
}

impl Forecaster for TrendSimulation {
    fn fit(&self, input: &ForecastInput) -> Result<Box<dyn FittedModel>, ForecastError> {
        Ok(Box::new(SimulatedTrend {
            base: base_sales(input.reorder_point) as f64,
            trend: trend_factor(&input.item_id),
            anchor: input.anchor,
            rng: self.random.rng(),
        }))
    }
}

struct SimulatedTrend {
    base: f64,
    trend: f64,
    anchor: NaiveDate,
    rng: StdRng,
}

impl FittedModel for SimulatedTrend {
    fn predict(&mut self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
        let mut out = Vec::with_capacity(horizon);
        for day in 1..=horizon as i32 {
            let center = self.base * self.trend.powi(day);
            let jitter: f64 = self.rng.gen_range(JITTER_LOW..JITTER_HIGH);
            let floor = |v: f64| (v as i64).max(1);
            out.push(ForecastPoint {
                date: self.anchor + Duration::days(i64::from(day)),
                predicted_sales: floor(center * jitter),
                lower: floor(center * JITTER_LOW),
                upper: floor(center * JITTER_HIGH),
            });
        }
        Ok(out)
    }
}
