//! Additive time-series model: `y(t) = trend(t) + weekly(t) + daily(t)`.
//!
//! The trend is piecewise linear with hinge terms at potential changepoints
//! spread over the first 80% of the history. Seasonal terms are Fourier
//! series over absolute day numbers. All coefficients except the base
//! intercept and slope carry a Gaussian prior, so the fit is a ridge
//! regression solved in closed form; the ridge weight of a block is
//! `1 / prior_scale^2`.

use chrono::{Datelike, Duration, NaiveDate};
use std::f64::consts::PI;

use super::{FittedModel, ForecastError, ForecastInput, Forecaster, Observation};
use crate::models::ForecastPoint;

const MAX_CHANGEPOINTS: usize = 25;
const CHANGEPOINT_RANGE: f64 = 0.8;
const WEEKLY_ORDER: usize = 3;
const DAILY_ORDER: usize = 4;
/// Two-sided normal quantile of an 80% prediction interval.
const INTERVAL_Z: f64 = 1.2816;

#[derive(Debug, Clone)]
pub struct AdditiveForecaster {
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
}

impl Default for AdditiveForecaster {
    /// Daily seasonality on, heavily regularized changepoints.
    fn default() -> Self {
        Self {
            changepoint_prior_scale: 0.01,
            seasonality_prior_scale: 10.0,
            weekly_seasonality: true,
            daily_seasonality: true,
        }
    }
}

impl Forecaster for AdditiveForecaster {
    fn fit(&self, input: &ForecastInput) -> Result<Box<dyn FittedModel>, ForecastError> {
        let mut history = input.history.clone();
        history.sort_by_key(|o| o.date);

        let (first, last) = match (history.first(), history.last()) {
            (Some(first), Some(last)) if first.date < last.date => (first.date, last.date),
            _ => {
                return Err(ForecastError::InsufficientHistory {
                    observed: history.len(),
                })
            }
        };
        if history.iter().any(|o| !o.value.is_finite()) {
            return Err(ForecastError::NonFinite("sales history"));
        }

        let y_scale = history
            .iter()
            .map(|o| o.value.abs())
            .fold(0.0_f64, f64::max)
            .max(1.0);

        let design = Design {
            start: first,
            span_days: (last - first).num_days() as f64,
            changepoints: changepoints(&history, first, (last - first).num_days() as f64),
            weekly: self.weekly_seasonality,
            daily: self.daily_seasonality,
        };

        let penalties = design.penalties(
            1.0 / self.changepoint_prior_scale.powi(2),
            1.0 / self.seasonality_prior_scale.powi(2),
        );
        let p = penalties.len();

        // Normal equations: (X'X + diag(penalties)) beta = X'y
        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        for obs in &history {
            let row = design.row(obs.date);
            let y = obs.value / y_scale;
            for i in 0..p {
                rhs[i] += row[i] * y;
                for j in 0..=i {
                    gram[i][j] += row[i] * row[j];
                }
            }
        }
        for (i, penalty) in penalties.iter().enumerate() {
            gram[i][i] += penalty;
        }

        let coefficients = solve_cholesky(gram, rhs)?;

        let squared_error: f64 = history
            .iter()
            .map(|obs| (obs.value - dot(&design.row(obs.date), &coefficients) * y_scale).powi(2))
            .sum();
        let residual_std = (squared_error / history.len() as f64).sqrt();
        if !residual_std.is_finite() {
            return Err(ForecastError::NonFinite("residuals"));
        }

        Ok(Box::new(AdditiveModel {
            design,
            coefficients,
            y_scale,
            residual_std,
            anchor: input.anchor,
        }))
    }
}

struct AdditiveModel {
    design: Design,
    coefficients: Vec<f64>,
    y_scale: f64,
    /// In sales units.
    residual_std: f64,
    anchor: NaiveDate,
}

impl FittedModel for AdditiveModel {
    fn predict(&mut self, horizon: usize) -> Result<Vec<ForecastPoint>, ForecastError> {
        (1..=horizon as i64)
            .map(|offset| {
                let date = self.anchor + Duration::days(offset);
                let yhat = dot(&self.design.row(date), &self.coefficients) * self.y_scale;
                if !yhat.is_finite() {
                    return Err(ForecastError::NonFinite("prediction"));
                }
                let half_width = INTERVAL_Z * self.residual_std;
                let floor = |v: f64| v.round().max(0.0) as i64;
                Ok(ForecastPoint {
                    date,
                    predicted_sales: floor(yhat),
                    lower: floor(yhat - half_width),
                    upper: floor(yhat + half_width),
                })
            })
            .collect()
    }
}

/// Column layout: intercept, slope, one hinge per changepoint, then weekly
/// and daily sin/cos pairs.
#[derive(Debug, Clone)]
struct Design {
    start: NaiveDate,
    span_days: f64,
    changepoints: Vec<f64>,
    weekly: bool,
    daily: bool,
}

impl Design {
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    fn row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let mut row = Vec::with_capacity(self.width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|&s| (t - s).max(0.0)));

        let day = day_number(date);
        if self.weekly {
            fourier(&mut row, day, 7.0, WEEKLY_ORDER);
        }
        if self.daily {
            fourier(&mut row, day, 1.0, DAILY_ORDER);
        }
        row
    }

    fn seasonal_terms(&self) -> usize {
        2 * (usize::from(self.weekly) * WEEKLY_ORDER + usize::from(self.daily) * DAILY_ORDER)
    }

    fn width(&self) -> usize {
        2 + self.changepoints.len() + self.seasonal_terms()
    }

    fn penalties(&self, changepoint: f64, seasonal: f64) -> Vec<f64> {
        let mut out = vec![0.0, 0.0];
        out.extend(std::iter::repeat(changepoint).take(self.changepoints.len()));
        out.extend(std::iter::repeat(seasonal).take(self.seasonal_terms()));
        out
    }
}

fn dot(row: &[f64], coefficients: &[f64]) -> f64 {
    row.iter().zip(coefficients).map(|(x, b)| x * b).sum()
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn fourier(row: &mut Vec<f64>, day: f64, period: f64, order: usize) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * day / period;
        row.push(angle.sin());
        row.push(angle.cos());
    }
}

/// Changepoints in scaled time, placed on observed dates within the first
/// 80% of the history.
fn changepoints(history: &[Observation], start: NaiveDate, span_days: f64) -> Vec<f64> {
    let last_index = ((history.len() - 1) as f64 * CHANGEPOINT_RANGE).floor() as usize;
    let count = MAX_CHANGEPOINTS.min(last_index);
    if count == 0 {
        return Vec::new();
    }

    let mut out: Vec<f64> = (1..=count)
        .map(|j| {
            let idx = (j as f64 * last_index as f64 / count as f64).round() as usize;
            (history[idx].date - start).num_days() as f64 / span_days
        })
        .collect();
    out.dedup();
    out
}

/// Solve `a x = b` for symmetric positive definite `a`, of which only the
/// lower triangle is read.
fn solve_cholesky(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ForecastError> {
    let n = b.len();
    for j in 0..n {
        let mut diag = a[j][j];
        for k in 0..j {
            diag -= a[j][k] * a[j][k];
        }
        if !diag.is_finite() || diag <= f64::EPSILON {
            return Err(ForecastError::Singular);
        }
        let diag = diag.sqrt();
        a[j][j] = diag;
        for i in (j + 1)..n {
            let mut value = a[i][j];
            for k in 0..j {
                value -= a[i][k] * a[j][k];
            }
            a[i][j] = value / diag;
        }
    }

    // L y = b
    for i in 0..n {
        for k in 0..i {
            b[i] -= a[i][k] * b[k];
        }
        b[i] /= a[i][i];
    }
    // L' x = y
    for i in (0..n).rev() {
        for k in (i + 1)..n {
            b[i] -= a[k][i] * b[k];
        }
        b[i] /= a[i][i];
    }

    if b.iter().any(|x| !x.is_finite()) {
        return Err(ForecastError::NonFinite("coefficients"));
    }
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::FORECAST_HORIZON;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    fn input(values: impl IntoIterator<Item = f64>) -> ForecastInput {
        let history: Vec<Observation> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Observation { date: day(i as i64), value })
            .collect();
        let anchor = history.last().map(|o| o.date).unwrap_or_else(|| day(0));
        ForecastInput {
            item_id: "D001".to_string(),
            reorder_point: 5000,
            history,
            anchor,
        }
    }

    fn forecast(values: impl IntoIterator<Item = f64>) -> Vec<ForecastPoint> {
        AdditiveForecaster::default()
            .fit(&input(values))
            .unwrap()
            .predict(FORECAST_HORIZON)
            .unwrap()
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        let points = forecast(std::iter::repeat(120.0).take(90));
        assert_eq!(points.len(), FORECAST_HORIZON);
        for p in points {
            assert!((p.predicted_sales - 120).abs() <= 1, "got {}", p.predicted_sales);
        }
    }

    #[test]
    fn linear_series_extrapolates_the_slope() {
        let points = forecast((0..90).map(|i| 10.0 + 2.0 * i as f64));
        for (h, p) in points.iter().enumerate() {
            let expected = 10 + 2 * (90 + h as i64);
            assert!(
                (p.predicted_sales - expected).abs() <= 2,
                "day {h}: expected ~{expected}, got {}",
                p.predicted_sales
            );
        }
    }

    #[test]
    fn weekly_cycle_is_recovered() {
        let signal = |i: i64| 100.0 + 20.0 * (2.0 * PI * i as f64 / 7.0).sin();
        let points = forecast((0..90).map(signal));
        for (h, p) in points.iter().enumerate() {
            let expected = signal(90 + h as i64).round() as i64;
            assert!(
                (p.predicted_sales - expected).abs() <= 3,
                "day {h}: expected ~{expected}, got {}",
                p.predicted_sales
            );
        }
    }

    #[test]
    fn band_surrounds_every_prediction() {
        let signal = |i: i64| 80.0 + 0.5 * i as f64 + 15.0 * ((i * 37 % 11) as f64 - 5.0);
        let points = forecast((0..90).map(signal));
        for p in &points {
            assert!(p.contains_prediction(), "{p:?}");
            assert!(p.lower >= 0);
        }
        assert!(points.iter().any(|p| p.upper > p.lower), "noisy history should widen the band");
    }

    #[test]
    fn exact_fit_has_a_tight_band() {
        let points = forecast(std::iter::repeat(120.0).take(90));
        for p in points {
            assert!(p.upper - p.lower <= 2, "{p:?}");
        }
    }

    #[test]
    fn band_is_floored_at_zero() {
        let points = forecast((0..90).map(|i| 100.0 - 2.0 * i as f64));
        assert!(points.iter().all(|p| p.lower == 0 && p.contains_prediction()));
    }

    #[test]
    fn dates_follow_the_last_observation() {
        let points = forecast((0..30).map(|_| 5.0));
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(dates, (30..37).map(day).collect::<Vec<_>>());
    }

    #[test]
    fn declining_series_is_floored_at_zero() {
        let points = forecast((0..90).map(|i| 100.0 - 2.0 * i as f64));
        assert!(points.iter().all(|p| p.predicted_sales == 0));
    }

    #[test]
    fn unordered_history_is_sorted_before_fitting() {
        let mut inp = input((0..60).map(|i| 50.0 + i as f64));
        inp.history.reverse();
        let points = AdditiveForecaster::default()
            .fit(&inp)
            .unwrap()
            .predict(FORECAST_HORIZON)
            .unwrap();
        assert!((points[0].predicted_sales - 110).abs() <= 2);
    }

    #[test]
    fn single_observation_is_rejected() {
        let err = AdditiveForecaster::default().fit(&input([3.0])).err().unwrap();
        assert!(matches!(err, ForecastError::InsufficientHistory { observed: 1 }));
    }

    #[test]
    fn repeated_single_date_is_rejected() {
        let mut inp = input([1.0, 2.0]);
        inp.history[1].date = inp.history[0].date;
        assert!(matches!(
            AdditiveForecaster::default().fit(&inp),
            Err(ForecastError::InsufficientHistory { observed: 2 })
        ));
    }

    #[test]
    fn non_finite_history_is_rejected() {
        let err = AdditiveForecaster::default()
            .fit(&input([1.0, f64::NAN, 3.0]))
            .err()
            .unwrap();
        assert!(matches!(err, ForecastError::NonFinite(_)));
    }

    #[test]
    fn cholesky_solves_small_system() {
        // [[4, 2], [2, 3]] x = [2, 1]  =>  x = [0.5, 0]
        let x = solve_cholesky(vec![vec![4.0, 0.0], vec![2.0, 3.0]], vec![2.0, 1.0]).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn cholesky_rejects_singular_matrix() {
        let result = solve_cholesky(vec![vec![0.0, 0.0], vec![0.0, 0.0]], vec![1.0, 1.0]);
        assert!(matches!(result, Err(ForecastError::Singular)));
    }
}
