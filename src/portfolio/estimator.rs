//! # Return/Risk Estimator
//!
//! $$
//! \mu_j = 252 \cdot \overline{r_j}, \qquad \Sigma = 252 \cdot \widehat{\operatorname{Cov}}(r)
//! $$
//!
//! Annualized historical-mean expected returns and sample covariance from
//! a price matrix, plus scalar metrics for a single price series. Daily
//! simple returns, 252 trading days per year.

use ndarray::Array1;
use ndarray::Array2;

use crate::market::series::PriceMatrix;
use crate::market::series::PriceSeries;
use crate::portfolio::types::PerformanceSummary;

/// Standard equity annualization factor.
pub const TRADING_DAYS: f64 = 252.0;

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

fn sample_std(xs: &[f64]) -> f64 {
  if xs.len() < 2 {
    return 0.0;
  }

  let mean = sample_mean(xs);
  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }
  (acc / (xs.len() - 1) as f64).sqrt()
}

/// Annualized expected-return vector, one entry per asset.
///
/// A matrix with fewer than 2 observations yields all zeros rather than
/// failing.
pub fn mean_historical_returns(prices: &PriceMatrix, periods_per_year: f64) -> Array1<f64> {
  let returns = prices.daily_returns();
  let n_assets = prices.n_assets();
  let n_periods = returns.nrows();

  let mut mu = Array1::zeros(n_assets);
  if n_periods == 0 {
    return mu;
  }

  for j in 0..n_assets {
    let col_mean = returns.column(j).sum() / n_periods as f64;
    mu[j] = col_mean * periods_per_year;
  }
  mu
}

/// Annualized sample covariance of daily returns, `ddof = 1`.
///
/// Symmetric and positive semi-definite by construction; zeros when
/// fewer than 2 return observations exist.
pub fn sample_covariance(prices: &PriceMatrix, periods_per_year: f64) -> Array2<f64> {
  let returns = prices.daily_returns();
  let n_assets = prices.n_assets();
  let n_periods = returns.nrows();

  let mut cov = Array2::zeros((n_assets, n_assets));
  if n_periods < 2 {
    return cov;
  }

  let means: Vec<f64> = (0..n_assets)
    .map(|j| returns.column(j).sum() / n_periods as f64)
    .collect();

  for i in 0..n_assets {
    for j in i..n_assets {
      let mut acc = 0.0;
      for t in 0..n_periods {
        acc += (returns[(t, i)] - means[i]) * (returns[(t, j)] - means[j]);
      }
      let c = acc / (n_periods - 1) as f64 * periods_per_year;
      cov[(i, j)] = c;
      cov[(j, i)] = c;
    }
  }
  cov
}

/// Annualized return, volatility and Sharpe for a single price series.
///
/// Fewer than 2 observations produce zero return and volatility; nothing
/// here panics on degenerate input.
pub fn series_metrics(
  series: &PriceSeries,
  periods_per_year: f64,
  risk_free: f64,
) -> PerformanceSummary {
  let returns = series.pct_change();
  let mu = sample_mean(&returns) * periods_per_year;
  let sigma = sample_std(&returns) * periods_per_year.sqrt();
  PerformanceSummary::new(mu, sigma, risk_free)
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;
  use chrono::NaiveDate;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
  }

  fn two_asset_matrix() -> PriceMatrix {
    let dates = vec![d(4), d(5), d(6), d(7)];
    let a = PriceSeries::new("A", dates.clone(), vec![100.0, 101.0, 102.01, 103.0301]);
    let b = PriceSeries::new("B", dates.clone(), vec![50.0, 50.0, 50.0, 50.0]);
    PriceMatrix::from_columns(dates, vec![a, b])
  }

  #[test]
  fn mean_returns_scale_with_annualization() {
    let m = two_asset_matrix();
    let mu = mean_historical_returns(&m, TRADING_DAYS);

    // Asset A compounds at exactly 1% per day.
    assert_abs_diff_eq!(mu[0], 0.01 * TRADING_DAYS, epsilon = 1e-9);
    assert_abs_diff_eq!(mu[1], 0.0, epsilon = 1e-12);
  }

  #[test]
  fn covariance_is_symmetric_with_zero_variance_for_flat_asset() {
    let m = two_asset_matrix();
    let cov = sample_covariance(&m, TRADING_DAYS);

    assert_abs_diff_eq!(cov[(0, 1)], cov[(1, 0)], epsilon = 1e-15);
    assert_abs_diff_eq!(cov[(1, 1)], 0.0, epsilon = 1e-15);
  }

  #[test]
  fn series_metrics_match_hand_computation() {
    let s = PriceSeries::new("A", vec![d(4), d(5), d(6)], vec![100.0, 110.0, 99.0]);
    let perf = series_metrics(&s, TRADING_DAYS, 0.0);

    // Daily returns are +10% and -10%; mean 0, std (ddof 1) = 0.1*sqrt(2).
    assert_abs_diff_eq!(perf.expected_return, 0.0, epsilon = 1e-12);
    let expected_vol = 0.1 * 2.0_f64.sqrt() * TRADING_DAYS.sqrt();
    assert_abs_diff_eq!(perf.volatility, expected_vol, epsilon = 1e-9);
    assert_eq!(perf.sharpe, 0.0);
  }

  #[test]
  fn degenerate_series_does_not_panic() {
    let s = PriceSeries::new("A", vec![d(4)], vec![100.0]);
    let perf = series_metrics(&s, TRADING_DAYS, 0.0);
    assert_eq!(perf.expected_return, 0.0);
    assert_eq!(perf.volatility, 0.0);
    assert_eq!(perf.sharpe, 0.0);
  }
}
