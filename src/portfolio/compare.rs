//! # Performance Comparator
//!
//! $$
//! C_t = \prod_{s \le t} (1 + r_s) - 1
//! $$
//!
//! Combines optimized weights, the conditioned price matrix and a
//! benchmark into display-ready cumulative-return series, and derives
//! buy-and-hold weight drift over the window.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::market::series::PriceMatrix;
use crate::market::series::PriceSeries;
use crate::portfolio::types::BenchmarkResult;
use crate::portfolio::types::WeightVector;

/// Date-aligned cumulative return series for charting.
///
/// Missing values on either side are filled with 0.0, read as "no
/// movement yet" before a series' start.
#[derive(Clone, Debug, Default)]
pub struct ComparisonChart {
  /// Union calendar, strictly increasing.
  pub dates: Vec<NaiveDate>,
  /// Portfolio cumulative returns.
  pub portfolio: Vec<f64>,
  /// Benchmark cumulative returns.
  pub benchmark: Vec<f64>,
}

/// Start and end allocations of a buy-and-hold portfolio.
///
/// Both are empty when no weighted asset overlaps the price matrix.
#[derive(Clone, Debug, Default)]
pub struct WeightDrift {
  /// Initial weights, restricted to assets present in the matrix.
  pub start: WeightVector,
  /// End-of-window weights after differential price movement.
  pub end: WeightVector,
}

/// Full comparator output.
#[derive(Clone, Debug)]
pub struct Comparison {
  pub chart: ComparisonChart,
  pub drift: WeightDrift,
}

/// Weighted daily portfolio returns; one entry per date from the second
/// matrix row onward. Weights are matched to columns by ticker, absent
/// tickers contribute nothing.
pub fn portfolio_daily_returns(prices: &PriceMatrix, weights: &WeightVector) -> Vec<f64> {
  let returns = prices.daily_returns();
  let col_weights: Vec<f64> = prices
    .tickers()
    .iter()
    .map(|t| weights.get(t).unwrap_or(0.0))
    .collect();

  (0..returns.nrows())
    .map(|t| {
      returns
        .row(t)
        .iter()
        .zip(col_weights.iter())
        .map(|(r, w)| r * w)
        .sum()
    })
    .collect()
}

/// Running product of `1 + r`, minus 1.
pub fn cumulative_returns(daily: &[f64]) -> Vec<f64> {
  let mut acc = 1.0;
  daily
    .iter()
    .map(|r| {
      acc *= 1.0 + r;
      acc - 1.0
    })
    .collect()
}

/// Benchmark growth relative to its first observation.
pub fn benchmark_cumulative(series: &PriceSeries) -> Vec<f64> {
  let Some(first) = series.first() else {
    return Vec::new();
  };

  series.values().iter().map(|v| v / first - 1.0).collect()
}

/// Outer-align two dated series on their union calendar, filling gaps
/// with 0.0.
fn outer_align(
  left_dates: &[NaiveDate],
  left: &[f64],
  right_dates: &[NaiveDate],
  right: &[f64],
) -> ComparisonChart {
  let mut merged: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

  for (d, v) in left_dates.iter().zip(left.iter()) {
    merged.entry(*d).or_insert((0.0, 0.0)).0 = *v;
  }
  for (d, v) in right_dates.iter().zip(right.iter()) {
    merged.entry(*d).or_insert((0.0, 0.0)).1 = *v;
  }

  let mut chart = ComparisonChart::default();
  for (d, (p, b)) in merged {
    chart.dates.push(d);
    chart.portfolio.push(p);
    chart.benchmark.push(b);
  }
  chart
}

/// Buy-and-hold drift: each starting weight scaled by its asset's total
/// price relative over the window, renormalized to sum to 1.
pub fn weight_drift(weights: &WeightVector, prices: &PriceMatrix) -> WeightDrift {
  let relatives = prices.price_relatives();

  let mut start = Vec::new();
  let mut scaled = Vec::new();
  for (ticker, w) in weights.iter() {
    let Some(j) = prices.ticker_index(ticker) else {
      continue;
    };
    start.push((ticker.to_string(), w));
    scaled.push((ticker.to_string(), w * relatives[j]));
  }

  if start.is_empty() {
    return WeightDrift::default();
  }

  let total: f64 = scaled.iter().map(|(_, w)| w).sum();
  let end = if total > 0.0 {
    scaled.into_iter().map(|(t, w)| (t, w / total)).collect()
  } else {
    Vec::new()
  };

  WeightDrift {
    start: WeightVector::new(start),
    end: WeightVector::new(end),
  }
}

/// Build the full comparison from one optimization's outputs.
pub fn compare(
  weights: &WeightVector,
  prices: &PriceMatrix,
  benchmark: &BenchmarkResult,
) -> Comparison {
  let daily = portfolio_daily_returns(prices, weights);
  let port_cum = cumulative_returns(&daily);
  let port_dates: &[NaiveDate] = if prices.n_obs() > 1 {
    &prices.dates()[1..]
  } else {
    &[]
  };

  let bmk_cum = benchmark_cumulative(&benchmark.converted);

  Comparison {
    chart: outer_align(port_dates, &port_cum, benchmark.converted.dates(), &bmk_cum),
    drift: weight_drift(weights, prices),
  }
}
