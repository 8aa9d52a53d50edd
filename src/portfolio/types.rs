//! # Portfolio Types
//!
//! $$
//! \mathbf{w}^\* = \arg\max_{\mathbf{w} \in \Delta^{N-1}} \frac{\mu^\top \mathbf{w} - r_f}{\sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}}
//! $$
//!
//! Result containers shared by the optimizer, benchmark and comparison
//! pipelines.

use crate::market::series::PriceMatrix;
use crate::market::series::PriceSeries;

/// Long-only allocation keyed by asset identifier.
///
/// After cleaning, kept weights are in `(0, 1]` and sum to 1 within
/// floating tolerance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightVector {
  entries: Vec<(String, f64)>,
}

impl WeightVector {
  /// Build from `(ticker, weight)` pairs, preserving order.
  pub fn new(entries: Vec<(String, f64)>) -> Self {
    Self { entries }
  }

  /// The empty allocation.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Weight for `ticker`, if allocated.
  pub fn get(&self, ticker: &str) -> Option<f64> {
    self
      .entries
      .iter()
      .find(|(t, _)| t == ticker)
      .map(|(_, w)| *w)
  }

  /// Iterate `(ticker, weight)` pairs in allocation order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
    self.entries.iter().map(|(t, w)| (t.as_str(), *w))
  }

  /// Sum of all weights.
  pub fn total(&self) -> f64 {
    self.entries.iter().map(|(_, w)| w).sum()
  }
}

/// Annualized performance triple.
///
/// `sharpe` is `(expected_return - r_f) / volatility` when volatility is
/// nonzero, defined as exactly 0 for a flat series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceSummary {
  /// Annualized expected return.
  pub expected_return: f64,
  /// Annualized volatility.
  pub volatility: f64,
  /// Risk-adjusted return.
  pub sharpe: f64,
}

impl PerformanceSummary {
  /// Assemble the triple, defining Sharpe as 0 when volatility vanishes.
  pub fn new(expected_return: f64, volatility: f64, risk_free: f64) -> Self {
    let sharpe = if volatility > 0.0 {
      (expected_return - risk_free) / volatility
    } else {
      0.0
    };

    Self {
      expected_return,
      volatility,
      sharpe,
    }
  }
}

/// Benchmark series in original and reporting currency, with conversion
/// metadata.
#[derive(Clone, Debug)]
pub struct BenchmarkResult {
  /// Benchmark prices in their native currency.
  pub original: PriceSeries,
  /// Benchmark prices in the reporting currency. Equal to `original`
  /// when no conversion was requested or none was possible.
  pub converted: PriceSeries,
  /// Detected or heuristic ISO currency of the benchmark.
  pub currency: String,
  /// FX pair symbol used for conversion, `None` when unconverted.
  pub fx_pair_used: Option<String>,
}

/// Immutable result of one optimization request.
///
/// Carries the conditioned price matrix so the caller can re-render or
/// run comparisons without recomputation.
#[derive(Clone, Debug)]
pub struct OptimizedPortfolio {
  /// Cleaned max-Sharpe weights.
  pub weights: WeightVector,
  /// Expected performance under the estimated moments.
  pub performance: PerformanceSummary,
  /// Conditioned prices the optimization was solved on.
  pub prices: PriceMatrix,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flat_series_sharpe_is_zero() {
    let perf = PerformanceSummary::new(0.05, 0.0, 0.0);
    assert_eq!(perf.sharpe, 0.0);
  }

  #[test]
  fn sharpe_uses_excess_return() {
    let perf = PerformanceSummary::new(0.12, 0.2, 0.02);
    assert!((perf.sharpe - 0.5).abs() < 1e-12);
  }

  #[test]
  fn weight_lookup_by_ticker() {
    let w = WeightVector::new(vec![("A".into(), 0.6), ("B".into(), 0.4)]);
    assert_eq!(w.get("B"), Some(0.4));
    assert_eq!(w.get("C"), None);
    assert!((w.total() - 1.0).abs() < 1e-12);
  }
}
