//! # Price Series and Matrices
//!
//! $$
//! r_t = \frac{P_t}{P_{t-1}} - 1
//! $$
//!
//! Time-indexed containers for single-asset and multi-asset price data,
//! plus the reindex/fill primitives the conditioner is built from. Gaps
//! are represented as `NaN` until a fill pass removes them.

use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::ArrayView1;

/// Replace leading/interior `NaN` runs with the next observed value.
pub(crate) fn fill_backward(values: &mut [f64]) {
  let mut next = f64::NAN;
  for v in values.iter_mut().rev() {
    if v.is_nan() {
      *v = next;
    } else {
      next = *v;
    }
  }
}

/// Replace trailing/interior `NaN` runs with the last observed value.
pub(crate) fn fill_forward(values: &mut [f64]) {
  let mut prev = f64::NAN;
  for v in values.iter_mut() {
    if v.is_nan() {
      *v = prev;
    } else {
      prev = *v;
    }
  }
}

/// Single-asset price history indexed by date.
#[derive(Clone, Debug, Default)]
pub struct PriceSeries {
  ticker: String,
  dates: Vec<NaiveDate>,
  values: Vec<f64>,
}

impl PriceSeries {
  /// Build a series from parallel date/value vectors.
  ///
  /// Observations are sorted chronologically; duplicate dates keep the
  /// last observation.
  pub fn new(ticker: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
    debug_assert_eq!(dates.len(), values.len());

    let mut obs: Vec<(NaiveDate, f64)> = dates.into_iter().zip(values).collect();
    obs.sort_by_key(|(d, _)| *d);
    // Keep the last observation for a duplicated date.
    obs.reverse();
    obs.dedup_by_key(|(d, _)| *d);
    obs.reverse();

    let (dates, values) = obs.into_iter().unzip();
    Self {
      ticker: ticker.into(),
      dates,
      values,
    }
  }

  /// An empty series carrying only an identifier.
  pub fn empty(ticker: impl Into<String>) -> Self {
    Self {
      ticker: ticker.into(),
      dates: Vec::new(),
      values: Vec::new(),
    }
  }

  /// Asset identifier.
  pub fn ticker(&self) -> &str {
    &self.ticker
  }

  /// Observation dates, strictly increasing.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Observation values, parallel to [`PriceSeries::dates`].
  pub fn values(&self) -> &[f64] {
    &self.values
  }

  pub fn len(&self) -> usize {
    self.dates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  /// First observed value, if any.
  pub fn first(&self) -> Option<f64> {
    self.values.first().copied()
  }

  /// Last observed value, if any.
  pub fn last(&self) -> Option<f64> {
    self.values.last().copied()
  }

  /// Drop observations whose value is missing.
  pub fn drop_missing(mut self) -> Self {
    let mut dates = Vec::with_capacity(self.dates.len());
    let mut values = Vec::with_capacity(self.values.len());

    for (d, v) in self.dates.iter().zip(self.values.iter()) {
      if !v.is_nan() {
        dates.push(*d);
        values.push(*v);
      }
    }

    self.dates = dates;
    self.values = values;
    self
  }

  /// Re-align the series onto `calendar`, introducing `NaN` holes where
  /// the target calendar has no observation.
  pub fn reindex(&self, calendar: &[NaiveDate]) -> Self {
    let values = calendar
      .iter()
      .map(|d| match self.dates.binary_search(d) {
        Ok(i) => self.values[i],
        Err(_) => f64::NAN,
      })
      .collect();

    Self {
      ticker: self.ticker.clone(),
      dates: calendar.to_vec(),
      values,
    }
  }

  /// Backward fill then forward fill, in place.
  pub fn fill_gaps(&mut self) {
    fill_backward(&mut self.values);
    fill_forward(&mut self.values);
  }

  /// Day-over-day simple returns; the first (undefined) observation is
  /// dropped. Fewer than 2 observations yield an empty vector.
  pub fn pct_change(&self) -> Vec<f64> {
    self
      .values
      .windows(2)
      .map(|w| w[1] / w[0] - 1.0)
      .collect()
  }

  /// Multiply elementwise by `factors`, which must be calendar-aligned.
  pub(crate) fn scale_by(&self, factors: &[f64]) -> Self {
    debug_assert_eq!(self.values.len(), factors.len());

    Self {
      ticker: self.ticker.clone(),
      dates: self.dates.clone(),
      values: self
        .values
        .iter()
        .zip(factors.iter())
        .map(|(v, f)| v * f)
        .collect(),
    }
  }
}

/// Multi-asset price grid: rows are dates, columns are assets.
///
/// After conditioning the grid is dense (no `NaN`) and every column spans
/// the full calendar.
#[derive(Clone, Debug, Default)]
pub struct PriceMatrix {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  values: Array2<f64>,
}

impl PriceMatrix {
  /// Assemble a matrix from calendar-aligned columns.
  pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<PriceSeries>) -> Self {
    let n_obs = dates.len();
    let n_assets = columns.len();
    let mut values = Array2::from_elem((n_obs, n_assets), f64::NAN);
    let mut tickers = Vec::with_capacity(n_assets);

    for (j, col) in columns.iter().enumerate() {
      debug_assert_eq!(col.len(), n_obs);
      tickers.push(col.ticker().to_string());
      for (i, v) in col.values().iter().enumerate() {
        values[(i, j)] = *v;
      }
    }

    Self {
      dates,
      tickers,
      values,
    }
  }

  /// The empty matrix, signaling "no data".
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty() || self.tickers.is_empty()
  }

  /// Number of assets (columns).
  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Number of dated observations (rows).
  pub fn n_obs(&self) -> usize {
    self.dates.len()
  }

  /// Row calendar, strictly increasing.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Column identifiers, in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Raw price grid.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  /// Column index of `ticker`, if present.
  pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
    self.tickers.iter().position(|t| t == ticker)
  }

  /// Column view for asset `j`.
  pub fn column(&self, j: usize) -> ArrayView1<'_, f64> {
    self.values.column(j)
  }

  /// Day-over-day simple returns per asset; one fewer row than prices.
  pub fn daily_returns(&self) -> Array2<f64> {
    let n_obs = self.n_obs();
    let n_assets = self.n_assets();
    if n_obs < 2 {
      return Array2::zeros((0, n_assets));
    }

    let mut returns = Array2::zeros((n_obs - 1, n_assets));
    for j in 0..n_assets {
      for i in 1..n_obs {
        returns[(i - 1, j)] = self.values[(i, j)] / self.values[(i - 1, j)] - 1.0;
      }
    }
    returns
  }

  /// Total price relative `last / first` per asset over the window.
  pub fn price_relatives(&self) -> Vec<f64> {
    if self.n_obs() == 0 {
      return vec![f64::NAN; self.n_assets()];
    }

    (0..self.n_assets())
      .map(|j| self.values[(self.n_obs() - 1, j)] / self.values[(0, j)])
      .collect()
  }
}

/// Conversion multipliers from one currency to another, date-indexed.
///
/// Values are strictly positive; an empty series signals "unavailable".
#[derive(Clone, Debug, Default)]
pub struct FxSeries {
  dates: Vec<NaiveDate>,
  rates: Vec<f64>,
}

impl FxSeries {
  /// Build from parallel date/rate vectors. Non-positive and missing
  /// rates are dropped, keeping the invariant that rates are strictly
  /// positive.
  pub fn new(dates: Vec<NaiveDate>, rates: Vec<f64>) -> Self {
    let mut kept: Vec<(NaiveDate, f64)> = dates
      .into_iter()
      .zip(rates)
      .filter(|(_, r)| r.is_finite() && *r > 0.0)
      .collect();
    kept.sort_by_key(|(d, _)| *d);

    let (dates, rates) = kept.into_iter().unzip();
    Self { dates, rates }
  }

  /// The unavailable series.
  pub fn unavailable() -> Self {
    Self::default()
  }

  /// A constant-1.0 series over `calendar`.
  pub fn identity(calendar: Vec<NaiveDate>) -> Self {
    let rates = vec![1.0; calendar.len()];
    Self {
      dates: calendar,
      rates,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  pub fn len(&self) -> usize {
    self.dates.len()
  }

  /// Rate dates, strictly increasing.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Conversion multipliers, parallel to [`FxSeries::dates`].
  pub fn rates(&self) -> &[f64] {
    &self.rates
  }

  /// Re-align rates onto `calendar` with forward then backward fill so
  /// leading and trailing edges are covered.
  pub fn aligned_to(&self, calendar: &[NaiveDate]) -> Vec<f64> {
    let mut rates: Vec<f64> = calendar
      .iter()
      .map(|d| match self.dates.binary_search(d) {
        Ok(i) => self.rates[i],
        Err(_) => f64::NAN,
      })
      .collect();

    fill_forward(&mut rates);
    fill_backward(&mut rates);
    rates
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
  }

  #[test]
  fn fill_covers_both_edges() {
    let mut xs = vec![f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN];
    fill_backward(&mut xs);
    fill_forward(&mut xs);
    assert_eq!(xs, vec![2.0, 2.0, 4.0, 4.0, 4.0]);
  }

  #[test]
  fn series_sorts_and_dedups() {
    let s = PriceSeries::new(
      "AAA",
      vec![d(5), d(4), d(5)],
      vec![10.0, 9.0, 11.0],
    );
    assert_eq!(s.dates(), &[d(4), d(5)]);
    assert_eq!(s.values(), &[9.0, 11.0]);
  }

  #[test]
  fn reindex_introduces_holes() {
    let s = PriceSeries::new("AAA", vec![d(4), d(6)], vec![1.0, 3.0]);
    let r = s.reindex(&[d(4), d(5), d(6)]);
    assert_eq!(r.values()[0], 1.0);
    assert!(r.values()[1].is_nan());
    assert_eq!(r.values()[2], 3.0);
  }

  #[test]
  fn pct_change_drops_first_observation() {
    let s = PriceSeries::new("AAA", vec![d(4), d(5), d(6)], vec![100.0, 110.0, 99.0]);
    let rets = s.pct_change();
    assert_eq!(rets.len(), 2);
    assert_abs_diff_eq!(rets[0], 0.10, epsilon = 1e-12);
    assert_abs_diff_eq!(rets[1], -0.10, epsilon = 1e-12);
  }

  #[test]
  fn short_series_has_no_returns() {
    let s = PriceSeries::new("AAA", vec![d(4)], vec![100.0]);
    assert!(s.pct_change().is_empty());
  }

  #[test]
  fn matrix_daily_returns_shape() {
    let a = PriceSeries::new("A", vec![d(4), d(5), d(6)], vec![1.0, 2.0, 4.0]);
    let b = PriceSeries::new("B", vec![d(4), d(5), d(6)], vec![10.0, 10.0, 10.0]);
    let m = PriceMatrix::from_columns(vec![d(4), d(5), d(6)], vec![a, b]);

    let rets = m.daily_returns();
    assert_eq!(rets.shape(), &[2, 2]);
    assert_abs_diff_eq!(rets[(0, 0)], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(rets[(1, 1)], 0.0, epsilon = 1e-12);
  }

  #[test]
  fn fx_drops_non_positive_rates() {
    let fx = FxSeries::new(vec![d(4), d(5), d(6)], vec![1.2, 0.0, f64::NAN]);
    assert_eq!(fx.len(), 1);
    assert_eq!(fx.rates(), &[1.2]);
  }

  #[test]
  fn fx_alignment_fills_edges() {
    let fx = FxSeries::new(vec![d(5)], vec![2.0]);
    let aligned = fx.aligned_to(&[d(4), d(5), d(6)]);
    assert_eq!(aligned, vec![2.0, 2.0, 2.0]);
  }
}
