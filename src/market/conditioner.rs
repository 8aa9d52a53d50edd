//! # Series Conditioner
//!
//! $$
//! P \in \mathbb{R}^{T \times N}, \quad P_{tj} > 0 \ \forall t, j
//! $$
//!
//! Normalizes raw per-asset histories onto a common business-day calendar
//! and assembles the dense price matrix the estimator and optimizer
//! consume. Assets with no data in range are dropped, not fatal.

use chrono::NaiveDate;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::market::calendar::business_days;
use crate::market::provider::MarketDataProvider;
use crate::market::series::PriceMatrix;
use crate::market::series::PriceSeries;

/// Condition one raw history: drop missing rows, reindex onto a
/// business-day calendar spanning the series' own extent, then backward
/// fill followed by forward fill.
pub fn condition_series(raw: PriceSeries) -> PriceSeries {
  let cleaned = raw.drop_missing();
  if cleaned.is_empty() {
    return cleaned;
  }

  let first = cleaned.dates()[0];
  let last = cleaned.dates()[cleaned.len() - 1];
  let mut conditioned = cleaned.reindex(&business_days(first, last));
  conditioned.fill_gaps();
  conditioned
}

/// Fetch and condition every asset, then align all columns onto the
/// business-day calendar of the full requested range.
///
/// Returns the empty matrix when the ticker list is empty or no asset had
/// data in range; provider failures propagate.
pub fn assemble_price_matrix<P: MarketDataProvider>(
  provider: &P,
  tickers: &[String],
  start: NaiveDate,
  end: NaiveDate,
) -> Result<PriceMatrix> {
  if tickers.is_empty() {
    return Ok(PriceMatrix::empty());
  }

  let mut conditioned = Vec::with_capacity(tickers.len());
  for ticker in tickers {
    let raw = provider.fetch_price_history(ticker, start, end)?;
    let series = condition_series(raw);
    if series.is_empty() {
      warn!(ticker = %ticker, "no price data in range, dropping asset");
      continue;
    }
    conditioned.push(series);
  }

  if conditioned.is_empty() {
    debug!("no assets survived conditioning");
    return Ok(PriceMatrix::empty());
  }

  let calendar = business_days(start, end);
  let columns: Vec<PriceSeries> = conditioned
    .into_iter()
    .map(|series| {
      let mut aligned = series.reindex(&calendar);
      aligned.fill_gaps();
      aligned
    })
    .collect();

  Ok(PriceMatrix::from_columns(calendar, columns))
}
