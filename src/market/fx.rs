//! # Currency Converter
//!
//! $$
//! P^{(to)}_t = P^{(from)}_t \cdot X_t, \qquad X_t = \text{FROMTO}_t \ \text{or} \ \frac{1}{\text{TOFROM}_t}
//! $$
//!
//! Resolves an FX rate series between two currencies, trying the direct
//! pair first and falling back to the inverted reverse pair, and applies
//! it to a price series.

use chrono::NaiveDate;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::market::calendar::business_days;
use crate::market::provider::MarketDataProvider;
use crate::market::series::FxSeries;
use crate::market::series::PriceSeries;

/// Outcome of FX pair resolution.
///
/// An empty series with `pair_used == None` means "conversion
/// unavailable"; callers fall back to unconverted values and flag it.
#[derive(Clone, Debug, Default)]
pub struct ResolvedFx {
  /// Conversion multipliers, empty when no pair resolved.
  pub series: FxSeries,
  /// Provider symbol of the pair actually used, `None` for identity or
  /// unavailable conversions.
  pub pair_used: Option<String>,
}

/// Provider symbol for a currency pair, e.g. `GBPUSD=X`.
fn pair_symbol(from_ccy: &str, to_ccy: &str) -> String {
  format!("{from_ccy}{to_ccy}=X")
}

/// Resolve a conversion from `from_ccy` into `to_ccy` over `[start, end]`.
///
/// Same currency (case-insensitive) yields a constant 1.0 series. Zero or
/// missing rates in a reverse pair are discarded rather than inverted.
pub fn resolve_fx<P: MarketDataProvider>(
  provider: &P,
  from_ccy: &str,
  to_ccy: &str,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<ResolvedFx> {
  let from_ccy = from_ccy.to_uppercase();
  let to_ccy = to_ccy.to_uppercase();

  if from_ccy == to_ccy {
    return Ok(ResolvedFx {
      series: FxSeries::identity(business_days(start, end)),
      pair_used: None,
    });
  }

  let direct_symbol = pair_symbol(&from_ccy, &to_ccy);
  let direct = provider
    .fetch_price_history(&direct_symbol, start, end)?
    .drop_missing();
  if !direct.is_empty() {
    debug!(pair = %direct_symbol, "resolved direct FX pair");
    return Ok(ResolvedFx {
      series: FxSeries::new(direct.dates().to_vec(), direct.values().to_vec()),
      pair_used: Some(direct_symbol),
    });
  }

  let reverse_symbol = pair_symbol(&to_ccy, &from_ccy);
  let reverse = provider
    .fetch_price_history(&reverse_symbol, start, end)?
    .drop_missing();
  if !reverse.is_empty() {
    debug!(pair = %reverse_symbol, "direct FX pair unavailable, inverting reverse pair");
    let inverted: Vec<f64> = reverse
      .values()
      .iter()
      .map(|&r| if r == 0.0 { f64::NAN } else { 1.0 / r })
      .collect();
    return Ok(ResolvedFx {
      series: FxSeries::new(reverse.dates().to_vec(), inverted),
      pair_used: Some(format!("{reverse_symbol}_inverted")),
    });
  }

  warn!(from = %from_ccy, to = %to_ccy, "no FX pair available in either direction");
  Ok(ResolvedFx {
    series: FxSeries::unavailable(),
    pair_used: None,
  })
}

/// Convert a price series with an FX series: the rates are reindexed onto
/// the price calendar, forward then backward filled, and applied
/// elementwise.
pub fn convert_series(prices: &PriceSeries, fx: &FxSeries) -> PriceSeries {
  let rates = fx.aligned_to(prices.dates());
  prices.scale_by(&rates)
}
