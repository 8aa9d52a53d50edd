//! # Benchmark Pipeline
//!
//! Fetches and conditions a benchmark series, detects its currency,
//! converts it into the reporting currency when a pair resolves, and
//! derives its annualized performance for side-by-side display.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::MaxSharpeError;
use crate::error::Result;
use crate::market::conditioner::condition_series;
use crate::market::fx::convert_series;
use crate::market::fx::resolve_fx;
use crate::market::provider::MarketDataProvider;
use crate::portfolio::estimator::series_metrics;
use crate::portfolio::types::BenchmarkResult;
use crate::portfolio::types::PerformanceSummary;

/// Fallback currency for a ticker with no provider metadata.
///
/// Narrow by design of the source data: FTSE index families are assumed
/// GBP, everything else USD. Known gap for non-US/UK instruments.
pub fn currency_heuristic(ticker: &str) -> &'static str {
  let upper = ticker.to_uppercase();
  if upper.starts_with("^FTSE") || upper.starts_with("^FTMC") {
    "GBP"
  } else {
    "USD"
  }
}

/// Retrieve, convert and measure a benchmark over `[start, end]`.
///
/// An unresolvable FX pair is not an error: the unconverted series is
/// passed through and `fx_pair_used` stays `None` so the caller can flag
/// the missing conversion.
pub fn benchmark_performance<P: MarketDataProvider>(
  provider: &P,
  ticker: &str,
  start: NaiveDate,
  end: NaiveDate,
  reporting_currency: Option<&str>,
  periods_per_year: f64,
  risk_free: f64,
) -> Result<(BenchmarkResult, PerformanceSummary)> {
  let raw = provider.fetch_price_history(ticker, start, end)?;
  let original = condition_series(raw);
  if original.is_empty() {
    return Err(MaxSharpeError::unavailable(format!(
      "no benchmark data for {ticker} in range"
    )));
  }

  let currency = match provider.fetch_currency_code(ticker)? {
    Some(ccy) => ccy.to_uppercase(),
    None => {
      let fallback = currency_heuristic(ticker);
      warn!(ticker = %ticker, fallback, "benchmark currency unknown, using heuristic");
      fallback.to_string()
    }
  };

  let needs_conversion = reporting_currency
    .map(|r| !r.eq_ignore_ascii_case(&currency))
    .unwrap_or(false);

  let (converted, fx_pair_used) = if needs_conversion {
    let reporting = reporting_currency.unwrap_or(&currency);
    let fx = resolve_fx(provider, &currency, reporting, start, end)?;
    if fx.series.is_empty() {
      warn!(from = %currency, to = %reporting, "FX conversion unavailable, reporting unconverted benchmark");
      (original.clone(), None)
    } else {
      (convert_series(&original, &fx.series), fx.pair_used)
    }
  } else {
    (original.clone(), None)
  };

  let performance = series_metrics(&converted, periods_per_year, risk_free);

  Ok((
    BenchmarkResult {
      original,
      converted,
      currency,
      fx_pair_used,
    },
    performance,
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::market::provider::StaticProvider;
  use crate::market::series::PriceSeries;
  use approx::assert_abs_diff_eq;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
  }

  fn gbp_benchmark() -> PriceSeries {
    PriceSeries::new(
      "^FTSE",
      vec![d(4), d(5), d(6)],
      vec![8000.0, 8080.0, 8160.0],
    )
  }

  #[test]
  fn missing_benchmark_is_data_unavailable() {
    let provider = StaticProvider::new();
    let err = benchmark_performance(&provider, "SPY", d(4), d(8), Some("USD"), 252.0, 0.0)
      .unwrap_err();
    assert!(matches!(err, MaxSharpeError::DataUnavailable(_)));
  }

  #[test]
  fn same_currency_passes_through() {
    let provider = StaticProvider::new()
      .with_series(gbp_benchmark())
      .with_currency("^FTSE", "GBP");

    let (result, _) =
      benchmark_performance(&provider, "^FTSE", d(4), d(6), Some("gbp"), 252.0, 0.0).unwrap();

    assert_eq!(result.currency, "GBP");
    assert!(result.fx_pair_used.is_none());
    assert_eq!(result.original.values(), result.converted.values());
  }

  #[test]
  fn heuristic_kicks_in_without_metadata() {
    let provider = StaticProvider::new().with_series(gbp_benchmark());
    let (result, _) =
      benchmark_performance(&provider, "^FTSE", d(4), d(6), None, 252.0, 0.0).unwrap();
    assert_eq!(result.currency, "GBP");
  }

  #[test]
  fn inverted_pair_converts_and_is_recorded() {
    // Direct GBPUSD unavailable; USDGBP resolves and is inverted.
    let provider = StaticProvider::new()
      .with_series(gbp_benchmark())
      .with_currency("^FTSE", "GBP")
      .with_series(PriceSeries::new(
        "USDGBP=X",
        vec![d(4), d(5), d(6)],
        vec![0.8, 0.8, 0.8],
      ));

    let (result, _) =
      benchmark_performance(&provider, "^FTSE", d(4), d(6), Some("USD"), 252.0, 0.0).unwrap();

    assert_eq!(result.fx_pair_used.as_deref(), Some("USDGBP=X_inverted"));
    // Converted equals original divided by the USDGBP rate.
    for (orig, conv) in result
      .original
      .values()
      .iter()
      .zip(result.converted.values().iter())
    {
      assert_abs_diff_eq!(conv, &(orig / 0.8), epsilon = 1e-9);
    }
  }

  #[test]
  fn unavailable_fx_falls_back_to_unconverted() {
    let provider = StaticProvider::new()
      .with_series(gbp_benchmark())
      .with_currency("^FTSE", "GBP");

    let (result, _) =
      benchmark_performance(&provider, "^FTSE", d(4), d(6), Some("JPY"), 252.0, 0.0).unwrap();

    assert!(result.fx_pair_used.is_none());
    assert_eq!(result.original.values(), result.converted.values());
  }
}
