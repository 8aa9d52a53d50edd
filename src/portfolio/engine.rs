//! # Allocation Engine
//!
//! $$
//! (\text{tickers}, t_0, t_1) \mapsto (\mathbf{w}^\*, \mu_p, \sigma_p, \text{SR})
//! $$
//!
//! Request-driven orchestration of conditioning, estimation, optimization
//! and benchmark comparison. Requests are validated before any fetch, and
//! each call runs start to finish with no shared mutable state.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::MaxSharpeError;
use crate::error::Result;
use crate::market::conditioner::assemble_price_matrix;
use crate::market::provider::MarketDataProvider;
use crate::market::series::PriceMatrix;
use crate::portfolio::benchmark;
use crate::portfolio::compare as comparator;
use crate::portfolio::compare::Comparison;
use crate::portfolio::estimator::mean_historical_returns;
use crate::portfolio::estimator::sample_covariance;
use crate::portfolio::estimator::TRADING_DAYS;
use crate::portfolio::optimizer::max_sharpe;
use crate::portfolio::types::BenchmarkResult;
use crate::portfolio::types::OptimizedPortfolio;
use crate::portfolio::types::PerformanceSummary;
use crate::portfolio::types::WeightVector;

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
  /// Risk-free rate used in Sharpe computations.
  pub risk_free: f64,
  /// Annualization factor for daily statistics.
  pub periods_per_year: f64,
  /// Maximum request span in calendar days; 1826 covers exactly 5 years
  /// including a leap day.
  pub max_range_days: i64,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      risk_free: 0.0,
      periods_per_year: TRADING_DAYS,
      max_range_days: 1826,
    }
  }
}

/// Single entry point for optimization, benchmarking and comparison.
pub struct AllocationEngine<P> {
  provider: P,
  config: EngineConfig,
}

impl<P: MarketDataProvider> AllocationEngine<P> {
  /// Construct an engine with explicit configuration.
  pub fn new(provider: P, config: EngineConfig) -> Self {
    Self { provider, config }
  }

  /// Construct an engine with default configuration.
  pub fn with_defaults(provider: P) -> Self {
    Self::new(provider, EngineConfig::default())
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Reject malformed date ranges before any fetch.
  fn validate_range(&self, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
      return Err(MaxSharpeError::validation("start date is after end date"));
    }

    let span = (end - start).num_days();
    if span > self.config.max_range_days {
      return Err(MaxSharpeError::validation(format!(
        "requested range of {span} days exceeds the {} day maximum",
        self.config.max_range_days
      )));
    }

    Ok(())
  }

  /// Solve the max-Sharpe allocation for `tickers` over `[start, end]`.
  ///
  /// The returned value is immutable and self-contained; callers own its
  /// storage lifecycle and can re-render or compare without recomputing.
  pub fn optimize(
    &self,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<OptimizedPortfolio> {
    if tickers.is_empty() {
      return Err(MaxSharpeError::validation("ticker list is empty"));
    }
    self.validate_range(start, end)?;

    let mut unique: Vec<String> = Vec::with_capacity(tickers.len());
    for t in tickers {
      if !unique.contains(t) {
        unique.push(t.clone());
      }
    }

    let prices = assemble_price_matrix(&self.provider, &unique, start, end)?;
    if prices.n_assets() < 2 {
      return Err(MaxSharpeError::insufficient(format!(
        "only {} asset(s) have price data in range, need at least 2",
        prices.n_assets()
      )));
    }
    if prices.n_obs() < 2 {
      return Err(MaxSharpeError::insufficient(
        "fewer than 2 observations survived conditioning",
      ));
    }

    let mu = mean_historical_returns(&prices, self.config.periods_per_year);
    let cov = sample_covariance(&prices, self.config.periods_per_year);
    let (raw_weights, performance) = max_sharpe(&mu, &cov, self.config.risk_free)?;

    debug!(
      assets = prices.n_assets(),
      observations = prices.n_obs(),
      sharpe = performance.sharpe,
      "optimization complete"
    );

    let weights = WeightVector::new(
      prices
        .tickers()
        .iter()
        .cloned()
        .zip(raw_weights)
        .collect(),
    );

    Ok(OptimizedPortfolio {
      weights,
      performance,
      prices,
    })
  }

  /// Benchmark series and metrics in the reporting currency.
  pub fn benchmark_performance(
    &self,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    reporting_currency: Option<&str>,
  ) -> Result<(BenchmarkResult, PerformanceSummary)> {
    self.validate_range(start, end)?;
    benchmark::benchmark_performance(
      &self.provider,
      ticker,
      start,
      end,
      reporting_currency,
      self.config.periods_per_year,
      self.config.risk_free,
    )
  }

  /// Chart series and weight drift for display.
  pub fn compare(
    &self,
    weights: &WeightVector,
    prices: &PriceMatrix,
    benchmark: &BenchmarkResult,
  ) -> Comparison {
    comparator::compare(weights, prices, benchmark)
  }
}
