//! # Data Collaborators
//!
//! Traits the quantitative core consumes for raw market data and index
//! reference metadata, an in-memory provider for offline use and tests,
//! and a session-scoped memoizing wrapper keyed by request parameters.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::Result;
use crate::market::series::PriceSeries;

/// Display metadata for one security, joined onto holdings by ticker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecurityInfo {
  /// Display name, blank when unknown.
  pub name: String,
  /// Sector classification, blank when unknown.
  pub sector: String,
}

/// Source of raw price histories and currency metadata.
///
/// "Ticker not found" is signaled by an empty series, never by an error;
/// errors are reserved for genuine provider failures.
pub trait MarketDataProvider {
  /// Raw price history for `ticker` over `[start, end]`. May be gappy;
  /// conditioning is the caller's job.
  fn fetch_price_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
    -> Result<PriceSeries>;

  /// Best-effort ISO currency code for `ticker`, `None` when unknown.
  fn fetch_currency_code(&self, ticker: &str) -> Result<Option<String>>;
}

/// Source of per-security display metadata for an index.
pub trait ReferenceMetadata {
  /// Map from ticker to display metadata. May be empty; holdings missing
  /// from the map still display, with blank fields.
  fn load_security_metadata(&self, index_name: &str) -> Result<BTreeMap<String, SecurityInfo>>;
}

/// In-memory provider backed by preloaded series and currency codes.
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
  series: HashMap<String, PriceSeries>,
  currencies: HashMap<String, String>,
}

impl StaticProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a full price history for its ticker.
  pub fn with_series(mut self, series: PriceSeries) -> Self {
    self.series.insert(series.ticker().to_string(), series);
    self
  }

  /// Register a currency code for a ticker.
  pub fn with_currency(mut self, ticker: impl Into<String>, ccy: impl Into<String>) -> Self {
    self.currencies.insert(ticker.into(), ccy.into());
    self
  }
}

impl MarketDataProvider for StaticProvider {
  fn fetch_price_history(
    &self,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<PriceSeries> {
    let Some(full) = self.series.get(ticker) else {
      return Ok(PriceSeries::empty(ticker));
    };

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (d, v) in full.dates().iter().zip(full.values().iter()) {
      if *d >= start && *d <= end {
        dates.push(*d);
        values.push(*v);
      }
    }

    Ok(PriceSeries::new(ticker, dates, values))
  }

  fn fetch_currency_code(&self, ticker: &str) -> Result<Option<String>> {
    Ok(self.currencies.get(ticker).cloned())
  }
}

type FetchKey = (String, NaiveDate, NaiveDate);

/// Memoizing wrapper avoiding redundant fetches for identical requests
/// within a session.
///
/// Population is idempotent and entries are read-only once stored, so a
/// stale entry is simply recomputed by a fresh wrapper, never invalidated
/// in place. Single-threaded by design.
pub struct CachedProvider<P> {
  inner: P,
  prices: RefCell<HashMap<FetchKey, PriceSeries>>,
  currencies: RefCell<HashMap<String, Option<String>>>,
}

impl<P> CachedProvider<P> {
  pub fn new(inner: P) -> Self {
    Self {
      inner,
      prices: RefCell::new(HashMap::new()),
      currencies: RefCell::new(HashMap::new()),
    }
  }

  /// Unwrap the underlying provider, discarding the cache.
  pub fn into_inner(self) -> P {
    self.inner
  }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
  fn fetch_price_history(
    &self,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<PriceSeries> {
    let key = (ticker.to_string(), start, end);
    if let Some(hit) = self.prices.borrow().get(&key) {
      return Ok(hit.clone());
    }

    let fetched = self.inner.fetch_price_history(ticker, start, end)?;
    self.prices.borrow_mut().insert(key, fetched.clone());
    Ok(fetched)
  }

  fn fetch_currency_code(&self, ticker: &str) -> Result<Option<String>> {
    if let Some(hit) = self.currencies.borrow().get(ticker) {
      return Ok(hit.clone());
    }

    let fetched = self.inner.fetch_currency_code(ticker)?;
    self
      .currencies
      .borrow_mut()
      .insert(ticker.to_string(), fetched.clone());
    Ok(fetched)
  }
}
