//! # maxsharpe
//!
//! $$
//! \mathbf{w}^\* = \arg\max_{\mathbf{w} \in \Delta^{N-1}} \frac{\mu^\top \mathbf{w} - r_f}{\sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}}
//! $$
//!
//! Max-Sharpe portfolio allocation from historical prices, with
//! FX-aware benchmark comparison. Price histories come from a pluggable
//! [`market::MarketDataProvider`]; the [`portfolio::AllocationEngine`]
//! conditions them onto a business-day calendar, estimates annualized
//! moments, solves the long-only tangency program and measures the
//! result against a currency-converted benchmark.

pub mod error;
pub mod market;
pub mod portfolio;

pub use error::MaxSharpeError;
pub use error::Result;
