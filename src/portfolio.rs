//! # Portfolio
//!
//! $$
//! \sigma_p^2 = \mathbf{w}^\top \Sigma \mathbf{w}
//! $$
//!
//! The quantitative core: moment estimation, max-Sharpe optimization,
//! benchmark measurement and performance comparison.

pub mod benchmark;
pub mod compare;
pub mod engine;
pub mod estimator;
pub mod optimizer;
pub mod types;

pub use benchmark::benchmark_performance;
pub use benchmark::currency_heuristic;
pub use compare::compare;
pub use compare::cumulative_returns;
pub use compare::portfolio_daily_returns;
pub use compare::weight_drift;
pub use compare::Comparison;
pub use compare::ComparisonChart;
pub use compare::WeightDrift;
pub use engine::AllocationEngine;
pub use engine::EngineConfig;
pub use estimator::mean_historical_returns;
pub use estimator::sample_covariance;
pub use estimator::series_metrics;
pub use estimator::TRADING_DAYS;
pub use optimizer::clean_weights;
pub use optimizer::max_sharpe;
pub use optimizer::WEIGHT_CUTOFF;
pub use types::BenchmarkResult;
pub use types::OptimizedPortfolio;
pub use types::PerformanceSummary;
pub use types::WeightVector;
