//! # Errors
//!
//! Crate-wide error taxonomy. Validation failures are detected before any
//! data fetch or numeric work; data and optimization failures are kept
//! distinct so callers can prompt for different inputs versus giving up.

use thiserror::Error;

/// Errors surfaced by the allocation engine and its collaborators.
#[derive(Debug, Error)]
pub enum MaxSharpeError {
  /// Invalid request shape, rejected before any fetch or computation.
  #[error("invalid request: {0}")]
  Validation(String),

  /// Not enough assets or observations survived conditioning.
  #[error("insufficient data: {0}")]
  InsufficientData(String),

  /// Covariance matrix singular or ill-conditioned beyond repair.
  #[error("degenerate optimization: {0}")]
  DegenerateOptimization(String),

  /// A data collaborator failed; propagated as-is.
  #[error("data unavailable: {0}")]
  DataUnavailable(String),

  /// Reference metadata could not be read.
  #[error("metadata error: {0}")]
  Metadata(#[from] csv::Error),
}

impl MaxSharpeError {
  /// Shorthand constructor for [`MaxSharpeError::Validation`].
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  /// Shorthand constructor for [`MaxSharpeError::InsufficientData`].
  pub fn insufficient(msg: impl Into<String>) -> Self {
    Self::InsufficientData(msg.into())
  }

  /// Shorthand constructor for [`MaxSharpeError::DegenerateOptimization`].
  pub fn degenerate(msg: impl Into<String>) -> Self {
    Self::DegenerateOptimization(msg.into())
  }

  /// Shorthand constructor for [`MaxSharpeError::DataUnavailable`].
  pub fn unavailable(msg: impl Into<String>) -> Self {
    Self::DataUnavailable(msg.into())
  }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MaxSharpeError>;
