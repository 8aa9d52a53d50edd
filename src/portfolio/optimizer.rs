//! # Max-Sharpe Optimizer
//!
//! $$
//! \mathbf{w} \propto \Sigma^{-1}(\mu - r_f), \quad w_i \ge 0, \quad \sum_i w_i = 1
//! $$
//!
//! Long-only, fully-invested tangency portfolio. The unconstrained
//! tangency solve is projected onto the simplex by iteratively
//! eliminating assets that receive non-positive weight and re-solving on
//! the survivors, which is exact for this convex program. A singular
//! covariance is repaired by diagonal loading before the solve; if that
//! fails the optimization is reported as degenerate rather than
//! returning `NaN` weights.

use ndarray::Array1;
use ndarray::Array2;
use tracing::debug;

use crate::error::MaxSharpeError;
use crate::error::Result;
use crate::portfolio::types::PerformanceSummary;

/// Relative cutoff below which cleaned weights are zeroed.
pub const WEIGHT_CUTOFF: f64 = 1e-4;

/// Diagonal loading levels tried against a singular covariance, relative
/// to the mean diagonal entry.
const RIDGE_LEVELS: [f64; 3] = [1e-10, 1e-8, 1e-6];

/// Gauss-Jordan inversion with partial pivoting. `None` when a pivot
/// degenerates.
fn invert(mat: &Array2<f64>) -> Option<Array2<f64>> {
  let n = mat.nrows();
  debug_assert_eq!(n, mat.ncols());
  if n == 0 {
    return Some(Array2::zeros((0, 0)));
  }

  let mut aug = Array2::zeros((n, 2 * n));
  for i in 0..n {
    for j in 0..n {
      aug[(i, j)] = mat[(i, j)];
    }
    aug[(i, n + i)] = 1.0;
  }

  for col in 0..n {
    let mut max_row = col;
    let mut max_val = aug[(col, col)].abs();
    for row in (col + 1)..n {
      if aug[(row, col)].abs() > max_val {
        max_val = aug[(row, col)].abs();
        max_row = row;
      }
    }

    if max_val < 1e-15 {
      return None;
    }

    if max_row != col {
      for j in 0..(2 * n) {
        let tmp = aug[(col, j)];
        aug[(col, j)] = aug[(max_row, j)];
        aug[(max_row, j)] = tmp;
      }
    }

    let pivot = aug[(col, col)];
    for j in 0..(2 * n) {
      aug[(col, j)] /= pivot;
    }

    for row in 0..n {
      if row == col {
        continue;
      }
      let factor = aug[(row, col)];
      for j in 0..(2 * n) {
        aug[(row, j)] -= factor * aug[(col, j)];
      }
    }
  }

  let mut inv = Array2::zeros((n, n));
  for i in 0..n {
    for j in 0..n {
      inv[(i, j)] = aug[(i, n + j)];
    }
  }
  Some(inv)
}

/// Return an invertible covariance, loading the diagonal when needed.
fn invertible_covariance(cov: &Array2<f64>) -> Result<Array2<f64>> {
  if invert(cov).is_some() {
    return Ok(cov.clone());
  }

  let n = cov.nrows();
  let scale = (cov.diag().sum() / n as f64).max(f64::MIN_POSITIVE);

  for level in RIDGE_LEVELS {
    let ridge = level * scale.max(1e-8);
    let mut loaded = cov.clone();
    for i in 0..n {
      loaded[(i, i)] += ridge;
    }
    if invert(&loaded).is_some() {
      debug!(ridge, "covariance singular, applied diagonal loading");
      return Ok(loaded);
    }
  }

  Err(MaxSharpeError::degenerate(
    "covariance matrix is singular beyond repair by diagonal loading",
  ))
}

/// Solve the sub-problem restricted to `active`, returning raw tangency
/// weights for those indices.
fn tangency_on(active: &[usize], cov: &Array2<f64>, excess: &Array1<f64>) -> Result<Vec<f64>> {
  let k = active.len();
  let mut sub_cov = Array2::zeros((k, k));
  let mut sub_excess = Array1::zeros(k);

  for (a, &i) in active.iter().enumerate() {
    sub_excess[a] = excess[i];
    for (b, &j) in active.iter().enumerate() {
      sub_cov[(a, b)] = cov[(i, j)];
    }
  }

  let inv = invert(&sub_cov).ok_or_else(|| {
    MaxSharpeError::degenerate("covariance sub-matrix became singular during projection")
  })?;

  Ok(inv.dot(&sub_excess).to_vec())
}

/// Zero out weights below [`WEIGHT_CUTOFF`] and renormalize the rest.
pub fn clean_weights(weights: &mut [f64]) {
  for w in weights.iter_mut() {
    if *w < WEIGHT_CUTOFF {
      *w = 0.0;
    }
  }

  let total: f64 = weights.iter().sum();
  if total > 0.0 {
    for w in weights.iter_mut() {
      *w /= total;
    }
  }
}

/// Maximize the Sharpe ratio over the long-only, fully-invested simplex.
///
/// Returns cleaned weights in `mu` order together with the expected
/// performance under the same moments that solved the program. The solve
/// is deterministic.
pub fn max_sharpe(
  mu: &Array1<f64>,
  cov: &Array2<f64>,
  risk_free: f64,
) -> Result<(Vec<f64>, PerformanceSummary)> {
  let n = mu.len();
  if n < 2 {
    return Err(MaxSharpeError::insufficient(
      "max-Sharpe optimization requires at least 2 assets",
    ));
  }

  let excess = mu.mapv(|m| m - risk_free);
  if !excess.iter().any(|&e| e > 0.0) {
    return Err(MaxSharpeError::degenerate(
      "no asset has an expected return above the risk-free rate",
    ));
  }

  let solved_cov = invertible_covariance(cov)?;

  let mut active: Vec<usize> = (0..n).collect();
  let mut weights = loop {
    let raw = tangency_on(&active, &solved_cov, &excess)?;

    let keep: Vec<usize> = active
      .iter()
      .zip(raw.iter())
      .filter(|(_, &w)| w > 0.0)
      .map(|(&i, _)| i)
      .collect();

    if keep.is_empty() {
      return Err(MaxSharpeError::degenerate(
        "simplex projection eliminated every asset",
      ));
    }

    if keep.len() == active.len() {
      let total: f64 = raw.iter().sum();
      let mut full = vec![0.0; n];
      for (&i, &w) in active.iter().zip(raw.iter()) {
        full[i] = w / total;
      }
      break full;
    }

    active = keep;
  };

  clean_weights(&mut weights);

  let w = Array1::from_vec(weights.clone());
  let expected_return = mu.dot(&w);
  let variance = w.dot(&cov.dot(&w)).max(0.0);
  let performance = PerformanceSummary::new(expected_return, variance.sqrt(), risk_free);

  Ok((weights, performance))
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;
  use ndarray::array;

  #[test]
  fn weights_lie_on_the_simplex() {
    let mu = array![0.08, 0.10, 0.12];
    let cov = array![
      [0.04, 0.01, 0.00],
      [0.01, 0.09, 0.02],
      [0.00, 0.02, 0.16]
    ];

    let (w, perf) = max_sharpe(&mu, &cov, 0.0).unwrap();
    let total: f64 = w.iter().sum();

    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-6);
    assert!(w.iter().all(|&x| (0.0..=1.0).contains(&x)));
    assert!(perf.volatility > 0.0);
    assert!(perf.sharpe > 0.0);
  }

  #[test]
  fn solve_is_deterministic() {
    let mu = array![0.08, 0.10, 0.12];
    let cov = array![
      [0.04, 0.01, 0.00],
      [0.01, 0.09, 0.02],
      [0.00, 0.02, 0.16]
    ];

    let (w1, _) = max_sharpe(&mu, &cov, 0.0).unwrap();
    let (w2, _) = max_sharpe(&mu, &cov, 0.0).unwrap();
    assert_eq!(w1, w2);
  }

  #[test]
  fn identical_assets_do_not_fail() {
    let mu = array![0.10, 0.10];
    let cov = array![[0.04, 0.04], [0.04, 0.04]];

    let (w, _) = max_sharpe(&mu, &cov, 0.0).unwrap();
    let total: f64 = w.iter().sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-6);
  }

  #[test]
  fn zero_variance_winner_takes_all() {
    // Second asset is flat: zero return, zero variance.
    let mu = array![0.25, 0.0];
    let cov = array![[0.02, 0.0], [0.0, 0.0]];

    let (w, perf) = max_sharpe(&mu, &cov, 0.0).unwrap();
    assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(w[1], 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(perf.expected_return, 0.25, epsilon = 1e-9);
  }

  #[test]
  fn all_returns_below_risk_free_is_degenerate() {
    let mu = array![0.01, 0.02];
    let cov = array![[0.04, 0.0], [0.0, 0.09]];

    let err = max_sharpe(&mu, &cov, 0.05).unwrap_err();
    assert!(matches!(err, MaxSharpeError::DegenerateOptimization(_)));
  }

  #[test]
  fn single_asset_is_insufficient() {
    let mu = array![0.10];
    let cov = array![[0.04]];

    let err = max_sharpe(&mu, &cov, 0.0).unwrap_err();
    assert!(matches!(err, MaxSharpeError::InsufficientData(_)));
  }

  #[test]
  fn negative_tangency_weight_is_projected_out() {
    // Highly correlated pair where the weaker asset would be shorted in
    // the unconstrained solve.
    let mu = array![0.15, 0.05];
    let cov = array![[0.04, 0.038], [0.038, 0.04]];

    let (w, _) = max_sharpe(&mu, &cov, 0.0).unwrap();
    assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(w[1], 0.0, epsilon = 1e-9);
  }
}
