//! Closed-form simple linear regression.
//!
//! The estimator only ever regresses one response on one regressor:
//!
//! ```text
//! minimize Σ (y_i - (a x_i + b))^2
//! ```
//!
//! so we use the textbook sums-of-squares solution instead of a matrix solver.
//!
//! Implementation choices:
//! - Two passes (means, then centered sums) accumulated left to right, so the
//!   result is reproducible for identical input order.
//! - Centered sums avoid the cancellation of the `n Σx² - (Σx)²` form when the
//!   regressor sits far from zero.

/// Result of regressing `y` on `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between `x` and `y`, clamped to `[-1, 1]`.
    pub r: f64,
    /// `r^2`, in `[0, 1]`.
    pub r_squared: f64,
}

/// Regress `y` on `x` by ordinary least squares.
///
/// Returns `None` when fewer than two pairs are given, when the slices differ
/// in length, or when `x` has no variance (the slope is undefined).
///
/// If `y` is constant the slope is `0` and the correlation is undefined; it is
/// reported as `r = 0`.
pub fn simple_linear_regression(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    let nf = n as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut max_abs_x: f64 = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sum_x += xi;
        sum_y += yi;
        max_abs_x = max_abs_x.max(xi.abs());
    }
    let mean_x = sum_x / nf;
    let mean_y = sum_y / nf;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if !sxx.is_finite() || !syy.is_finite() || !sxy.is_finite() {
        return None;
    }

    // Identical regressors can still leave a few ulps of spread after
    // centering; treat anything at rounding level as zero variance.
    let all_equal = x.iter().all(|&xi| xi == x[0]);
    let rounding_floor = nf * (16.0 * f64::EPSILON * max_abs_x).powi(2);
    if all_equal || sxx <= rounding_floor {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
    };

    Some(LinearFit {
        slope,
        intercept,
        r,
        r_squared: r * r,
    })
}
