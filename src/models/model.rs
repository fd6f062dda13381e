//! Power-law evaluation.
//!
//! The estimator relies on two primitive operations:
//! - predict `P(q) = k * q^a` (for estimates, residuals, plots)
//! - sample the curve on an evenly spaced quantity grid (for plots/exports)

use crate::domain::FittedModel;

/// Evaluate `k * q^a`.
pub fn power_law(k: f64, a: f64, quantity: f64) -> f64 {
    k * quantity.powf(a)
}

/// Sample `n` points of the fitted curve on `[q_min, q_max]`, both ends included.
///
/// - `n == 0` yields an empty list
/// - `n == 1` yields the single point at `q_min`
/// - otherwise the last quantity is exactly `q_max`
pub fn sample_curve(model: &FittedModel, q_min: f64, q_max: f64, n: usize) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    if n == 1 {
        out.push((q_min, model.predict(q_min)));
        return out;
    }

    let last = n - 1;
    for i in 0..n {
        let q = if i == last {
            q_max
        } else {
            let u = i as f64 / last as f64;
            q_min + u * (q_max - q_min)
        };
        out.push((q, model.predict(q)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_law_smoke() {
        assert!((power_law(10.0, -0.5, 4.0) - 5.0).abs() < 1e-12);
        assert_eq!(power_law(3.0, 0.0, 123.0), 3.0);
    }

    #[test]
    fn sample_curve_hits_both_ends() {
        let model = FittedModel { k: 2.0, a: 1.0, r_squared: 1.0 };
        let pts = sample_curve(&model, 1.0, 3.0, 5);
        let qs: Vec<f64> = pts.iter().map(|&(q, _)| q).collect();
        assert_eq!(qs, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert!((pts[4].1 - 6.0).abs() < 1e-12);
    }

    #[test]
    fn sample_curve_small_counts() {
        let model = FittedModel { k: 1.0, a: 1.0, r_squared: 1.0 };
        assert!(sample_curve(&model, 1.0, 2.0, 0).is_empty());
        assert_eq!(sample_curve(&model, 1.0, 2.0, 1), vec![(1.0, 1.0)]);
    }
}
