//! Synthetic degressive-price samples.
//!
//! Prices follow `k * q^a` with multiplicative log-normal noise:
//!
//! `p = k * q^a * exp(σ z)`, `z ~ N(0, 1)`
//!
//! Quantities are drawn log-uniformly so small and large orders are equally
//! represented, which is how volume price lists tend to look.

use std::io::Write;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Field, Observation, validate_positive};
use crate::error::AppError;

/// Parameters for a synthetic sample.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub k: f64,
    pub a: f64,
    pub count: usize,
    pub quantity_min: f64,
    pub quantity_max: f64,
    /// Standard deviation of the log-price noise (0 = exact power law).
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            k: 10.0,
            a: -0.3,
            count: 20,
            quantity_min: 1.0,
            quantity_max: 1000.0,
            noise: 0.05,
            seed: 42,
        }
    }
}

/// Generate a deterministic (seeded) sample.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Observation>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    validate_positive(Field::Price, config.k)
        .map_err(|_| AppError::new(2, "Sample scale `k` must be a finite positive number."))?;
    if !config.a.is_finite() {
        return Err(AppError::new(2, "Sample exponent `a` must be finite."));
    }
    if !(config.quantity_min.is_finite()
        && config.quantity_max.is_finite()
        && config.quantity_min > 0.0
        && config.quantity_max >= config.quantity_min)
    {
        return Err(AppError::new(2, "Invalid quantity range for sample generation."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Sample noise must be a finite non-negative number."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let ln_min = config.quantity_min.ln();
    let ln_max = config.quantity_max.ln();

    let mut points = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let quantity = if ln_max > ln_min {
            let ln_q: f64 = rng.gen_range(ln_min..=ln_max);
            ln_q.exp()
        } else {
            config.quantity_min
        };
        let z: f64 = normal.sample(&mut rng);
        let price = config.k * quantity.powf(config.a) * (config.noise * z).exp();

        let observation = Observation::new(quantity, price)
            .map_err(|e| AppError::new(4, format!("Generated an unusable observation: {e}")))?;
        points.push(observation);
    }

    Ok(points)
}

/// Write observations as a `quantity,price` CSV.
///
/// Values are written at full precision; rounding could turn a tiny price
/// into `0`, which ingest rejects.
pub fn write_sample_csv<W: Write>(out: W, points: &[Observation]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["quantity", "price"])
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for p in points {
        writer
            .write_record([p.quantity().to_string(), p.price().to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::PowerLawEstimator;
    use crate::io::read_observations;

    #[test]
    fn same_seed_same_sample() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), config.count);
        for o in &a {
            assert!(o.quantity() >= 1.0 && o.quantity() <= 1000.0 + 1e-9);
        }
    }

    #[test]
    fn noiseless_sample_fits_exactly() {
        let config = SampleConfig {
            k: 25.0,
            a: -0.4,
            noise: 0.0,
            ..SampleConfig::default()
        };
        let est: PowerLawEstimator = generate_sample(&config).unwrap().into_iter().collect();
        let model = est.fit().unwrap();
        assert!((model.a + 0.4).abs() < 1e-9);
        assert!((model.k - 25.0).abs() < 1e-7);
    }

    #[test]
    fn noisy_sample_is_close_to_truth() {
        let config = SampleConfig {
            count: 500,
            noise: 0.05,
            ..SampleConfig::default()
        };
        let est: PowerLawEstimator = generate_sample(&config).unwrap().into_iter().collect();
        let model = est.fit().unwrap();
        assert!((model.a - config.a).abs() < 0.02, "a = {}", model.a);
        assert!(model.r_squared > 0.9);
    }

    #[test]
    fn rejects_bad_parameters() {
        let zero = SampleConfig { count: 0, ..SampleConfig::default() };
        assert!(generate_sample(&zero).is_err());
        let range = SampleConfig { quantity_min: 0.0, ..SampleConfig::default() };
        assert!(generate_sample(&range).is_err());
        let noise = SampleConfig { noise: -1.0, ..SampleConfig::default() };
        assert!(generate_sample(&noise).is_err());
    }

    #[test]
    fn written_csv_reads_back() {
        let points = generate_sample(&SampleConfig::default()).unwrap();
        let mut buf = Vec::new();
        write_sample_csv(&mut buf, &points).unwrap();
        let data = read_observations(buf.as_slice()).unwrap();
        assert_eq!(data.rows_used, points.len());
        assert!(data.row_errors.is_empty());
        assert_eq!(data.observations, points);
    }

    #[test]
    fn tiny_prices_survive_the_csv() {
        let config = SampleConfig {
            k: 1e-3,
            a: -1.0,
            noise: 0.0,
            ..SampleConfig::default()
        };
        let points = generate_sample(&config).unwrap();
        assert!(points.iter().any(|o| o.price() < 5e-5));
        let mut buf = Vec::new();
        write_sample_csv(&mut buf, &points).unwrap();
        let data = read_observations(buf.as_slice()).unwrap();
        assert!(data.row_errors.is_empty());
        assert_eq!(data.rows_used, points.len());
    }
}
