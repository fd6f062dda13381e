//! Shared "fit pipeline" logic used by the `fit` and `estimate` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> estimator -> fit -> curve samples -> residuals -> estimate
//!
//! The front-ends can then focus on presentation.

use crate::domain::{Field, FittedModel, ObservationResidual, RunConfig, parse_positive};
use crate::error::AppError;
use crate::estimator::PowerLawEstimator;
use crate::fit::compute_residuals;
use crate::io::ingest::{IngestedData, load_observations};

/// All computed outputs of a single `pricer fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub estimator: PowerLawEstimator,
    pub model: FittedModel,
    pub price_r2: Option<f64>,
    pub curve: Vec<(f64, f64)>,
    pub residuals: Vec<ObservationResidual>,
    /// `(quantity, estimated price)` when an estimate was requested.
    pub estimate: Option<(f64, f64)>,
}

/// Execute the full fitting pipeline from the configured CSV.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_observations(&config.csv_path)?;
    run_fit_with_data(config, ingest)
}

/// Execute the fitting pipeline on already-ingested data.
pub fn run_fit_with_data(config: &RunConfig, ingest: IngestedData) -> Result<RunOutput, AppError> {
    let estimator: PowerLawEstimator = ingest.observations.iter().copied().collect();

    let model = estimator.fit()?;
    let curve = estimator.curve_samples(config.curve_points)?;
    let residuals = compute_residuals(&model, estimator.observations());
    let price_r2 = if config.price_space_r2 {
        estimator.price_space_r_squared()?
    } else {
        None
    };
    let estimate = match config.estimate_quantity {
        Some(q) => Some((q, estimator.estimate(q)?)),
        None => None,
    };

    Ok(RunOutput {
        ingest,
        estimator,
        model,
        price_r2,
        curve,
        residuals,
        estimate,
    })
}

/// Parse a user-supplied quantity to estimate.
pub fn parse_quantity(raw: &str) -> Result<f64, AppError> {
    Ok(parse_positive(Field::Quantity, raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_observations;
    use std::path::PathBuf;

    fn config(estimate: Option<f64>) -> RunConfig {
        RunConfig {
            csv_path: PathBuf::from("unused.csv"),
            estimate_quantity: estimate,
            curve_points: 25,
            plot: false,
            plot_width: 40,
            plot_height: 10,
            price_space_r2: true,
            export_results: None,
            export_curve: None,
        }
    }

    #[test]
    fn pipeline_fits_and_estimates() {
        let ingest = read_observations("quantity,price\n1,10\n2,8\n4,6.4\n".as_bytes()).unwrap();
        let run = run_fit_with_data(&config(Some(8.0)), ingest).unwrap();

        assert_eq!(run.curve.len(), 25);
        assert_eq!(run.residuals.len(), 3);
        assert!((run.model.k - 10.0).abs() < 1e-9);
        let (q, p) = run.estimate.unwrap();
        assert_eq!(q, 8.0);
        assert!(p > 4.0 && p < 6.4);
        assert!(run.price_r2.unwrap() > 0.999);
    }

    #[test]
    fn single_row_is_insufficient() {
        let ingest = read_observations("quantity,price\n1,10\n".as_bytes()).unwrap();
        let err = run_fit_with_data(&config(None), ingest).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("at least two data points"));
    }

    #[test]
    fn same_quantity_rows_are_degenerate() {
        let ingest = read_observations("quantity,price\n5,10\n5,9\n5,11\n".as_bytes()).unwrap();
        let err = run_fit_with_data(&config(None), ingest).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn quantity_parsing_rejects_junk() {
        assert_eq!(parse_quantity("12.5").unwrap(), 12.5);
        assert_eq!(parse_quantity("abc").unwrap_err().exit_code(), 2);
        assert_eq!(parse_quantity("-3").unwrap_err().exit_code(), 2);
    }
}
