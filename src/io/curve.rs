//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - power-law parameters and R²
//! - run metadata (tool, timestamp, observation count)
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::domain::{CurveFile, CurveGrid};
use crate::error::AppError;
use crate::estimator::PowerLawEstimator;

/// Build the curve document for the estimator's current fit.
pub fn build_curve_file(estimator: &PowerLawEstimator, grid_points: usize) -> Result<CurveFile, AppError> {
    let model = estimator.fit()?;
    let samples = estimator.curve_samples(grid_points.max(2))?;
    Ok(CurveFile {
        tool: "pricer".to_string(),
        generated_at: Utc::now(),
        n_observations: estimator.len(),
        model,
        price_space_r_squared: estimator.price_space_r_squared()?,
        grid: CurveGrid::from_samples(&samples),
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    info!(path = %path.display(), points = curve.grid.quantity.len(), "wrote curve JSON");
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    if curve.grid.quantity.len() != curve.grid.price.len() {
        return Err(AppError::new(2, "Invalid curve JSON: grid columns differ in length."));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_file_survives_a_disk_trip() {
        let mut est = PowerLawEstimator::new();
        est.add(1.0, 10.0).unwrap();
        est.add(2.0, 8.0).unwrap();
        est.add(4.0, 6.4).unwrap();

        let curve = build_curve_file(&est, 11).unwrap();
        assert_eq!(curve.grid.quantity.len(), 11);
        assert_eq!(curve.grid.quantity[0], 1.0);
        assert_eq!(curve.grid.quantity[10], 4.0);
        assert_eq!(curve.n_observations, 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");
        write_curve_json(&path, &curve).unwrap();
        let back = read_curve_json(&path).unwrap();
        assert_eq!(back.model, curve.model);
        assert_eq!(back.grid, curve.grid);
    }

    #[test]
    fn building_a_curve_needs_a_fit() {
        let mut est = PowerLawEstimator::new();
        est.add(1.0, 10.0).unwrap();
        let err = build_curve_file(&est, 10).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"tool":"pricer","generated_at":"2026-01-01T00:00:00Z","n_observations":2,
               "model":{"k":1.0,"a":-0.5,"r_squared":1.0},
               "grid":{"quantity":[1.0,2.0],"price":[1.0]}}"#,
        )
        .unwrap();
        assert!(read_curve_json(&path).is_err());
    }
}
