//! Export per-observation results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use tracing::info;

use crate::domain::ObservationResidual;
use crate::error::AppError;

/// Write per-observation results to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[ObservationResidual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["quantity", "price", "fitted_price", "residual", "log_residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writer
            .write_record([
                r.observation.quantity().to_string(),
                format!("{:.4}", r.observation.price()),
                format!("{:.4}", r.fitted),
                format!("{:.4}", r.residual),
                format!("{:.6}", r.log_residual),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = residuals.len(), "wrote results CSV");
    Ok(())
}
