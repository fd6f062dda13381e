use thiserror::Error;

use crate::domain::Field;

/// Recoverable failures of the estimator core.
///
/// Every variant leaves the observation set exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// A quantity or price is non-positive, non-finite, or not a number.
    #[error("invalid {field}: expected a finite positive number, got '{value}'")]
    InvalidObservation { field: Field, value: String },

    /// Fewer than two observations are available for a fit.
    #[error("insufficient data: need at least two data points (have {have})")]
    InsufficientData { have: usize },

    /// The log-log slope is undefined (all quantities identical) or the
    /// resulting model cannot be represented as finite positive numbers.
    #[error("degenerate fit: the quantities are identical or too close together to determine a usable slope")]
    DegenerateFit,
}

impl EstimateError {
    pub(crate) fn invalid(field: Field, value: impl ToString) -> Self {
        Self::InvalidObservation {
            field,
            value: value.to_string(),
        }
    }

    /// Process exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            EstimateError::InvalidObservation { .. } => 2,
            EstimateError::InsufficientData { .. } => 3,
            EstimateError::DegenerateFit => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_errors_map_to_distinct_exit_codes() {
        let invalid: AppError = EstimateError::invalid(Field::Price, "-1").into();
        let short: AppError = EstimateError::InsufficientData { have: 1 }.into();
        let degenerate: AppError = EstimateError::DegenerateFit.into();

        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(short.exit_code(), 3);
        assert_eq!(degenerate.exit_code(), 4);
        assert!(short.to_string().contains("at least two data points"));
        assert_eq!(invalid.to_string(), "invalid price: expected a finite positive number, got '-1'");
    }
}
