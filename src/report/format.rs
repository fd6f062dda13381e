//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{DatasetStats, FittedModel, Observation};
use crate::io::ingest::RowError;

/// Format the observation table in insertion order.
///
/// Quantities are printed as entered; prices with two decimals.
pub fn format_observation_table(observations: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>4} {:>14} {:>14}\n", "#", "quantity", "price"));
    out.push_str(&format!("{:->4} {:->14} {:->14}\n", "", "", ""));
    for (i, o) in observations.iter().enumerate() {
        out.push_str(&format!("{:>4} {:>14} {:>14.2}\n", i + 1, o.quantity(), o.price()));
    }
    out
}

/// Format dataset stats, the fitted model and its diagnostics.
pub fn format_fit_summary(stats: &DatasetStats, model: &FittedModel, price_r2: Option<f64>) -> String {
    let mut out = String::new();

    out.push_str("=== pricer - power-law price fit ===\n");
    out.push_str(&format!(
        "Points: n={} | quantity=[{}, {}] | price=[{:.2}, {:.2}]\n",
        stats.n_points, stats.quantity_min, stats.quantity_max, stats.price_min, stats.price_max
    ));
    out.push_str(&format!("Model: {}\n", model.equation()));
    out.push_str(&format!("- k: {:.6}\n", model.k));
    out.push_str(&format!("- a: {:.6}\n", model.a));
    out.push_str(&format!("R^2 (log-log) = {:.4}\n", model.r_squared));
    if let Some(r2) = price_r2 {
        out.push_str(&format!("R^2 (price space) = {r2:.4}\n"));
    }

    out
}

/// Format a single price estimate.
pub fn format_estimate(quantity: f64, price: f64) -> String {
    format!("Estimated price for quantity {quantity}: {price:.2}")
}

/// Format skipped CSV rows (empty string when there are none).
pub fn format_row_errors(row_errors: &[RowError]) -> String {
    if row_errors.is_empty() {
        return String::new();
    }
    let mut out = format!("Skipped {} row(s):\n", row_errors.len());
    for e in row_errors {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_table_keeps_order_and_two_decimal_prices() {
        let obs = [
            Observation::new(4.0, 6.4).unwrap(),
            Observation::new(1.0, 10.0).unwrap(),
        ];
        let txt = format_observation_table(&obs);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "   1              4           6.40");
        assert_eq!(lines[3], "   2              1          10.00");
    }

    #[test]
    fn fit_summary_mentions_equation_and_r2() {
        let stats = DatasetStats {
            n_points: 3,
            quantity_min: 1.0,
            quantity_max: 4.0,
            price_min: 6.4,
            price_max: 10.0,
        };
        let model = FittedModel { k: 10.0, a: -0.3219, r_squared: 1.0 };

        let txt = format_fit_summary(&stats, &model, None);
        assert!(txt.contains("Model: P = 10.00 * Q^-0.32\n"));
        assert!(txt.contains("R^2 (log-log) = 1.0000\n"));
        assert!(!txt.contains("price space"));

        let txt = format_fit_summary(&stats, &model, Some(0.98765));
        assert!(txt.contains("R^2 (price space) = 0.9877\n"));
    }

    #[test]
    fn estimate_and_row_errors() {
        assert_eq!(format_estimate(8.0, 5.1234), "Estimated price for quantity 8: 5.12");
        assert_eq!(format_row_errors(&[]), "");
        let txt = format_row_errors(&[RowError { line: 3, message: "bad".to_string() }]);
        assert_eq!(txt, "Skipped 1 row(s):\n  line 3: bad\n");
    }
}
