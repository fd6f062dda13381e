//! Line-oriented interactive session.
//!
//! The session is a presentation shell over `PowerLawEstimator`: it parses
//! typed commands, applies the input bounds, and turns each error kind into
//! its own user-facing message. It holds no quantity/price data itself.
//!
//! Commands:
//! - `add <quantity> <price>`
//! - `estimate <quantity>`
//! - `show` / `plot`
//! - `reset` (asks for confirmation)
//! - `help` / `quit`

use std::io::{BufRead, Write};

use crate::domain::{Field, parse_positive};
use crate::error::{AppError, EstimateError};
use crate::estimator::PowerLawEstimator;
use crate::plot::render_ascii_plot;
use crate::report::{format_estimate, format_observation_table};

/// Smallest value the input surface accepts.
pub const INPUT_MIN: f64 = 1e-4;
/// Largest value the input surface accepts.
pub const INPUT_MAX: f64 = 1e12;

const HELP: &str = "\
Commands:
  add <quantity> <price>   record an observation
  estimate <quantity>      estimate the price for a quantity
  show                     list observations and the fitted model
  plot                     draw observations and the fitted curve
  reset                    clear all observations (asks first)
  help                     show this help
  quit                     leave the session
";

/// Display settings for the session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub curve_points: usize,
    pub plot_width: usize,
    pub plot_height: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Add { quantity: String, price: String },
    Estimate { quantity: String },
    Show,
    Plot,
    Reset,
    Help,
    Quit,
}

/// Run the session until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    estimator: &mut PowerLawEstimator,
    config: &SessionConfig,
    mut input: R,
    mut output: W,
) -> Result<(), AppError> {
    let io_err = |e: std::io::Error| AppError::new(2, format!("Terminal I/O failed: {e}"));

    writeln!(output, "Degressive price estimator. Type `help` for commands.").map_err(io_err)?;

    loop {
        write!(output, "> ").map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let Some(line) = read_line(&mut input).map_err(io_err)? else {
            writeln!(output).map_err(io_err)?;
            return Ok(());
        };

        let command = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{message}").map_err(io_err)?;
                continue;
            }
        };

        let reply = match command {
            SessionCommand::Quit => return Ok(()),
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Add { quantity, price } => add(estimator, &quantity, &price),
            SessionCommand::Estimate { quantity } => estimate(estimator, &quantity),
            SessionCommand::Show => show(estimator),
            SessionCommand::Plot => plot(estimator, config),
            SessionCommand::Reset => {
                write!(output, "Reset all data? Every observation will be removed. [y/N] ").map_err(io_err)?;
                output.flush().map_err(io_err)?;
                let answer = read_line(&mut input).map_err(io_err)?.unwrap_or_default();
                if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    estimator.reset();
                    "All data cleared.".to_string()
                } else {
                    "Reset canceled.".to_string()
                }
            }
        };

        writeln!(output, "{}", reply.trim_end()).map_err(io_err)?;
    }
}

fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("add", [q, p]) => SessionCommand::Add {
            quantity: q.to_string(),
            price: p.to_string(),
        },
        ("add", _) => return Err("Usage: add <quantity> <price>".to_string()),
        ("estimate", [q]) => SessionCommand::Estimate { quantity: q.to_string() },
        ("estimate", _) => return Err("Usage: estimate <quantity>".to_string()),
        ("show", []) => SessionCommand::Show,
        ("plot", []) => SessionCommand::Plot,
        ("reset", []) => SessionCommand::Reset,
        ("help" | "?", _) => SessionCommand::Help,
        ("quit" | "exit", _) => SessionCommand::Quit,
        (other, _) => return Err(format!("Unknown command `{other}`. Type `help` for commands.")),
    };
    Ok(Some(command))
}

/// Parse a typed number and apply the input-surface bounds.
fn read_bounded(field: Field, raw: &str) -> Result<f64, EstimateError> {
    let value = parse_positive(field, raw)?;
    if (INPUT_MIN..=INPUT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(EstimateError::InvalidObservation {
            field,
            value: raw.to_string(),
        })
    }
}

fn add(estimator: &mut PowerLawEstimator, quantity: &str, price: &str) -> String {
    let parsed = read_bounded(Field::Quantity, quantity)
        .and_then(|q| Ok((q, read_bounded(Field::Price, price)?)))
        .and_then(|(q, p)| estimator.add(q, p).map(|()| (q, p)));

    match parsed {
        Ok((q, p)) => {
            let mut reply = format!("Added #{}: quantity {q}, price {p:.2}", estimator.len());
            if let Ok(model) = estimator.fit() {
                reply.push_str(&format!("\n{} (R^2 = {:.4})", model.equation(), model.r_squared));
            }
            reply
        }
        Err(err) => describe(&err),
    }
}

fn estimate(estimator: &PowerLawEstimator, quantity: &str) -> String {
    let result = read_bounded(Field::Quantity, quantity).and_then(|q| Ok((q, estimator.estimate(q)?)));
    match result {
        Ok((q, price)) => format_estimate(q, price),
        Err(err) => describe(&err),
    }
}

fn show(estimator: &PowerLawEstimator) -> String {
    if estimator.is_empty() {
        return "No observations yet.".to_string();
    }
    let mut out = format_observation_table(estimator.observations());
    match estimator.fit() {
        Ok(model) => out.push_str(&format!("{} (R^2 = {:.4})\n", model.equation(), model.r_squared)),
        Err(err) => out.push_str(&describe(&err)),
    }
    out
}

fn plot(estimator: &PowerLawEstimator, config: &SessionConfig) -> String {
    // Fewer than two usable points: scatter only, like the fit-free view.
    let curve = estimator.curve_samples(config.curve_points).ok();
    let body = render_ascii_plot(
        estimator.observations(),
        curve.as_deref(),
        config.plot_width,
        config.plot_height,
    );
    match estimator.fit() {
        Ok(model) if curve.is_some() => {
            format!("{}
R^2 = {:.4}
{body}", model.equation(), model.r_squared)
        }
        _ => body,
    }
}

/// One distinct message per failure kind.
fn describe(err: &EstimateError) -> String {
    match err {
        EstimateError::InvalidObservation { field, value } => format!(
            "Input error: '{value}' is not a valid {field}. Enter positive numbers between {INPUT_MIN} and {INPUT_MAX:e}."
        ),
        EstimateError::InsufficientData { have } => format!(
            "Insufficient data: enter at least two data points to estimate a price (have {have})."
        ),
        EstimateError::DegenerateFit => {
            "Cannot fit: the quantities are identical or too close together. Add an observation with a clearly different quantity.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            curve_points: 20,
            plot_width: 30,
            plot_height: 8,
        }
    }

    fn drive(script: &str) -> (PowerLawEstimator, String) {
        let mut est = PowerLawEstimator::new();
        let mut out = Vec::new();
        run_session(&mut est, &config(), script.as_bytes(), &mut out).unwrap();
        (est, String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_and_estimate_scenario() {
        let (est, out) = drive("add 1 10\nadd 2 8\nadd 4 6.4\nestimate 8\nquit\n");
        assert_eq!(est.len(), 3);
        assert!(out.contains("Added #3: quantity 4, price 6.40"));
        assert!(out.contains("P = 10.00 * Q^-0.32 (R^2 = 1.0000)"));
        assert!(out.contains("Estimated price for quantity 8: 5.12"));
    }

    #[test]
    fn each_failure_kind_has_its_own_message() {
        let (est, out) = drive("estimate 3\nadd 5 10\nadd -1 3\nadd 5 abc\nadd 5 12\nestimate 2\nestimate 0\n");
        assert_eq!(est.len(), 2);
        assert!(out.contains("Insufficient data: enter at least two data points"));
        assert!(out.contains("Input error: '-1' is not a valid quantity"));
        assert!(out.contains("Input error: 'abc' is not a valid price"));
        assert!(out.contains("Cannot fit: the quantities are identical"));
        assert!(out.contains("Input error: '0' is not a valid quantity"));
    }

    #[test]
    fn out_of_bounds_input_is_rejected() {
        let (est, out) = drive("add 0.00001 5\nadd 5 2e12\n");
        assert!(est.is_empty());
        assert_eq!(out.matches("Input error").count(), 2);
    }

    #[test]
    fn reset_requires_confirmation() {
        let (est, out) = drive("add 1 10\nadd 2 8\nreset\nn\n");
        assert_eq!(est.len(), 2);
        assert!(out.contains("Reset canceled."));

        let (est, out) = drive("add 1 10\nadd 2 8\nreset\ny\nestimate 3\n");
        assert!(est.is_empty());
        assert!(out.contains("All data cleared."));
        assert!(out.contains("Insufficient data"));
    }

    #[test]
    fn show_and_plot_render() {
        let (_, out) = drive("show\nadd 1 10\nadd 2 8\nshow\nplot\n");
        assert!(out.contains("No observations yet."));
        assert!(out.contains("   2              2           8.00"));
        assert!(out.contains("Plot: quantity=[1.000, 2.000]"));
    }

    #[test]
    fn plot_carries_equation_and_r_squared() {
        let (_, out) = drive("add 1 10\nadd 2 8\nadd 4 6.4\nplot\n");
        assert!(out.contains("P = 10.00 * Q^-0.32\nR^2 = 1.0000\nPlot: quantity=[1.000, 4.000]"));

        let (_, out) = drive("add 1 10\nplot\n");
        assert!(out.contains("Plot: quantity="));
        assert!(!out.contains("R^2 ="));
    }

    #[test]
    fn bad_commands_are_reported() {
        let (_, out) = drive("frobnicate\nadd 1\n\nhelp\n");
        assert!(out.contains("Unknown command `frobnicate`"));
        assert!(out.contains("Usage: add <quantity> <price>"));
        assert!(out.contains("estimate <quantity>"));
    }

    #[test]
    fn parse_command_recognizes_verbs() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("QUIT"), Ok(Some(SessionCommand::Quit)));
        assert_eq!(
            parse_command("estimate 12"),
            Ok(Some(SessionCommand::Estimate { quantity: "12".to_string() }))
        );
    }
}
