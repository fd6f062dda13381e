//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - ingests CSV observations
//! - runs the power-law fit
//! - prints reports/plots
//! - writes optional exports

use std::fs::File;
use std::io::{self, BufWriter};

use clap::Parser;
use tracing::info;

use crate::cli::{Command, EstimateArgs, FitArgs, PlotArgs, SampleArgs, SessionArgs};
use crate::data::{SampleConfig, generate_sample, write_sample_csv};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::estimator::PowerLawEstimator;

pub mod pipeline;
pub mod session;

/// Entry point for the `pricer` binary.
pub fn run() -> Result<(), AppError> {
    // `pricer` alone opens the interactive session.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Estimate(args) => handle_estimate(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
        Command::Session(args) => handle_session(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    let row_errors = crate::report::format_row_errors(&run.ingest.row_errors);
    if !row_errors.is_empty() {
        eprint!("{row_errors}");
    }

    println!("{}", crate::report::format_observation_table(run.estimator.observations()));
    println!(
        "{}",
        crate::report::format_fit_summary(&run.ingest.stats, &run.model, run.price_r2)
    );
    if let Some((q, p)) = run.estimate {
        println!("{}", crate::report::format_estimate(q, p));
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            run.estimator.observations(),
            Some(run.curve.as_slice()),
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_curve {
        let curve = crate::io::curve::build_curve_file(&run.estimator, config.curve_points)?;
        crate::io::curve::write_curve_json(path, &curve)?;
    }

    Ok(())
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let quantity = pipeline::parse_quantity(&args.quantity)?;
    let ingest = crate::io::ingest::load_observations(&args.file)?;
    let estimator: PowerLawEstimator = ingest.observations.into_iter().collect();
    let price = estimator.estimate(quantity)?;
    println!("{price:.2}");
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    println!("{}", curve.model.equation());
    println!("R^2 (log-log) = {:.4}", curve.model.r_squared);
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.size.width, args.size.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        k: args.k,
        a: args.a,
        count: args.count,
        quantity_min: args.q_min,
        quantity_max: args.q_max,
        noise: args.noise,
        seed: args.seed,
    };
    let points = generate_sample(&config)?;

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
            write_sample_csv(BufWriter::new(file), &points)?;
            info!(path = %path.display(), rows = points.len(), "wrote sample CSV");
        }
        None => write_sample_csv(io::stdout().lock(), &points)?,
    }
    Ok(())
}

fn handle_session(args: SessionArgs) -> Result<(), AppError> {
    let mut estimator = match &args.file {
        Some(path) => {
            let ingest = crate::io::ingest::load_observations(path)?;
            ingest.observations.into_iter().collect()
        }
        None => PowerLawEstimator::new(),
    };
    let config = session::SessionConfig {
        curve_points: args.curve_points,
        plot_width: args.size.width,
        plot_height: args.size.height,
    };
    session::run_session(&mut estimator, &config, io::stdin().lock(), io::stdout().lock())
}

pub fn run_config_from_args(args: &FitArgs) -> Result<RunConfig, AppError> {
    let csv_path = match &args.file {
        Some(path) => crate::cli::picker::validate_csv_path(path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    let estimate_quantity = args
        .estimate
        .as_deref()
        .map(pipeline::parse_quantity)
        .transpose()?;

    Ok(RunConfig {
        csv_path,
        estimate_quantity,
        curve_points: args.curve_points,
        plot: args.plot && !args.no_plot,
        plot_width: args.size.width,
        plot_height: args.size.height,
        price_space_r2: args.price_r2,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
    })
}

/// Rewrite argv so `pricer` defaults to `pricer session`.
///
/// Rules:
/// - `pricer`                      -> `pricer session`
/// - `pricer -f data.csv ...`      -> `pricer session -f data.csv ...`
/// - `pricer --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("session".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "session flags".
    if arg1.starts_with('-') {
        argv.insert(1, "session".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_session() {
        assert_eq!(rewrite_args(argv(&["pricer"])), argv(&["pricer", "session"]));
        assert_eq!(
            rewrite_args(argv(&["pricer", "-f", "a.csv"])),
            argv(&["pricer", "session", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["pricer", "--help"])), argv(&["pricer", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["pricer", "fit", "-f", "a.csv"])),
            argv(&["pricer", "fit", "-f", "a.csv"])
        );
    }

    #[test]
    fn run_config_validates_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "quantity,price\n1,10\n2,8\n").unwrap();

        let cli = crate::cli::Cli::try_parse_from([
            "pricer",
            "fit",
            "-f",
            path.to_str().unwrap(),
            "-q",
            "3",
            "--no-plot",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config_from_args(&args).unwrap();
        assert_eq!(config.estimate_quantity, Some(3.0));
        assert!(!config.plot);

        let mut bad = args.clone();
        bad.estimate = Some("zero".to_string());
        assert_eq!(run_config_from_args(&bad).unwrap_err().exit_code(), 2);
    }
}
