//! Command-line parsing for the power-law price estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pricer", version, about = "Degressive price estimator (power-law fit P = k * Q^a)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a power law to a CSV of (quantity, price) rows and print the model.
    Fit(FitArgs),
    /// Print only the estimated price for one quantity (useful for scripting).
    Estimate(EstimateArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Write a synthetic power-law dataset as CSV.
    Sample(SampleArgs),
    /// Enter observations interactively and ask for estimates.
    Session(SessionArgs),
}

/// Terminal plot geometry (shared by several subcommands).
#[derive(Debug, Args, Clone)]
pub struct PlotSize {
    /// Plot width (columns).
    #[arg(long, env = "PRICER_PLOT_WIDTH", default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "PRICER_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,
}

/// Options for fitting.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Input CSV with `quantity` and `price` columns. Prompts for one if omitted.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Quantity to price after fitting.
    #[arg(short = 'q', long = "estimate", value_name = "QUANTITY", allow_negative_numbers = true)]
    pub estimate: Option<String>,

    /// Number of points sampled along the fitted curve.
    #[arg(long, env = "PRICER_CURVE_POINTS", default_value_t = 100)]
    pub curve_points: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    #[command(flatten)]
    pub size: PlotSize,

    /// Also report R² measured on raw prices.
    #[arg(long = "price-r2")]
    pub price_r2: bool,

    /// Export per-observation results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (model + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for a one-shot estimate.
#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    /// Input CSV with `quantity` and `price` columns.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: PathBuf,

    /// Quantity to price.
    #[arg(short = 'q', long = "quantity", value_name = "QUANTITY", allow_negative_numbers = true)]
    pub quantity: String,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `pricer fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    #[command(flatten)]
    pub size: PlotSize,
}

/// Options for synthetic data generation.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Scale `k` of the generating curve.
    #[arg(short = 'k', long, default_value_t = 10.0)]
    pub k: f64,

    /// Exponent `a` of the generating curve.
    #[arg(short = 'a', long, default_value_t = -0.3, allow_negative_numbers = true)]
    pub a: f64,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Smallest quantity.
    #[arg(long, default_value_t = 1.0)]
    pub q_min: f64,

    /// Largest quantity.
    #[arg(long, default_value_t = 1000.0)]
    pub q_max: f64,

    /// Standard deviation of multiplicative log-price noise.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output path (stdout if omitted).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

/// Options for the interactive session.
#[derive(Debug, Args, Clone)]
pub struct SessionArgs {
    /// Preload observations from a CSV.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Number of points sampled along the fitted curve.
    #[arg(long, env = "PRICER_CURVE_POINTS", default_value_t = 100)]
    pub curve_points: usize,

    #[command(flatten)]
    pub size: PlotSize,
}
