//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line

use crate::domain::{CurveFile, Observation};

/// Render observations with an optional fitted curve overlay.
///
/// The x-axis spans the observed quantities; without observations it falls
/// back to the curve's own range.
pub fn render_ascii_plot(
    observations: &[Observation],
    curve: Option<&[(f64, f64)]>,
    width: usize,
    height: usize,
) -> String {
    let (q_min, q_max) = quantity_range(observations.iter().map(|o| o.quantity()))
        .or_else(|| curve.and_then(|c| quantity_range(c.iter().map(|&(q, _)| q))))
        .unwrap_or((0.0, 1.0));
    render_plot(observations, curve, q_min, q_max, width, height)
}

/// Render a plot from a saved curve JSON file (curve only, no overlay points).
pub fn render_ascii_plot_from_curve_file(curve: &CurveFile, width: usize, height: usize) -> String {
    let points = curve.grid.points();
    render_ascii_plot(&[], Some(points.as_slice()), width, height)
}

fn render_plot(
    observations: &[Observation],
    curve_points: Option<&[(f64, f64)]>,
    q_min: f64,
    q_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // A single observed quantity still needs a non-empty x span.
    let (q_min, q_max) = if q_max > q_min { (q_min, q_max) } else { pad_range(q_min, q_max, 0.05) };

    // Determine price range from observed points and curve points.
    let (p_min, p_max) = price_range(observations, curve_points).unwrap_or((0.0, 1.0));
    let (p_min, p_max) = pad_range(p_min, p_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    if let Some(curve) = curve_points {
        draw_curve(&mut grid, curve, q_min, q_max, p_min, p_max);
    }

    for o in observations {
        let x = map_x(o.quantity(), q_min, q_max, width);
        let y = map_y(o.price(), p_min, p_max, height);
        grid[y][x] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: quantity=[{q_min:.3}, {q_max:.3}] | price=[{p_min:.2}, {p_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn quantity_range(quantities: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_q = f64::INFINITY;
    let mut max_q = f64::NEG_INFINITY;
    for q in quantities {
        min_q = min_q.min(q);
        max_q = max_q.max(q);
    }
    if min_q.is_finite() && max_q.is_finite() {
        Some((min_q, max_q))
    } else {
        None
    }
}

fn price_range(observations: &[Observation], curve: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_p = f64::INFINITY;
    let mut max_p = f64::NEG_INFINITY;

    for o in observations {
        min_p = min_p.min(o.price());
        max_p = max_p.max(o.price());
    }
    if let Some(curve) = curve {
        for &(_, p) in curve {
            min_p = min_p.min(p);
            max_p = max_p.max(p);
        }
    }

    if min_p.is_finite() && max_p.is_finite() && max_p >= min_p {
        Some((min_p, max_p))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { (min.abs() * frac).max(1e-12) };
    (min - pad, max + pad)
}

fn map_x(q: f64, q_min: f64, q_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((q - q_min) / (q_max - q_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(p: f64, p_min: f64, p_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((p - p_min) / (p_max - p_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], q_min: f64, q_max: f64, p_min: f64, p_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(q, p) in curve {
        let x = map_x(q, q_min, q_max, width);
        let y = map_y(p, p_min, p_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
