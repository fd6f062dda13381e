//! Interactive CSV picker.
//!
//! Used when `pricer fit` runs without `-f`: list the `*.csv` files under the
//! current directory and let the user choose one by number or type a path.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth for finding CSV files.
const SEARCH_DEPTH: usize = 3;

/// Prompt on stdin/stdout for a CSV under the current directory.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = find_csv_files(Path::new("."), SEARCH_DEPTH);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    pick_csv(&files, stdin.lock(), stdout.lock())
}

/// Ask the user to pick one of `files` (by 1-based number) or to type a path.
///
/// `q` cancels; end of input is an error.
pub fn pick_csv<R: BufRead, W: Write>(files: &[PathBuf], mut input: R, mut output: W) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Provide one with `pricer fit -f <file.csv>`.",
        ));
    }

    let io_err = |e: std::io::Error| AppError::new(2, format!("Terminal I/O failed: {e}"));

    writeln!(output, "Found {} CSV file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Select a file (1-{}), type a path, or q to quit: ", files.len()).map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(2, "No input received. Provide a CSV path with `-f`."));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_csv_path(&files[choice - 1]);
            }
            writeln!(output, "Invalid choice: {choice}.").map_err(io_err)?;
            continue;
        }

        match validate_csv_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}").map_err(io_err)?,
        }
    }
}

/// Validate the provided path points to an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(2, format!("Expected a .csv file, got: {}", path.display())));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root`, sorted for a stable listing.
pub fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !matches!(name, ".git" | "target") {
                walk(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn pretty_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.csv"), "quantity,price\n").unwrap();
        fs::write(dir.path().join("nested").join("a.CSV"), "quantity,price\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let files = find_csv_files(dir.path(), 2);
        (dir, files)
    }

    #[test]
    fn finds_csv_files_recursively() {
        let (_dir, files) = fixture();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| has_csv_extension(p)));
    }

    #[test]
    fn picks_by_number_after_a_bad_choice() {
        let (_dir, files) = fixture();
        let mut out = Vec::new();
        let picked = pick_csv(&files, "9\n2\n".as_bytes(), &mut out).unwrap();
        assert_eq!(picked, files[1]);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Invalid choice: 9."));
    }

    #[test]
    fn cancel_and_eof_are_errors() {
        let (_dir, files) = fixture();
        assert!(pick_csv(&files, "q\n".as_bytes(), Vec::new()).is_err());
        assert!(pick_csv(&files, "".as_bytes(), Vec::new()).is_err());
        assert!(pick_csv(&[], "1\n".as_bytes(), Vec::new()).is_err());
    }
}
