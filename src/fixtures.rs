//! Conformance harness: decode CSV datasets and compare them with reference JSON.
//!
//! A dataset directory holds `csv/<name>.csv` files and, for each, a
//! `json/<name>.json` file with the expected rows as a JSON array of arrays or
//! objects. Object rows compare without regard to key order.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::decoder::decode;
use crate::encoding::read_text;
use crate::error::{CodecError, Result};
use crate::options::{DecodeOptions, Header};
use crate::value::Row;

/// Result of checking a single dataset.
#[derive(Debug, Clone)]
pub struct DatasetResult {
    pub name: String,
    pub passed: bool,
    pub expected_rows: usize,
    pub decoded_rows: usize,
    /// Index of the first row that differs, when row contents disagree.
    pub first_mismatch: Option<usize>,
    pub error: Option<String>,
}

impl DatasetResult {
    fn error(name: &str, error: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            expected_rows: 0,
            decoded_rows: 0,
            first_mismatch: None,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate conformance results.
#[derive(Debug, Clone, Default)]
pub struct ConformanceResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub dataset_results: Vec<DatasetResult>,
}

impl ConformanceResult {
    /// Calculate success ratio (passed / total).
    pub fn success_ratio(&self) -> f64 {
        ratio(self.passed, self.total)
    }

    /// Calculate failure ratio (failed / total).
    pub fn failure_ratio(&self) -> f64 {
        ratio(self.failed, self.total)
    }

    /// Calculate error ratio (errors / total).
    pub fn error_ratio(&self) -> f64 {
        ratio(self.errors, self.total)
    }

    /// Returns true when every dataset passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Print detailed results to stdout.
    pub fn print_details(&self) {
        println!("\n=== Conformance Results ===\n");

        for result in &self.dataset_results {
            let status = if result.error.is_some() {
                "ERROR"
            } else if result.passed {
                "PASS"
            } else {
                "FAIL"
            };

            print!("[{}] {}", status, result.name);

            if !result.passed && result.error.is_none() {
                print!(
                    " - rows: expected {} got {}",
                    result.expected_rows, result.decoded_rows
                );
                if let Some(idx) = result.first_mismatch {
                    print!(", first mismatch at row {idx}");
                }
            }

            if let Some(ref err) = result.error {
                print!(" - {err}");
            }

            println!();
        }
    }

    /// Print summary metrics to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===\n");
        println!("Total datasets: {}", self.total);
        println!(
            "Passed:         {} ({:.1}%)",
            self.passed,
            self.success_ratio() * 100.0
        );
        println!(
            "Failed:         {} ({:.1}%)",
            self.failed,
            self.failure_ratio() * 100.0
        );
        println!(
            "Errors:         {} ({:.1}%)",
            self.errors,
            self.error_ratio() * 100.0
        );
    }
}

fn ratio(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        n as f64 / total as f64
    }
}

/// Read a file as UTF-8 text, transcoding when needed.
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(read_text(&bytes))
}

/// Read a JSON file holding an array of rows.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = load_text(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// List dataset names under `dir`: CSV files with a matching JSON file.
pub fn discover_datasets(dir: &Path) -> Result<Vec<String>> {
    let csv_dir = dir.join("csv");
    let json_dir = dir.join("json");
    let mut names = Vec::new();

    for entry in fs::read_dir(&csv_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if json_dir.join(format!("{name}.json")).is_file() {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Run every dataset under `dir`, taking field names from each file's first row.
pub fn run_conformance(dir: &Path) -> Result<ConformanceResult> {
    let options = DecodeOptions {
        header: Header::FirstRow,
        ..DecodeOptions::default()
    };
    run_conformance_with(dir, &options)
}

/// Run every dataset under `dir` with the given decode options.
pub fn run_conformance_with(dir: &Path, options: &DecodeOptions) -> Result<ConformanceResult> {
    let names = discover_datasets(dir)?;
    if names.is_empty() {
        return Err(CodecError::EmptyData);
    }

    let dataset_results: Vec<DatasetResult> = names
        .par_iter()
        .map(|name| check_dataset(dir, name, options))
        .collect();

    let mut result = ConformanceResult {
        total: dataset_results.len(),
        ..ConformanceResult::default()
    };
    for dataset in &dataset_results {
        if dataset.error.is_some() {
            result.errors += 1;
        } else if dataset.passed {
            result.passed += 1;
        } else {
            result.failed += 1;
        }
    }
    result.dataset_results = dataset_results;

    tracing::debug!(
        total = result.total,
        passed = result.passed,
        "conformance run finished"
    );

    Ok(result)
}

/// Decode one dataset and compare it with its reference rows.
pub fn check_dataset(dir: &Path, name: &str, options: &DecodeOptions) -> DatasetResult {
    let csv_path = dir.join("csv").join(format!("{name}.csv"));
    let json_path = dir.join("json").join(format!("{name}.json"));

    let text = match load_text(&csv_path) {
        Ok(text) => text,
        Err(e) => return DatasetResult::error(name, e),
    };
    let expected = match load_rows(&json_path) {
        Ok(rows) => rows,
        Err(e) => return DatasetResult::error(name, e),
    };

    let decoded = match decode(&text, options) {
        Some(rows) => rows,
        None if expected.is_empty() => Vec::new(),
        None => return DatasetResult::error(name, CodecError::EmptyData),
    };

    let first_mismatch = decoded
        .iter()
        .zip(&expected)
        .position(|(got, want)| !rows_equivalent(got, want));

    DatasetResult {
        name: name.to_string(),
        passed: first_mismatch.is_none() && decoded.len() == expected.len(),
        expected_rows: expected.len(),
        decoded_rows: decoded.len(),
        first_mismatch,
        error: None,
    }
}

/// Compare two rows, ignoring key order for object rows.
pub fn rows_equivalent(a: &Row, b: &Row) -> bool {
    match (a, b) {
        (Row::Array(x), Row::Array(y)) => x == y,
        (Row::Object(x), Row::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k) == Some(v))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Record, Value};

    #[test]
    fn test_rows_equivalent_ignores_key_order() {
        let a: Record = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Record = [("y", "2"), ("x", "1")].into_iter().collect();
        assert!(rows_equivalent(&Row::Object(a.clone()), &Row::Object(b)));

        let c: Record = [("x", "1")].into_iter().collect();
        assert!(!rows_equivalent(&Row::Object(a), &Row::Object(c)));

        let arr = Row::Array(vec![Value::from("1")]);
        assert!(!rows_equivalent(&arr, &Row::Array(vec![Value::from(1)])));
    }

    #[test]
    fn test_conformance_result_metrics() {
        let result = ConformanceResult {
            total: 20,
            passed: 15,
            failed: 3,
            errors: 2,
            dataset_results: vec![],
        };

        assert!((result.success_ratio() - 0.75).abs() < 0.001);
        assert!((result.failure_ratio() - 0.15).abs() < 0.001);
        assert!((result.error_ratio() - 0.10).abs() < 0.001);
        assert!(!result.all_passed());
        assert_eq!(ConformanceResult::default().success_ratio(), 0.0);
    }
}
