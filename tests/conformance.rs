//! Conformance harness tests against small on-disk datasets.
//!
//! Each test lays out `csv/` and `json/` directories in a temporary folder
//! and runs the harness over them.

use csv_duplex::fixtures::{
    ConformanceResult, check_dataset, discover_datasets, load_rows, run_conformance,
    run_conformance_with,
};
use csv_duplex::{CodecError, DecodeOptions, Header, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn header_options() -> DecodeOptions {
    DecodeOptions {
        header: Header::FirstRow,
        ..DecodeOptions::default()
    }
}

fn write_dataset(dir: &Path, name: &str, csv: &str, json: &str) {
    fs::create_dir_all(dir.join("csv")).unwrap();
    fs::create_dir_all(dir.join("json")).unwrap();
    fs::write(dir.join("csv").join(format!("{name}.csv")), csv).unwrap();
    fs::write(dir.join("json").join(format!("{name}.json")), json).unwrap();
}

fn sample_datasets() -> TempDir {
    let dir = TempDir::new().unwrap();

    write_dataset(
        dir.path(),
        "people",
        "name,age\r\nWill,32\r\nAnn,41\r\n",
        r#"[{"age":"32","name":"Will"},{"name":"Ann","age":"41"}]"#,
    );
    write_dataset(
        dir.path(),
        "quoted",
        "city,note\r\nParis,\"a, b\"\r\nRome,\"x\r\ny\"\r\n",
        r#"[{"city":"Paris","note":"a, b"},{"city":"Rome","note":"x\r\ny"}]"#,
    );
    write_dataset(
        dir.path(),
        "mismatch",
        "k,v\r\n1,a\r\n2,b\r\n",
        r#"[{"k":"1","v":"a"},{"k":"2","v":"WRONG"}]"#,
    );
    write_dataset(dir.path(), "broken", "k,v\r\n1,a\r\n", "{not json");

    dir
}

fn run(dir: &TempDir) -> ConformanceResult {
    run_conformance(dir.path()).expect("Conformance run should complete")
}

#[test]
fn test_discover_datasets_sorted_and_paired() {
    let dir = sample_datasets();
    // CSV without a JSON counterpart is ignored
    fs::write(dir.path().join("csv").join("orphan.csv"), "a,b\r\n").unwrap();
    fs::write(dir.path().join("csv").join("notes.txt"), "ignored").unwrap();

    let names = discover_datasets(dir.path()).unwrap();

    assert_eq!(names, vec!["broken", "mismatch", "people", "quoted"]);
}

#[test]
fn test_conformance_counts() {
    let dir = sample_datasets();
    let result = run(&dir);

    assert_eq!(result.total, 4);
    assert_eq!(result.passed, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.errors, 1);
    assert!(!result.all_passed());
    assert!((result.success_ratio() - 0.5).abs() < 0.001);
}

#[test]
fn test_conformance_reports_mismatch_row() {
    let dir = sample_datasets();
    let result = check_dataset(dir.path(), "mismatch", &header_options());

    assert!(!result.passed);
    assert!(result.error.is_none());
    assert_eq!(result.expected_rows, 2);
    assert_eq!(result.decoded_rows, 2);
    assert_eq!(result.first_mismatch, Some(1));
}

#[test]
fn test_conformance_reports_load_errors() {
    let dir = sample_datasets();
    let result = check_dataset(dir.path(), "broken", &header_options());

    assert!(!result.passed);
    assert!(result.error.as_deref().unwrap().starts_with("JSON error"));
}

#[test]
fn test_conformance_all_pass() {
    let dir = TempDir::new().unwrap();
    write_dataset(
        dir.path(),
        "people",
        "name,age\r\nWill,32\r\n",
        r#"[{"name":"Will","age":"32"}]"#,
    );

    let result = run(&dir);

    assert!(result.all_passed());
    assert_eq!(result.dataset_results[0].name, "people");
}

#[test]
fn test_conformance_with_cast() {
    let dir = TempDir::new().unwrap();
    write_dataset(
        dir.path(),
        "typed",
        "id,active\r\n1,true\r\n2,false\r\n",
        r#"[{"id":1,"active":true},{"id":2,"active":false}]"#,
    );

    let options = DecodeOptions {
        cast: true,
        ..header_options()
    };
    let result = run_conformance_with(dir.path(), &options).unwrap();

    assert!(result.all_passed());
}

#[test]
fn test_conformance_empty_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("csv")).unwrap();

    assert!(matches!(
        run_conformance(dir.path()),
        Err(CodecError::EmptyData)
    ));
}

#[test]
fn test_conformance_missing_directory() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        run_conformance(dir.path()),
        Err(CodecError::Io(_))
    ));
}

#[test]
fn test_load_rows_shapes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rows.json");
    fs::write(&path, r#"[["a", 1, true, null], {"k": "v"}]"#).unwrap();

    let rows = load_rows(&path).unwrap();

    assert_eq!(
        rows[0].as_array().unwrap(),
        &[
            Value::from("a"),
            Value::Number(1.0),
            Value::Bool(true),
            Value::Null
        ]
    );
    assert_eq!(rows[1].get("k"), Some(&Value::from("v")));
}
