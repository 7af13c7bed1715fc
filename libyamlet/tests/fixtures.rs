//! Test harness for the yamlet parser against fixture files.
//!
//! This test harness reads all .yaml files from the test/yaml/ directory and
//! parses them, comparing the debug dump against expected files in test/tree/.
//! It also reads .nay files from test/nay/ (expected to fail) and verifies
//! they produce the expected error messages from corresponding .error files.

use std::fs;
use std::path::{Path, PathBuf};

use libyamlet::{parse, parse_with_filename};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all files with a given extension from a subdirectory of test/.
fn get_files_in_subdir(subdir: &str, ext: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join(format!("*.{}", ext));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read the file next to a fixture in another subdirectory of test/.
fn read_companion(path: &Path, subdir: &str, ext: &str) -> Option<String> {
    let basename = path.file_stem().unwrap().to_string_lossy();
    let companion = test_root().join(subdir).join(format!("{}.{}", basename, ext));
    fs::read_to_string(companion).ok()
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Run a single .yaml test file (expected to succeed).
fn run_yaml_test(path: &Path) -> Result<(), String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let filename = file_name(path);

    let value = parse(&content)
        .map_err(|e| format!("{}: Unexpected parse error: {}", filename, e))?;
    let actual = format!("{:?}", value);

    match read_companion(path, "tree", "tree") {
        Some(expected) if expected.trim() != actual => Err(format!(
            "{}: Output mismatch\n    expected: {}\n    actual:   {}",
            filename,
            expected.trim(),
            actual
        )),
        Some(_) => {
            println!("  {} => {}", filename, actual);
            Ok(())
        }
        None => Err(format!("{}: Missing .tree file", filename)),
    }
}

/// Run a single .nay test file (expected to fail with specific error).
fn run_nay_test(path: &Path) -> Result<(), String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let filename = file_name(path);

    match parse_with_filename(&content, Some(&filename)) {
        Ok(value) => Err(format!(
            "{}: Expected parse error, but got success: {:?}",
            filename, value
        )),
        Err(e) => {
            let actual_error = e.to_string();
            match read_companion(path, "nay", "error") {
                Some(expected) if expected.trim() == actual_error => {
                    println!("  {} => error (as expected)", filename);
                    Ok(())
                }
                Some(expected) => Err(format!(
                    "{}: Error mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim(),
                    actual_error
                )),
                None => {
                    println!(
                        "  {} => error: {} (no .error file to compare)",
                        filename, actual_error
                    );
                    Ok(())
                }
            }
        }
    }
}

fn run_all(files: &[PathBuf], run: fn(&Path) -> Result<(), String>) -> usize {
    let mut failed = 0;
    let mut errors: Vec<String> = Vec::new();

    for file in files {
        if let Err(e) = run(file) {
            failed += 1;
            errors.push(e);
        }
    }

    println!("\nResults: {} passed, {} failed", files.len() - failed, failed);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    failed
}

#[test]
fn test_all_yaml_fixtures() {
    let files = get_files_in_subdir("yaml", "yaml");
    assert!(!files.is_empty(), "No .yaml test files found!");

    println!("\nRunning {} .yaml test files:", files.len());
    let failed = run_all(&files, run_yaml_test);
    assert!(failed == 0, "{} .yaml tests failed", failed);
}

#[test]
fn test_all_nay_fixtures() {
    let files = get_files_in_subdir("nay", "nay");
    assert!(!files.is_empty(), "No .nay test files found!");

    println!("\nRunning {} .nay test files:", files.len());
    let failed = run_all(&files, run_nay_test);
    assert!(failed == 0, "{} .nay tests failed", failed);
}

#[test]
fn test_every_fixture_has_expectation() {
    for file in get_files_in_subdir("yaml", "yaml") {
        assert!(
            read_companion(&file, "tree", "tree").is_some(),
            "{} has no .tree file",
            file.display()
        );
    }
    for file in get_files_in_subdir("nay", "nay") {
        assert!(
            read_companion(&file, "nay", "error").is_some(),
            "{} has no .error file",
            file.display()
        );
    }
}

#[test]
fn test_classification_is_total() {
    let samples = ["", " ", "   ", "-", "--", " - ", "- a", "a", "a: b", "\t- a"];
    for line in samples {
        let indent = libyamlet::indentation_of(line);
        assert!(indent <= line.len());
        assert_eq!(indent, libyamlet::indentation_of(line));
        assert_eq!(
            libyamlet::is_scalar_item(line),
            libyamlet::is_scalar_item(line)
        );
    }
    assert_eq!(libyamlet::indentation_of("   "), 3);
    assert!(!libyamlet::is_scalar_item("\t- a"));
}
