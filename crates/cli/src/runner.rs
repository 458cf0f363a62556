use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::tap::Tap;

/// Diagnosis conformance suite runner.
///
/// Convention:
///   positive/  -- *.facts.json + *.diagnosis.json (expected records)
///   negative/  -- *.facts.json + *.expected-error.json (expected error)
pub struct RunResult {
    pub failed: usize,
}

pub fn run_suite(suite_dir: &Path, quiet: bool) -> RunResult {
    let mut tap = Tap::new();

    run_dir(suite_dir, "positive", "diagnosis.json", &mut tap);
    run_dir(suite_dir, "negative", "expected-error.json", &mut tap);

    let failed = tap.failure_count();
    tap.finish(quiet);

    RunResult { failed }
}

fn run_dir(suite_dir: &Path, subdir: &str, expected_suffix: &str, tap: &mut Tap) {
    let dir = suite_dir.join(subdir);
    if !dir.exists() {
        return;
    }
    let mut entries = glob_facts_files(&dir);
    entries.sort();
    for facts_path in &entries {
        let name = fixture_name(facts_path);
        let test_name = format!("{}/{}", subdir, name);
        let expected_path = dir.join(format!("{}.{}", name, expected_suffix));
        if !expected_path.exists() {
            tap.not_ok(
                test_name,
                format!("missing expected file: {}", expected_path.display()),
            );
            continue;
        }
        debug!(fixture = %test_name, "running conformance case");
        let outcome = match subdir {
            "negative" => run_negative_case(facts_path, &expected_path),
            _ => run_positive_case(facts_path, &expected_path),
        };
        match outcome {
            Ok(()) => tap.ok(test_name),
            Err(diag) => tap.not_ok(test_name, diag),
        }
    }
}

fn run_positive_case(facts_path: &Path, expected_path: &Path) -> Result<(), String> {
    let facts = read_json(facts_path)?;
    let expected = read_json(expected_path)?;
    let result = tuberdx_eval::evaluate(&facts)
        .map_err(|e| format!("unexpected assembly error: {}", e))?;
    let got = result.to_summary_json();
    if got == expected {
        Ok(())
    } else {
        Err(format!("output mismatch:\n{}", json_diff(&expected, &got)))
    }
}

fn run_negative_case(facts_path: &Path, expected_path: &Path) -> Result<(), String> {
    let facts = read_json(facts_path)?;
    let expected = read_json(expected_path)?;
    match tuberdx_eval::evaluate(&facts) {
        Ok(result) => Err(format!(
            "expected an error but diagnosis succeeded: {:?}",
            result.rules_fired()
        )),
        Err(e) => {
            let got = serde_json::json!({ "error": e.to_string() });
            if got == expected {
                Ok(())
            } else {
                Err(format!("error mismatch:\n{}", json_diff(&expected, &got)))
            }
        }
    }
}

// -- Helpers --

fn glob_facts_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_facts = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".facts.json"));
            if is_facts {
                results.push(path);
            }
        }
    }
    results
}

fn fixture_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    file_name
        .strip_suffix(".facts.json")
        .unwrap_or(&file_name)
        .to_string()
}

fn read_json(path: &Path) -> Result<Value, String> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&src).map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))
}

fn json_diff(expected: &Value, got: &Value) -> String {
    let exp_str = serde_json::to_string_pretty(expected).unwrap_or_default();
    let got_str = serde_json::to_string_pretty(got).unwrap_or_default();
    format!("--- expected\n{}\n+++ got\n{}", exp_str, got_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_name_strips_double_extension() {
        assert_eq!(
            fixture_name(Path::new("conformance/diagnose/positive/cbb_high.facts.json")),
            "cbb_high"
        );
    }

    #[test]
    fn missing_suite_subdirs_run_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = run_suite(tmp.path(), true);
        assert_eq!(result.failed, 0);
    }

    #[test]
    fn missing_expectation_is_a_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let positive = tmp.path().join("positive");
        std::fs::create_dir(&positive).unwrap();
        std::fs::write(positive.join("lonely.facts.json"), "{}").unwrap();
        let result = run_suite(tmp.path(), true);
        assert_eq!(result.failed, 1);
    }
}
