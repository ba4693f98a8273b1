//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use dvphoto_test_support::SyntheticPhotoBuilder;
use predicates::prelude::*;
use tempfile::TempDir;

/// Writes an 800x800 face-like PNG that passes validation.
fn write_portrait(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let img = SyntheticPhotoBuilder::standard_portrait();
    std::fs::write(&path, SyntheticPhotoBuilder::png_bytes(&img).unwrap()).unwrap();
    path
}

/// Runs the binary with an empty XDG config home and `dir` as cwd.
fn dvphoto(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dvphoto").unwrap();
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let dir = TempDir::new().unwrap();
    dvphoto(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let dir = TempDir::new().unwrap();
    dvphoto(dir.path())
        .arg("/nonexistent/path/to/photo.jpg")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    dvphoto(dir.path())
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--format", "xml"])
        .arg(photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json"));
}

#[test]
fn test_valid_formats_accepted() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    for format in ["json", "jsonl"] {
        dvphoto(dir.path())
            .args(["--format", format])
            .arg(&photo)
            .assert()
            .code(0);
    }
}

// === Policy Flag Validation ===

#[test]
fn test_zero_dimension_rejected() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--min-dimension", "0"])
        .arg(photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_non_numeric_file_size_rejected() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--max-file-size", "big"])
        .arg(photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_negative_sharpness_normalization_rejected() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .arg("--sharpness-normalization=-5")
        .arg(photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_inverted_dimension_range_is_an_error() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--min-dimension", "1000", "--max-dimension", "900"])
        .arg(photo)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exceeds maximum dimension"));
}

#[test]
fn test_max_dimension_flag_rejects_photo() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--max-dimension", "700"])
        .arg(photo)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("dimensions_out_of_range"));
}

#[test]
fn test_max_file_size_flag_rejects_photo() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .args(["--max-file-size", "100"])
        .arg(photo)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("file_too_large"));
}

// === Verbosity Level Tests ===

#[test]
fn test_verbosity_levels() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    for flag in ["-v", "-vv", "-vvv"] {
        dvphoto(dir.path()).arg(flag).arg(&photo).assert().code(0);
    }
}

#[test]
fn test_info_verbosity_logs_to_stderr_only() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    let output = dvphoto(dir.path()).arg("-v").arg(photo).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("Running check command"));
    for line in stdout.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }
}

#[test]
fn test_quiet_suppresses_progress() {
    let dir = TempDir::new().unwrap();
    let blank = dir.path().join("blank.png");
    std::fs::write(
        &blank,
        SyntheticPhotoBuilder::png_bytes(&SyntheticPhotoBuilder::blank_photo()).unwrap(),
    )
    .unwrap();

    dvphoto(dir.path())
        .arg("--quiet")
        .arg(blank)
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}

// === Multiple Paths ===

#[test]
fn test_multiple_paths() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    let output = dvphoto(dir.path()).arg(&photo).arg(&photo).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
}

// === Recursive Flag ===

#[test]
fn test_recursive_flag() {
    let dir = TempDir::new().unwrap();
    let sub_dir = dir.path().join("subdir");
    std::fs::create_dir(&sub_dir).unwrap();
    write_portrait(&sub_dir, "photo.png");

    // Without -r, should not find photo in subdir
    dvphoto(dir.path())
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    // With -r, should find photo in subdir
    dvphoto(dir.path())
        .arg("-r")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("photo.png"));
}

// === Help and Version ===

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    dvphoto(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--max-file-size"))
        .stdout(predicate::str::contains("--basic"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    dvphoto(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dvphoto"));
}

// === Subcommands ===

#[test]
fn test_check_subcommand() {
    let dir = TempDir::new().unwrap();
    let photo = write_portrait(dir.path(), "photo.png");

    dvphoto(dir.path())
        .arg("check")
        .arg("--basic")
        .arg(photo)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"compliance_score\":100"));
}

#[test]
fn test_policy_subcommand_prints_defaults() {
    let dir = TempDir::new().unwrap();
    let output = dvphoto(dir.path()).arg("policy").output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let policy: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(policy["mode"], "advanced");
    assert_eq!(policy["constraints"]["max_file_size_bytes"], 5 * 1024 * 1024);
    assert_eq!(policy["constraints"]["min_dimension_px"], 600);
    assert_eq!(policy["constraints"]["max_dimension_px"], 1200);
    assert_eq!(policy["scoring"]["deductions"]["no_face"], 50);
}

#[test]
fn test_policy_subcommand_applies_flags() {
    let dir = TempDir::new().unwrap();
    let output = dvphoto(dir.path())
        .args(["policy", "--basic", "--max-dimension", "1500"])
        .output()
        .unwrap();

    let policy: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(policy["mode"], "basic");
    assert_eq!(policy["constraints"]["max_dimension_px"], 1500);
}
