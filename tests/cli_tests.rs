//! Black-box tests of the `pfac-mpm` binary (SPEC_FULL ambient §D), in the
//! style of the teacher's `tests/cli_tests.rs`: drive the built binary with
//! `assert_cmd`, assert on its stdout/stderr with `predicates`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn pfac_mpm_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pfac-mpm"))
}

fn pattern_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

#[test]
fn test_help() {
    pfac_mpm_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("failureless Aho-Corasick"));
}

#[test]
fn test_version() {
    pfac_mpm_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pfac-mpm"));
}

#[test]
fn test_scan_reports_matched_ids_from_stdin() {
    let patterns = pattern_file(&["0\ts\tabcd", "1\ti\tXYZ"]);

    pfac_mpm_cmd()
        .arg(patterns.path())
        .write_stdin("xxabcdxx\nno match here\nxyzxyz\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1: raw=1 ids=[0]"))
        .stdout(predicate::str::contains("3: raw=2 ids=[1]"));
}

#[test]
fn test_missing_pattern_file_is_an_error() {
    pfac_mpm_cmd()
        .arg("/nonexistent/path/to/patterns.txt")
        .assert()
        .failure();
}

#[test]
fn test_malformed_pattern_line_is_an_error() {
    let patterns = pattern_file(&["0\tx\tabcd"]);

    pfac_mpm_cmd()
        .arg(patterns.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown flags"));
}
