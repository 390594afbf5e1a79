//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool,
//! following behavior-driven testing principles.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a command for the lilylint CLI
fn lilylint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lilylint"))
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        lilylint_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        lilylint_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod init_command {
    use super::*;

    #[test]
    fn creates_config_file() {
        let temp = tempfile::tempdir().unwrap();

        lilylint_cmd()
            .current_dir(temp.path())
            .arg("init")
            .assert()
            .success();

        let content = std::fs::read_to_string(temp.path().join(".lilylint.json")).unwrap();
        assert!(content.contains("executable_path"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(".lilylint.json"), "{}").unwrap();

        lilylint_cmd()
            .current_dir(temp.path())
            .arg("init")
            .assert()
            .failure()
            .code(2);
    }

    #[test]
    fn overwrites_with_force() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(".lilylint.json"), "{}").unwrap();

        lilylint_cmd()
            .current_dir(temp.path())
            .arg("init")
            .arg("--force")
            .assert()
            .success();

        let content = std::fs::read_to_string(temp.path().join(".lilylint.json")).unwrap();
        assert!(content.contains("timeout_secs"));
    }
}

#[cfg(unix)]
mod check_command {
    use std::path::{Path, PathBuf};

    use super::*;

    /// Writes an executable shell script standing in for lilypond.
    fn stub_compiler(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-lilypond");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn clean_file_exits_zero() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(temp.path(), "cat > /dev/null");
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ c' e' g' }").unwrap();

        lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg(&stub)
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files, found 0 issues"));
    }

    #[test]
    fn errors_exit_one_and_are_reported() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(
            temp.path(),
            r#"cat > /dev/null; printf '%s\n' '-:1:3: error: not a note name: foo' >&2; exit 1"#,
        );
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ foo }").unwrap();

        lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg(&stub)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("1:3 error: not a note name: foo"));
    }

    #[test]
    fn warnings_alone_exit_zero() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(
            temp.path(),
            r#"cat > /dev/null; printf '%s\n' '-:2:1: warning: barcheck failed' >&2"#,
        );
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ c' }\n|").unwrap();

        lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg(&stub)
            .assert()
            .success()
            .stdout(predicate::str::contains("warning: barcheck failed"));
    }

    #[test]
    fn json_format_carries_positions() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(
            temp.path(),
            r#"cat > /dev/null; printf '%s\n' '-:1:3: error: not a note name: foo' >&2"#,
        );
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ foo }").unwrap();

        let output = lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg(&stub)
            .arg("--format")
            .arg("json")
            .output()
            .unwrap();

        let reports: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("valid JSON output");
        let report = &reports.as_array().unwrap()[0];
        assert_eq!(report["status"], "findings");
        let diag = &report["diagnostics"][0];
        assert_eq!(diag["severity"], "error");
        assert_eq!(diag["excerpt"], "not a note name: foo");
        // Zero-based word span over "foo".
        assert_eq!(diag["location"]["position"], serde_json::json!([[0, 2], [0, 5]]));
    }

    #[test]
    fn missing_executable_reports_failure() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ c' }").unwrap();

        lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg("/nonexistent/lilypond")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed to check"));
    }

    #[test]
    fn unknown_format_exits_two() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(temp.path(), "cat > /dev/null");
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ c' }").unwrap();

        lilylint_cmd()
            .arg("check")
            .arg(&source)
            .arg("--executable")
            .arg(&stub)
            .arg("--format")
            .arg("yaml")
            .assert()
            .code(2);
    }

    #[test]
    fn config_file_is_discovered_from_cwd() {
        let temp = tempfile::tempdir().unwrap();
        let stub = stub_compiler(temp.path(), "cat > /dev/null");
        let config = format!(r#"{{ "executable_path": "{}" }}"#, stub.display());
        std::fs::write(temp.path().join(".lilylint.json"), config).unwrap();
        let source = temp.path().join("test.ly");
        std::fs::write(&source, "{ c' }").unwrap();

        lilylint_cmd()
            .current_dir(temp.path())
            .arg("check")
            .arg("test.ly")
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }
}
