use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("baseline-lint").unwrap()
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Baseline compatibility checker for CSS declarations",
        ))
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("prefetch"));
}

#[test]
fn test_cli_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline-lint"));
}

#[test]
fn test_check_unknown_property() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["check", "color-scheme", "light dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_check_heuristic_json_output() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--output", "json", "check", "margin-top", "10px"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"baseline\""))
        .stdout(predicate::str::contains("\"source\": \"heuristic\""));
}

#[test]
fn test_lint_clean_file_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let css = dir.path().join("clean.css");
    std::fs::write(&css, ".a { margin-top: 10px; }\n").unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["lint", "clean.css"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 warnings"));
}

#[test]
fn test_lint_reports_exception_warning() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data/exceptions.json"),
        r#"{ "css.properties.word-break.auto-phrase": { "reason": "limited Safari support" } }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("page.css"),
        ".a { word-break: auto-phrase; }\n",
    )
    .unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["lint", "page.css"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not Baseline"))
        .stdout(predicate::str::contains("limited Safari support"));
}

#[test]
fn test_lint_missing_file_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["lint", "no-such-file.css"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_data_dir_override() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("kb")).unwrap();
    std::fs::write(
        dir.path().join("kb/web-features.json"),
        r#"{ "grid": {
            "compat_features": ["css.properties.display.grid"],
            "status": { "baseline": true }
        } }"#,
    )
    .unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--data-dir", "kb", "check", "display", "grid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline"))
        .stdout(predicate::str::contains("catalog"));
}

#[test]
fn test_config_show() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[network]"))
        .stdout(predicate::str::contains("enabled = false"));
}

#[test]
fn test_config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    assert!(dir.path().join("baseline.toml").exists());
}
