use predicates::prelude::*;

use crate::support::*;

#[test]
fn help_lists_every_command() {
    let t = Test::new();
    let output = t.run(&["--help"]);
    assert_success(&output);
    let out = stdout(&output);
    for command in [
        "define-environment",
        "validate-environment",
        "show-environment",
        "deploy-config",
        "preview-config",
        "validate-config",
    ] {
        assert!(out.contains(command), "missing {command} in:\n{out}");
    }
}

#[test]
fn usage_errors_exit_with_two() {
    let t = Test::new();
    assert_exit_code(&t.run(&["unknown-command"]), 2);
    assert_exit_code(&t.run(&["deploy-config"]), 2);
    assert_exit_code(&t.run(&["validate-config", "--component", "site"]), 2);
}

#[test]
fn malformed_config_selector_fails() {
    let t = Test::new();
    t.cmd()
        .args(["validate-config", "--config", "site"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("<component>/<instance>"));
}

#[test]
fn environment_names_cannot_escape_the_directory() {
    let t = Test::new();
    t.cmd()
        .args(["define-environment", "--env", "../secrets"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid environment"));
}

#[test]
fn corrupt_stored_descriptor_is_reported() {
    let t = Test::new();
    t.write(
        "params.json",
        r#"{"parameters":{"/aws-config/environment":{"value":"not json","tier":"standard"}}}"#,
    );
    t.cmd()
        .arg("show-environment")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON in parameter /aws-config/environment"));
}

#[test]
fn explicit_settings_file_must_exist() {
    let t = Test::new();
    t.cmd()
        .args(["show-environment", "--settings", "missing.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}
