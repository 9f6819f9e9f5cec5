use predicates::prelude::*;
use serde_json::json;

use crate::support::*;

const PARAM: &str = "/aws-config/environment";

#[test]
fn define_then_validate_succeeds() {
    let t = Test::new();
    t.write(
        "account_environments/prod.json",
        r#"{"name":"prod","region":"us-east-1"}"#,
    );

    t.cmd()
        .args(["define-environment", "--env", "prod", "--skip-policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parameter written successfully."));
    assert_eq!(
        t.parameter(PARAM),
        Some(json!({"name": "prod", "region": "us-east-1"}))
    );

    t.cmd()
        .args(["validate-environment", "--env", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("matches environment 'prod'"));
}

#[test]
fn define_twice_leaves_the_same_value() {
    let t = Test::new();
    t.write("account_environments/dev.json", r#"{"environment":"dev"}"#);

    assert_success(&t.run(&["define-environment", "--env", "dev", "--skip-policy"]));
    let first = t.raw_parameter(PARAM);
    assert_success(&t.run(&["define-environment", "--env", "dev", "--skip-policy"]));
    assert_eq!(t.raw_parameter(PARAM), first);
    assert_eq!(first.as_deref(), Some(r#"{"name":"dev"}"#));
}

#[test]
fn validate_reports_each_mismatch() {
    let t = Test::new();
    t.write(
        "account_environments/prod.json",
        r#"{"name":"prod","region":"us-east-1"}"#,
    );
    assert_success(&t.run(&["define-environment", "--env", "prod", "--skip-policy"]));
    t.write(
        "account_environments/prod.json",
        r#"{"name":"prod","region":"us-west-2","owner":"platform"}"#,
    );

    let output = t.run(&["validate-environment", "--env", "prod"]);
    assert_exit_code(&output, 1);
    let out = stdout(&output);
    assert!(out.contains(" - region: expected us-west-2, got us-east-1"), "{out}");
    assert!(out.contains(" - owner: expected platform, got <missing>"), "{out}");
    assert!(!out.contains(" - name:"), "{out}");
}

#[test]
fn descriptor_without_name_is_never_written() {
    let t = Test::new();
    t.write("account_environments/dev.json", r#"{"region":"us-east-1"}"#);

    t.cmd()
        .args(["define-environment", "--env", "dev"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing 'name' field"));
    assert!(!t.store_path().exists());
}

#[test]
fn missing_descriptor_file_fails() {
    let t = Test::new();
    t.cmd()
        .args(["define-environment", "--env", "staging", "--skip-policy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn policy_is_attached_only_on_advanced_tier() {
    let t = Test::new();
    t.write("account_environments/prod.json", r#"{"name":"prod"}"#);

    t.cmd()
        .args(["define-environment", "--env", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not supported on the standard tier"));

    t.cmd()
        .args([
            "define-environment",
            "--env",
            "prod",
            "--tier",
            "advanced",
            "--allow-role",
            "Deployer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Only arn:aws:iam::000000000000:role/Deployer may modify /aws-config/environment.",
        ));

    let store: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(t.store_path()).unwrap()).unwrap();
    let policy = &store["policies"]["arn:aws:ssm:local:000000000000:parameter/aws-config/environment"];
    assert_eq!(policy["Statement"][0]["Effect"], "Deny");
    assert_eq!(store["parameters"][PARAM]["tier"], "advanced");
}

#[test]
fn show_environment_prints_the_stored_descriptor() {
    let t = Test::new();
    t.write(
        "account_environments/dev.json",
        r#"{"name":"dev","config_repo":"https://example.com/cfg.git"}"#,
    );
    assert_success(&t.run(&["define-environment", "--env", "dev", "--skip-policy"]));

    t.cmd()
        .arg("show-environment")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"dev\""))
        .stdout(predicate::str::contains(
            "\"config_repo\": \"https://example.com/cfg.git\"",
        ));
}

#[test]
fn legacy_directory_and_settings_file_are_honored() {
    let t = Test::new();
    t.write("account-environments/dev.json", r#"{"name":"dev"}"#);
    t.write("envctl.yaml", "environment_param: /iac-config/environment\n");

    assert_success(&t.run(&["define-environment", "--env", "dev", "--skip-policy"]));
    assert_eq!(t.parameter("/iac-config/environment"), Some(json!({"name": "dev"})));
    assert_eq!(t.parameter(PARAM), None);

    t.cmd()
        .args(["show-environment", "--param-name", "/iac-config/environment"])
        .assert()
        .success();
}

#[test]
fn param_name_can_come_from_the_environment() {
    let t = Test::new();
    t.write("account_environments/dev.json", r#"{"name":"dev"}"#);

    t.cmd()
        .env("ENVCTL_ENVIRONMENT_PARAM", "/iac/environment")
        .args(["define-environment", "--env", "dev", "--skip-policy"])
        .assert()
        .success();
    assert_eq!(t.parameter("/iac/environment"), Some(json!({"name": "dev"})));
}
