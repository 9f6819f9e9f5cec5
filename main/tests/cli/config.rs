use predicates::prelude::*;
use serde_json::json;

use crate::support::*;

const CONFIG_PARAM: &str = "/iac/serverless-site/strall-com/config";

fn bind(t: &Test, descriptor: &str) {
    t.write("account_environments/current.json", descriptor);
    assert_success(&t.run(&["define-environment", "--env", "current", "--skip-policy"]));
}

#[test]
fn deploy_publishes_compact_config() {
    let t = Test::new();
    bind(&t, r#"{"name":"prod"}"#);
    t.write(
        "iac/prod/serverless-site/strall-com/config.json",
        "{\n  \"domain\": \"strall.com\",\n  \"cdn\": { \"ttl\": 300 }\n}\n",
    );

    t.cmd()
        .args(["deploy-config", "--config", "serverless-site/strall-com"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Deployed serverless-site/strall-com to {}.",
            CONFIG_PARAM
        )));
    assert_eq!(
        t.raw_parameter(CONFIG_PARAM).as_deref(),
        Some(r#"{"domain":"strall.com","cdn":{"ttl":300}}"#)
    );
}

#[test]
fn deploy_honors_prefix_from_the_environment() {
    let t = Test::new();
    bind(&t, r#"{"name":"dev"}"#);
    t.write("iac/dev/api/main/config.json", r#"{"port":8080}"#);

    t.cmd()
        .env("IAC_PARAM_PREFIX", "/platform/")
        .args(["deploy-config", "--component", "api", "--nickname", "main"])
        .assert()
        .success();
    assert_eq!(t.parameter("/platform/api/main/config"), Some(json!({"port": 8080})));
}

#[test]
fn deploy_without_environment_fails_unless_optional() {
    let t = Test::new();
    t.write("iac/prod/serverless-site/strall-com/config.json", "{}");

    t.cmd()
        .args(["deploy-config", "--config", "serverless-site/strall-com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist in the parameter store"));

    t.cmd()
        .args([
            "deploy-config",
            "--config",
            "serverless-site/strall-com",
            "--optional-environment",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipping deployment"));
    assert_eq!(t.raw_parameter(CONFIG_PARAM), None);
}

#[test]
fn deploy_fails_on_missing_config_file() {
    let t = Test::new();
    bind(&t, r#"{"name":"prod"}"#);

    t.cmd()
        .args(["deploy-config", "--config", "serverless-site/strall-com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
    assert_eq!(t.raw_parameter(CONFIG_PARAM), None);
}

#[test]
fn preview_clones_and_never_writes() {
    let t = Test::new();
    let repo = t.git_repo(
        "config-repo",
        "release",
        &[("prod/serverless-site/strall-com/config.json", r#"{ "from": "git" }"#)],
    );
    bind(
        &t,
        &format!(
            r#"{{"name":"prod","config_repo":"{}","config_branch":"release"}}"#,
            repo.display()
        ),
    );

    t.cmd()
        .args(["preview-config", "--config", "serverless-site/strall-com"])
        .assert()
        .success()
        .stdout(predicate::str::contains(CONFIG_PARAM))
        .stdout(predicate::str::contains(r#"{"from":"git"}"#));
    assert_eq!(t.raw_parameter(CONFIG_PARAM), None);
}

#[test]
fn preview_requires_a_repository() {
    let t = Test::new();
    bind(&t, r#"{"name":"prod"}"#);

    t.cmd()
        .args(["preview-config", "--config", "serverless-site/strall-com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing 'config_repo' field"));
}

#[test]
fn validate_config_against_cloned_repository() {
    let t = Test::new();
    let repo = t.git_repo(
        "config-repo",
        "main",
        &[
            ("dev/site/blog/config.json", r#"{"ok":true}"#),
            ("dev/site/broken/config.json", "{ nope"),
        ],
    );
    bind(
        &t,
        &format!(
            r#"{{"name":"dev","config_repo":"{}","config_branch":"main"}}"#,
            repo.display()
        ),
    );

    t.cmd()
        .args(["validate-config", "--config", "site/blog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev/site/blog/config.json exists and is valid JSON"));

    t.cmd()
        .args(["validate-config", "--component", "site", "--nickname", "missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found: dev/site/missing/config.json"));

    t.cmd()
        .args(["validate-config", "--config", "site/broken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not valid JSON"));
}

#[test]
fn validate_config_against_local_tree() {
    let t = Test::new();
    bind(&t, r#"{"name":"dev"}"#);
    t.write("configs/dev/site/blog/config.json", "[]");

    t.cmd()
        .args(["validate-config", "--config", "site/blog", "--config-root", "configs"])
        .assert()
        .success();
}
