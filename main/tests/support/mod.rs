//! Shared setup for envctl integration tests.
//!
//! Every test runs the binary in its own scratch directory against a
//! file-backed parameter store, so no AWS access is needed.

#![allow(dead_code)]

use std::{fs, path::Path, path::PathBuf, process::Output};

use assert_cmd::Command;
use git2::{IndexAddOption, Repository, Signature};
use serde_json::Value;
use tempfile::TempDir;

const CLEARED_VARS: &[&str] = &[
    "ENVCTL_SETTINGS",
    "ENVCTL_LOCAL_STORE",
    "ENVCTL_ENVIRONMENT_PARAM",
    "ENVCTL_LOG",
    "IAC_PARAM_PREFIX",
    "AWS_PROFILE",
    "AWS_REGION",
];

pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        Test {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn store_path(&self) -> PathBuf {
        self.path("params.json")
    }

    /// `envctl` in the scratch directory, wired to the local store.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envctl").expect("failed to find envctl binary");
        for var in CLEARED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd.arg("--local-store").arg(self.store_path());
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run envctl")
    }

    pub fn write(&self, relative: &str, content: &str) {
        write_file(self.dir.path(), relative, content);
    }

    /// Value stored under `name`, parsed as JSON.
    pub fn parameter(&self, name: &str) -> Option<Value> {
        let content = fs::read_to_string(self.store_path()).ok()?;
        let store: Value = serde_json::from_str(&content).expect("store is valid JSON");
        let value = store["parameters"][name]["value"].as_str()?;
        Some(serde_json::from_str(value).expect("parameter is valid JSON"))
    }

    /// Raw string value stored under `name`.
    pub fn raw_parameter(&self, name: &str) -> Option<String> {
        let content = fs::read_to_string(self.store_path()).ok()?;
        let store: Value = serde_json::from_str(&content).expect("store is valid JSON");
        store["parameters"][name]["value"].as_str().map(str::to_string)
    }

    /// Git repository under the scratch directory with one commit on `branch`.
    pub fn git_repo(&self, relative: &str, branch: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.path(relative);
        let repo = Repository::init(&dir).expect("failed to init repository");
        for (path, content) in files {
            write_file(&dir, path, content);
        }
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("envctl", "envctl@example.com").unwrap();
        let reference = format!("refs/heads/{}", branch);
        repo.commit(Some(&reference), &signature, &signature, "initial", &tree, &[])
            .unwrap();
        repo.set_head(&reference).unwrap();
        dir
    }
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success\nstdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

pub fn assert_exit_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}
