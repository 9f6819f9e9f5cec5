use std::{cell::Cell, path::Path};

use git2::{build::RepoBuilder, Cred, CredentialType, FetchOptions, RemoteCallbacks};
use lib_core::{
    with_tmp_dir, CliError, CloneFailure, Printer, TemporaryDirectoryError, TMP_CLONE_PREFIX,
};
use tracing::debug;

const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Whether libgit2 negotiates a shallow fetch for this URL. Its local
/// transport does not, so local paths (and `file://`) get a full clone.
fn supports_shallow_fetch(url: &str) -> bool {
    const NETWORK_SCHEMES: &[&str] = &["http://", "https://", "ssh://", "git://"];
    if NETWORK_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return true;
    }
    // scp-like syntax: user@host:path
    match (url.find('@'), url.find(':')) {
        (Some(at), Some(colon)) => at < colon && !url.contains("://"),
        _ => false,
    }
}

fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let attempts = Cell::new(0);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        // libgit2 keeps asking as long as credentials are rejected.
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("credentials rejected"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            Cred::credential_helper(&config, url, username_from_url)
        } else {
            Cred::default()
        }
    });
    callbacks
}

/// Clones only `branch` of `url` into `destination`, which must be empty or
/// not exist yet.
pub fn clone_branch_to(
    pr: &Printer,
    url: &str,
    branch: &str,
    destination: &Path,
) -> Result<(), CliError> {
    pr.info(&format!("Cloning branch '{}' of {}...", branch, url));
    let shallow = supports_shallow_fetch(url);
    debug!(url, branch, shallow, destination = %destination.display(), "cloning repository");

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks());
    if shallow {
        fetch_options.depth(1);
    }

    let refspec = format!("+refs/heads/{0}:refs/remotes/origin/{0}", branch);
    let mut builder = RepoBuilder::new();
    builder
        .branch(branch)
        .fetch_options(fetch_options)
        .remote_create(|repo, name, url| repo.remote_with_fetch(name, url, &refspec));
    builder
        .clone(url, destination)
        .map_err(|e| CloneFailure::with_debug(url, branch, &e))?;
    Ok(())
}

/// Runs `f` against a fresh checkout of `branch`, removing the checkout
/// afterwards on every path, including a failed clone.
pub fn with_repository_snapshot<F, R>(
    pr: &Printer,
    url: &str,
    branch: &str,
    f: F,
) -> Result<R, CliError>
where
    F: FnOnce(&Path) -> Result<R, CliError>,
{
    pr.info("Temporarily cloning configuration repository...");
    let result = with_tmp_dir(TMP_CLONE_PREFIX, |checkout| {
        clone_branch_to(pr, url, branch, checkout)?;
        f(checkout)
    });
    if checkout_removed(&result) {
        pr.debug("Cleaned up temporary clone.");
    }
    result
}

/// False when creating or removing the temporary directory itself failed.
fn checkout_removed<R>(result: &Result<R, CliError>) -> bool {
    !matches!(result, Err(e) if e.is::<TemporaryDirectoryError>())
}
