use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::{define_cli_error, CliError};

define_cli_error!(TemporaryDirectoryError, "Temporary directory error: {details}.", { details: &str });

/// Perform an operation inside a fresh temporary directory.
///
/// The directory is removed once `op` returns, whether it succeeded or not.
/// If `op` failed, its error is returned even when cleanup also fails. As with
/// any drop-based cleanup, a hard exit (ex. process::exit) while `op` runs
/// leaves the directory behind.
pub fn with_tmp_dir<F, R>(prefix: &str, op: F) -> Result<R, CliError>
where
    F: FnOnce(&Path) -> Result<R, CliError>,
{
    let temp_dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|e| TemporaryDirectoryError::with_debug("failed to create directory", &e))?;
    debug!(path = %temp_dir.path().display(), "created temporary directory");
    let result = op(temp_dir.path());
    let cleanup = close(temp_dir);
    let value = result?;
    cleanup?;
    Ok(value)
}

fn close(temp_dir: TempDir) -> Result<(), CliError> {
    let path = temp_dir.path().display().to_string();
    temp_dir
        .close()
        .map_err(|e| TemporaryDirectoryError::with_debug("failed to remove directory", &e))?;
    debug!(path = %path, "removed temporary directory");
    Ok(())
}
