use std::path::Path;

use crate::{CliError, IOError, MissingLocalFile};

#[track_caller]
pub fn read_file<P>(path: P) -> Result<String, CliError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.is_file() {
        return Err(MissingLocalFile::new(&path.display()));
    }
    std::fs::read_to_string(path).map_err(|e| IOError::with_debug(&e))
}

#[track_caller]
pub fn write_file<P, C>(path: P, content: C) -> Result<(), CliError>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    std::fs::write(path, content).map_err(|e| IOError::with_debug(&e))?;
    Ok(())
}

#[track_caller]
pub fn mkdir_p<P>(path: P) -> Result<(), CliError>
where
    P: AsRef<Path>,
{
    std::fs::create_dir_all(path).map_err(|e| IOError::with_debug(&e))?;
    Ok(())
}
