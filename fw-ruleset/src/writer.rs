use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::backend::Backend;
use crate::render::RenderError;
use crate::rule::FirewallConfig;

/// Errors that can occur while writing a rendered script.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The ruleset could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Failed to create the output directory or file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Render `config` for `backend` and write it into `dir`.
///
/// The directory is created if missing. Returns the path of the written file.
pub fn write_script(
    config: &FirewallConfig,
    backend: Backend,
    dir: &Path,
) -> Result<PathBuf, WriteError> {
    let script = backend.render(config)?;
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

    let path = dir.join(backend.script_file_name());
    fs::write(&path, script).map_err(|source| io_error(&path, source))?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), WriteError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|source| io_error(path, source))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), WriteError> {
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.display().to_string(),
        source,
    }
}
