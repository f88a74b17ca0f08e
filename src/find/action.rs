//! Action dispatch for selected entries

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::FindError;

use super::config::{Action, FindConfig};

/// What an action left behind at the entry's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The entry is still where it was
    InPlace,
    /// The entry was deleted or moved away
    Gone,
}

/// Runs the configured action on selected paths, writing printed paths and
/// viewer output to `out`.
///
/// External commands are spawned and waited on so control always returns to
/// the walker.
pub struct Dispatcher<'a, W: Write> {
    config: &'a FindConfig,
    out: &'a mut W,
}

impl<'a, W: Write> Dispatcher<'a, W> {
    pub fn new(config: &'a FindConfig, out: &'a mut W) -> Self {
        Self { config, out }
    }

    pub fn dispatch(&mut self, path: &Path) -> Result<Disposition, FindError> {
        let config = self.config;
        debug!(path = %path.display(), action = ?config.action, "dispatch");
        match &config.action {
            Action::Print => {
                write_path_line(self.out, path).map_err(FindError::Output)?;
                Ok(Disposition::InPlace)
            }
            Action::Delete => delete(path),
            Action::View => self.view(path),
            Action::Move { destination } => self.relocate(path, destination),
        }
    }

    /// Flush buffered output, e.g. before a child process writes to the
    /// same terminal.
    pub fn flush(&mut self) -> Result<(), FindError> {
        self.out.flush().map_err(FindError::Output)
    }

    fn view(&mut self, path: &Path) -> Result<Disposition, FindError> {
        let program = &self.config.viewer;
        // Captured and forwarded so it interleaves with printed paths
        let output = Command::new(program)
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| spawn_error(program, path, source))?;

        self.out.write_all(&output.stdout).map_err(FindError::Output)?;
        if !output.status.success() {
            return Err(FindError::CommandFailed {
                program: program.clone(),
                path: path.to_path_buf(),
                status: output.status,
            });
        }
        Ok(Disposition::InPlace)
    }

    fn relocate(&mut self, path: &Path, destination: &Path) -> Result<Disposition, FindError> {
        self.flush()?;
        let program = &self.config.mover;
        let status = Command::new(program)
            .arg(path)
            .arg(destination)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| spawn_error(program, path, source))?;

        if !status.success() {
            return Err(FindError::CommandFailed {
                program: program.clone(),
                path: path.to_path_buf(),
                status,
            });
        }
        Ok(Disposition::Gone)
    }
}

/// Write `path` followed by a newline, byte for byte where the platform allows.
#[cfg(unix)]
fn write_path_line<W: Write>(out: &mut W, path: &Path) -> std::io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b"\n")
}

#[cfg(not(unix))]
fn write_path_line<W: Write>(out: &mut W, path: &Path) -> std::io::Result<()> {
    writeln!(out, "{}", path.display())
}

/// Remove a file, or a directory if it is empty.
fn delete(path: &Path) -> Result<Disposition, FindError> {
    let is_dir = std::fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let result = if is_dir {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    };
    result
        .map(|_| Disposition::Gone)
        .map_err(|source| FindError::Delete {
            path: path.to_path_buf(),
            source,
        })
}

fn spawn_error(program: &str, path: &Path, source: std::io::Error) -> FindError {
    FindError::Spawn {
        program: program.to_string(),
        path: path.to_path_buf(),
        source,
    }
}
