//! Walker - depth-first traversal that selects entries and dispatches actions

use std::fs::{DirEntry, ReadDir};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, trace};

use crate::error::FindError;

use super::action::{Dispatcher, Disposition};
use super::config::FindConfig;
use super::criteria::evaluate;
use super::entry::{EntryMetadata, join_entry};

/// Counts and recoverable errors from a finished walk.
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Entries an action was dispatched on
    pub matched: usize,
    /// Directories listed, including the root
    pub directories: usize,
    pub errors: Vec<FindError>,
}

impl WalkSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// (device, inode) of a directory, used to detect symlink cycles.
type DirId = (u64, u64);

/// One open directory listing. The stack of frames stands in for the call
/// stack of a recursive walk: a frame is pushed when a directory is entered
/// and popped (closing its handle) once its listing is exhausted.
struct Frame {
    path: PathBuf,
    entries: ReadDir,
    id: Option<DirId>,
}

/// Depth-first tree walker.
///
/// Every directory is descended into whether or not it matched. When no
/// criteria are set, directories are themselves selected before their
/// contents; otherwise criteria only select non-directory entries.
pub struct Walker<'a> {
    config: &'a FindConfig,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a FindConfig) -> Self {
        Self { config }
    }

    /// Walk `root`, writing printed output to `out` and passing every
    /// recoverable error to `report` as it happens.
    ///
    /// Returns `Err` only when writing output fails.
    pub fn walk<W, R>(
        &self,
        root: &Path,
        out: &mut W,
        mut report: R,
    ) -> Result<WalkSummary, FindError>
    where
        W: Write,
        R: FnMut(&FindError),
    {
        let mut dispatcher = Dispatcher::new(self.config, out);
        let mut summary = WalkSummary::default();
        let mut stack: Vec<Frame> = Vec::new();

        let mut record = |summary: &mut WalkSummary, err: FindError| {
            debug!(error = %err, "recoverable error");
            report(&err);
            summary.errors.push(err);
        };

        match self.open(root, &stack) {
            Ok(frame) => {
                summary.directories += 1;
                stack.push(frame);
            }
            Err(err) => record(&mut summary, err),
        }

        while let Some(frame) = stack.last_mut() {
            let dir_entry = match frame.entries.next() {
                None => {
                    trace!(path = %frame.path.display(), "leaving");
                    stack.pop();
                    continue;
                }
                Some(Ok(entry)) => entry,
                Some(Err(source)) => {
                    let err = FindError::ReadDir {
                        path: frame.path.clone(),
                        source,
                    };
                    record(&mut summary, err);
                    // A failing listing tends to keep failing
                    stack.pop();
                    continue;
                }
            };

            // read_dir never yields "." or ".."
            let entry = self.describe(&frame.path, &dir_entry);

            if entry.is_dir {
                if self.config.criteria.is_empty() {
                    match dispatcher.dispatch(&entry.full_path) {
                        Ok(Disposition::InPlace) => summary.matched += 1,
                        Ok(Disposition::Gone) => {
                            summary.matched += 1;
                            continue;
                        }
                        Err(err) if err.is_recoverable() => record(&mut summary, err),
                        Err(err) => return Err(err),
                    }
                }
                match self.open(&entry.full_path, &stack) {
                    Ok(frame) => {
                        summary.directories += 1;
                        stack.push(frame);
                    }
                    Err(err) => record(&mut summary, err),
                }
                continue;
            }

            let entry = match self.config.criteria.active() {
                Some(criterion) if criterion.needs_stat() => entry.probe(),
                _ => entry,
            };
            if let Some(err) = entry.stat_error() {
                debug!(error = %err, "treating entry as unmatched");
            }

            let selected = evaluate(&entry, &self.config.criteria, SystemTime::now());
            trace!(path = %entry.full_path.display(), selected, "evaluated");
            if !selected {
                continue;
            }
            match dispatcher.dispatch(&entry.full_path) {
                Ok(_) => summary.matched += 1,
                Err(err) if err.is_recoverable() => record(&mut summary, err),
                Err(err) => return Err(err),
            }
        }

        dispatcher.flush()?;
        Ok(summary)
    }

    /// Build the entry for a listing item of `parent`.
    fn describe(&self, parent: &Path, dir_entry: &DirEntry) -> EntryMetadata {
        let name = dir_entry.file_name();
        let full_path = join_entry(parent, &name);
        let is_dir = self.is_dir(dir_entry, &full_path);
        EntryMetadata::new(name, full_path, is_dir)
    }

    /// Directory check based on the listing's own type information. Symlinks
    /// count as directories only when following links.
    fn is_dir(&self, entry: &DirEntry, full_path: &Path) -> bool {
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => true,
            Ok(ft) if ft.is_symlink() && self.config.follow_links => {
                std::fs::metadata(full_path).is_ok_and(|m| m.is_dir())
            }
            _ => false,
        }
    }

    fn open(&self, path: &Path, ancestors: &[Frame]) -> Result<Frame, FindError> {
        let id = if self.config.follow_links {
            let id = dir_id(path);
            if id.is_some() && ancestors.iter().any(|f| f.id == id) {
                return Err(FindError::SymlinkCycle(path.to_path_buf()));
            }
            id
        } else {
            None
        };

        let entries = std::fs::read_dir(path).map_err(|source| FindError::OpenDir {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "descending");
        Ok(Frame {
            path: path.to_path_buf(),
            entries,
            id,
        })
    }
}

#[cfg(unix)]
fn dir_id(path: &Path) -> Option<DirId> {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).ok().map(|m| (m.dev(), m.ino()))
}

#[cfg(not(unix))]
fn dir_id(_path: &Path) -> Option<DirId> {
    None
}
