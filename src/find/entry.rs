//! Per-entry metadata gathered during a walk

use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::FindError;

/// Status information read with `stat` (links followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub inode: u64,
    pub modified: SystemTime,
}

impl Stat {
    pub fn from_metadata(meta: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            inode: inode_of(meta),
            modified: meta.modified()?,
        })
    }

    pub fn read(path: &Path) -> Result<Self, FindError> {
        std::fs::metadata(path)
            .and_then(|meta| Self::from_metadata(&meta))
            .map_err(|source| FindError::Metadata {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(unix)]
fn inode_of(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.ino()
}

#[cfg(not(unix))]
fn inode_of(_meta: &Metadata) -> u64 {
    0
}

/// A single directory entry as seen by the criteria evaluator.
///
/// `full_path` is always `root/name` for the directory being listed, with no
/// normalization. `stat` is only read when a criterion needs it; when that
/// read fails it holds the error and the entry never matches.
#[derive(Debug)]
pub struct EntryMetadata {
    pub name: OsString,
    pub full_path: PathBuf,
    pub is_dir: bool,
    pub stat: Option<Result<Stat, FindError>>,
}

impl EntryMetadata {
    pub fn new(name: OsString, full_path: PathBuf, is_dir: bool) -> Self {
        Self {
            name,
            full_path,
            is_dir,
            stat: None,
        }
    }

    /// Read `stat` for this entry if it has not been read yet.
    pub fn probe(mut self) -> Self {
        if self.stat.is_none() {
            self.stat = Some(Stat::read(&self.full_path));
        }
        self
    }

    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.stat = Some(Ok(stat));
        self
    }

    /// Stat fields, if they were read successfully.
    pub fn stat(&self) -> Option<&Stat> {
        self.stat.as_ref().and_then(|s| s.as_ref().ok())
    }

    /// The metadata error, if reading stat failed.
    pub fn stat_error(&self) -> Option<&FindError> {
        self.stat.as_ref().and_then(|s| s.as_ref().err())
    }
}

/// Join a directory and an entry name the way the walker reports paths:
/// `dir/name`, no separator collapsing.
pub fn join_entry(dir: &Path, name: &std::ffi::OsStr) -> PathBuf {
    let mut joined = dir.as_os_str().to_os_string();
    joined.push("/");
    joined.push(name);
    PathBuf::from(joined)
}
