//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// Provides methods for creating files and directories and for backdating
/// modification times. The tree is removed when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a directory (and any missing parents).
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Set a file's modification time to `age` before now.
    pub fn backdate(&self, path: &str, age: Duration) {
        let full_path = self.dir.path().join(path);
        fs::File::options()
            .write(true)
            .open(&full_path)
            .expect("Failed to open file")
            .set_modified(SystemTime::now() - age)
            .expect("Failed to set mtime");
    }

    /// Inode number of an entry in the tree.
    #[cfg(unix)]
    pub fn inode(&self, path: &str) -> u64 {
        use std::os::unix::fs::MetadataExt;
        fs::metadata(self.dir.path().join(path))
            .expect("Failed to stat")
            .ino()
    }

    /// Build a chain of `dirs` nested directories, each holding `files` files.
    pub fn populate(&self, dirs: usize, files: usize) {
        let mut current = String::new();
        for d in 0..dirs {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(&format!("dir{}", d));
            for f in 0..files {
                self.add_file(&format!("{}/file{}.txt", current, f), "content");
            }
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
