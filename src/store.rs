//! Whole-file text storage.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::log::{LogEntry, LogScope, LogSink, Timed};

/// Read and write whole text files.
///
/// `read` fails when the path does not exist; `write` fails when the file
/// cannot be created. Writes are not atomic: a crash mid-write can leave a
/// truncated file behind.
pub trait FileStore {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// [`FileStore`] backed by the local filesystem, UTF-8 only.
pub struct FsStore<'a> {
    log: &'a dyn LogSink,
}

impl<'a> FsStore<'a> {
    pub fn new(log: &'a dyn LogSink) -> Self {
        Self { log }
    }

    fn note(&self, path: &Path, mode: &str) {
        self.log.record(LogEntry::note(
            LogScope::FileIo,
            format!("Working with file '{}', with mode '{}'.", path.display(), mode),
        ));
    }
}

impl FileStore for FsStore<'_> {
    fn read(&self, path: &Path) -> Result<String> {
        let _timed = Timed::start(self.log, LogScope::FileIo, "fileio");
        let path = normalize(path);
        self.note(&path, "read");

        fs::read_to_string(&path).map_err(|source| BuildError::Read { path, source })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let _timed = Timed::start(self.log, LogScope::FileIo, "fileio");
        let path = normalize(path);
        self.note(&path, "write");

        fs::write(&path, contents).map_err(|source| BuildError::Write { path, source })
    }
}

/// Lexically collapse `.` and `..` segments without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
