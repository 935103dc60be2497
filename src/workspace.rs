//! Output tree preparation and file discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{BuildError, Result};
use crate::log::{LogEntry, LogScope, LogSink, Timed};

/// Produces a clean output tree mirroring the source tree.
pub trait WorkspaceInit {
    fn init(&self, source: &Path, output: &Path) -> Result<()>;
}

/// Removes any previous output tree and copies the source tree in its place.
pub struct CopyWorkspace<'a> {
    log: &'a dyn LogSink,
}

impl<'a> CopyWorkspace<'a> {
    pub fn new(log: &'a dyn LogSink) -> Self {
        Self { log }
    }
}

impl WorkspaceInit for CopyWorkspace<'_> {
    fn init(&self, source: &Path, output: &Path) -> Result<()> {
        let _timed = Timed::start(self.log, LogScope::Main, "init_build_dir");

        if output.exists() {
            fs::remove_dir_all(output).map_err(|source| BuildError::Workspace {
                path: output.to_path_buf(),
                source,
            })?;
        }
        self.log
            .record(LogEntry::child(LogScope::Main, "Removed old directory."));

        copy_tree(source, output)?;
        self.log
            .record(LogEntry::child(LogScope::Main, "Copied build directory."));

        self.log
            .record(LogEntry::note(LogScope::Main, "Initialized build directory."));
        Ok(())
    }
}

fn copy_tree(source: &Path, output: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(source) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = output.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(workspace_err(&target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(workspace_err(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(workspace_err(&target))?;
        }
    }

    Ok(())
}

fn workspace_err(path: &Path) -> impl FnOnce(io::Error) -> BuildError {
    let path = path.to_path_buf();
    move |source| BuildError::Workspace { path, source }
}

/// Recursively find every file under `root` whose name ends with `suffix`,
/// in a stable (file-name sorted) walk order.
pub fn find_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(suffix) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{MemoryLog, NullLog};

    #[test]
    fn test_copy_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("frontend");
        let output = dir.path().join("dist");
        fs::create_dir_all(source.join("components")).unwrap();
        fs::write(source.join("index.html"), "index").unwrap();
        fs::write(source.join("components/nav.components.html"), "nav").unwrap();
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.html"), "old").unwrap();

        let log = MemoryLog::new();
        CopyWorkspace::new(&log).init(&source, &output).unwrap();

        assert!(!output.join("stale.html").exists());
        assert_eq!(fs::read_to_string(output.join("index.html")).unwrap(), "index");
        assert_eq!(
            fs::read_to_string(output.join("components/nav.components.html")).unwrap(),
            "nav"
        );
        assert!(log
            .lines()
            .iter()
            .any(|l| l.contains("MAIN.main: Initialized build directory.")));
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            CopyWorkspace::new(&NullLog).init(&dir.path().join("nope"), &dir.path().join("dist"));
        assert!(matches!(result, Err(BuildError::Walk(_))));
    }

    #[test]
    fn test_find_files_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/z.html"), "").unwrap();
        fs::write(root.join("a.html"), "").unwrap();
        fs::write(root.join("style.css"), "").unwrap();
        fs::write(root.join("b/card.components.html"), "").unwrap();

        let pages = find_files(root, ".html").unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.html", "b/card.components.html", "b/z.html"]);

        let components = find_files(root, ".components.html").unwrap();
        assert_eq!(components.len(), 1);
    }
}
