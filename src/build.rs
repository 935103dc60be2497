//! Build orchestration.
//!
//! A build runs `Idle → Initializing → Cataloging → Composing → Done`. The
//! first I/O error moves it to `Failed` and is returned as is; nothing is
//! retried. The whole catalog is built before the first page is composed.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::catalog::Catalog;
use crate::compose::compose;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::log::{LogEntry, LogScope, LogSink, MemoryLog, NullLog, Timed};
use crate::store::{FileStore, FsStore};
use crate::workspace::{find_files, CopyWorkspace, WorkspaceInit};

/// Every file with this suffix in the output tree is composed as a page.
pub const PAGE_SUFFIX: &str = ".html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildState {
    Idle,
    Initializing,
    Cataloging,
    Composing,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub name: String,
    pub path: PathBuf,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub path: PathBuf,
    pub bytes: usize,
    /// SHA-256 of the written HTML, hex encoded.
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub components: Vec<ComponentSummary>,
    pub pages: Vec<PageSummary>,
    pub elapsed_ns: u64,
}

pub struct Builder {
    config: BuildConfig,
    log: MemoryLog,
    state: Cell<BuildState>,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            log: MemoryLog::new(),
            state: Cell::new(BuildState::Idle),
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        self.state.get()
    }

    /// Log collected so far, including on the failure path.
    pub fn log(&self) -> &MemoryLog {
        &self.log
    }

    pub fn logs(&self) -> Vec<String> {
        self.log.lines()
    }

    /// Build against the local filesystem.
    pub fn build(&self) -> Result<BuildReport> {
        let sink = self.sink();
        let workspace = CopyWorkspace::new(sink);
        let store = FsStore::new(sink);
        self.build_with(&workspace, &store)
    }

    /// Build with caller-supplied workspace initializer and file store.
    pub fn build_with(
        &self,
        workspace: &dyn WorkspaceInit,
        store: &dyn FileStore,
    ) -> Result<BuildReport> {
        let result = self.run(workspace, store);
        if let Err(e) = &result {
            self.state.set(BuildState::Failed);
            tracing::error!(state = ?self.state(), "build failed: {}", e);
        }
        result
    }

    fn sink(&self) -> &dyn LogSink {
        if self.config.log {
            &self.log
        } else {
            &NullLog
        }
    }

    fn run(&self, workspace: &dyn WorkspaceInit, store: &dyn FileStore) -> Result<BuildReport> {
        let log = self.sink();
        let _timed = Timed::start(log, LogScope::Main, "main");
        let started = Instant::now();

        self.state.set(BuildState::Initializing);
        workspace.init(&self.config.frontend, &self.config.build_dir)?;
        let pages = discover_pages(&self.config.build_dir, log)?;

        self.state.set(BuildState::Cataloging);
        let catalog = Catalog::build(
            self.config.components_root(),
            &self.config.components_suffix,
            store,
            log,
        )?;

        self.state.set(BuildState::Composing);
        let mut written = Vec::with_capacity(pages.len());
        for page in pages {
            let raw = store.read(&page)?;
            let html = compose(&raw, &catalog, log);
            store.write(&page, &html)?;
            written.push(PageSummary {
                bytes: html.len(),
                sha256: digest(&html),
                path: page,
            });
        }

        log.record(LogEntry::note(LogScope::Main, "Finished building."));
        self.state.set(BuildState::Done);

        Ok(BuildReport {
            components: catalog
                .iter()
                .map(|c| ComponentSummary {
                    name: c.name.clone(),
                    path: c.path.clone(),
                    token: c.token.clone(),
                })
                .collect(),
            pages: written,
            elapsed_ns: started.elapsed().as_nanos() as u64,
        })
    }
}

fn discover_pages(root: &Path, log: &dyn LogSink) -> Result<Vec<PathBuf>> {
    let _timed = Timed::start(log, LogScope::Loader, "load_html_to_build");
    let pages = find_files(root, PAGE_SUFFIX)?;
    log.record(
        LogEntry::note(LogScope::Loader, "Loaded HTMLs.")
            .with_hints(format!("{} pages", pages.len())),
    );
    Ok(pages)
}

fn digest(html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html.as_bytes());
    format!("{:x}", hasher.finalize())
}
