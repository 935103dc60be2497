//! # YAFB (Yet Another Frontend Builder)
//!
//! Assembles a deployable frontend tree from a source tree:
//!
//! 1. **Workspace**: the output directory is wiped and the frontend source
//!    tree is copied into it.
//! 2. **Catalog**: every `*.components.html` fragment is loaded, its embedded
//!    `<style>` block scoped with a random suffix.
//! 3. **Compose**: each `.html` page in the output tree gets its own CSS
//!    scoped, every `:name;` placeholder replaced with the component markup,
//!    all style blocks moved before `</head>`, and newlines and double spaces
//!    stripped. The page is written back in place.
//!
//! CSS and HTML are matched with regular expressions, not parsed. See
//! [`selector`] and [`scope`] for exactly what is and is not recognised.
//!
//! Builds are synchronous and single-threaded. Each [`Builder`] owns its
//! catalog for the duration of one build, so separate builders never share
//! state.

pub mod build;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod error;
pub mod log;
pub mod scope;
pub mod selector;
pub mod store;
pub mod workspace;


pub use build::{BuildReport, BuildState, Builder};
pub use catalog::{Catalog, Component};
pub use compose::{compact, compose};
pub use config::BuildConfig;
pub use error::{BuildError, Result};
pub use log::{LogEntry, LogSink, MemoryLog, NullLog};
pub use scope::{scope, Scoped};
pub use selector::{extract, SelectorSet};
pub use store::{FileStore, FsStore};
pub use workspace::{CopyWorkspace, WorkspaceInit};
