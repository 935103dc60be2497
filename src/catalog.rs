//! Component catalog.
//!
//! Scans a directory for component fragments (files ending in the configured
//! suffix, `.components.html` by default), scopes each one and keeps the
//! result keyed by name. A catalog is built once per build and read-only
//! afterwards.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::log::{LogEntry, LogScope, LogSink, Timed};
use crate::scope;
use crate::store::FileStore;
use crate::workspace::find_files;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub path: PathBuf,
    pub html: String,
    pub css: String,
    /// Brackets the inlined markup. Unrelated to the scoping suffix.
    pub token: String,
}

/// Components in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<Component>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` for files ending in `suffix` and scope each of them.
    ///
    /// A read failure aborts the whole scan.
    pub fn build(
        root: &Path,
        suffix: &str,
        store: &dyn FileStore,
        log: &dyn LogSink,
    ) -> Result<Self> {
        let _timed = Timed::start(log, LogScope::Loader, "load_components_data");

        let mut found = Vec::new();
        for path in find_files(root, suffix)? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = file_name
                .strip_suffix(suffix)
                .unwrap_or(&file_name)
                .to_string();

            log.record(LogEntry::child(
                LogScope::Loader,
                format!("Found component '{}'", name),
            ));
            found.push((name, path));
        }

        let mut catalog = Catalog::new();
        for (name, path) in found {
            let source = store.read(&path)?;
            let scoped = scope::scope(&source, log);
            catalog.insert(Component {
                name,
                path,
                html: scoped.html,
                css: scoped.css,
                token: scope::random_token(),
            });
        }

        log.record(LogEntry::note(
            LogScope::Loader,
            "Done loading components's HTML and CSS.",
        ));
        Ok(catalog)
    }

    /// Add a component. A component with the same name is replaced in place,
    /// keeping its original position.
    pub fn insert(&mut self, component: Component) {
        match self.index.get(&component.name) {
            Some(&i) => self.components[i] = component,
            None => {
                self.index
                    .insert(component.name.clone(), self.components.len());
                self.components.push(component);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::log::{MemoryLog, NullLog};
    use crate::store::FsStore;
    use std::fs;

    const SUFFIX: &str = ".components.html";

    fn component(name: &str, html: &str) -> Component {
        Component {
            name: name.to_string(),
            path: PathBuf::from(format!("{}{}", name, SUFFIX)),
            html: html.to_string(),
            css: String::new(),
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_insert_last_wins_keeps_position() {
        let mut catalog = Catalog::new();
        catalog.insert(component("header", "first"));
        catalog.insert(component("footer", "f"));
        catalog.insert(component("header", "second"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("header").unwrap().html, "second");
        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["header", "footer"]);
    }

    #[test]
    fn test_build_scopes_components() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("components")).unwrap();
        fs::write(
            root.join("components/nav.components.html"),
            "<style>.link { color: blue; }</style><a class=\"link\">Home</a>",
        )
        .unwrap();
        fs::write(root.join("components/plain.components.html"), "<b>plain</b>").unwrap();
        fs::write(root.join("index.html"), ":nav;").unwrap();

        let log = MemoryLog::new();
        let store = FsStore::new(&log);
        let catalog = Catalog::build(root, SUFFIX, &store, &log).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("index").is_none());

        let nav = catalog.get("nav").unwrap();
        assert!(nav.html.starts_with("<a class=\"link-"));
        assert!(nav.css.starts_with(".link-"));
        assert_eq!(nav.token.len(), 64);
        assert!(!nav.css.contains(&nav.token));

        let plain = catalog.get("plain").unwrap();
        assert_eq!(plain.html, "<b>plain</b>");
        assert_eq!(plain.css, "");
        assert_ne!(plain.token, nav.token);

        let lines = log.lines();
        assert!(lines.iter().any(|l| l.contains("LOADER.child: Found component 'nav'")));
        assert!(lines.iter().any(|l| l.contains("'load_components_data'")));
    }

    #[test]
    fn test_duplicate_names_last_discovered_wins() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/card.components.html"), "from a").unwrap();
        fs::write(root.join("b/card.components.html"), "from b").unwrap();

        let catalog = Catalog::build(root, SUFFIX, &FsStore::new(&NullLog), &NullLog).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("card").unwrap().html, "from b");
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::build(
            &dir.path().join("missing"),
            SUFFIX,
            &FsStore::new(&NullLog),
            &NullLog,
        );
        assert!(matches!(result, Err(BuildError::Walk(_))));
    }
}
