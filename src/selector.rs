//! Selector extraction.
//!
//! Finds the class and id names a CSS block defines. Matching is syntactic: a
//! selector counts only when the name is immediately followed by ` {`. Combined
//! selectors (`.a.b {`), pseudo-classes (`.a:hover {`) and `.a{` are not
//! detected, and so are never scoped.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CLASS_SELECTOR: Regex = Regex::new(r"\.([a-zA-Z0-9_-]+) \{").unwrap();
    static ref ID_SELECTOR: Regex = Regex::new(r"#([a-zA-Z0-9_-]+) \{").unwrap();
}

/// Class and id names defined by a CSS block, each listed once in order of
/// first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    pub class_names: Vec<String>,
    pub id_names: Vec<String>,
}

impl SelectorSet {
    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty() && self.id_names.is_empty()
    }
}

pub fn extract(css: &str) -> SelectorSet {
    SelectorSet {
        class_names: collect_unique(&CLASS_SELECTOR, css),
        id_names: collect_unique(&ID_SELECTOR, css),
    }
}

fn collect_unique(re: &Regex, css: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in re.captures_iter(css) {
        if let Some(m) = cap.get(1) {
            if !names.iter().any(|n| n == m.as_str()) {
                names.push(m.as_str().to_string());
            }
        }
    }
    names
}
