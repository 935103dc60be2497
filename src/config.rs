//! Build configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

pub const DEFAULT_COMPONENTS_SUFFIX: &str = ".components.html";
pub const DEFAULT_FRONTEND: &str = "frontend";
pub const DEFAULT_BUILD_DIR: &str = "dist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// File name suffix marking a component fragment.
    pub components_suffix: String,
    /// Frontend source tree.
    pub frontend: PathBuf,
    /// Output tree, wiped and recreated on every build.
    pub build_dir: PathBuf,
    /// Where component fragments are searched for. Defaults to `frontend`.
    pub components_dir: Option<PathBuf>,
    /// Collect operation notes and timings.
    pub log: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            components_suffix: DEFAULT_COMPONENTS_SUFFIX.to_string(),
            frontend: PathBuf::from(DEFAULT_FRONTEND),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            components_dir: None,
            log: true,
        }
    }
}

impl BuildConfig {
    pub fn new(
        components_suffix: impl Into<String>,
        frontend: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            components_suffix: components_suffix.into(),
            frontend: frontend.into(),
            build_dir: build_dir.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| BuildError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| BuildError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn components_root(&self) -> &Path {
        self.components_dir.as_deref().unwrap_or(&self.frontend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.components_suffix, ".components.html");
        assert_eq!(config.components_root(), Path::new("frontend"));
        assert!(config.log);
    }

    #[test]
    fn test_load_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yafb.json");
        fs::write(
            &path,
            r#"{ "buildDir": "public", "componentsDir": "frontend/parts", "log": false }"#,
        )
        .unwrap();

        let config = BuildConfig::load(&path).unwrap();
        assert_eq!(config.build_dir, PathBuf::from("public"));
        assert_eq!(config.frontend, PathBuf::from("frontend"));
        assert_eq!(config.components_root(), Path::new("frontend/parts"));
        assert!(!config.log);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            BuildConfig::load(&missing),
            Err(BuildError::ConfigIo { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            BuildConfig::load(&broken),
            Err(BuildError::Config { .. })
        ));
    }
}
