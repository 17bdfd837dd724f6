//! Per-directory test configuration
//!
//! A `testing.toml` file names the file suffixes that identify tests and the
//! environment variables those tests run with:
//!
//! ```toml
//! suffixes = [".c", ".cpp"]
//!
//! [environment]
//! PATH = "/usr/bin"
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::{Error, Result};

/// File name searched for by [`find_config`]
pub const CONFIG_FILE_NAME: &str = "testing.toml";

/// On-disk shape of the configuration file
///
/// Keys other than these two are ignored.
#[derive(Debug, Deserialize, Default)]
struct RawTestingConfig {
    #[serde(default)]
    suffixes: Vec<String>,

    #[serde(default)]
    environment: HashMap<String, String>,
}

/// Information on how to run a group of tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestingConfig {
    root: Option<PathBuf>,
    suffixes: HashSet<String>,
    environment: HashMap<String, String>,
}

impl TestingConfig {
    pub fn new<I, S>(suffixes: I, environment: HashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: None,
            suffixes: suffixes.into_iter().map(Into::into).collect(),
            environment,
        }
    }

    /// Load a configuration file
    ///
    /// The root is left unset; callers assign it with [`TestingConfig::with_root`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            Error::ConfigParse(msg) => Error::ConfigParse(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawTestingConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;

        Ok(Self::new(raw.suffixes, raw.environment))
    }

    /// Find and load the configuration governing `dir`
    ///
    /// The root is set to the directory holding the configuration file.
    /// Returns `None` when no configuration file exists in `dir` or above.
    pub fn load_for(dir: &Path) -> Result<Option<Self>> {
        let Some(path) = find_config(dir) else {
            return Ok(None);
        };

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.to_path_buf());

        tracing::debug!(config = %path.display(), root = %root.display(), "loaded testing config");

        Ok(Some(Self::from_path(&path)?.with_root(root)))
    }

    /// Return a copy of this configuration with the discovery root assigned
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn suffixes(&self) -> &HashSet<String> {
        &self.suffixes
    }

    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    /// Whether `path` names a test file under this configuration
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Suffixes in a stable order, for display
    pub fn sorted_suffixes(&self) -> Vec<&str> {
        let mut suffixes: Vec<&str> = self.suffixes.iter().map(String::as_str).collect();
        suffixes.sort_unstable();
        suffixes
    }
}

/// Search `start` and its ancestors for a configuration file
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
