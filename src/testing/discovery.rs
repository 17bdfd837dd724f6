//! Test discovery
//!
//! Walks a configuration's root and collects files whose names end with one
//! of its suffixes.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result, TestingConfig};

/// Find all test files under the configuration's root, sorted by path
///
/// Hidden directories are skipped. The root must have been assigned.
pub fn discover_tests(config: &TestingConfig) -> Result<Vec<PathBuf>> {
    let root = config
        .root()
        .ok_or_else(|| Error::Config("Test discovery root is not set".to_string()))?;

    if !root.is_dir() {
        return Err(Error::Config(format!(
            "Test discovery root '{}' is not a directory",
            root.display()
        )));
    }

    let mut found = Vec::new();
    walk(root, config, &mut found)?;
    found.sort();

    tracing::debug!(root = %root.display(), count = found.len(), "discovered tests");
    Ok(found)
}

fn walk(dir: &Path, config: &TestingConfig, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if is_hidden(&path) {
                continue;
            }
            walk(&path, config, found)?;
        } else if config.matches(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
