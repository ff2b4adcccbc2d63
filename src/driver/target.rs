//! Extension targets.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One native extension module to generate, compile and install.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionTarget {
    /// Slash-separated module path, e.g. `pycpp_build/pycpp_build`.
    pub name: String,
    /// CMake source directory, relative to the project root.
    pub source_dir: PathBuf,
    /// Test binaries (relative to the target build directory) copied into
    /// the test-binary directory after install.
    #[serde(default)]
    pub test_binaries: Vec<PathBuf>,
}

impl ExtensionTarget {
    pub fn new(name: &str, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            source_dir: source_dir.into(),
            test_binaries: Vec::new(),
        }
    }

    pub fn with_test_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_binaries.push(path.into());
        self
    }

    /// Name of the produced library: the last segment of [`Self::name`].
    pub fn library_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Source directory resolved against `root`.
    pub fn source_dir_in(&self, root: &Path) -> PathBuf {
        if self.source_dir.is_absolute() {
            self.source_dir.clone()
        } else {
            root.join(&self.source_dir)
        }
    }
}
