//! Configuration Store - the file bridging `configure` and `build`.
//!
//! The store holds one JSON object mapping external keys to values (or
//! `null`). It is always rewritten as a whole: the mapping goes to a
//! temporary sibling file which is then renamed over the old one.
//! Its modification time is what the build driver compares build
//! directories against.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Mode of a newly created store file. `NamedTempFile` creates files
/// owner-only, which would survive the rename.
const STORE_MODE: u32 = 0o644;

/// Resolved option values keyed by external key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfiguration(BTreeMap<String, Option<String>>);

impl ResolvedConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.0.insert(key.into(), value);
    }

    /// Value for `key`, `None` when absent or null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Entries with a value, in key order. Null entries are skipped.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for ResolvedConfiguration {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Handle on the persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationStore {
    path: PathBuf,
}

impl ConfigurationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the stored mapping with `config`.
    pub fn save(&self, config: &ResolvedConfiguration) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut tmp, config).map_err(|source| Error::StoreFormat {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(b"\n")?;
        let permissions = match fs::metadata(&self.path) {
            Ok(meta) => meta.permissions(),
            Err(_) => fs::Permissions::from_mode(STORE_MODE),
        };
        tmp.as_file().set_permissions(permissions)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), entries = config.len(), "configuration written");
        Ok(())
    }

    /// Read the stored mapping.
    ///
    /// A missing file is [`Error::ConfigurationMissing`].
    pub fn load(&self) -> Result<ResolvedConfiguration> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigurationMissing {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| Error::StoreFormat {
            path: self.path.clone(),
            source,
        })
    }

    /// Modification time of the store file.
    pub fn modified(&self) -> Result<SystemTime> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.modified()?),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::ConfigurationMissing {
                path: self.path.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the store. Returns true if a file was removed.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
