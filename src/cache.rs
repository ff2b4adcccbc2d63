//! Rebuild detection for per-target build directories.
//!
//! CMake does not notice options changed through the Configuration Store,
//! so a build directory whose mtime predates the store is thrown away and
//! regenerated.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::warn;

/// State of a target's build directory relative to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// Directory does not exist; CMake has to generate it.
    Missing,
    /// Directory is at least as new as the configuration.
    Fresh,
    /// Directory predates the configuration.
    Stale,
}

impl DirState {
    pub fn label(self) -> &'static str {
        match self {
            DirState::Missing => "not generated",
            DirState::Fresh => "up to date",
            DirState::Stale => "stale (configuration changed)",
        }
    }
}

/// Classify `dir` against the configuration write time.
///
/// A directory whose mtime cannot be read counts as stale.
pub fn dir_state(dir: &Path, config_time: SystemTime) -> DirState {
    if !dir.exists() {
        return DirState::Missing;
    }
    let Ok(modified) = dir.metadata().and_then(|m| m.modified()) else {
        return DirState::Stale;
    };
    if modified < config_time {
        DirState::Stale
    } else {
        DirState::Fresh
    }
}

/// Remove `dir` if it is stale. Returns true if it was removed.
pub fn invalidate_if_stale(dir: &Path, config_time: SystemTime) -> io::Result<bool> {
    if dir_state(dir, config_time) != DirState::Stale {
        return Ok(false);
    }
    warn!(dir = %dir.display(), "build directory predates configuration, removing");
    fs::remove_dir_all(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn mtime(path: &Path) -> SystemTime {
        path.metadata().unwrap().modified().unwrap()
    }

    #[test]
    fn test_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ext");
        assert_eq!(dir_state(&dir, SystemTime::now()), DirState::Missing);
        assert!(!invalidate_if_stale(&dir, SystemTime::now()).unwrap());
    }

    #[test]
    fn test_fresh_when_config_older() {
        let tmp = tempfile::tempdir().unwrap();
        let config_time = mtime(tmp.path()) - Duration::from_secs(60);
        assert_eq!(dir_state(tmp.path(), config_time), DirState::Fresh);
    }

    #[test]
    fn test_stale_dir_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ext");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("CMakeCache.txt"), "old").unwrap();
        let config_time = mtime(&dir) + Duration::from_secs(60);

        assert_eq!(dir_state(&dir, config_time), DirState::Stale);
        assert!(invalidate_if_stale(&dir, config_time).unwrap());
        assert!(!dir.exists());
    }
}
