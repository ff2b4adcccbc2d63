//! Project version from git tags.

use std::path::Path;

use crate::process::Cmd;

/// Version used when git cannot describe the tree.
pub const FALLBACK_VERSION: &str = "0.0.0";

/// `git describe --tags --always --dirty` for the repository at `root`.
///
/// With `plain`, only the release part of the tag is returned
/// (`v1.2.0-3-gabc1234-dirty` becomes `1.2.0`).
pub fn version_from_git(root: &Path, plain: bool) -> String {
    let described = Cmd::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .dir(root)
        .capture()
        .ok()
        .filter(|r| r.success())
        .map(|r| r.stdout_trimmed().to_string())
        .filter(|s| !s.is_empty());

    match described {
        Some(version) if plain => plain_version(&version),
        Some(version) => version,
        None => FALLBACK_VERSION.to_string(),
    }
}

/// Strip a leading `v` and everything from the first `-`.
pub fn plain_version(described: &str) -> String {
    let trimmed = described.strip_prefix('v').unwrap_or(described);
    let release = trimmed.split('-').next().unwrap_or(trimmed);
    if release.is_empty() {
        FALLBACK_VERSION.to_string()
    } else {
        release.to_string()
    }
}
