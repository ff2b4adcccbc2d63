//! Copying compiled test binaries next to the test suite.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Copy `source` into `dest_dir`, keeping its permission bits.
///
/// `dest_dir` is created (and the creation reported) when missing. An
/// existing file of the same name is overwritten. Returns the destination
/// path.
pub fn copy_test_binary(source: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
    if !dest_dir.exists() {
        println!("creating directory {}", dest_dir.display());
        fs::create_dir_all(dest_dir)?;
    }

    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        )
    })?;
    let dest = dest_dir.join(file_name);

    // fs::copy carries the permission bits over on Unix.
    fs::copy(source, &dest)?;
    tracing::debug!(from = %source.display(), to = %dest.display(), "copied test binary");
    Ok(dest)
}
