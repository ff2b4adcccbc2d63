//! Running the compiled test binaries.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::process::Cmd;

/// Executables directly inside `dir`, sorted by name.
///
/// A missing directory has no binaries.
pub fn find_test_binaries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut binaries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let mode = entry
            .metadata()
            .map_err(|e| Error::Io(e.into()))?
            .permissions()
            .mode();
        if mode & 0o111 != 0 {
            binaries.push(entry.into_path());
        }
    }
    Ok(binaries)
}

/// Run every test binary in `dir`, stopping at the first failure.
///
/// Returns the number of binaries run.
pub fn run_test_binaries(dir: &Path) -> Result<usize> {
    let binaries = find_test_binaries(dir)?;
    if binaries.is_empty() {
        println!("No test binaries in {}", dir.display());
        return Ok(0);
    }

    println!("Testing C++ code");
    for exe in &binaries {
        println!("\nRunning {}", exe.display());
        Cmd::new(exe.to_string_lossy()).dir(dir).run()?;
    }
    Ok(binaries.len())
}
