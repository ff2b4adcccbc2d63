//! Build artifact cleaning.

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::store::ConfigurationStore;

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Refuse to remove the project root or any directory containing it.
fn guard_root(path: &Path, root: &Path, what: &str) -> Result<()> {
    if canonical(root).starts_with(canonical(path)) {
        bail!(
            "refusing to remove {} {}: it contains the project root {}",
            what,
            path.display(),
            root.display()
        );
    }
    Ok(())
}

fn remove_dir(config: &Config, path: &Path, what: &str) -> Result<bool> {
    guard_root(path, &config.root, what)?;
    if path.exists() {
        println!("Removing {} ({})...", what, path.display());
        fs::remove_dir_all(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Remove per-target build directories and compiled extensions.
/// The configuration is kept.
pub fn clean_build(config: &Config) -> Result<()> {
    let temp = remove_dir(config, &config.build_temp, "build directories")?;
    let lib = remove_dir(config, &config.build_lib, "compiled extensions")?;
    if temp || lib {
        println!("Build artifacts cleaned (configuration preserved).");
    } else {
        println!("No build artifacts to clean.");
    }
    Ok(())
}

/// Remove the Configuration Store.
pub fn clean_config(config: &Config) -> Result<()> {
    let store = ConfigurationStore::new(&config.config_file);
    if store.remove()? {
        println!("Removed {}", config.config_file.display());
    } else {
        println!("No configuration to clean.");
    }
    Ok(())
}

/// Remove the collected test binaries.
pub fn clean_test_binaries(config: &Config) -> Result<()> {
    if !remove_dir(config, &config.test_bin_dir, "test binaries")? {
        println!("No test binaries to clean.");
    }
    Ok(())
}

/// Clean everything (build tree, configuration, test binaries).
pub fn clean_all(config: &Config) -> Result<()> {
    guard_root(&config.build_dir, &config.root, "build directory")?;
    clean_build(config)?;
    clean_config(config)?;
    clean_test_binaries(config)?;
    remove_dir(config, &config.build_dir, "build directory")?;
    println!("\nFull clean complete.");
    Ok(())
}
