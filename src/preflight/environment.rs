//! Build environment checks (directories, descriptor, configuration).

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::Config;
use crate::project::Project;
use crate::store::ConfigurationStore;

use super::types::CheckResult;

/// Check the project tree and build directory.
pub fn check_build_environment(config: &Config, project: Option<&Project>) -> Vec<CheckResult> {
    let mut results = Vec::new();

    // Build directory must be writable, or creatable
    let build_dir = &config.build_dir;
    match writable(build_dir) {
        Ok(()) => results.push(CheckResult::pass("build/ writable")),
        Err(e) => results.push(CheckResult::fail(
            "build/ writable",
            &format!("Cannot write to {}: {}", build_dir.display(), e),
        )),
    }

    // Project descriptor
    match project {
        Some(project) => {
            results.push(CheckResult::pass_with(
                "project descriptor",
                &format!(
                    "{} ({} options, {} extensions)",
                    project.name,
                    project.options.len(),
                    project.extensions.len()
                ),
            ));
            for ext in &project.extensions {
                let lists = ext.source_dir_in(&config.root).join("CMakeLists.txt");
                let name = format!("{} sources", ext.name);
                if lists.is_file() {
                    results.push(CheckResult::pass(&name));
                } else {
                    results.push(CheckResult::fail(
                        &name,
                        &format!("{} not found", lists.display()),
                    ));
                }
            }
            if let Some(doxyfile) = &project.doxyfile {
                if !config.root.join(doxyfile).is_file() {
                    results.push(CheckResult::warn(
                        "Doxyfile",
                        &format!("{} not found", doxyfile.display()),
                    ));
                }
            }
        }
        None => results.push(CheckResult::fail(
            "project descriptor",
            &format!("{} not found", config.project_file.display()),
        )),
    }

    // Configuration
    let store = ConfigurationStore::new(&config.config_file);
    match store.load() {
        Ok(resolved) => results.push(CheckResult::pass_with(
            "configuration",
            &format!("{} entries", resolved.len()),
        )),
        Err(e) => results.push(CheckResult::warn(
            "configuration",
            &format!("{}. Run `extforge configure`.", e),
        )),
    }

    results
}

// Checks the nearest existing ancestor so the tree is left as found.
fn writable(dir: &Path) -> io::Result<()> {
    let existing = dir
        .ancestors()
        .find(|p| p.exists())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no existing parent directory"))?;
    NamedTempFile::new_in(existing)?;
    Ok(())
}
