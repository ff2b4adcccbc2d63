//! Build command - builds every declared extension.

use anyhow::Result;

use crate::config::Config;
use crate::driver::{BuildDriver, SystemRunner};
use crate::project::Project;

/// Execute the build command.
pub fn cmd_build(config: &Config, project: &Project, parallel: Option<usize>) -> Result<()> {
    if project.extensions.is_empty() {
        println!(
            "No extensions declared in {}",
            config.project_file.display()
        );
        return Ok(());
    }

    println!("=== Building {} ===\n", project.name);

    let driver = BuildDriver::new(config).parallel(parallel);
    let outcomes = driver.run(&project.extensions, &mut SystemRunner)?;

    println!();
    for outcome in &outcomes {
        let how = match (outcome.invalidated, outcome.generated) {
            (true, _) => "regenerated (configuration changed)",
            (false, true) => "generated",
            (false, false) => "incremental",
        };
        println!("  {} - {}", outcome.name, how);
        for binary in &outcome.test_binaries {
            println!("    test binary: {}", binary.display());
        }
    }
    println!("\nBuilt {} extension(s) into {}", outcomes.len(), config.build_lib.display());
    Ok(())
}
