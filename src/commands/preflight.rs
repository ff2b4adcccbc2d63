//! Preflight command - reports whether a build can succeed.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::preflight;
use crate::project::Project;

/// Execute the preflight command. With `strict`, failed checks are an error.
pub fn cmd_preflight(config: &Config, project: Option<&Project>, strict: bool) -> Result<()> {
    let report = preflight::run_preflight(config, project);
    println!("\n{}", report);

    match (report.all_passed(), strict) {
        (true, _) => println!("All preflight checks passed!"),
        (false, true) => bail!(
            "preflight failed: {} check(s) failed",
            report.fail_count()
        ),
        (false, false) => println!("Some checks failed. Use --strict to exit non-zero."),
    }
    Ok(())
}
