//! Preflight checks.
//!
//! Verifies the host tools and the project tree before a build, so a
//! missing CMake or an unconfigured tree is reported up front instead of
//! halfway through the first extension. Run with `extforge preflight`.

mod environment;
mod host_tools;
mod types;

use tracing::debug;

use crate::config::Config;
use crate::project::Project;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run every check. `project` is `None` when the descriptor did not load.
pub fn run_preflight(config: &Config, project: Option<&Project>) -> PreflightReport {
    let mut report = PreflightReport::default();

    println!("Checking host tools...");
    report
        .checks
        .extend(host_tools::check_host_tools(config, project));

    println!("Checking build environment...");
    report
        .checks
        .extend(environment::check_build_environment(config, project));

    debug!(
        checks = report.checks.len(),
        failed = report.fail_count(),
        "preflight finished"
    );
    report
}
