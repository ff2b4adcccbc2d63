//! Clean command - removes build artifacts.

use anyhow::Result;

use crate::clean;
use crate::config::Config;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Build directories and compiled extensions (default)
    Build,
    /// Configuration Store
    Config,
    /// Collected test binaries
    Tests,
    /// Everything
    All,
}

/// Execute the clean command.
pub fn cmd_clean(config: &Config, target: CleanTarget) -> Result<()> {
    match target {
        CleanTarget::Build => clean::clean_build(config),
        CleanTarget::Config => clean::clean_config(config),
        CleanTarget::Tests => clean::clean_test_binaries(config),
        CleanTarget::All => clean::clean_all(config),
    }
}
