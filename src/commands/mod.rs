//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `configure` - Resolve options and write the configuration
//! - `build` - Generate, compile and install extensions
//! - `clean` - Clean build artifacts
//! - `show` - Display configuration and build state
//! - `preflight` - Run preflight checks
//! - `test` - Collect and run compiled test binaries
//! - `docs` - Run doxygen

pub mod build;
pub mod clean;
pub mod configure;
mod docs;
mod preflight;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use configure::{cmd_configure, option_args};
pub use docs::cmd_docs;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
pub use test::{cmd_copy_test_binary, cmd_test};
