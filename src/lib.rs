//! extforge - typed configure/build front end for CMake-built extensions.
//!
//! Two separate invocations share state only through the Configuration
//! Store on disk:
//! - `configure` builds a [`ConfigureCommand`](configure::ConfigureCommand)
//!   from the project's [`OptionSchema`](options::OptionSchema), validates
//!   the values and persists them
//! - `build` runs the [`BuildDriver`](driver::BuildDriver), which turns the
//!   stored values into CMake arguments and generates, compiles and
//!   installs every extension target

pub mod cache;
pub mod clean;
pub mod commands;
pub mod config;
pub mod configure;
pub mod docs;
pub mod driver;
pub mod error;
pub mod options;
pub mod preflight;
pub mod process;
pub mod project;
pub mod relocate;
pub mod store;
pub mod testbin;
pub mod timing;
pub mod version;

pub use error::{Error, Result};
