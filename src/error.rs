//! Error types for extforge.
//!
//! Every fatal condition maps to a process exit code. The binary turns an
//! [`Error`] into that code; the library never exits on its own.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a failed external tool step (and any uncategorized failure).
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when `build` runs before `configure`.
pub const EXIT_CONFIGURATION_MISSING: i32 = 2;
/// Exit code when the external tool or a configured compiler cannot be found.
pub const EXIT_TOOL_NOT_FOUND: i32 = 3;
/// Exit code when an option value is rejected by its check.
pub const EXIT_OPTION_INVALID: i32 = 4;
/// Exit code for a broken option declaration.
pub const EXIT_SCHEMA_DECLARATION: i32 = 5;

/// Errors raised by the option schema, configure command and build driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid declaration for option '{option}': {reason}")]
    SchemaDeclaration { option: String, reason: String },

    #[error("option '{option}' rejected value '{value}'")]
    OptionValidation { option: String, value: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error(
        "configuration file {} not found. Did you forget to run the configure command first?",
        path.display()
    )]
    ConfigurationMissing { path: PathBuf },

    #[error("'{tool}' is not executable: {detail}")]
    ToolNotFound { tool: String, detail: String },

    #[error("command failed ({status}): {command}")]
    ExternalTool { command: String, status: String },

    #[error("invalid project descriptor {}: {reason}", path.display())]
    Project { path: PathBuf, reason: String },

    #[error("cannot read configuration {}: {source}", path.display())]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigurationMissing { .. } => EXIT_CONFIGURATION_MISSING,
            Error::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            Error::OptionValidation { .. } | Error::UnknownOption(_) => EXIT_OPTION_INVALID,
            Error::SchemaDeclaration { .. } => EXIT_SCHEMA_DECLARATION,
            Error::ExternalTool { .. }
            | Error::Project { .. }
            | Error::StoreFormat { .. }
            | Error::Io(_) => EXIT_FAILURE,
        }
    }

    pub(crate) fn declaration(option: &str, reason: impl Into<String>) -> Self {
        Error::SchemaDeclaration {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
