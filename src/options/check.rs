//! Value checks attached to options.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Predicate an option value must satisfy after finalize.
///
/// Deserializes from `"directory"`, `"file"`, `"exists"`, `"executable"` or
/// `{"one_of": ["A", "B"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Value names an existing directory.
    Directory,
    /// Value names an existing regular file.
    File,
    /// Value names any existing path.
    Exists,
    /// Value resolves to an executable, either as a path or through PATH.
    Executable,
    /// Value is exactly one of the listed choices.
    OneOf(Vec<String>),
}

impl Check {
    /// Returns true if `value` passes this check.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Check::Directory => Path::new(value).is_dir(),
            Check::File => Path::new(value).is_file(),
            Check::Exists => Path::new(value).exists(),
            Check::Executable => which::which(value).is_ok(),
            Check::OneOf(choices) => choices.iter().any(|c| c == value),
        }
    }

    /// Check `value` for `option`.
    ///
    /// An unresolvable executable is [`Error::ToolNotFound`] carrying the
    /// lookup diagnostic; every other rejection is
    /// [`Error::OptionValidation`].
    pub fn verify(&self, option: &str, value: &str) -> Result<()> {
        if let Check::Executable = self {
            return which::which(value)
                .map(|_| ())
                .map_err(|e| Error::ToolNotFound {
                    tool: value.to_string(),
                    detail: e.to_string(),
                });
        }
        if self.accepts(value) {
            Ok(())
        } else {
            Err(Error::OptionValidation {
                option: option.to_string(),
                value: value.to_string(),
            })
        }
    }
}
