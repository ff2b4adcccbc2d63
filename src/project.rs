//! Project descriptor (`extforge.json`).
//!
//! Declares the project's options and extension targets. Read once at
//! startup; the option schema is built from it before any command runs.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::driver::ExtensionTarget;
use crate::error::{Error, Result};
use crate::options::{OptionDecl, OptionSchema};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub options: Vec<OptionDecl>,
    #[serde(default)]
    pub extensions: Vec<ExtensionTarget>,
    /// Doxygen configuration, relative to the project root.
    #[serde(default)]
    pub doxyfile: Option<PathBuf>,
}

impl Project {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Project {
            path: path.to_path_buf(),
            reason: if e.kind() == ErrorKind::NotFound {
                "file not found".to_string()
            } else {
                e.to_string()
            },
        })?;
        Self::parse(path, &content)
    }

    /// Like [`Project::load`], but a missing file is `Ok(None)`. Any other
    /// failure, a malformed descriptor included, is still an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Project {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// The descriptor a command cannot run without.
    pub fn required(project: Option<Self>, path: &Path) -> Result<Self> {
        project.ok_or_else(|| Error::Project {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        })
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let project: Project = serde_json::from_str(content).map_err(|e| Error::Project {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for (i, ext) in project.extensions.iter().enumerate() {
            if ext.library_name().is_empty() {
                return Err(Error::Project {
                    path: path.to_path_buf(),
                    reason: format!("extension #{} has an empty name", i + 1),
                });
            }
            let duplicate = project.extensions[..i]
                .iter()
                .any(|other| other.library_name() == ext.library_name());
            if duplicate {
                return Err(Error::Project {
                    path: path.to_path_buf(),
                    reason: format!(
                        "extensions share the build directory '{}'",
                        ext.library_name()
                    ),
                });
            }
        }

        Ok(project)
    }

    pub fn schema(&self) -> Result<OptionSchema> {
        OptionSchema::build(&self.options)
    }
}
