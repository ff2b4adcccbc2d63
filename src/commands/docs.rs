//! Docs command - runs doxygen.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::docs;
use crate::project::Project;

/// Execute the docs command.
pub fn cmd_docs(config: &Config, project: &Project) -> Result<()> {
    let Some(doxyfile) = &project.doxyfile else {
        bail!(
            "No doxyfile declared in {}",
            config.project_file.display()
        );
    };
    docs::run_doxygen(&config.root.join(doxyfile))?;
    Ok(())
}
