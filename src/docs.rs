//! API documentation via doxygen.

use std::path::Path;

use crate::error::{Error, Result};
use crate::process::{self, Cmd};

/// Run `doxygen <file>` from the directory holding `doxyfile`.
pub fn run_doxygen(doxyfile: &Path) -> Result<()> {
    let doxyfile = doxyfile.canonicalize()?;
    let docs_dir = doxyfile.parent().unwrap_or(Path::new("/"));
    let file_name = doxyfile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if process::which("doxygen").is_none() {
        return Err(Error::ToolNotFound {
            tool: "doxygen".to_string(),
            detail: "not found in PATH".to_string(),
        });
    }

    println!("running doxygen in {}", docs_dir.display());
    doxygen_cmd(&file_name, docs_dir).run()
}

fn doxygen_cmd(file_name: &str, docs_dir: &Path) -> Cmd {
    Cmd::new("doxygen").arg(file_name).dir(docs_dir)
}
