//! Host tool availability checks.

use crate::config::{Config, DEFAULT_PYTHON};
use crate::driver::Interpreter;
use crate::process;
use crate::project::Project;
use crate::store::ConfigurationStore;

use super::types::CheckResult;

/// Check the tools a build shells out to.
pub fn check_host_tools(config: &Config, project: Option<&Project>) -> Vec<CheckResult> {
    let mut results = Vec::new();

    results.push(check_tool(
        &config.cmake,
        true,
        "Required to generate and compile extensions. Install cmake or set CMAKE.",
    ));

    let python = config.python.as_deref().unwrap_or(DEFAULT_PYTHON);
    match Interpreter::locate(python) {
        Ok(interpreter) => {
            results.push(CheckResult::pass_with(
                "interpreter",
                &interpreter.executable().display().to_string(),
            ));
            let companion = interpreter.config_path();
            if companion.exists() {
                results.push(CheckResult::pass("interpreter -config"));
            } else {
                results.push(CheckResult::warn(
                    "interpreter -config",
                    &format!(
                        "{} not found. CMake may not find the interpreter headers.",
                        companion.display()
                    ),
                ));
            }
        }
        Err(e) => results.push(CheckResult::fail(
            "interpreter",
            &format!("{}. Set PYTHON to the interpreter to build against.", e),
        )),
    }

    // A compiler stored by an earlier configure run must still resolve.
    if let Ok(resolved) = ConfigurationStore::new(&config.config_file).load() {
        if let Some(compiler) = resolved.get("CMAKE_CXX_COMPILER") {
            results.push(check_tool(
                compiler,
                true,
                "Configured compiler is gone. Re-run configure.",
            ));
        }
    }

    let wants_docs = project.is_some_and(|p| p.doxyfile.is_some());
    results.push(check_tool(
        "doxygen",
        wants_docs,
        "Required for `extforge docs`.",
    ));
    results.push(check_tool(
        "git",
        false,
        "Required for `extforge version`.",
    ));

    results
}

/// Check if a tool exists in PATH.
fn check_tool(tool: &str, required: bool, purpose: &str) -> CheckResult {
    match process::which(tool) {
        Some(path) => CheckResult::pass_with(tool, &path.display().to_string()),
        None => {
            let msg = format!("Not found. {}", purpose);
            if required {
                CheckResult::fail(tool, &msg)
            } else {
                CheckResult::warn(tool, &msg)
            }
        }
    }
}
