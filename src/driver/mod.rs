//! Build driver - generates, compiles and installs extension targets.
//!
//! One run:
//! 1. Resolve the CMake executable and the interpreter
//! 2. Load the Configuration Store and remember its mtime
//! 3. For each target, in order:
//!    - drop its build directory if it predates the configuration
//!    - generate the build directory if it does not exist, removing it
//!      again if generation fails
//!    - compile, then install
//!    - copy declared test binaries into the test-binary directory
//!
//! The first failure aborts the whole run.

mod cmake;
mod runner;
mod target;

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cache;
use crate::config::{Config, DEFAULT_PYTHON};
use crate::error::Result;
use crate::relocate;
use crate::store::ConfigurationStore;
use crate::timing::Timer;

pub use cmake::{common_args, define, CMake, Interpreter};
pub use runner::{Invocation, Step, SystemRunner, ToolRunner};
pub use target::ExtensionTarget;

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub name: String,
    pub build_dir: PathBuf,
    /// A stale build directory was removed first.
    pub invalidated: bool,
    /// CMake's generate step ran.
    pub generated: bool,
    /// Test binaries copied after install.
    pub test_binaries: Vec<PathBuf>,
}

pub struct BuildDriver<'a> {
    config: &'a Config,
    parallel: Option<usize>,
    interpreter: Option<Interpreter>,
}

impl<'a> BuildDriver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            parallel: None,
            interpreter: None,
        }
    }

    /// Job count handed to the compile step.
    pub fn parallel(mut self, jobs: Option<usize>) -> Self {
        self.parallel = jobs;
        self
    }

    /// Use this interpreter instead of looking one up.
    pub fn interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    /// Build every target with `runner`.
    pub fn run(
        &self,
        targets: &[ExtensionTarget],
        runner: &mut dyn ToolRunner,
    ) -> Result<Vec<TargetOutcome>> {
        let cmake = CMake::locate(&self.config.cmake)?;
        let interpreter = match &self.interpreter {
            Some(i) => i.clone(),
            None => Interpreter::locate(self.config.python.as_deref().unwrap_or(DEFAULT_PYTHON))?,
        };

        let store = ConfigurationStore::new(&self.config.config_file);
        let resolved = store.load()?;
        let config_time = store.modified()?;

        let args = common_args(&resolved, &interpreter, Some(&self.config.test_dir));
        debug!(?args, "common cmake arguments");

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.build_target(&cmake, target, &args, config_time, runner)?);
        }
        Ok(outcomes)
    }

    fn build_target(
        &self,
        cmake: &CMake,
        target: &ExtensionTarget,
        common: &[String],
        config_time: std::time::SystemTime,
        runner: &mut dyn ToolRunner,
    ) -> Result<TargetOutcome> {
        println!("building extension {}", target.name);
        let timer = Timer::start(&target.name);

        let libname = target.library_name();
        let build_dir = self.config.build_temp.join(libname);

        let invalidated = cache::invalidate_if_stale(&build_dir, config_time)?;

        let generated = !build_dir.exists();
        if generated {
            fs::create_dir_all(&build_dir)?;
            let ext_dir = self.config.extension_output_dir(&target.name);
            let mut args = common.to_vec();
            args.push(define("LIBRARY_NAME", libname));
            args.push(define(
                "CMAKE_LIBRARY_OUTPUT_DIRECTORY",
                ext_dir.to_string_lossy(),
            ));
            let source_dir = target.source_dir_in(&self.config.root);
            info!(target_name = %target.name, dir = %build_dir.display(), "generating build directory");
            if let Err(e) = runner.run(&cmake.generate(&source_dir, &build_dir, &args)) {
                // A half-generated directory would look fresh to the next run.
                if let Err(rm) = fs::remove_dir_all(&build_dir) {
                    warn!(dir = %build_dir.display(), error = %rm, "cannot remove failed build directory");
                }
                return Err(e);
            }
        }

        println!("compiling extension");
        runner.run(&cmake.compile(&build_dir, self.parallel))?;
        runner.run(&cmake.install(&build_dir))?;

        let mut test_binaries = Vec::with_capacity(target.test_binaries.len());
        for binary in &target.test_binaries {
            let copied =
                relocate::copy_test_binary(&build_dir.join(binary), &self.config.test_bin_dir)?;
            test_binaries.push(copied);
        }

        timer.finish();
        Ok(TargetOutcome {
            name: target.name.clone(),
            build_dir,
            invalidated,
            generated,
            test_binaries,
        })
    }
}
