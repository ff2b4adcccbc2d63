//! CMake command lines.
//!
//! Turns the resolved configuration into `-DKEY=VALUE` arguments and builds
//! the generate, compile and install invocations for one build directory.

use std::path::{Path, PathBuf};

use super::runner::{Invocation, Step};
use crate::error::{Error, Result};
use crate::store::ResolvedConfiguration;

/// `-DKEY=VALUE`.
pub fn define(key: &str, value: impl AsRef<str>) -> String {
    format!("-D{}={}", key, value.as_ref())
}

/// The interpreter whose headers and libraries the extension builds against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    executable: PathBuf,
}

impl Interpreter {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Resolve `name` through PATH.
    pub fn locate(name: &str) -> Result<Self> {
        which::which(name)
            .map(Self::new)
            .map_err(|e| Error::ToolNotFound {
                tool: name.to_string(),
                detail: e.to_string(),
            })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The `-config` companion next to the executable.
    pub fn config_path(&self) -> PathBuf {
        let mut path = self.executable.clone().into_os_string();
        path.push("-config");
        PathBuf::from(path)
    }

    pub fn cmake_args(&self) -> Vec<String> {
        vec![
            define("PYTHON_EXECUTABLE", self.executable.to_string_lossy()),
            define("PYTHON_CONFIG", self.config_path().to_string_lossy()),
        ]
    }
}

/// Arguments shared by every target: the configuration (null values
/// skipped), the interpreter location and the test directory.
pub fn common_args(
    config: &ResolvedConfiguration,
    interpreter: &Interpreter,
    test_dir: Option<&Path>,
) -> Vec<String> {
    let mut args: Vec<String> = config.defined().map(|(k, v)| define(k, v)).collect();
    args.extend(interpreter.cmake_args());
    if let Some(dir) = test_dir {
        args.push(define("TEST_DIR", dir.to_string_lossy()));
    }
    args
}

/// A located CMake executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMake {
    program: String,
}

impl CMake {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve `name` through PATH, failing with [`Error::ToolNotFound`].
    pub fn locate(name: &str) -> Result<Self> {
        match which::which(name) {
            Ok(path) => Ok(Self::new(path.to_string_lossy())),
            Err(e) => Err(Error::ToolNotFound {
                tool: name.to_string(),
                detail: e.to_string(),
            }),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `cmake <source> <args...>` run inside `build_dir`.
    pub fn generate(&self, source_dir: &Path, build_dir: &Path, args: &[String]) -> Invocation {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(source_dir.to_string_lossy().into_owned());
        all.extend(args.iter().cloned());
        self.invocation(Step::Generate, build_dir, all)
    }

    /// `cmake --build . [-- -j N]`.
    pub fn compile(&self, build_dir: &Path, parallel: Option<usize>) -> Invocation {
        let mut args = vec!["--build".to_string(), ".".to_string()];
        if let Some(jobs) = parallel.filter(|&n| n > 0) {
            args.extend(["--".to_string(), "-j".to_string(), jobs.to_string()]);
        }
        self.invocation(Step::Compile, build_dir, args)
    }

    /// `cmake --build . --target install`.
    pub fn install(&self, build_dir: &Path) -> Invocation {
        let args = ["--build", ".", "--target", "install"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.invocation(Step::Install, build_dir, args)
    }

    fn invocation(&self, step: Step, dir: &Path, args: Vec<String>) -> Invocation {
        Invocation {
            step,
            program: self.program.clone(),
            args,
            dir: dir.to_path_buf(),
        }
    }
}
