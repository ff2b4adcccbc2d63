//! Configuration management for extforge.
//!
//! Every fixed location the configure and build phases share lives in one
//! [`Config`], built once at process start and passed down by reference.
//! Values come from defaults, then `<root>/.env`, then the process
//! environment. Environment variables take precedence over `.env`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the project descriptor at the project root.
pub const PROJECT_FILE: &str = "extforge.json";

/// File name of the Configuration Store inside the build directory.
pub const CONFIG_FILE_NAME: &str = "configure.out.json";

/// Every variable [`Config::load`] reads from `.env` and the environment.
pub const ENV_KEYS: &[&str] = &[
    "EXTFORGE_PROJECT",
    "EXTFORGE_BUILD_DIR",
    "EXTFORGE_TEST_DIR",
    "EXTFORGE_CONFIG_FILE",
    "CMAKE",
    "PYTHON",
];

/// Default external build tool.
pub const DEFAULT_CMAKE: &str = "cmake";

/// Interpreter looked up on PATH when `PYTHON` is not set.
pub const DEFAULT_PYTHON: &str = "python3";

/// extforge configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project root (directory holding the project descriptor)
    pub root: PathBuf,
    /// Project descriptor path (default: <root>/extforge.json)
    pub project_file: PathBuf,
    /// Build output directory (default: <root>/build)
    pub build_dir: PathBuf,
    /// Per-target build directories live here (default: <build>/temp)
    pub build_temp: PathBuf,
    /// Compiled extensions are placed here (default: <build>/lib)
    pub build_lib: PathBuf,
    /// Test directory handed to CMake as TEST_DIR (default: <root>/tests)
    pub test_dir: PathBuf,
    /// Compiled test binaries are collected here (default: <tests>/bin)
    pub test_bin_dir: PathBuf,
    /// Configuration Store (default: <build>/configure.out.json)
    pub config_file: PathBuf,
    /// External build tool, name or path
    pub cmake: String,
    /// Interpreter override, name or path
    pub python: Option<String>,
}

impl Config {
    /// Configuration with every location at its default under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let build_dir = root.join("build");
        let test_dir = root.join("tests");
        Self {
            project_file: root.join(PROJECT_FILE),
            build_temp: build_dir.join("temp"),
            build_lib: build_dir.join("lib"),
            test_bin_dir: test_dir.join("bin"),
            config_file: build_dir.join(CONFIG_FILE_NAME),
            build_dir,
            test_dir,
            cmake: DEFAULT_CMAKE.to_string(),
            python: None,
            root,
        }
    }

    /// Load configuration from `<root>/.env` and the environment.
    pub fn load(root: &Path) -> Self {
        let mut vars = HashMap::new();

        let env_path = root.join(".env");
        if env_path.exists() {
            match dotenvy::from_path_iter(&env_path) {
                Ok(iter) => {
                    for item in iter {
                        match item {
                            Ok((key, value)) => {
                                vars.insert(key, value);
                            }
                            Err(e) => {
                                tracing::warn!(path = %env_path.display(), error = %e, "skipping malformed .env line");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %env_path.display(), error = %e, "cannot read .env");
                }
            }
        }

        // Only our own keys; unrelated variables may not be valid UTF-8.
        for key in ENV_KEYS {
            match std::env::var(key) {
                Ok(value) => {
                    vars.insert(key.to_string(), value);
                }
                Err(std::env::VarError::NotUnicode(_)) => {
                    tracing::warn!(key, "ignoring non-UTF-8 environment variable");
                }
                Err(std::env::VarError::NotPresent) => {}
            }
        }

        Self::from_vars(root, &vars)
    }

    /// Apply overrides from a variable map on top of the defaults.
    pub fn from_vars(root: &Path, vars: &HashMap<String, String>) -> Self {
        let mut config = Self::new(root);
        let resolve = |value: &str| {
            let path = PathBuf::from(value);
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        };

        if let Some(project) = vars.get("EXTFORGE_PROJECT") {
            config.project_file = resolve(project);
        }
        if let Some(build) = vars.get("EXTFORGE_BUILD_DIR") {
            config.build_dir = resolve(build);
            config.build_temp = config.build_dir.join("temp");
            config.build_lib = config.build_dir.join("lib");
            config.config_file = config.build_dir.join(CONFIG_FILE_NAME);
        }
        if let Some(tests) = vars.get("EXTFORGE_TEST_DIR") {
            config.test_dir = resolve(tests);
            config.test_bin_dir = config.test_dir.join("bin");
        }
        if let Some(file) = vars.get("EXTFORGE_CONFIG_FILE") {
            config.config_file = resolve(file);
        }
        if let Some(cmake) = vars.get("CMAKE").filter(|s| !s.is_empty()) {
            config.cmake = cmake.clone();
        }
        config.python = vars.get("PYTHON").filter(|s| !s.is_empty()).cloned();

        config
    }

    /// Directory the packaging step expects the extension `name` in.
    ///
    /// `pkg/sub/mod` lands in `<build lib>/pkg/sub`.
    pub fn extension_output_dir(&self, name: &str) -> PathBuf {
        match name.rsplit_once('/') {
            Some((parent, _)) => self.build_lib.join(parent),
            None => self.build_lib.clone(),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Project root:   {}", self.root.display());
        println!("  Project file:   {}", self.project_file.display());
        println!("  Build dir:      {}", self.build_dir.display());
        println!("  Build temp:     {}", self.build_temp.display());
        println!("  Build lib:      {}", self.build_lib.display());
        println!("  Test dir:       {}", self.test_dir.display());
        println!("  Test binaries:  {}", self.test_bin_dir.display());
        println!("  Config file:    {}", self.config_file.display());
        println!("  CMAKE:          {}", self.cmake);
        match &self.python {
            Some(python) => println!("  PYTHON:         {}", python),
            None => println!("  PYTHON:         {} (from PATH)", DEFAULT_PYTHON),
        }
    }
}
