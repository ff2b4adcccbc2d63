//! Shared test utilities for extforge tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use extforge::config::Config;
use extforge::driver::{Interpreter, Invocation, ToolRunner};
use extforge::store::{ConfigurationStore, ResolvedConfiguration};
use extforge::Error;
use tempfile::TempDir;

/// Test environment: a project root in a temporary directory with a fake
/// cmake executable, so tool lookup succeeds without CMake installed.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Project root
    pub root: PathBuf,
    /// Fake cmake script
    pub cmake: PathBuf,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("project");
        fs::create_dir_all(&root).expect("Failed to create project root");

        let cmake = temp_dir.path().join("tools/cmake");
        create_mock_binary(&cmake);

        let mut config = Config::new(&root);
        config.cmake = cmake.to_string_lossy().into_owned();

        Self {
            _temp_dir: temp_dir,
            root,
            cmake,
            config,
        }
    }

    pub fn store(&self) -> ConfigurationStore {
        ConfigurationStore::new(&self.config.config_file)
    }

    /// Write a Configuration Store with the given entries.
    pub fn write_config(&self, entries: &[(&str, Option<&str>)]) {
        let resolved: ResolvedConfiguration = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect();
        self.store().save(&resolved).expect("Failed to save configuration");
    }

    /// Move the store's mtime relative to now.
    pub fn touch_config(&self, offset: Duration, future: bool) {
        let now = SystemTime::now();
        let time = if future { now + offset } else { now - offset };
        set_mtime(&self.config.config_file, time);
    }

    /// Interpreter that needs no real python on PATH.
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new("/usr/bin/python3")
    }
}

/// Set a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("Failed to set mtime");
}

/// Create a mock executable script.
pub fn create_mock_binary(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir for binary");
    }
    fs::write(path, "#!/bin/sh\nexit 0\n").expect("Failed to create mock binary");

    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

/// Records invocations instead of running them. When `fail_at` is set,
/// that call (0-based) fails like a non-zero exit.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Vec<Invocation>,
    pub fail_at: Option<usize>,
    /// Files created in the invocation directory on install, relative to it.
    pub install_outputs: Vec<PathBuf>,
}

impl RecordingRunner {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn steps(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.step.to_string()).collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> extforge::Result<()> {
        let index = self.calls.len();
        self.calls.push(invocation.clone());
        if self.fail_at == Some(index) {
            return Err(Error::ExternalTool {
                command: invocation.command_line(),
                status: "exit code 2".to_string(),
            });
        }
        if invocation.step == extforge::driver::Step::Install {
            for output in &self.install_outputs {
                create_mock_binary(&invocation.dir.join(output));
            }
        }
        Ok(())
    }
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(
        path.is_dir(),
        "Expected directory to exist: {}",
        path.display()
    );
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}
