//! Execution of external tool steps.
//!
//! The driver only describes what to run as an [`Invocation`]. A
//! [`ToolRunner`] executes it, which lets tests record the calls instead of
//! spawning CMake.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::process::Cmd;

/// Which CMake step an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Generate,
    Compile,
    Install,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Generate => "generate",
            Step::Compile => "compile",
            Step::Install => "install",
        })
    }
}

/// A single blocking external tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub step: Step,
    pub program: String,
    pub args: Vec<String>,
    /// Working directory.
    pub dir: PathBuf,
}

impl Invocation {
    pub fn to_cmd(&self) -> Cmd {
        Cmd::new(&self.program).args(&self.args).dir(&self.dir)
    }

    pub fn command_line(&self) -> String {
        self.to_cmd().command_line()
    }
}

pub trait ToolRunner {
    /// Run `invocation` to completion. A non-zero exit is
    /// [`crate::Error::ExternalTool`] carrying the command line.
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real subprocesses with inherited stdio.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        let command = invocation.command_line();
        println!("running cmake ({})", invocation.step);
        info!(step = %invocation.step, dir = %invocation.dir.display(), %command, "invoking external tool");

        invocation.to_cmd().run()
    }
}
