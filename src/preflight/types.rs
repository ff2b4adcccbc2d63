//! Preflight check results and the report that collects them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something will degrade (docs, version, headers).
    Warn,
    /// A build will fail.
    Fail,
}

impl CheckStatus {
    fn tag(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓ [PASS]",
            CheckStatus::Warn => "⚠ [WARN]",
            CheckStatus::Fail => "✗ [FAIL]",
        }
    }
}

/// Result of a single preflight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

impl CheckResult {
    fn with_status(name: &str, status: CheckStatus, details: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            details: details.map(str::to_string),
        }
    }

    pub fn pass(name: &str) -> Self {
        Self::with_status(name, CheckStatus::Pass, None)
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self::with_status(name, CheckStatus::Pass, Some(details))
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self::with_status(name, CheckStatus::Warn, Some(details))
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self::with_status(name, CheckStatus::Fail, Some(details))
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.tag(), self.name)?;
        if let Some(details) = &self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    /// No check failed. Warnings do not count.
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    pub fn fail_count(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    pub fn warn_count(&self) -> usize {
        self.count(CheckStatus::Warn)
    }
}

impl fmt::Display for PreflightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Preflight Check Results ===\n")?;
        for check in &self.checks {
            writeln!(f, "  {}", check)?;
        }
        writeln!(
            f,
            "\nSummary: {}/{} passed",
            self.count(CheckStatus::Pass),
            self.checks.len()
        )?;
        match (self.fail_count(), self.warn_count()) {
            (0, 0) => Ok(()),
            (0, warns) => writeln!(f, "         {} warning(s)", warns),
            (fails, 0) => writeln!(f, "         {} FAILED, a build will not succeed", fails),
            (fails, warns) => writeln!(
                f,
                "         {} FAILED, a build will not succeed\n         {} warning(s)",
                fails, warns
            ),
        }
    }
}
