//! Problem severity levels and the fatality gate.

use std::fmt;

/// Severity of a reported build problem.
///
/// `Error` outranks `Warning`: a lower rank number is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transform failures that corrupt or prevent output.
    Error,

    /// Non-fatal quality issues, e.g. prefixer notices.
    Warning,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Decides whether a reported problem halts the process.
///
/// Constructed once from the `--fatal` flag and shared read-only for the
/// process lifetime. With the default threshold (`Error`), only error-level
/// problems are fatal; lowering the threshold to `Warning` makes both levels
/// fatal.
#[derive(Debug, Clone, Copy)]
pub struct SeverityGate {
    threshold: Severity,
}

impl SeverityGate {
    /// Create a gate for the given threshold; `None` means `Error`.
    pub fn new(threshold: Option<Severity>) -> Self {
        Self {
            threshold: threshold.unwrap_or(Severity::Error),
        }
    }

    /// Whether a problem at `level` must terminate the process.
    pub fn is_fatal(&self, level: Severity) -> bool {
        level.rank() <= self.threshold.rank()
    }

    /// Log a problem, then exit with a non-zero status if it is fatal.
    ///
    /// Does not return when the level is fatal. Each problem is handled
    /// exactly once at the point of report; there are no retries.
    pub fn report(&self, level: Severity, message: &str) {
        match level {
            Severity::Error => tracing::error!("{}", message),
            Severity::Warning => tracing::warn!("{}", message),
        }

        if self.is_fatal(level) {
            std::process::exit(1);
        }
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_threshold_behaves_like_error() {
        let unset = SeverityGate::new(None);
        let explicit = SeverityGate::new(Some(Severity::Error));

        for level in [Severity::Error, Severity::Warning] {
            assert_eq!(unset.is_fatal(level), explicit.is_fatal(level));
        }
    }

    #[test]
    fn errors_are_fatal_under_every_threshold() {
        for threshold in [None, Some(Severity::Error), Some(Severity::Warning)] {
            let gate = SeverityGate::new(threshold);
            assert!(gate.is_fatal(Severity::Error));
        }
    }

    #[test]
    fn warnings_are_fatal_only_when_threshold_is_warning() {
        assert!(!SeverityGate::new(None).is_fatal(Severity::Warning));
        assert!(!SeverityGate::new(Some(Severity::Error)).is_fatal(Severity::Warning));
        assert!(SeverityGate::new(Some(Severity::Warning)).is_fatal(Severity::Warning));
    }

    #[test]
    fn nonfatal_report_returns_control() {
        let gate = SeverityGate::new(Some(Severity::Error));
        gate.report(Severity::Warning, "prefixer notice");
    }
}
