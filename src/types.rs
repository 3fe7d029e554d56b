// src/types.rs

use std::fmt;
use std::process::ExitStatus;

/// How a single child process run ended.
///
/// Produced for both the dependency install step and every worker run. The
/// supervisor only logs and publishes it; no variant changes what happens
/// next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited on its own with this code.
    Exited(i32),
    /// The process was terminated by a signal (Unix only).
    Signaled(i32),
    /// The process could not be started at all (e.g. program not found).
    LaunchFailed(String),
}

impl RunOutcome {
    /// Classify a finished child's status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return RunOutcome::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return RunOutcome::Signaled(signal);
            }
        }

        RunOutcome::Exited(-1)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited(0))
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Exited(code) => write!(f, "exit code {code}"),
            RunOutcome::Signaled(signal) => write!(f, "terminated by signal {signal}"),
            RunOutcome::LaunchFailed(reason) => write!(f, "launch failed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exit_zero_is_success() {
        assert!(RunOutcome::Exited(0).is_success());
        assert!(!RunOutcome::Exited(1).is_success());
        assert!(!RunOutcome::Signaled(9).is_success());
        assert!(!RunOutcome::LaunchFailed("missing".into()).is_success());
    }

    #[test]
    fn display_names_the_cause() {
        assert_eq!(RunOutcome::Exited(3).to_string(), "exit code 3");
        assert_eq!(RunOutcome::Signaled(9).to_string(), "terminated by signal 9");
        assert!(
            RunOutcome::LaunchFailed("no such file".into())
                .to_string()
                .contains("no such file")
        );
    }

    #[cfg(unix)]
    #[test]
    fn signal_status_is_classified_as_signaled() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status: low 7 bits carry the terminating signal.
        let status = ExitStatus::from_raw(9);
        assert_eq!(RunOutcome::from_status(status), RunOutcome::Signaled(9));

        let status = ExitStatus::from_raw(1 << 8);
        assert_eq!(RunOutcome::from_status(status), RunOutcome::Exited(1));
    }
}
