//! Exit status codes for the CLI
//!
//! - 0: Success
//! - 1: Any error (bad configuration, bind failure, transport errors)
//! - 10: One or more checks failed
//! - 130: User interrupted (Ctrl+C, standard SIGINT exit code)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Successful execution
    Success = 0,
    /// Any error
    Error = 1,
    /// At least one check failed
    CheckFailed = 10,
    /// User interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Exit status for a `call` command: 2xx succeeds, anything else is an error
    pub fn from_http_status(status_code: u16) -> Self {
        if (200..300).contains(&status_code) {
            ExitStatus::Success
        } else {
            ExitStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert_eq!(ExitStatus::from_http_status(201), ExitStatus::Success);
        assert_eq!(ExitStatus::from_http_status(404), ExitStatus::Error);
        assert_eq!(ExitStatus::from_http_status(302), ExitStatus::Error);
    }
}
