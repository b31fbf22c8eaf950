//! Process exit codes.

/// Exit codes for the dupetrie binary.
///
/// - 0: Scan completed and duplicates were found
/// - 1: General error (unexpected failure)
/// - 2: Scan completed, no duplicates
/// - 3: Scan completed but some paths had to be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some paths were skipped on errors.
    PartialSuccess = 3,
}

impl ExitCode {
    /// The numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NoDuplicates.as_i32(), 2);
        assert_eq!(ExitCode::PartialSuccess.as_i32(), 3);
    }
}
