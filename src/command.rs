/// Status a command finished with: a builtin's own result, or a child's exit code.
pub type ExitCode = i32;

/// Whether the session loop should prompt for another line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands.
    Continue,
    /// Leave the session loop.
    Terminate,
}

impl Flow {
    /// Integer continuation code: 1 keeps the session alive, 0 ends it.
    pub fn code(self) -> i32 {
        match self {
            Flow::Continue => 1,
            Flow::Terminate => 0,
        }
    }
}

/// Result of dispatching one command line.
///
/// `status` is the exit status of whatever ran: the builtin's own status, or
/// the child's real exit code for external programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub flow: Flow,
    pub status: ExitCode,
}

impl Outcome {
    pub fn proceed(status: ExitCode) -> Self {
        Self {
            flow: Flow::Continue,
            status,
        }
    }

    pub fn terminate(status: ExitCode) -> Self {
        Self {
            flow: Flow::Terminate,
            status,
        }
    }

    pub fn should_continue(&self) -> bool {
        self.flow == Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_codes() {
        assert_eq!(Flow::Continue.code(), 1);
        assert_eq!(Flow::Terminate.code(), 0);
    }

    #[test]
    fn test_outcome_constructors() {
        let o = Outcome::proceed(3);
        assert!(o.should_continue());
        assert_eq!(o.status, 3);

        let o = Outcome::terminate(0);
        assert!(!o.should_continue());
    }
}
