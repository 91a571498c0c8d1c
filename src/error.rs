use thiserror::Error;

/// Errors terminating a compile invocation.
///
/// Every kind is terminal for the one-shot build: the message is
/// printed for the operator and the process exits with the kind's
/// status code. Nothing is retried and no partial artifact survives.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Malformed invocation (missing positionals, help requested).
    #[error("{0}")]
    Usage(String),

    /// Host capability missing (archive writing disabled).
    #[error("{0}")]
    Environment(String),

    /// Bad inputs: unusable directories or an unknown timezone.
    #[error("{0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Process exit status for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Environment(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_errors_use_distinct_exit_code() {
        assert_eq!(CompileError::Environment("readonly".into()).exit_code(), 2);
    }

    #[test]
    fn test_usage_and_input_errors_exit_one() {
        assert_eq!(CompileError::Usage("usage".into()).exit_code(), 1);
        assert_eq!(CompileError::Input("bad dir".into()).exit_code(), 1);
    }
}
