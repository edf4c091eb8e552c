use std::sync::Arc;

/// Errors surfaced by the breakpoint manager, the debug session and the
/// HTTP adapter.
///
/// None of these are fatal to the process: every operation returns its
/// error to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed request: missing field, unknown action, and similar.
    #[error("Validation failed: {0}")]
    Validation(Arc<str>),

    /// Unknown breakpoint scope-key or paused execution id.
    #[error("{0} not found")]
    NotFound(Arc<str>),

    /// The execution id is already registered as paused.
    #[error("Execution '{0}' is already paused")]
    AlreadyPaused(Arc<str>),

    /// Operation is not valid in the session's current status.
    #[error("Invalid state: {0}")]
    InvalidState(Arc<str>),

    /// A session pause was unblocked by its cancellation signal.
    #[error("Pause at step '{0}' was cancelled")]
    Cancelled(Arc<str>),

    /// A session pause was discarded by a reset.
    #[error("Pause at step '{0}' was aborted by a session reset")]
    Aborted(Arc<str>),

    /// The handoff was closed before any decision was delivered.
    #[error("Resume handoff closed for execution '{0}'")]
    HandoffClosed(Arc<str>),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<Arc<str>>) -> Self {
        Error::Validation(msg.into())
    }

    pub(crate) fn breakpoint_not_found(scope: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("Breakpoint '{scope}'").into())
    }

    pub(crate) fn execution_not_found(execution_id: &str) -> Self {
        Error::NotFound(format!("Paused execution '{execution_id}'").into())
    }

    pub(crate) fn invalid_state(msg: impl Into<Arc<str>>) -> Self {
        Error::InvalidState(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            Error::execution_not_found("exec-1").to_string(),
            "Paused execution 'exec-1' not found"
        );
        assert_eq!(
            Error::breakpoint_not_found("orders:validate").to_string(),
            "Breakpoint 'orders:validate' not found"
        );
    }

    #[test]
    fn test_state_error_message() {
        let err = Error::invalid_state("session is not paused (status: running)");
        assert_eq!(
            err.to_string(),
            "Invalid state: session is not paused (status: running)"
        );
    }
}
