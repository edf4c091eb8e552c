use serde::{Deserialize, Serialize};

/// Lifecycle status of a [`DebugSession`](crate::DebugSession).
///
/// ```text
/// Idle → Running → Paused → Running → ... → Idle
///                    └────→ Stopped (cancelled while paused)
/// ```
///
/// `reset()` forces `Idle` from any status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No run is tracked.
    #[default]
    Idle,
    /// A run is executing units.
    Running,
    /// The run is suspended, waiting for `step()` or `continue_()`.
    Paused,
    /// The run was cancelled while paused.
    Stopped,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Running => write!(f, "running"),
            SessionStatus::Paused => write!(f, "paused"),
            SessionStatus::Stopped => write!(f, "stopped"),
        }
    }
}
