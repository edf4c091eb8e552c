use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ContextMap, session::UnitKind};

/// One executed unit in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: Arc<str>,
    pub kind: UnitKind,
    pub duration: Duration,
    #[serde(default, skip_serializing_if = "ContextMap::is_empty")]
    pub data: ContextMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Timestamp in nanoseconds since Unix epoch.
    pub recorded_at: u64,
}

/// Breakpoint on a session unit, keyed by kind and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBreakpoint {
    pub id: Arc<str>,
    pub kind: UnitKind,
    pub target: Arc<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Arc<str>>,
    pub enabled: bool,
    pub hit_count: u64,
}

/// Why [`DebugSession::should_pause`](crate::DebugSession::should_pause) asked to pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseReason {
    /// The previous decision was `step()`: pause at the next unit.
    Step,
    /// A session breakpoint fired.
    Breakpoint(Arc<str>),
}

impl PauseReason {
    pub fn breakpoint_id(&self) -> Option<&str> {
        match self {
            PauseReason::Step => None,
            PauseReason::Breakpoint(id) => Some(id),
        }
    }
}

/// Serialisable snapshot of a [`DebugSession`](crate::DebugSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: super::SessionStatus,
    pub workflow_type: Option<Arc<str>>,
    pub current_step: Option<Arc<str>>,
    /// Breakpoint that caused the current pause, if any.
    pub paused_breakpoint: Option<Arc<str>>,
    /// Data handed over by the paused unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_data: Option<ContextMap>,
    /// Whether the next unit pauses regardless of breakpoints.
    pub stepping: bool,
    pub history: Vec<StepRecord>,
    pub breakpoints: Vec<SessionBreakpoint>,
}
