use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ContextMap, ScopeKey};

/// Read-only view of an execution suspended at a breakpoint.
///
/// `context` is a deep copy taken when the execution paused, so later
/// mutation of the executor's live context never shows up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PausedExecution {
    /// Caller-supplied execution id, unique among paused executions.
    pub id: Arc<str>,
    #[serde(flatten)]
    pub scope: ScopeKey,
    pub step_index: usize,
    pub context: ContextMap,
    /// Timestamp in nanoseconds since Unix epoch.
    pub paused_at: u64,
}
