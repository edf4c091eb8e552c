use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ScopeKey;

/// Point-in-time copy of a pipeline breakpoint.
///
/// Returned by [`BreakpointManager::set_breakpoint`](crate::BreakpointManager::set_breakpoint)
/// and [`BreakpointManager::list_breakpoints`](crate::BreakpointManager::list_breakpoints).
/// Later changes to the breakpoint (toggling, hits) are not reflected in an
/// already returned copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Opaque id, fresh on every `set_breakpoint`, even for a replaced scope.
    pub id: Arc<str>,
    #[serde(flatten)]
    pub scope: ScopeKey,
    /// Context key that must hold a truthy value for the breakpoint to fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Arc<str>>,
    pub enabled: bool,
    /// Number of times the breakpoint actually fired.
    pub hit_count: u64,
}
