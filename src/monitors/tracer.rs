use std::time::Duration;

use crate::{
    Breakpoint, PausedExecution, ResumeAction, ScopeKey,
    monitoring::Monitor,
    session::{SessionStatus, UnitKind},
};

/// Monitor that logs breakpoint activity via the `tracing` crate.
///
/// Lifecycle changes go out at `info`, individual hits at `debug`, and
/// forced aborts at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tracer;

impl Monitor for Tracer {
    fn on_breakpoint_set(&self, breakpoint: &Breakpoint) {
        tracing::info!(
            id = %breakpoint.id,
            pipeline = breakpoint.scope.pipeline(),
            step = breakpoint.scope.step(),
            condition = breakpoint.condition.as_deref().unwrap_or(""),
            "Breakpoint set"
        );
    }

    fn on_breakpoint_removed(&self, scope: &ScopeKey) {
        tracing::info!(pipeline = scope.pipeline(), step = scope.step(), "Breakpoint removed");
    }

    fn on_breakpoint_toggled(&self, scope: &ScopeKey, enabled: bool) {
        if enabled {
            tracing::info!(pipeline = scope.pipeline(), step = scope.step(), "Breakpoint enabled");
        } else {
            tracing::info!(pipeline = scope.pipeline(), step = scope.step(), "Breakpoint disabled");
        }
    }

    fn on_breakpoint_hit(&self, id: &str, scope: &ScopeKey, hit_count: u64) {
        tracing::debug!(id, %scope, hit_count, "Breakpoint hit");
    }

    fn on_execution_paused(&self, execution: &PausedExecution) {
        tracing::info!(
            execution_id = %execution.id,
            pipeline = execution.scope.pipeline(),
            step = execution.scope.step(),
            step_index = execution.step_index,
            "Execution paused"
        );
    }

    fn on_execution_resumed(&self, execution_id: &str, action: &ResumeAction) {
        tracing::info!(execution_id, action = %action.action, "Execution resumed");
    }

    fn on_cleared(&self, breakpoints: usize, aborted: usize) {
        tracing::info!(breakpoints, aborted, "All breakpoints and paused executions cleared");
    }

    fn on_stale_pause_swept(&self, execution_id: &str, age: Duration) {
        tracing::warn!(execution_id, ?age, "Aborting stale paused execution");
    }

    fn on_session_transition(&self, from: SessionStatus, to: SessionStatus) {
        tracing::info!(%from, %to, "Debug session transition");
    }

    fn on_session_breakpoint_hit(&self, id: &str, kind: UnitKind, target: &str) {
        tracing::debug!(id, %kind, target, "Session breakpoint hit");
    }
}
