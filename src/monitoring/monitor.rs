use std::time::Duration;

use crate::{
    Breakpoint, PausedExecution, ResumeAction, ScopeKey,
    session::{SessionStatus, UnitKind},
};

/// Observer of breakpoint and pause/resume activity.
///
/// Every hook has an empty default body, so implementors only override what
/// they care about. Hooks are informational: they run synchronously on the
/// calling task and cannot influence control flow. Keep them cheap.
pub trait Monitor: Send + Sync {
    fn on_breakpoint_set(&self, breakpoint: &Breakpoint) {
        let _b = breakpoint;
    }

    fn on_breakpoint_removed(&self, scope: &ScopeKey) {
        let _s = scope;
    }

    fn on_breakpoint_toggled(&self, scope: &ScopeKey, enabled: bool) {
        let _s = scope;
        let _e = enabled;
    }

    fn on_breakpoint_hit(&self, id: &str, scope: &ScopeKey, hit_count: u64) {
        let _i = id;
        let _s = scope;
        let _h = hit_count;
    }

    fn on_execution_paused(&self, execution: &PausedExecution) {
        let _e = execution;
    }

    fn on_execution_resumed(&self, execution_id: &str, action: &ResumeAction) {
        let _e = execution_id;
        let _a = action;
    }

    fn on_cleared(&self, breakpoints: usize, aborted: usize) {
        let _b = breakpoints;
        let _a = aborted;
    }

    fn on_stale_pause_swept(&self, execution_id: &str, age: Duration) {
        let _e = execution_id;
        let _a = age;
    }

    fn on_session_transition(&self, from: SessionStatus, to: SessionStatus) {
        let _f = from;
        let _t = to;
    }

    fn on_session_breakpoint_hit(&self, id: &str, kind: UnitKind, target: &str) {
        let _i = id;
        let _k = kind;
        let _t = target;
    }
}
