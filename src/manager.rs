use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{sync::oneshot, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    Breakpoint, Config, ContextMap, Error, PausedExecution, PendingResume, ResumeAction, Result,
    ScopeKey,
    internal::{BreakpointTable, PausedDirectory, PausedEntry, now_nanos},
    monitoring::Monitor,
    monitors::Noop,
};

/// Pipeline breakpoints plus the directory of executions paused on them.
///
/// The executor asks [`check_breakpoint`](Self::check_breakpoint) at every step
/// boundary. When it fires, the executor parks itself with
/// [`wait_for_resume`](Self::wait_for_resume) (or [`pause`](Self::pause) and
/// [`PendingResume::wait`]). A controller lists paused executions and releases
/// each one with [`resume`](Self::resume).
///
/// - One decision per pause: `resume` takes the directory entry before
///   delivering, so a second `resume` for the same id fails with `NotFound`.
/// - `clear_all` aborts every paused execution, so a reset never leaves a
///   task blocked.
/// - No lock is held while a task waits or while a decision is delivered.
///
/// The manager is `Send + Sync`; share it behind an `Arc`.
pub struct BreakpointManager {
    config: Arc<Config>,
    breakpoints: BreakpointTable,
    paused: Arc<PausedDirectory>,
    monitor: Arc<dyn Monitor>,
}

impl BreakpointManager {
    pub fn new(config: Config) -> Self {
        Self {
            breakpoints: BreakpointTable::new(config.breakpoint_id_prefix),
            config: Arc::new(config),
            paused: Arc::new(PausedDirectory::new()),
            monitor: Arc::new(Noop),
        }
    }

    /// Replace the monitor notified about breakpoint and pause activity.
    pub fn with_monitor<M: Monitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    /// Sets a breakpoint on `pipeline`/`step`, replacing any existing one.
    ///
    /// The new breakpoint is enabled, has a zero hit count and a fresh id.
    /// An empty `condition` is the same as none.
    pub fn set_breakpoint(&self, pipeline: &str, step: &str, condition: Option<&str>) -> Breakpoint {
        let condition = condition.filter(|c| !c.is_empty()).map(Arc::from);
        let bp = self.breakpoints.set(ScopeKey::new(pipeline, step), condition);
        self.monitor.on_breakpoint_set(&bp);
        bp
    }

    /// Returns `true` if a breakpoint was removed.
    pub fn remove_breakpoint(&self, pipeline: &str, step: &str) -> bool {
        let scope = ScopeKey::new(pipeline, step);
        let removed = self.breakpoints.remove(&scope);
        if removed {
            self.monitor.on_breakpoint_removed(&scope);
        }
        removed
    }

    /// Returns `true` if the breakpoint exists. The hit count is untouched.
    pub fn enable_breakpoint(&self, pipeline: &str, step: &str) -> bool {
        self.toggle(pipeline, step, true)
    }

    /// Disables without removing. Returns `true` if the breakpoint exists.
    pub fn disable_breakpoint(&self, pipeline: &str, step: &str) -> bool {
        self.toggle(pipeline, step, false)
    }

    fn toggle(&self, pipeline: &str, step: &str, enabled: bool) -> bool {
        let scope = ScopeKey::new(pipeline, step);
        let found = self.breakpoints.set_enabled(&scope, enabled);
        if found {
            self.monitor.on_breakpoint_toggled(&scope, enabled);
        }
        found
    }

    pub fn list_breakpoints(&self) -> Vec<Breakpoint> {
        self.breakpoints.list()
    }

    /// Removes every breakpoint and aborts every paused execution.
    ///
    /// Each paused execution receives [`Action::Abort`](crate::Action::Abort)
    /// and should unwind. Afterwards both listings are empty.
    pub fn clear_all(&self) {
        let removed = self.breakpoints.clear();
        let entries = self.paused.take_all();
        let aborted = entries.len();
        for entry in entries {
            Self::deliver_abort(entry);
        }
        self.monitor.on_cleared(removed, aborted);
    }

    /// Checks whether execution should pause at `pipeline`/`step`.
    ///
    /// Returns the id of the breakpoint that fired, or `None` if there is no
    /// enabled breakpoint or its condition does not hold. Only a firing
    /// breakpoint counts a hit.
    ///
    /// A conditional breakpoint never fires when `ctx` is `None`: a missing
    /// context is treated like a context without the condition key.
    pub fn check_breakpoint(
        &self,
        pipeline: &str,
        step: &str,
        ctx: Option<&ContextMap>,
    ) -> Option<Arc<str>> {
        let scope = ScopeKey::new(pipeline, step);
        let hit = self.breakpoints.check(&scope, ctx)?;
        self.monitor.on_breakpoint_hit(&hit.id, &scope, hit.hit_count);
        Some(hit.id)
    }

    /// Registers a paused execution and returns the handle its task waits on.
    ///
    /// `ctx` is deep-copied. Fails with [`Error::AlreadyPaused`] if
    /// `execution_id` is already paused.
    pub fn pause(
        &self,
        execution_id: &str,
        pipeline: &str,
        step: &str,
        step_index: usize,
        ctx: Option<&ContextMap>,
    ) -> Result<PendingResume> {
        let execution_id: Arc<str> = Arc::from(execution_id);
        let snapshot = PausedExecution {
            id: execution_id.clone(),
            scope: ScopeKey::new(pipeline, step),
            step_index,
            context: ctx.cloned().unwrap_or_default(),
            paused_at: now_nanos(),
        };
        let (tx, rx) = oneshot::channel();
        let token = Uuid::new_v4();
        let entry = PausedEntry {
            snapshot: snapshot.clone(),
            token,
            since: Instant::now(),
            sender: tx,
        };
        self.paused.insert(entry)?;
        self.monitor.on_execution_paused(&snapshot);

        Ok(PendingResume::new(
            execution_id,
            token,
            rx,
            Arc::downgrade(&self.paused),
        ))
    }

    /// Delivers `action` to the paused execution and removes it from the directory.
    ///
    /// Fails with [`Error::NotFound`] if the execution is not paused, was
    /// already resumed or cleared, or its waiter has gone away.
    pub fn resume(&self, execution_id: &str, action: ResumeAction) -> Result<()> {
        let entry = self
            .paused
            .take(execution_id)
            .ok_or_else(|| Error::execution_not_found(execution_id))?;
        let notified = action.clone();
        if entry.deliver(action).is_err() {
            tracing::warn!(execution_id, "Paused execution dropped its handoff before resume");
            return Err(Error::execution_not_found(execution_id));
        }
        self.monitor.on_execution_resumed(execution_id, &notified);
        Ok(())
    }

    /// Pauses and waits for the decision. The only blocking call on the manager.
    pub async fn wait_for_resume(
        &self,
        execution_id: &str,
        pipeline: &str,
        step: &str,
        step_index: usize,
        ctx: Option<&ContextMap>,
    ) -> Result<ResumeAction> {
        self.pause(execution_id, pipeline, step, step_index, ctx)?
            .wait()
            .await
    }

    pub fn list_paused(&self) -> Vec<PausedExecution> {
        self.paused.list()
    }

    pub fn get_paused(&self, execution_id: &str) -> Option<PausedExecution> {
        self.paused.get(execution_id)
    }

    pub fn paused_count(&self) -> usize {
        self.paused.len()
    }

    /// Aborts every execution that has been paused for at least `max_age`.
    /// Returns how many were aborted.
    pub fn sweep_stale(&self, max_age: Duration) -> usize {
        let stale = self.paused.take_older_than(max_age);
        let n = stale.len();
        for entry in stale {
            self.monitor
                .on_stale_pause_swept(&entry.snapshot.id, entry.since.elapsed());
            Self::deliver_abort(entry);
        }
        n
    }

    /// Spawns a task that periodically aborts stale pauses until `cancel` fires.
    ///
    /// Returns `Ok(None)` when [`Config::stale_pause_after`] is unset, and
    /// fails with [`Error::Validation`] if [`Config::sweep_interval`] is zero.
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        cancel: CancellationToken,
    ) -> Result<Option<JoinHandle<()>>> {
        let Some(max_age) = self.config.stale_pause_after else {
            return Ok(None);
        };
        if self.config.sweep_interval.is_zero() {
            return Err(Error::validation("sweep interval must be non-zero"));
        }
        let manager = Arc::downgrade(self);
        let mut interval = tokio::time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        Ok(Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(manager) = manager.upgrade() else { break };
                        manager.sweep_stale(max_age);
                    }
                }
            }
        })))
    }

    fn deliver_abort(entry: PausedEntry) {
        let id = entry.snapshot.id.clone();
        if entry.deliver(ResumeAction::abort()).is_err() {
            tracing::debug!(execution_id = %id, "Paused execution was already gone during abort");
        }
    }
}

impl Default for BreakpointManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use serde_json::json;

    fn ctx(value: serde_json::Value) -> ContextMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_set_and_remove_breakpoint() {
        let m = BreakpointManager::default();

        let bp = m.set_breakpoint("order-pipeline", "validate", None);
        assert!(!bp.id.is_empty());
        assert_eq!(bp.scope.pipeline(), "order-pipeline");
        assert_eq!(bp.scope.step(), "validate");
        assert!(bp.enabled);
        assert_eq!(bp.hit_count, 0);
        assert_eq!(m.list_breakpoints().len(), 1);

        assert!(m.remove_breakpoint("order-pipeline", "validate"));
        assert!(m.list_breakpoints().is_empty());
        assert!(!m.remove_breakpoint("order-pipeline", "validate"));
    }

    #[test]
    fn test_overwrite_issues_new_id() {
        let m = BreakpointManager::default();
        let bp1 = m.set_breakpoint("pipeline", "step", Some("cond1"));
        let bp2 = m.set_breakpoint("pipeline", "step", Some("cond2"));

        let bps = m.list_breakpoints();
        assert_eq!(bps.len(), 1);
        assert_eq!(bps[0].condition.as_deref(), Some("cond2"));
        assert_ne!(bp1.id, bp2.id);
        assert_eq!(bps[0].id, bp2.id);
    }

    #[test]
    fn test_disabled_breakpoint_never_fires() {
        let m = BreakpointManager::default();
        m.set_breakpoint("pipeline-a", "step-1", None);

        assert!(m.disable_breakpoint("pipeline-a", "step-1"));
        assert!(!m.list_breakpoints()[0].enabled);
        for _ in 0..3 {
            assert!(m.check_breakpoint("pipeline-a", "step-1", None).is_none());
        }
        assert_eq!(m.list_breakpoints()[0].hit_count, 0);

        assert!(m.enable_breakpoint("pipeline-a", "step-1"));
        assert!(m.check_breakpoint("pipeline-a", "step-1", None).is_some());
        assert_eq!(m.list_breakpoints()[0].hit_count, 1);

        assert!(!m.enable_breakpoint("nope", "nope"));
        assert!(!m.disable_breakpoint("nope", "nope"));
    }

    #[test]
    fn test_toggling_keeps_hit_count() {
        let m = BreakpointManager::default();
        m.set_breakpoint("pipeline-a", "step-1", None);
        m.check_breakpoint("pipeline-a", "step-1", None);
        m.check_breakpoint("pipeline-a", "step-1", None);

        assert!(m.disable_breakpoint("pipeline-a", "step-1"));
        assert_eq!(m.list_breakpoints()[0].hit_count, 2);
        assert!(m.enable_breakpoint("pipeline-a", "step-1"));
        assert_eq!(m.list_breakpoints()[0].hit_count, 2);

        assert!(m.check_breakpoint("pipeline-a", "step-1", None).is_some());
        assert_eq!(m.list_breakpoints()[0].hit_count, 3);
    }

    #[test]
    fn test_check_matches_exact_scope() {
        let m = BreakpointManager::default();
        m.set_breakpoint("pipeline-a", "step-1", None);

        assert!(m.check_breakpoint("pipeline-a", "step-1", None).is_some());
        assert!(m.check_breakpoint("pipeline-b", "step-1", None).is_none());
        assert!(m.check_breakpoint("pipeline-a", "step-2", None).is_none());
        assert!(m.check_breakpoint("none", "none", None).is_none());
    }

    #[test]
    fn test_conditional_breakpoint() {
        let m = BreakpointManager::default();
        m.set_breakpoint("pipeline-a", "step-1", Some("debug_mode"));

        for falsy in [
            json!({}),
            json!({"debug_mode": false}),
            json!({"debug_mode": 0}),
            json!({"debug_mode": ""}),
            json!({"debug_mode": null}),
        ] {
            assert!(m.check_breakpoint("pipeline-a", "step-1", Some(&ctx(falsy))).is_none());
        }
        assert!(m.check_breakpoint("pipeline-a", "step-1", None).is_none());
        assert_eq!(m.list_breakpoints()[0].hit_count, 0);

        for truthy in [
            json!({"debug_mode": true}),
            json!({"debug_mode": 1}),
            json!({"debug_mode": "yes"}),
        ] {
            assert!(m.check_breakpoint("pipeline-a", "step-1", Some(&ctx(truthy))).is_some());
        }
        assert_eq!(m.list_breakpoints()[0].hit_count, 3);

        m.set_breakpoint("pipeline-b", "step-2", Some(""));
        assert!(m.check_breakpoint("pipeline-b", "step-2", Some(&ContextMap::new())).is_some());
    }

    #[test]
    fn test_hit_count_then_remove() {
        let m = BreakpointManager::default();
        let bp = m.set_breakpoint("orders", "validate", None);
        let c = ctx(json!({"amt": 5}));

        assert_eq!(m.check_breakpoint("orders", "validate", Some(&c)), Some(bp.id.clone()));
        assert_eq!(m.check_breakpoint("orders", "validate", Some(&c)), Some(bp.id));
        assert_eq!(m.list_breakpoints()[0].hit_count, 2);

        assert!(m.remove_breakpoint("orders", "validate"));
        assert_eq!(m.check_breakpoint("orders", "validate", Some(&c)), None);
    }

    #[test]
    fn test_duplicate_pause_is_rejected() {
        let m = BreakpointManager::default();
        let _first = m.pause("exec-1", "p", "s", 0, None).unwrap();
        let second = m.pause("exec-1", "p", "s", 1, None);
        assert!(matches!(second, Err(Error::AlreadyPaused(id)) if &*id == "exec-1"));
        assert_eq!(m.get_paused("exec-1").unwrap().step_index, 0);
    }

    #[test]
    fn test_resume_unknown_mutates_nothing() {
        let m = BreakpointManager::default();
        m.set_breakpoint("p", "s", None);
        let _pending = m.pause("exec-1", "p", "s", 0, None).unwrap();

        let err = m.resume("nonexistent", ResumeAction::continue_()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(m.list_paused().len(), 1);
        assert_eq!(m.list_breakpoints().len(), 1);
    }

    #[test]
    fn test_dropped_handle_withdraws_pause() {
        let m = BreakpointManager::default();
        let pending = m.pause("exec-1", "p", "s", 0, None).unwrap();
        assert_eq!(pending.execution_id(), "exec-1");
        assert_eq!(m.paused_count(), 1);

        drop(pending);
        assert_eq!(m.paused_count(), 0);
        assert!(matches!(m.resume("exec-1", ResumeAction::continue_()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_stale_drop_does_not_remove_newer_pause() {
        let m = BreakpointManager::default();
        let first = m.pause("exec-1", "p", "s", 0, None).unwrap();
        m.resume("exec-1", ResumeAction::skip()).unwrap();
        let _second = m.pause("exec-1", "p", "s", 1, None).unwrap();

        drop(first);
        assert_eq!(m.get_paused("exec-1").unwrap().step_index, 1);
    }

    #[tokio::test]
    async fn test_sweep_aborts_only_stale_pauses() {
        let m = BreakpointManager::default();
        let old = m.pause("old", "p", "s", 0, None).unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let fresh = m.pause("fresh", "p", "s", 0, None).unwrap();

        assert_eq!(m.sweep_stale(Duration::from_millis(20)), 1);
        assert_eq!(old.wait().await.unwrap().action, Action::Abort);
        assert_eq!(m.list_paused().len(), 1);
        assert_eq!(&*m.list_paused()[0].id, "fresh");

        m.resume("fresh", ResumeAction::continue_()).unwrap();
        assert_eq!(fresh.wait().await.unwrap().action, Action::Continue);
    }

    #[tokio::test]
    async fn test_sweeper_requires_policy() {
        let m = Arc::new(BreakpointManager::default());
        assert!(m.spawn_sweeper(CancellationToken::new()).unwrap().is_none());

        let m = Arc::new(BreakpointManager::new(
            Config::default()
                .with_stale_pause_after(Duration::from_millis(10))
                .with_sweep_interval(Duration::from_millis(5)),
        ));
        let cancel = CancellationToken::new();
        let handle = m.spawn_sweeper(cancel.clone()).unwrap().unwrap();

        let pending = m.pause("exec-1", "p", "s", 0, None).unwrap();
        let action = tokio::time::timeout(Duration::from_secs(2), pending.wait())
            .await
            .expect("sweeper should abort the stale pause")
            .unwrap();
        assert!(action.is_abort());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_rejects_zero_interval() {
        let m = Arc::new(BreakpointManager::new(
            Config::default()
                .with_stale_pause_after(Duration::from_secs(1))
                .with_sweep_interval(Duration::ZERO),
        ));
        let err = m.spawn_sweeper(CancellationToken::new()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Without a stale-pause policy the interval is never used.
        let m = Arc::new(BreakpointManager::new(
            Config::default().with_sweep_interval(Duration::ZERO),
        ));
        assert!(m.spawn_sweeper(CancellationToken::new()).unwrap().is_none());
    }
}
