use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    Config, ContextMap, Error, Result,
    condition::condition_holds,
    internal::now_nanos,
    monitoring::Monitor,
    monitors::Noop,
    session::{PauseReason, SessionBreakpoint, SessionState, SessionStatus, StepRecord, UnitKind},
};

struct Waiter {
    token: Uuid,
    sender: oneshot::Sender<()>,
}

#[derive(Default)]
struct Inner {
    status: SessionStatus,
    workflow_type: Option<Arc<str>>,
    current_step: Option<Arc<str>>,
    paused_breakpoint: Option<Arc<str>>,
    paused_data: Option<ContextMap>,
    stepping: bool,
    history: VecDeque<StepRecord>,
    breakpoints: BTreeMap<(UnitKind, Arc<str>), SessionBreakpoint>,
    last_breakpoint_id: u64,
    waiter: Option<Waiter>,
}

impl Inner {
    fn clear_pause(&mut self) {
        self.waiter = None;
        self.paused_breakpoint = None;
        self.paused_data = None;
    }

    fn check(&mut self, kind: UnitKind, target: &str, ctx: Option<&ContextMap>) -> Option<(Arc<str>, u64)> {
        let bp = self.breakpoints.get_mut(&(kind, Arc::from(target)))?;
        if !bp.enabled || !condition_holds(bp.condition.as_deref(), ctx) {
            return None;
        }
        bp.hit_count += 1;
        Some((bp.id.clone(), bp.hit_count))
    }
}

/// Debug controller for a single workflow run, stepping unit by unit.
///
/// Unlike [`BreakpointManager`](crate::BreakpointManager), which tracks many
/// concurrently paused executions, a session follows exactly one run:
///
/// - `set_running()` starts tracking a run (`Idle → Running`)
/// - `pause()` suspends the run's task (`Running → Paused`) until `step()`,
///   `continue_()`, cancellation or `reset()`
/// - `step()` resumes and pauses again at the next unit
/// - `continue_()` resumes and only pauses at the next breakpoint
/// - `reset()` forces `Idle` and aborts a pending pause
///
/// Exactly one of resume, cancellation or reset settles a pause. All
/// transitions happen under the session lock, which is never held while the
/// run is suspended.
pub struct DebugSession {
    config: Arc<Config>,
    inner: Mutex<Inner>,
    monitor: Arc<dyn Monitor>,
}

impl DebugSession {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            inner: Mutex::new(Inner::default()),
            monitor: Arc::new(Noop),
        }
    }

    /// Replace the monitor notified about session transitions and hits.
    pub fn with_monitor<M: Monitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("DebugSession lock poisoned")
    }

    fn notify_transition(&self, from: SessionStatus, to: SessionStatus) {
        if from != to {
            self.monitor.on_session_transition(from, to);
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// Starts tracking a run of `workflow_type`.
    ///
    /// Fails with [`Error::InvalidState`] while a unit is paused.
    pub fn set_running(&self, workflow_type: &str) -> Result<()> {
        let from = {
            let mut inner = self.lock();
            if inner.status == SessionStatus::Paused {
                return Err(Error::invalid_state("cannot start a run while paused"));
            }
            let from = inner.status;
            inner.status = SessionStatus::Running;
            inner.workflow_type = Some(Arc::from(workflow_type));
            inner.current_step = None;
            inner.stepping = false;
            from
        };
        self.notify_transition(from, SessionStatus::Running);
        Ok(())
    }

    /// Marks the tracked run as complete (`Running → Idle`).
    ///
    /// A no-op when idle or stopped; fails while paused.
    pub fn finish(&self) -> Result<()> {
        {
            let mut inner = self.lock();
            match inner.status {
                SessionStatus::Paused => {
                    return Err(Error::invalid_state("cannot finish a paused run"));
                }
                SessionStatus::Running => {
                    inner.status = SessionStatus::Idle;
                    inner.stepping = false;
                }
                SessionStatus::Idle | SessionStatus::Stopped => return Ok(()),
            }
        }
        self.notify_transition(SessionStatus::Running, SessionStatus::Idle);
        Ok(())
    }

    pub fn set_breakpoint(&self, kind: UnitKind, target: &str, condition: Option<&str>) -> SessionBreakpoint {
        let mut inner = self.lock();
        inner.last_breakpoint_id += 1;
        let bp = SessionBreakpoint {
            id: format!("bp-{}", inner.last_breakpoint_id).into(),
            kind,
            target: Arc::from(target),
            condition: condition.filter(|c| !c.is_empty()).map(Arc::from),
            enabled: true,
            hit_count: 0,
        };
        inner.breakpoints.insert((kind, bp.target.clone()), bp.clone());
        bp
    }

    pub fn remove_breakpoint(&self, kind: UnitKind, target: &str) -> bool {
        self.lock()
            .breakpoints
            .remove(&(kind, Arc::from(target)))
            .is_some()
    }

    pub fn enable_breakpoint(&self, kind: UnitKind, target: &str) -> bool {
        self.toggle(kind, target, true)
    }

    pub fn disable_breakpoint(&self, kind: UnitKind, target: &str) -> bool {
        self.toggle(kind, target, false)
    }

    fn toggle(&self, kind: UnitKind, target: &str, enabled: bool) -> bool {
        match self.lock().breakpoints.get_mut(&(kind, Arc::from(target))) {
            Some(bp) => {
                bp.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn list_breakpoints(&self) -> Vec<SessionBreakpoint> {
        self.lock().breakpoints.values().cloned().collect()
    }

    /// Same rules as the pipeline breakpoints, scoped by unit kind and target.
    /// Returns the id of the breakpoint that fired.
    pub fn check_breakpoint(&self, kind: UnitKind, target: &str, ctx: Option<&ContextMap>) -> Option<Arc<str>> {
        let hit = self.lock().check(kind, target, ctx);
        hit.map(|(id, _)| {
            self.monitor.on_session_breakpoint_hit(&id, kind, target);
            id
        })
    }

    /// Decides whether the running unit should pause before executing.
    ///
    /// A firing breakpoint wins; otherwise the unit pauses if the last
    /// decision was `step()`. Always `None` unless the session is running.
    pub fn should_pause(&self, kind: UnitKind, target: &str, ctx: Option<&ContextMap>) -> Option<PauseReason> {
        let reason = {
            let mut inner = self.lock();
            if inner.status != SessionStatus::Running {
                return None;
            }
            let reason = match inner.check(kind, target, ctx) {
                Some((id, _)) => PauseReason::Breakpoint(id),
                None if inner.stepping => PauseReason::Step,
                None => return None,
            };
            inner.stepping = false;
            reason
        };
        if let Some(id) = reason.breakpoint_id() {
            self.monitor.on_session_breakpoint_hit(id, kind, target);
        }
        Some(reason)
    }

    /// Appends to the bounded history, evicting the oldest entry when full.
    pub fn record_step(
        &self,
        name: &str,
        kind: UnitKind,
        duration: Duration,
        data: ContextMap,
        error: Option<String>,
    ) {
        let limit = self.config.history_limit;
        if limit == 0 {
            return;
        }
        let record = StepRecord {
            name: Arc::from(name),
            kind,
            duration,
            data,
            error,
            recorded_at: now_nanos(),
        };
        let mut inner = self.lock();
        while inner.history.len() >= limit {
            inner.history.pop_front();
        }
        inner.history.push_back(record);
    }

    /// Suspends the running unit until it is released.
    ///
    /// Returns `Ok(())` after `step()` or `continue_()` (status back to
    /// `Running`), [`Error::Cancelled`] if `cancel` fires first (status
    /// `Stopped`), or [`Error::Aborted`] if the session is reset meanwhile.
    /// Fails immediately with [`Error::InvalidState`] unless running.
    ///
    /// Dropping the returned future before it completes counts as
    /// cancellation.
    pub async fn pause(
        &self,
        cancel: &CancellationToken,
        step_id: &str,
        breakpoint_id: Option<&str>,
        data: ContextMap,
    ) -> Result<()> {
        let step: Arc<str> = Arc::from(step_id);
        let (token, mut rx) = {
            let mut inner = self.lock();
            if inner.status != SessionStatus::Running {
                return Err(Error::invalid_state(format!(
                    "cannot pause while {}",
                    inner.status
                )));
            }
            let (tx, rx) = oneshot::channel();
            let token = Uuid::new_v4();
            inner.waiter = Some(Waiter { token, sender: tx });
            inner.status = SessionStatus::Paused;
            inner.current_step = Some(step.clone());
            inner.paused_breakpoint = breakpoint_id.map(Arc::from);
            inner.paused_data = Some(data);
            inner.stepping = false;
            (token, rx)
        };
        self.notify_transition(SessionStatus::Running, SessionStatus::Paused);

        let _guard = PauseGuard {
            session: self,
            token,
        };

        tokio::select! {
            biased;
            released = &mut rx => released.map_err(|_| Error::Aborted(step)),
            _ = cancel.cancelled() => {
                if self.release_waiter(token) {
                    Err(Error::Cancelled(step))
                } else {
                    // A decision or a reset got there first and has already settled the handoff.
                    rx.await.map_err(|_| Error::Aborted(step))
                }
            }
        }
    }

    /// Stops the run if the pause identified by `token` is still pending.
    fn release_waiter(&self, token: Uuid) -> bool {
        {
            let mut inner = self.lock();
            if inner.waiter.as_ref().is_none_or(|w| w.token != token) {
                return false;
            }
            inner.clear_pause();
            inner.status = SessionStatus::Stopped;
        }
        self.notify_transition(SessionStatus::Paused, SessionStatus::Stopped);
        true
    }

    /// Resumes the paused unit and pauses again at the next one.
    pub fn step(&self) -> Result<()> {
        self.release(true)
    }

    /// Resumes the paused unit and runs until the next breakpoint.
    pub fn continue_(&self) -> Result<()> {
        self.release(false)
    }

    fn release(&self, stepping: bool) -> Result<()> {
        let waiter = {
            let mut inner = self.lock();
            if inner.status != SessionStatus::Paused {
                return Err(Error::invalid_state(format!(
                    "session is not paused (status: {})",
                    inner.status
                )));
            }
            let Some(waiter) = inner.waiter.take() else {
                return Err(Error::invalid_state("no paused unit to resume"));
            };
            inner.clear_pause();
            inner.status = SessionStatus::Running;
            inner.stepping = stepping;
            waiter
        };
        self.notify_transition(SessionStatus::Paused, SessionStatus::Running);
        let _ = waiter.sender.send(());
        Ok(())
    }

    /// Forces `Idle`, clearing breakpoints, history and any pending pause.
    ///
    /// A task suspended in [`pause`](Self::pause) returns [`Error::Aborted`].
    pub fn reset(&self) {
        let (from, waiter) = {
            let mut inner = self.lock();
            let from = inner.status;
            let waiter = inner.waiter.take();
            let last_breakpoint_id = inner.last_breakpoint_id;
            *inner = Inner {
                last_breakpoint_id,
                ..Inner::default()
            };
            (from, waiter)
        };
        drop(waiter);
        self.notify_transition(from, SessionStatus::Idle);
    }

    pub fn state(&self) -> SessionState {
        let inner = self.lock();
        SessionState {
            status: inner.status,
            workflow_type: inner.workflow_type.clone(),
            current_step: inner.current_step.clone(),
            paused_breakpoint: inner.paused_breakpoint.clone(),
            paused_data: inner.paused_data.clone(),
            stepping: inner.stepping,
            history: inner.history.iter().cloned().collect(),
            breakpoints: inner.breakpoints.values().cloned().collect(),
        }
    }
}

impl Default for DebugSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Settles an abandoned pause when the `pause` future is dropped mid-wait.
struct PauseGuard<'a> {
    session: &'a DebugSession,
    token: Uuid,
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.session.release_waiter(self.token);
    }
}
