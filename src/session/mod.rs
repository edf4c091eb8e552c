//! Single-run debug session.
//!
//! A coarse, workflow-level debugger that follows one run at a time through
//! its modules, nested workflows and triggers. It keeps its own breakpoint
//! set and shares only the truthiness rules with
//! [`BreakpointManager`](crate::BreakpointManager).

mod debug_session;
mod records;
mod status;
mod unit_kind;

pub use debug_session::DebugSession;
pub use records::{PauseReason, SessionBreakpoint, SessionState, StepRecord};
pub use status::SessionStatus;
pub use unit_kind::UnitKind;
