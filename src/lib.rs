//! Waypoint - breakpoints and pause/resume control for pipeline executions
//!
//! Lets an operator suspend an in-flight execution at a named point, inspect
//! the context it carried at that moment, and release it with a decision:
//! continue, skip the step, abort the run, or step over to the next step,
//! optionally injecting replacement data.
//!
//! Two controllers share the same truthiness rules for conditional
//! breakpoints:
//!
//! - [`BreakpointManager`] - breakpoints keyed by pipeline and step, with a
//!   directory of any number of concurrently paused executions.
//! - [`DebugSession`] - a single-run debugger stepping a workflow through its
//!   modules, nested workflows and triggers.
//!
//! With the `http` feature, [`http::router`] exposes both over axum.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waypoint::{Action, BreakpointManager, ResumeAction};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> waypoint::Result<()> {
//! let manager = Arc::new(BreakpointManager::default());
//! manager.set_breakpoint("orders", "validate", None);
//!
//! // executor side
//! assert!(manager.check_breakpoint("orders", "validate", None).is_some());
//! let pending = manager.pause("run-1", "orders", "validate", 0, None)?;
//!
//! // controller side
//! manager.resume("run-1", ResumeAction::skip())?;
//!
//! assert_eq!(pending.wait().await?.action, Action::Skip);
//! # Ok(())
//! # }
//! ```

mod breakpoint;
mod condition;
mod config;
mod error;
mod interceptor;
mod manager;
mod paused_execution;
mod pending_resume;
mod resume_action;
mod scope_key;

mod internal;

pub mod monitoring;
pub mod monitors;
pub mod session;

#[cfg(feature = "http")]
pub mod http;

pub use breakpoint::Breakpoint;
pub use condition::{ContextMap, is_truthy};
pub use config::Config;
pub use error::Error;
pub use interceptor::BreakpointInterceptor;
pub use manager::BreakpointManager;
pub use paused_execution::PausedExecution;
pub use pending_resume::PendingResume;
pub use resume_action::{Action, ResumeAction};
pub use scope_key::ScopeKey;
pub use session::{DebugSession, SessionState, SessionStatus, UnitKind};

pub type Result<T = ()> = std::result::Result<T, Error>;
