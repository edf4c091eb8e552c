//! Observer seam for breakpoint activity.
//!
//! A [`Monitor`] is injected at construction time with
//! [`BreakpointManager::with_monitor`](crate::BreakpointManager::with_monitor) or
//! [`DebugSession::with_monitor`](crate::DebugSession::with_monitor). Without one,
//! [`Noop`](crate::monitors::Noop) is used and nothing is reported.
//!
//! # Example
//!
//! ```rust
//! use waypoint::{BreakpointManager, Config, monitors::Tracer};
//!
//! let manager = BreakpointManager::new(Config::default()).with_monitor(Tracer);
//! ```

mod monitor;

pub use monitor::Monitor;
