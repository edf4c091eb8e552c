//! Ready-to-use monitor implementations.
//!
//! - [`Noop`] - reports nothing; the default when no monitor is injected
//! - [`Tracer`] - logs activity via the `tracing` crate

mod tracer;
pub use tracer::Tracer;

use crate::monitoring::Monitor;

/// Monitor that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Monitor for Noop {}
