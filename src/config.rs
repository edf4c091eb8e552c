use std::time::Duration;

/// Runtime configuration for the breakpoint manager and the debug session.
///
/// Use the builder methods to customize, or [`Default`] for sensible defaults.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use waypoint::Config;
///
/// let config = Config::default()
///     .with_history_limit(500)
///     .with_stale_pause_after(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries kept in the session step history.
    /// The oldest entry is evicted first once the limit is reached.
    /// Default: 100
    pub history_limit: usize,

    /// Age after which a paused execution is considered abandoned and is
    /// aborted by the sweeper. `None` disables sweeping entirely, so a
    /// paused execution waits until it is resumed or cleared.
    /// Default: `None`
    pub stale_pause_after: Option<Duration>,

    /// How often the background sweeper checks for stale pauses.
    /// Only used when `stale_pause_after` is set.
    /// Default: 30 s
    pub sweep_interval: Duration,

    /// Prefix used for breakpoint ids issued by the manager.
    /// Default: `"pbp"`
    pub breakpoint_id_prefix: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_limit: 100,
            stale_pause_after: None,
            sweep_interval: Duration::from_secs(30),
            breakpoint_id_prefix: "pbp",
        }
    }
}

impl Config {
    /// Set the bounded size of the session step history.
    ///
    /// A limit of zero keeps no history at all.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Abort paused executions that have waited longer than `age`.
    ///
    /// Sweeping only happens while a sweeper task is running, see
    /// [`BreakpointManager::spawn_sweeper`](crate::BreakpointManager::spawn_sweeper).
    pub fn with_stale_pause_after(mut self, age: Duration) -> Self {
        self.stale_pause_after = Some(age);
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_breakpoint_id_prefix(mut self, prefix: &'static str) -> Self {
        self.breakpoint_id_prefix = prefix;
        self
    }
}
