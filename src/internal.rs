mod breakpoint_table;
mod clock;
mod paused_directory;

pub(crate) use breakpoint_table::BreakpointTable;
pub(crate) use clock::now_nanos;
pub(crate) use paused_directory::{PausedDirectory, PausedEntry};
