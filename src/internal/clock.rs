use std::time::SystemTime;

/// Nanoseconds since Unix epoch, truncated to `u64`.
pub(crate) fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
