use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Whole seconds since the Unix epoch, 0 if the clock is set before it
pub(crate) fn get_now_as_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since_epoch| since_epoch.as_secs())
        .unwrap_or_default()
}
