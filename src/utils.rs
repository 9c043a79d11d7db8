//! Small helpers shared across modules.

/// Milliseconds since the Unix epoch, from the JS clock.
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
