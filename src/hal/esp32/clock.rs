//! ESP32 clock implementation using the ESP-IDF timer.

use crate::traits::Clock;

/// Microseconds since boot, truncated to the wrapping counter the
/// encoder interrupt compares against.
#[inline]
pub(super) fn now_us() -> u32 {
    // Safe: plain read of the hardware timer, callable from ISRs
    let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
    micros as u32
}

/// ESP32 clock using the hardware timer.
///
/// Provides millisecond-resolution timing using the ESP-IDF `esp_timer_get_time()`
/// function, which returns microseconds since boot.
///
/// # Example
///
/// ```ignore
/// use cnc_pendant::hal::esp32::Esp32Clock;
/// use cnc_pendant::traits::Clock;
///
/// let clock = Esp32Clock::new();
/// let start = clock.now_ms();
/// // ... do work ...
/// let elapsed = clock.now_ms() - start;
/// ```
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // Safe: plain read of the hardware timer, no side effects
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        (micros / 1000) as u64
    }
}
