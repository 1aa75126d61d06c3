//! Hardware abstraction traits for the pendant's inputs, encoder, serial link, and clock.
//!
//! This module defines the hardware interfaces that let the pendant control
//! loop run unchanged on the ESP32 and on a desktop test harness.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`PendantInputs`] | Raw levels of the buttons, toggle, and E-stop |
//! | [`EncoderInput`] | Read-and-clear of the interrupt-fed tick counter |
//! | [`SerialLink`] | Newline-delimited ASCII link to the desktop bridge |
//! | [`Clock`] | Millisecond time source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::traits::{EncoderInput, PendantInputs};
//! use cnc_pendant::hal::{MockEncoder, MockInputs};
//!
//! let mut encoder = MockEncoder::new();
//! encoder.queue_ticks(3);
//! assert_eq!(encoder.take_ticks(), 3);
//! assert_eq!(encoder.take_ticks(), 0);
//!
//! let mut inputs = MockInputs::new();
//! inputs.press_estop();
//! assert!(!inputs.sample().estop); // active low
//! ```

use heapless::String;

/// Maximum length of a single protocol line, excluding the newline.
pub const MAX_LINE_LEN: usize = 96;

/// One line of the serial protocol.
pub type Line = String<MAX_LINE_LEN>;

/// Raw electrical levels of the pendant's digital inputs, sampled once per loop.
///
/// `true` means the pin reads high. Polarity is resolved later by
/// [`InputChannel`](crate::input::InputChannel), so this struct mirrors the
/// wiring rather than the meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawInputs {
    /// Button 1 (axis / distance), active low.
    pub button1: bool,
    /// Button 2 (speed / coordinate view), active low.
    pub button2: bool,
    /// Power toggle switch, active low (low = ON).
    pub toggle: bool,
    /// Emergency stop, active low.
    pub estop: bool,
}

impl RawInputs {
    /// Levels with both buttons released, the toggle ON, and the E-stop released.
    pub const IDLE: RawInputs = RawInputs {
        button1: true,
        button2: true,
        toggle: false,
        estop: true,
    };
}

impl Default for RawInputs {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Source of raw input levels.
///
/// Implementations only read pins. Debouncing and press classification happen
/// in the hardware-independent [`crate::input`] module.
pub trait PendantInputs {
    /// Samples all pendant inputs at once.
    fn sample(&mut self) -> RawInputs;
}

/// Quadrature encoder input.
///
/// Abstracts the jog wheel. On hardware the counter is fed from the phase A
/// edge interrupt; see [`TickCounter`](crate::encoder::TickCounter).
///
/// # Implementation Notes
///
/// - `take_ticks()` must read and clear the pending count atomically
/// - Positive values = phase B low at the A edge
pub trait EncoderInput {
    /// Returns raw ticks accumulated since the last call and resets the counter.
    fn take_ticks(&mut self) -> i32;
}

/// Line-oriented serial link to the desktop bridge.
///
/// Lines are ASCII without the trailing newline; the implementation appends
/// `\n` on write and strips `\r`/`\n` on read.
pub trait SerialLink {
    /// Error type for write operations.
    type Error: core::fmt::Debug;

    /// Writes one line followed by a newline.
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;

    /// Returns the next complete inbound line, if one is buffered.
    ///
    /// Must never block.
    fn read_line(&mut self) -> Option<Line>;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for debounce, heartbeat, and
/// redraw timing. On desktop, this can wrap `std::time::Instant`. On embedded,
/// use a hardware timer.
///
/// # Example
///
/// ```rust
/// use cnc_pendant::traits::Clock;
/// use cnc_pendant::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
