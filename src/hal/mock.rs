//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every hardware trait, enabling
//! development and testing of the full control loop on desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockInputs`] | [`PendantInputs`] | Settable pin levels with press helpers |
//! | [`MockEncoder`] | [`EncoderInput`] | Queued raw ticks |
//! | [`MockSerial`] | [`SerialLink`] | Captures sent lines, queues inbound lines |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockDisplay`] | [`PendantDisplay`] | Records every draw call |
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::config::PendantConfig;
//! use cnc_pendant::controller::PendantController;
//! use cnc_pendant::hal::{MockDisplay, MockSerial};
//! use cnc_pendant::traits::RawInputs;
//!
//! let mut pendant = PendantController::new(
//!     PendantConfig::default(),
//!     MockSerial::new(),
//!     MockDisplay::new(),
//! );
//! pendant.start(0, RawInputs::IDLE).unwrap();
//!
//! pendant.serial_mut().push_line("HOST:PING");
//! pendant.tick(5, RawInputs::IDLE, 0).unwrap();
//! assert_eq!(pendant.serial().sent_lines(), ["PENDANT:READY", "HOST:PONG"]);
//! ```
//!
//! [`PendantInputs`]: crate::traits::PendantInputs
//! [`EncoderInput`]: crate::traits::EncoderInput
//! [`SerialLink`]: crate::traits::SerialLink
//! [`Clock`]: crate::traits::Clock
//! [`PendantDisplay`]: crate::traits::PendantDisplay

extern crate alloc;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::position::PositionReadout;
use crate::profile::RateMode;
use crate::safety::MotionState;
use crate::state::Units;
use crate::theme::{Rgb, Theme};
use crate::traits::{
    CardView, Clock, EncoderInput, Line, PendantDisplay, PendantInputs, RawInputs, SerialLink,
    StatusView,
};

// ============================================================================
// Input Mocks
// ============================================================================

/// Mock pendant inputs.
///
/// Holds raw (electrical) levels. The helpers speak in operator terms and
/// handle the active-low wiring.
///
/// # Example
///
/// ```rust
/// use cnc_pendant::hal::MockInputs;
/// use cnc_pendant::traits::PendantInputs;
///
/// let mut inputs = MockInputs::new();
/// inputs.press_button1();
/// assert!(!inputs.sample().button1);
/// inputs.release_button1();
/// assert!(inputs.sample().button1);
/// ```
#[derive(Debug, Default)]
pub struct MockInputs {
    /// Current raw levels.
    pub raw: RawInputs,
}

impl MockInputs {
    /// Creates inputs at rest: buttons up, toggle ON, E-stop released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds button 1 down.
    pub fn press_button1(&mut self) {
        self.raw.button1 = false;
    }

    /// Lets button 1 up.
    pub fn release_button1(&mut self) {
        self.raw.button1 = true;
    }

    /// Holds button 2 down.
    pub fn press_button2(&mut self) {
        self.raw.button2 = false;
    }

    /// Lets button 2 up.
    pub fn release_button2(&mut self) {
        self.raw.button2 = true;
    }

    /// Opens the E-stop.
    pub fn press_estop(&mut self) {
        self.raw.estop = false;
    }

    /// Closes the E-stop.
    pub fn release_estop(&mut self) {
        self.raw.estop = true;
    }

    /// Sets the power toggle.
    pub fn set_toggle(&mut self, on: bool) {
        self.raw.toggle = !on;
    }
}

impl PendantInputs for MockInputs {
    fn sample(&mut self) -> RawInputs {
        self.raw
    }
}

/// Mock jog wheel.
///
/// Queued ticks accumulate until the next `take_ticks`, like the ISR counter.
///
/// # Example
///
/// ```rust
/// use cnc_pendant::hal::MockEncoder;
/// use cnc_pendant::traits::EncoderInput;
///
/// let mut encoder = MockEncoder::new();
/// encoder.queue_ticks(5);
/// encoder.queue_ticks(-2);
/// assert_eq!(encoder.take_ticks(), 3);
/// assert_eq!(encoder.take_ticks(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockEncoder {
    pending: i32,
}

impl MockEncoder {
    /// Creates an encoder with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds raw ticks to the pending count.
    pub fn queue_ticks(&mut self, ticks: i32) {
        self.pending += ticks;
    }
}

impl EncoderInput for MockEncoder {
    fn take_ticks(&mut self) -> i32 {
        core::mem::take(&mut self.pending)
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
///
/// # Example
///
/// ```rust
/// use cnc_pendant::hal::MockClock;
/// use cnc_pendant::traits::Clock;
///
/// let mut clock = MockClock::new();
/// clock.set(1000);
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Serial Mock
// ============================================================================

/// Mock serial link.
///
/// Records every written line in `sent` and serves queued inbound lines in
/// FIFO order.
#[derive(Debug, Default)]
pub struct MockSerial {
    /// Lines written by the firmware, oldest first.
    pub sent: Vec<String>,
    /// Lines waiting to be read.
    pub inbox: VecDeque<String>,
    /// When set, every write fails.
    pub fail_writes: bool,
}

impl MockSerial {
    /// Creates an empty link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a host line.
    pub fn push_line(&mut self, line: &str) {
        self.inbox.push_back(line.into());
    }

    /// Written lines as string slices.
    pub fn sent_lines(&self) -> Vec<&str> {
        self.sent.iter().map(String::as_str).collect()
    }

    /// Written lines starting with `prefix`.
    pub fn sent_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.sent
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(prefix))
            .collect()
    }

    /// Drains and returns everything written so far.
    pub fn take_sent(&mut self) -> Vec<String> {
        core::mem::take(&mut self.sent)
    }
}

/// Error returned by [`MockSerial`] when `fail_writes` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLinkError;

impl SerialLink for MockSerial {
    type Error = MockLinkError;

    fn write_line(&mut self, line: &str) -> Result<(), MockLinkError> {
        if self.fail_writes {
            return Err(MockLinkError);
        }
        self.sent.push(line.into());
        Ok(())
    }

    fn read_line(&mut self) -> Option<Line> {
        let next = self.inbox.pop_front()?;
        let mut line = Line::new();
        // Overlong lines come through empty, like the UART reader's discard
        let _ = line.push_str(&next);
        Some(line)
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// One recorded [`PendantDisplay`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    /// `init`
    Init,
    /// `clear`
    Clear,
    /// `draw_boot`
    Boot {
        /// Device name.
        name: String,
        /// Firmware version.
        version: String,
    },
    /// `draw_background`
    Background {
        /// Theme background.
        background: Rgb,
        /// Profile accent.
        accent: Rgb,
    },
    /// `draw_card`
    Card(CardView),
    /// `draw_position`
    Position(PositionReadout),
    /// `draw_status`
    Status {
        /// Host connected.
        connected: bool,
        /// Heartbeat fresh.
        heartbeat: bool,
        /// Armed.
        armed: bool,
        /// Host motion state.
        motion: MotionState,
        /// Units.
        units: Units,
        /// Work-offset label.
        wcs: String,
        /// Pulse phase.
        pulse: bool,
    },
    /// `draw_estop`
    Estop {
        /// Boot-time fault.
        fault: bool,
    },
    /// `draw_help`
    Help {
        /// Profile rate mode.
        rate_mode: RateMode,
    },
}

impl DisplayCall {
    /// Is `draw_background`.
    pub fn is_background(&self) -> bool {
        matches!(self, DisplayCall::Background { .. })
    }

    /// Is `draw_card`.
    pub fn is_card(&self) -> bool {
        matches!(self, DisplayCall::Card(_))
    }

    /// Is `draw_position`.
    pub fn is_position(&self) -> bool {
        matches!(self, DisplayCall::Position(_))
    }

    /// Is `draw_status`.
    pub fn is_status(&self) -> bool {
        matches!(self, DisplayCall::Status { .. })
    }

    /// Is `draw_estop`.
    pub fn is_estop(&self) -> bool {
        matches!(self, DisplayCall::Estop { .. })
    }

    /// Is `draw_help`.
    pub fn is_help(&self) -> bool {
        matches!(self, DisplayCall::Help { .. })
    }
}

/// Mock display for testing.
///
/// Records every call in order. Set `fail_draws` to make draw calls fail
/// (the call is still recorded).
///
/// # Example
///
/// ```rust
/// use cnc_pendant::hal::{DisplayCall, MockDisplay};
/// use cnc_pendant::traits::PendantDisplay;
///
/// let mut display = MockDisplay::new();
/// display.clear().unwrap();
/// assert_eq!(display.count(DisplayCall::is_estop), 0);
/// assert_eq!(display.last(), Some(&DisplayCall::Clear));
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Every call, oldest first.
    pub calls: Vec<DisplayCall>,
    /// When set, every `draw_*` call fails.
    pub fail_draws: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DisplayCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(*c)).count()
    }

    /// Most recent call.
    pub fn last(&self) -> Option<&DisplayCall> {
        self.calls.last()
    }

    fn record(&mut self, call: DisplayCall) -> Result<(), ()> {
        self.calls.push(call);
        if self.fail_draws {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl PendantDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.calls.push(DisplayCall::Init);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.calls.push(DisplayCall::Clear);
        Ok(())
    }

    fn draw_boot(&mut self, name: &str, version: &str) -> Result<(), ()> {
        self.record(DisplayCall::Boot {
            name: name.into(),
            version: version.into(),
        })
    }

    fn draw_background(&mut self, theme: &Theme, accent: Rgb) -> Result<(), ()> {
        self.record(DisplayCall::Background {
            background: theme.background,
            accent,
        })
    }

    fn draw_card(&mut self, card: &CardView) -> Result<(), ()> {
        self.record(DisplayCall::Card(*card))
    }

    fn draw_position(&mut self, readout: &PositionReadout) -> Result<(), ()> {
        self.record(DisplayCall::Position(*readout))
    }

    fn draw_status(&mut self, status: &StatusView<'_>) -> Result<(), ()> {
        self.record(DisplayCall::Status {
            connected: status.connected,
            heartbeat: status.heartbeat,
            armed: status.armed,
            motion: status.motion,
            units: status.units,
            wcs: status.wcs.into(),
            pulse: status.pulse,
        })
    }

    fn draw_estop(&mut self, fault: bool) -> Result<(), ()> {
        self.record(DisplayCall::Estop { fault })
    }

    fn draw_help(&mut self, rate_mode: RateMode) -> Result<(), ()> {
        self.record(DisplayCall::Help { rate_mode })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MockInputs Tests
    // =========================================================================

    #[test]
    fn mock_inputs_default_is_idle() {
        let mut inputs = MockInputs::new();
        assert_eq!(inputs.sample(), RawInputs::IDLE);
    }

    #[test]
    fn mock_inputs_active_low_helpers() {
        let mut inputs = MockInputs::new();
        inputs.press_button2();
        inputs.press_estop();
        inputs.set_toggle(false);
        let raw = inputs.sample();
        assert!(!raw.button2);
        assert!(!raw.estop);
        assert!(raw.toggle);

        inputs.release_button2();
        inputs.release_estop();
        inputs.set_toggle(true);
        assert_eq!(inputs.sample(), RawInputs::IDLE);
    }

    // =========================================================================
    // MockEncoder Tests
    // =========================================================================

    #[test]
    fn mock_encoder_accumulates() {
        let mut encoder = MockEncoder::new();
        assert_eq!(encoder.take_ticks(), 0);
        encoder.queue_ticks(4);
        encoder.queue_ticks(6);
        assert_eq!(encoder.take_ticks(), 10);
        assert_eq!(encoder.take_ticks(), 0);
    }

    // =========================================================================
    // MockSerial Tests
    // =========================================================================

    #[test]
    fn mock_serial_fifo() {
        let mut serial = MockSerial::new();
        serial.push_line("A:1");
        serial.push_line("B:2");
        assert_eq!(serial.read_line().as_deref(), Some("A:1"));
        assert_eq!(serial.read_line().as_deref(), Some("B:2"));
        assert!(serial.read_line().is_none());
    }

    #[test]
    fn mock_serial_records_and_fails() {
        let mut serial = MockSerial::new();
        serial.write_line("AXIS:X").unwrap();
        serial.write_line("SPEED:FAST").unwrap();
        assert_eq!(serial.sent_with_prefix("AXIS:"), ["AXIS:X"]);

        serial.fail_writes = true;
        assert_eq!(serial.write_line("AXIS:Y"), Err(MockLinkError));
        assert_eq!(serial.take_sent().len(), 2);
        assert!(serial.sent.is_empty());
    }

    // =========================================================================
    // MockDisplay Tests
    // =========================================================================

    #[test]
    fn mock_display_records_in_order() {
        let mut display = MockDisplay::new();
        display.init().unwrap();
        display.draw_boot("P", "1").unwrap();
        display.draw_help(RateMode::Speed).unwrap();
        assert_eq!(display.calls.len(), 3);
        assert!(display.last().is_some_and(DisplayCall::is_help));
    }

    #[test]
    fn mock_display_fail_draws_still_records() {
        let mut display = MockDisplay::new();
        display.fail_draws = true;
        assert!(display.draw_estop(true).is_err());
        assert_eq!(display.calls, [DisplayCall::Estop { fault: true }]);
    }

    #[test]
    fn mock_clock_advance() {
        let mut clock = MockClock::new();
        clock.advance(5);
        clock.advance(5);
        assert_eq!(clock.now_ms(), 10);
    }
}
