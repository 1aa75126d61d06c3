//! Display abstraction for the round pendant screen.
//!
//! This module defines the [`PendantDisplay`] trait plus the small view
//! models the compositor hands to it. The layout is a fixed 240×240 circle:
//!
//! ```text
//!        ╭──────────────╮
//!      ╱    X  1.000     ╲      position readout + freshness dot
//!     │     Y  2.000      │
//!     │     Z  3.000  WCS │
//!     │   ┌───────────┐   │
//!     │   │  Z  0.100 │   │     center card: axis, distance, speed/feed
//!     │   │   MEDIUM  │   │
//!     │   └───────────┘   │
//!      ╲  ● ARM MM G54   ╱      status bar
//!        ╰──────────────╯
//! ```

use crate::position::PositionReadout;
use crate::profile::RateMode;
use crate::safety::MotionState;
use crate::state::{Axis, FeedRate, Speed, Units};
use crate::theme::{Rgb, Theme};

/// Button 2 selection shown on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateSelection {
    /// Speed-mode profile.
    Speed(Speed),
    /// Feed-rate-mode profile.
    FeedRate(FeedRate),
}

/// Center card contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardView {
    /// Selected axis.
    pub axis: Axis,
    /// Jog length in `units`.
    pub distance: f32,
    /// Unit system.
    pub units: Units,
    /// Speed or feed-rate.
    pub rate: RateSelection,
    /// Profile wire name.
    pub profile: &'static str,
    /// Profile accent colour.
    pub accent: Rgb,
}

/// Status bar contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusView<'a> {
    /// Host application connected.
    pub connected: bool,
    /// Host heartbeat within the timeout.
    pub heartbeat: bool,
    /// Motion armed by the host.
    pub armed: bool,
    /// Host-reported machine motion.
    pub motion: MotionState,
    /// Unit system.
    pub units: Units,
    /// Active work-offset label.
    pub wcs: &'a str,
    /// Alternates on every status refresh; drives the connection pulse.
    pub pulse: bool,
}

/// Rendering backend for the pendant screen.
///
/// The compositor decides *when* to draw; implementations only decide *how*.
/// Each `draw_*` call is expected to be complete on return (flush if the
/// backend buffers).
///
/// # Example
///
/// ```rust
/// use cnc_pendant::traits::PendantDisplay;
/// use cnc_pendant::hal::{DisplayCall, MockDisplay};
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// display.draw_estop(false).unwrap();
/// assert_eq!(display.calls, vec![DisplayCall::Init, DisplayCall::Estop { fault: false }]);
/// ```
pub trait PendantDisplay {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Initializes the display hardware.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Blanks the screen (sleep).
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Boot splash with device name and firmware version.
    fn draw_boot(&mut self, name: &str, version: &str) -> Result<(), Self::Error>;

    /// Paints the background and static chrome. First step of a full redraw.
    fn draw_background(&mut self, theme: &Theme, accent: Rgb) -> Result<(), Self::Error>;

    /// Center card.
    fn draw_card(&mut self, card: &CardView) -> Result<(), Self::Error>;

    /// Position readout.
    fn draw_position(&mut self, readout: &PositionReadout) -> Result<(), Self::Error>;

    /// Status bar.
    fn draw_status(&mut self, status: &StatusView<'_>) -> Result<(), Self::Error>;

    /// Full-screen E-stop overlay. `fault` = switch was open at boot.
    fn draw_estop(&mut self, fault: bool) -> Result<(), Self::Error>;

    /// Full-screen help overlay for the profile's button mapping.
    fn draw_help(&mut self, rate_mode: RateMode) -> Result<(), Self::Error>;
}
