//! # cnc-pendant
//!
//! Firmware core for a handheld CNC jog pendant: a quadrature jog wheel, two
//! mode buttons, a power toggle, an E-stop switch, and a 240×240 round LCD,
//! talking to a host bridge over a line-oriented serial protocol.
//!
//! ## Features
//!
//! - **Safety-gated jogging**: the wheel only emits motion while the host has
//!   armed the pendant, heartbeats are fresh, the machine is idle, and the
//!   E-stop is released
//! - **Machine profiles**: per-application jog dialect, distance tables, and
//!   speed or feed-rate selection, chosen by the host or detected from its
//!   banner lines
//! - **Position readout**: host snapshots with staleness, dead reckoning, and
//!   work offsets
//! - **Rate-limited rendering**: independent panels with dirty flags, plus
//!   E-stop, help, and sleep screens
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and display abstractions
//! - `input`, `encoder` - Debounce, press classification, tick scaling
//! - `safety`, `state`, `profile` - Motion gate and mode machine
//! - `protocol` - Serial line parsing and formatting
//! - `position`, `power`, `theme` - Readout, sleep, colours
//! - `display` - Panel scheduling and the embedded-graphics renderer
//! - `controller` - Main loop that ties everything together
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use cnc_pendant::{
//!     hal::{MockDisplay, MockSerial},
//!     PendantConfig, PendantController, RawInputs,
//! };
//!
//! let mut pendant = PendantController::new(
//!     PendantConfig::default(),
//!     MockSerial::new(),
//!     MockDisplay::new(),
//! );
//! pendant.start(0, RawInputs::IDLE).unwrap();
//!
//! // Host arms the pendant and sends a heartbeat
//! pendant.serial_mut().push_line("ARM:ENABLE");
//! pendant.serial_mut().push_line("HOST:PING");
//! pendant.tick(5, RawInputs::IDLE, 0).unwrap();
//!
//! // Two raw ticks at the default scale make one jog step
//! pendant.tick(10, RawInputs::IDLE, 2).unwrap();
//! assert_eq!(pendant.serial().sent_with_prefix("JOG:"), ["JOG:Z,0.100,1000"]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Compiled-in configuration with builder helpers.
pub mod config;
/// Main pendant controller that coordinates inputs, safety, protocol, and display.
pub mod controller;
/// Panel scheduling and rendering.
pub mod display;
/// Jog wheel tick counting and scaling.
pub mod encoder;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Debounced inputs and button press classification.
pub mod input;
/// Position snapshots, dead reckoning, and work offsets.
pub mod position;
/// Screen sleep countdown.
pub mod power;
/// Per-application machine profiles.
pub mod profile;
/// Serial line protocol.
pub mod protocol;
/// Motion authorization gate.
pub mod safety;
/// Operator selections and the button mode machine.
pub mod state;
/// Colours and background theme.
pub mod theme;
/// Core traits for hardware and display abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{
    DeviceConfig, DisplayConfig, EncoderConfig, InputConfig, PendantConfig, PowerConfig,
    SafetyConfig, SerialConfig,
};
pub use controller::{PendantContext, PendantController, PendantError, PendantResult};
pub use display::{Compositor, Frame, Panel, Screen};
pub use encoder::{JogScaler, TickCounter};
pub use input::{Button, ButtonEvent, ButtonPair, ChannelId, Edge, InputChannel, PressEvent, PressKind};
pub use position::{PositionReadout, PositionTracker};
pub use power::{PowerManager, PowerState, PowerTransition};
pub use profile::{MachineProfile, ProfileSpec, RateMode};
pub use protocol::{Dialect, EstopEvent, HostMessage, Outbound};
pub use safety::{BlockReason, EstopState, MotionState, SafetyGate};
pub use state::{Axis, CoordView, FeedRate, JogDistance, ModeChange, PendantState, Speed, UiView, Units};
pub use theme::{Rgb, Theme};
pub use traits::{
    // Display
    CardView,
    // Hardware
    Clock,
    EncoderInput,
    PendantDisplay,
    PendantInputs,
    RateSelection,
    RawInputs,
    SerialLink,
    StatusView,
};

#[cfg(feature = "display")]
pub use display::GraphicsDisplay;
