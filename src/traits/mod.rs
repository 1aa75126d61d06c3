//! Trait definitions for hardware abstraction.
//!
//! This module defines the seams that let the pendant control loop run on the
//! ESP32 and under `cargo test` with identical logic.
//!
//! # Submodules
//!
//! - `hardware`: inputs, encoder, serial link, clock
//! - `display`: the round screen and its view models
//!
//! # Hardware Abstraction
//!
//! - [`PendantInputs`]: raw button, toggle, and E-stop levels
//! - [`EncoderInput`]: read-and-clear of the jog wheel counter
//! - [`SerialLink`]: newline-delimited link to the desktop bridge
//! - [`Clock`]: time source for `no_std` environments
//! - [`PendantDisplay`]: panel and overlay rendering

pub mod display;
pub mod hardware;

pub use display::*;
pub use hardware::*;
