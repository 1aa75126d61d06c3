//! ESP32-C3 SuperMini hardware abstraction layer for the jog pendant.
//!
//! This module provides hardware implementations for the ESP32-C3 SuperMini
//! board driving a GC9A01 round LCD and reading the pendant controls.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Display**: GC9A01 240x240 round LCD (SPI)
//! - **Encoder**: 100 PPR manual pulse generator, phase A on an edge interrupt
//! - **Controls**: two momentary buttons, power toggle, E-stop
//! - **Host link**: UART1 to the bridge; logs stay on the USB console
//!
//! All switch inputs are active low with internal pull-ups.
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod clock;
mod encoder;
mod inputs;
mod serial;

pub use clock::Esp32Clock;
pub use encoder::Esp32Encoder;
pub use inputs::Esp32Inputs;
pub use serial::Esp32Serial;

#[cfg(feature = "esp32-display")]
mod display;
#[cfg(feature = "esp32-display")]
pub use display::{Esp32Display, LcdInitError};

/// Pin assignments for SuperMini ESP32-C3.
///
/// - Jog wheel on GPIO0/1
/// - LCD on the SPI2 pins plus DC/RST/CS
/// - Buttons, toggle, and E-stop on the remaining GPIOs
/// - Host UART on GPIO20/21
pub mod pins {
    // =========================================================================
    // Jog Wheel
    // =========================================================================

    /// Encoder phase A (edge interrupt)
    pub const ENC_A: i32 = 0;

    /// Encoder phase B (sampled at each A edge)
    pub const ENC_B: i32 = 1;

    // =========================================================================
    // GC9A01 LCD (SPI2)
    // =========================================================================

    /// Data/command select
    pub const LCD_DC: i32 = 2;

    /// Panel reset
    pub const LCD_RST: i32 = 3;

    /// Chip select
    pub const LCD_CS: i32 = 5;

    /// SPI clock
    pub const LCD_SCLK: i32 = 6;

    /// SPI data out
    pub const LCD_MOSI: i32 = 7;

    // =========================================================================
    // Controls
    // =========================================================================

    /// Button 1 (axis / distance)
    pub const BUTTON1: i32 = 4;

    /// Button 2 (speed / coordinate view). Shared with BOOT: holding it
    /// through reset enters download mode.
    pub const BUTTON2: i32 = 9;

    /// Power toggle, low = ON
    pub const TOGGLE: i32 = 8;

    /// E-stop, low = pressed
    pub const ESTOP: i32 = 10;

    // =========================================================================
    // Host Link (UART1)
    // =========================================================================

    /// UART receive from the bridge
    pub const UART_RX: i32 = 20;

    /// UART transmit to the bridge
    pub const UART_TX: i32 = 21;
}
