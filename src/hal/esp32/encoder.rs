//! Interrupt-driven jog wheel for ESP32.
//!
//! The ESP32-C3 has no pulse counter peripheral, so phase A raises a GPIO
//! interrupt on both edges. The handler samples phase B and feeds a
//! [`TickCounter`]; the main loop drains it through [`EncoderInput`].
//!
//! # Wiring
//!
//! - A → GPIO0
//! - B → GPIO1
//! - VCC → 5V (open-collector outputs, pulled up to 3.3V on the MCU side)
//! - GND → GND

use esp_idf_hal::gpio::{AnyIOPin, Input, InterruptType, PinDriver, Pull};
use esp_idf_hal::sys::EspError;

use super::clock::now_us;
use crate::encoder::TickCounter;
use crate::traits::EncoderInput;

/// Jog wheel on two GPIOs.
///
/// # Example
///
/// ```ignore
/// use cnc_pendant::hal::esp32::Esp32Encoder;
/// use cnc_pendant::traits::EncoderInput;
///
/// let peripherals = Peripherals::take()?;
/// let mut encoder = Esp32Encoder::new(
///     peripherals.pins.gpio0.downgrade(), // A
///     peripherals.pins.gpio1.downgrade(), // B
///     1000,
/// )?;
///
/// loop {
///     let ticks = encoder.take_ticks();
///     // hand to the controller
/// }
/// ```
pub struct Esp32Encoder {
    /// Kept alive so the subscription stays registered
    _phase_a: PinDriver<'static, AnyIOPin, Input>,
    counter: &'static TickCounter,
}

impl Esp32Encoder {
    /// Configures both phases with pull-ups and subscribes to phase A edges.
    ///
    /// Edges closer than `min_edge_us` are treated as contact bounce.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO or interrupt setup fails.
    pub fn new(phase_a: AnyIOPin, phase_b: AnyIOPin, min_edge_us: u32) -> Result<Self, EspError> {
        // Shared with the ISR for the rest of the program's life
        let counter: &'static TickCounter = Box::leak(Box::new(TickCounter::new(min_edge_us)));

        let mut a = PinDriver::input(phase_a)?;
        let mut b = PinDriver::input(phase_b)?;
        a.set_pull(Pull::Up)?;
        b.set_pull(Pull::Up)?;
        a.set_interrupt_type(InterruptType::AnyEdge)?;

        let pin = a.pin();
        // Safe: the callback reads a GPIO level and the timer, updates
        // atomics, and re-arms its own interrupt. Nothing blocks.
        unsafe {
            a.subscribe(move || {
                counter.on_phase_a_edge(b.is_high(), now_us());
                // The driver disarms after each edge
                esp_idf_hal::sys::gpio_intr_enable(pin);
            })?;
        }
        a.enable_interrupt()?;

        log::info!("jog wheel armed on GPIO{}", pin);
        Ok(Self {
            _phase_a: a,
            counter,
        })
    }

    /// Pending ticks without draining them.
    pub fn pending(&self) -> i32 {
        self.counter.peek()
    }
}

impl EncoderInput for Esp32Encoder {
    fn take_ticks(&mut self) -> i32 {
        self.counter.take()
    }
}
