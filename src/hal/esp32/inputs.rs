//! Button, toggle, and E-stop inputs for ESP32.
//!
//! Levels are returned raw; debounce and polarity live in
//! [`crate::input`]. Every input has the internal pull-up enabled and
//! switches to ground.
//!
//! # Wiring
//!
//! - Button 1 → GPIO4
//! - Button 2 → GPIO9 (BOOT)
//! - Toggle → GPIO8
//! - E-stop → GPIO10

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use esp_idf_hal::sys::EspError;

use crate::traits::{PendantInputs, RawInputs};

/// The four switch inputs.
pub struct Esp32Inputs<'d> {
    button1: PinDriver<'d, AnyIOPin, Input>,
    button2: PinDriver<'d, AnyIOPin, Input>,
    toggle: PinDriver<'d, AnyIOPin, Input>,
    estop: PinDriver<'d, AnyIOPin, Input>,
}

impl<'d> Esp32Inputs<'d> {
    /// Configures the pins as pulled-up inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        button1: AnyIOPin,
        button2: AnyIOPin,
        toggle: AnyIOPin,
        estop: AnyIOPin,
    ) -> Result<Self, EspError> {
        Ok(Self {
            button1: pulled_up(button1)?,
            button2: pulled_up(button2)?,
            toggle: pulled_up(toggle)?,
            estop: pulled_up(estop)?,
        })
    }
}

fn pulled_up<'d>(pin: AnyIOPin) -> Result<PinDriver<'d, AnyIOPin, Input>, EspError> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

impl PendantInputs for Esp32Inputs<'_> {
    fn sample(&mut self) -> RawInputs {
        RawInputs {
            button1: self.button1.is_high(),
            button2: self.button2.is_high(),
            toggle: self.toggle.is_high(),
            estop: self.estop.is_high(),
        }
    }
}
