//! UART host link for ESP32.
//!
//! Lines are `\n`-terminated ASCII; `\r` is dropped. Reads never block: a
//! partial line stays buffered until its terminator arrives. A line longer
//! than [`MAX_LINE_LEN`] is discarded whole.
//!
//! # Wiring
//!
//! - TX → GPIO21 → bridge RX
//! - RX → GPIO20 ← bridge TX
//! - GND shared

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::{config::Config as UartConfig, Uart, UartDriver};
use heapless::Vec;
use log::warn;

use crate::traits::{Line, SerialLink, MAX_LINE_LEN};

/// Host link over a hardware UART.
pub struct Esp32Serial<'d> {
    uart: UartDriver<'d>,
    pending: Vec<u8, MAX_LINE_LEN>,
    overflow: bool,
}

impl<'d> Esp32Serial<'d> {
    /// Opens the UART at `baud`, 8N1, no flow control.
    ///
    /// # Errors
    ///
    /// Returns an error if the UART driver cannot be installed.
    pub fn new<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx: AnyIOPin,
        rx: AnyIOPin,
        baud: u32,
    ) -> Result<Self, EspError> {
        let config = UartConfig::default().baudrate(Hertz(baud));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        Ok(Self {
            uart,
            pending: Vec::new(),
            overflow: false,
        })
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), EspError> {
        while !bytes.is_empty() {
            let written = self.uart.write(bytes)?;
            bytes = &bytes[written..];
        }
        Ok(())
    }

    /// Completes the buffered line. `None` for overlong, empty, or non-UTF-8 input.
    fn finish_line(&mut self) -> Option<Line> {
        let overflow = core::mem::take(&mut self.overflow);
        let bytes = core::mem::take(&mut self.pending);
        if overflow {
            warn!("discarded inbound line over {} bytes", MAX_LINE_LEN);
            return None;
        }
        if bytes.is_empty() {
            return None;
        }
        let text = core::str::from_utf8(&bytes).ok()?;
        let mut line = Line::new();
        line.push_str(text).ok()?;
        Some(line)
    }
}

impl SerialLink for Esp32Serial<'_> {
    type Error = EspError;

    fn write_line(&mut self, line: &str) -> Result<(), EspError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }

    fn read_line(&mut self) -> Option<Line> {
        let mut byte = [0u8; 1];
        loop {
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(1) => {}
                Ok(_) => return None,
                Err(e) => {
                    warn!("uart read failed: {:?}", e);
                    return None;
                }
            }
            match byte[0] {
                b'\n' => {
                    if let Some(line) = self.finish_line() {
                        return Some(line);
                    }
                }
                b'\r' => {}
                b => {
                    if self.pending.push(b).is_err() {
                        self.overflow = true;
                    }
                }
            }
        }
    }
}
