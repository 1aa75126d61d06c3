//! GC9A01 round LCD for ESP32.
//!
//! Brings up the panel with mipidsi and hands it to
//! [`GraphicsDisplay`], which does all drawing.
//!
//! # Wiring
//!
//! - SCL → GPIO6
//! - SDA → GPIO7
//! - CS → GPIO5
//! - DC → GPIO2
//! - RST → GPIO3
//! - BL → 3.3V

use display_interface_spi::SPIInterface;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, Output, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::spi::{config::Config as SpiConfig, SpiAnyPins, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::sys::EspError;
use mipidsi::{models::GC9A01, options::ColorInversion, Builder};

use crate::display::GraphicsDisplay;

type Pin<'d> = PinDriver<'d, AnyIOPin, Output>;
type Interface<'d> = SPIInterface<SpiDeviceDriver<'d, SpiDriver<'d>>, Pin<'d>>;

/// GC9A01 panel driver.
pub type Lcd<'d> = mipidsi::Display<Interface<'d>, GC9A01, Pin<'d>>;

/// The pendant screen on real hardware.
pub type Esp32Display<'d> = GraphicsDisplay<Lcd<'d>>;

/// LCD bring-up failure.
#[derive(Debug, thiserror::Error)]
pub enum LcdInitError {
    /// SPI bus or GPIO setup failed.
    #[error("SPI setup failed: {0}")]
    Spi(#[from] EspError),
    /// The panel rejected its init sequence.
    #[error("panel init failed: {0}")]
    Panel(String),
}

/// SPI clock for the panel.
const SPI_CLOCK_MHZ: u32 = 40;

impl<'d> Esp32Display<'d> {
    /// Initializes SPI and the panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the SPI bus, the control pins, or the panel init
    /// sequence fail.
    pub fn gc9a01<S: SpiAnyPins>(
        spi: impl Peripheral<P = S> + 'd,
        sclk: AnyIOPin,
        mosi: AnyIOPin,
        cs: AnyIOPin,
        dc: AnyIOPin,
        rst: AnyIOPin,
    ) -> Result<Self, LcdInitError> {
        let driver = SpiDriver::new(spi, sclk, mosi, Option::<AnyIOPin>::None, &SpiDriverConfig::new())?;
        let config = SpiConfig::new().baudrate(SPI_CLOCK_MHZ.MHz().into());
        let device = SpiDeviceDriver::new(driver, Some(cs), &config)?;

        let dc = PinDriver::output(dc)?;
        let rst = PinDriver::output(rst)?;
        let interface = SPIInterface::new(device, dc);

        let lcd = Builder::new(GC9A01, interface)
            .reset_pin(rst)
            .display_size(240, 240)
            .invert_colors(ColorInversion::Inverted)
            .init(&mut Ets)
            .map_err(|e| LcdInitError::Panel(format!("{:?}", e)))?;

        log::info!("GC9A01 initialized at {} MHz", SPI_CLOCK_MHZ);
        Ok(GraphicsDisplay::new(lcd))
    }
}
