//! ESP32-C3 SuperMini CNC jog pendant.
//!
//! This is the main entry point for the physical pendant. It runs a 200Hz
//! loop that:
//! - Samples the buttons, power toggle, and E-stop
//! - Drains jog wheel ticks counted by the phase A interrupt
//! - Hands both to the controller, which talks to the host over UART1 and
//!   redraws the round LCD
//!
//! Logs go to the USB console, never to the host link.
//!
//! # Hardware Setup
//!
//! See [`cnc_pendant::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32-display --bin esp32_main
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use cnc_pendant::hal::esp32::{pins, Esp32Clock, Esp32Display, Esp32Encoder, Esp32Inputs, Esp32Serial};
use cnc_pendant::traits::{Clock, EncoderInput, PendantInputs};
use cnc_pendant::{PendantConfig, PendantController};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::IOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use log::{info, warn};

/// Main loop interval in milliseconds (200Hz = 5ms)
const LOOP_INTERVAL_MS: u32 = 5;

/// Minimum spacing between repeated tick error logs
const ERROR_LOG_INTERVAL_MS: u64 = 1000;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    let config = PendantConfig::default();
    info!("{} {}", config.device.name, config.device.version);

    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    // =========================================================================
    // Jog Wheel (GPIO0/1, phase A interrupt)
    // =========================================================================
    let mut encoder = Esp32Encoder::new(
        gpio.gpio0.downgrade(),
        gpio.gpio1.downgrade(),
        config.encoder.min_edge_us,
    )?;
    info!("[OK] Jog wheel (GPIO{}/{})", pins::ENC_A, pins::ENC_B);

    // =========================================================================
    // Buttons, Toggle, E-stop
    // =========================================================================
    let mut inputs = Esp32Inputs::new(
        gpio.gpio4.downgrade(),
        gpio.gpio9.downgrade(),
        gpio.gpio8.downgrade(),
        gpio.gpio10.downgrade(),
    )?;
    info!(
        "[OK] Controls (B1 GPIO{}, B2 GPIO{}, toggle GPIO{}, E-stop GPIO{})",
        pins::BUTTON1,
        pins::BUTTON2,
        pins::TOGGLE,
        pins::ESTOP
    );

    // =========================================================================
    // Host Link (UART1)
    // =========================================================================
    let serial = Esp32Serial::new(
        peripherals.uart1,
        gpio.gpio21.downgrade(),
        gpio.gpio20.downgrade(),
        config.serial.baud,
    )?;
    info!(
        "[OK] Host link (TX GPIO{}, RX GPIO{}, {} baud)",
        pins::UART_TX,
        pins::UART_RX,
        config.serial.baud
    );

    // =========================================================================
    // Display (GC9A01 on SPI2)
    // =========================================================================
    let display = Esp32Display::gc9a01(
        peripherals.spi2,
        gpio.gpio6.downgrade(),
        gpio.gpio7.downgrade(),
        gpio.gpio5.downgrade(),
        gpio.gpio2.downgrade(),
        gpio.gpio3.downgrade(),
    )?;
    info!("[OK] Display (SCLK GPIO{}, MOSI GPIO{})", pins::LCD_SCLK, pins::LCD_MOSI);

    // =========================================================================
    // Controller
    // =========================================================================
    let clock = Esp32Clock::new();
    let mut pendant = PendantController::new(config, serial, display);
    if let Err(e) = pendant.start(clock.now_ms(), inputs.sample()) {
        warn!("boot: {}", e);
    }

    info!("Starting control loop (200Hz)...");

    let mut last_error_log: Option<u64> = None;

    // =========================================================================
    // Main Control Loop (200Hz)
    // =========================================================================
    loop {
        let now = clock.now_ms();
        let raw = inputs.sample();
        let ticks = encoder.take_ticks();

        if let Err(e) = pendant.tick(now, raw, ticks) {
            let due = last_error_log.map_or(true, |at| now.saturating_sub(at) >= ERROR_LOG_INTERVAL_MS);
            if due {
                warn!("tick: {}", e);
                last_error_log = Some(now);
            }
        }

        FreeRtos::delay_ms(LOOP_INTERVAL_MS);
    }
}
