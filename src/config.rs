//! Compiled-in pendant configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility. Nothing is persisted;
//! the firmware builds a [`PendantConfig`] at startup and hands it to the
//! controller.
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::config::{EncoderConfig, InputConfig, PendantConfig};
//!
//! // Use defaults
//! let config = PendantConfig::default();
//! assert_eq!(config.input.axis_long_press_ms, 2000);
//!
//! // Or customize
//! let config = PendantConfig::default()
//!     .with_input(InputConfig::default().with_debounce_ms(20))
//!     .with_encoder(EncoderConfig::default().with_scale(4));
//! assert_eq!(config.encoder.scale, 4);
//! ```

use heapless::String as HString;

use crate::encoder::SCALE_RANGE;

/// Maximum length for config strings (device name, version)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating at a char boundary if too long
pub fn short_string(s: &str) -> ShortString {
    let mut end = s.len().min(MAX_SHORT_STRING);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut hs = ShortString::new();
    let _ = hs.push_str(&s[..end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete pendant configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendantConfig {
    /// Debounce and press timing
    pub input: InputConfig,
    /// Jog wheel
    pub encoder: EncoderConfig,
    /// Arming and heartbeat
    pub safety: SafetyConfig,
    /// Redraw pacing
    pub display: DisplayConfig,
    /// Sleep countdown
    pub power: PowerConfig,
    /// Serial link
    pub serial: SerialConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl PendantConfig {
    /// Set input configuration
    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    /// Set encoder configuration
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set safety configuration
    pub fn with_safety(mut self, safety: SafetyConfig) -> Self {
        self.safety = safety;
        self
    }

    /// Set display configuration
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Set power configuration
    pub fn with_power(mut self, power: PowerConfig) -> Self {
        self.power = power;
        self
    }

    /// Set serial configuration
    pub fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Input Config
// ============================================================================

/// Debounce window and press thresholds
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputConfig {
    /// Settle window for every digital input
    pub debounce_ms: u32,
    /// Button 1 long-press threshold (jog distance)
    pub axis_long_press_ms: u32,
    /// Button 2 long-press threshold (coordinate view)
    pub rate_long_press_ms: u32,
    /// Both-buttons hold threshold (help)
    pub help_hold_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 30,
            axis_long_press_ms: 2000,
            rate_long_press_ms: 1000,
            help_hold_ms: 1500,
        }
    }
}

impl InputConfig {
    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the button 1 long-press threshold
    pub fn with_axis_long_press_ms(mut self, ms: u32) -> Self {
        self.axis_long_press_ms = ms;
        self
    }

    /// Set the button 2 long-press threshold
    pub fn with_rate_long_press_ms(mut self, ms: u32) -> Self {
        self.rate_long_press_ms = ms;
        self
    }

    /// Set the help gesture hold time
    pub fn with_help_hold_ms(mut self, ms: u32) -> Self {
        self.help_hold_ms = ms;
        self
    }
}

// ============================================================================
// Encoder Config
// ============================================================================

/// Jog wheel configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Raw ticks per jog step (1..=10)
    pub scale: u8,
    /// Minimum spacing between phase A edges, in microseconds
    pub min_edge_us: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            min_edge_us: 1000,
        }
    }
}

impl EncoderConfig {
    /// Set the scale, clamped to 1..=10
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale.clamp(*SCALE_RANGE.start(), *SCALE_RANGE.end());
        self
    }

    /// Set the minimum edge spacing
    pub fn with_min_edge_us(mut self, us: u32) -> Self {
        self.min_edge_us = us;
        self
    }
}

// ============================================================================
// Safety Config
// ============================================================================

/// Arming and heartbeat configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SafetyConfig {
    /// Heartbeat age beyond which motion is blocked
    pub heartbeat_timeout_ms: u32,
    /// Minimum spacing between `ESTOP:MOTION_BLOCKED` notices
    pub blocked_notice_interval_ms: u32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_ms: 3000,
            blocked_notice_interval_ms: 1000,
        }
    }
}

impl SafetyConfig {
    /// Set the heartbeat timeout
    pub fn with_heartbeat_timeout_ms(mut self, ms: u32) -> Self {
        self.heartbeat_timeout_ms = ms;
        self
    }

    /// Set the blocked-notice interval
    pub fn with_blocked_notice_interval_ms(mut self, ms: u32) -> Self {
        self.blocked_notice_interval_ms = ms;
        self
    }
}

// ============================================================================
// Display Config
// ============================================================================

/// Redraw pacing
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    /// Minimum time between position panel redraws
    pub position_min_interval_ms: u32,
    /// Unconditional status bar refresh interval
    pub status_refresh_ms: u32,
    /// Smallest per-axis change worth redrawing
    pub position_epsilon: f32,
    /// Host snapshot age beyond which it is stale
    pub stale_after_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            position_min_interval_ms: 250,
            status_refresh_ms: 1000,
            position_epsilon: 0.0005,
            stale_after_ms: 2000,
        }
    }
}

impl DisplayConfig {
    /// Set the position redraw interval
    pub fn with_position_min_interval_ms(mut self, ms: u32) -> Self {
        self.position_min_interval_ms = ms;
        self
    }

    /// Set the status refresh interval
    pub fn with_status_refresh_ms(mut self, ms: u32) -> Self {
        self.status_refresh_ms = ms;
        self
    }

    /// Set the position epsilon (negative values become 0)
    pub fn with_position_epsilon(mut self, epsilon: f32) -> Self {
        self.position_epsilon = epsilon.max(0.0);
        self
    }

    /// Set the snapshot staleness threshold
    pub fn with_stale_after_ms(mut self, ms: u32) -> Self {
        self.stale_after_ms = ms;
        self
    }
}

// ============================================================================
// Power Config
// ============================================================================

/// Screen sleep configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerConfig {
    /// Delay between toggle OFF and screen clear
    pub sleep_countdown_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sleep_countdown_ms: 5000,
        }
    }
}

impl PowerConfig {
    /// Set the sleep countdown
    pub fn with_sleep_countdown_ms(mut self, ms: u32) -> Self {
        self.sleep_countdown_ms = ms;
        self
    }
}

// ============================================================================
// Serial Config
// ============================================================================

/// Serial link configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConfig {
    /// UART baud rate
    pub baud: u32,
    /// Inbound lines handled per loop iteration
    pub max_lines_per_tick: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: 115_200,
            max_lines_per_tick: 8,
        }
    }
}

impl SerialConfig {
    /// Set the baud rate
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Set the per-tick inbound line budget (at least 1)
    pub fn with_max_lines_per_tick(mut self, lines: u8) -> Self {
        self.max_lines_per_tick = lines.max(1);
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification shown on the boot screen
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
    /// Firmware version
    pub version: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("CNC PENDANT"),
            version: short_string(env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the version string
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = short_string(version);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
