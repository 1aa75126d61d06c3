//! Line protocol between the pendant and the desktop bridge.
//!
//! Newline-delimited ASCII at 115200 baud, case-sensitive tokens.
//!
//! - [`Outbound`]: everything the firmware sends, formatted into a [`Line`](crate::traits::Line)
//! - [`parse`]: recognizes host lines into [`HostMessage`]
//! - [`Dialect`]: the jog/stop syntax of each profile family
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::protocol::{parse, Dialect, HostMessage, Outbound};
//! use cnc_pendant::state::{Axis, Units};
//!
//! let jog = Outbound::Jog {
//!     dialect: Dialect::GcodeJog,
//!     axis: Axis::X,
//!     distance: 1.0,
//!     feed: 1000.0,
//!     units: Units::Metric,
//! };
//! assert_eq!(jog.to_line().unwrap().as_str(), "$J=G91 G21 X1.000 F1000");
//!
//! assert_eq!(parse("HOST:PING"), Some(HostMessage::Ping));
//! assert_eq!(parse("something else"), None);
//! ```

mod dialect;
mod inbound;
mod outbound;

pub use dialect::Dialect;
pub use inbound::{parse, AxisValues, HostMessage, OFFSET_SLOTS};
pub use outbound::{EstopEvent, Outbound};
