//! Host → firmware lines.
//!
//! [`parse`] recognizes a line by its prefix and parses each numeric field on
//! its own. A field that fails to parse comes back as `None` so the caller
//! keeps its previous value; the rest of the line still applies.

use crate::profile::MachineProfile;
use crate::safety::MotionState;
use crate::state::{Axis, CoordView, Units, WcsLabel};

/// Work-offset slots addressable with `OFFSET:`.
pub const OFFSET_SLOTS: [&str; 6] = ["G54", "G55", "G56", "G57", "G58", "G59"];

/// Per-axis values from a position or offset line; `None` = missing or malformed.
pub type AxisValues = [Option<f32>; 3];

/// A recognized host line.
#[derive(Clone, Debug, PartialEq)]
pub enum HostMessage {
    /// `LCD:SOLID,<r>,<g>,<b>`
    Solid([Option<u8>; 3]),
    /// `LCD:WHEEL,<hue>`
    Wheel(u8),
    /// `MACHINE:<NAME>`
    Machine(MachineProfile),
    /// `UNITS:<MM|IN|INCHES>`
    Units(Units),
    /// `SOFTWARE:CONNECTED` (true) / `SOFTWARE:DISCONNECTED` (false)
    Software(bool),
    /// `ARM:ENABLE` (true) / `ARM:DISABLE` (false)
    Arm(bool),
    /// `HOST:PING`
    Ping,
    /// `HOST:HELLO`
    Hello,
    /// `MOTION:STATE,<IDLE|RUN|HOLD>`
    Motion(MotionState),
    /// `COORD:VIEW,<WCS|MCS>`
    CoordView(CoordView),
    /// `COORD:UNLOCK`
    CoordUnlock,
    /// `COORD:ACTIVE,<label>`
    CoordActive(WcsLabel),
    /// `POS:WCS,...` / `POS:MCS,...`
    Position {
        /// Frame the values belong to.
        frame: CoordView,
        /// X, Y, Z.
        values: AxisValues,
    },
    /// `OFFSET:<G54..G59>,X,<f>,Y,<f>,Z,<f>`
    Offset {
        /// Index into [`OFFSET_SLOTS`].
        slot: usize,
        /// X, Y, Z.
        values: AxisValues,
    },
    /// `ENCODER:SCALE,<n>` (range checked by the receiver)
    EncoderScale(u8),
}

/// Parses one host line. Unrecognized lines return `None`.
pub fn parse(line: &str) -> Option<HostMessage> {
    let line = line.trim();
    let (head, rest) = line.split_once(':')?;

    match head {
        "LCD" => parse_lcd(rest),
        "MACHINE" => MachineProfile::from_token(rest).map(HostMessage::Machine),
        "UNITS" => Units::from_token(rest).map(HostMessage::Units),
        "SOFTWARE" => match rest {
            "CONNECTED" => Some(HostMessage::Software(true)),
            "DISCONNECTED" => Some(HostMessage::Software(false)),
            _ => None,
        },
        "ARM" => match rest {
            "ENABLE" => Some(HostMessage::Arm(true)),
            "DISABLE" => Some(HostMessage::Arm(false)),
            _ => None,
        },
        "HOST" => match rest {
            "PING" => Some(HostMessage::Ping),
            "HELLO" => Some(HostMessage::Hello),
            _ => None,
        },
        "MOTION" => {
            let state = rest.strip_prefix("STATE,")?;
            MotionState::from_token(state).map(HostMessage::Motion)
        }
        "COORD" => parse_coord(rest),
        "POS" => {
            let (frame, fields) = split_first(rest);
            let frame = CoordView::from_token(frame)?;
            Some(HostMessage::Position {
                frame,
                values: parse_axis_values(fields),
            })
        }
        "OFFSET" => {
            let (slot, fields) = split_first(rest);
            let slot = OFFSET_SLOTS.iter().position(|s| *s == slot)?;
            Some(HostMessage::Offset {
                slot,
                values: parse_axis_values(fields),
            })
        }
        "ENCODER" => {
            let scale = rest.strip_prefix("SCALE,")?;
            scale.trim().parse().ok().map(HostMessage::EncoderScale)
        }
        _ => None,
    }
}

fn parse_lcd(rest: &str) -> Option<HostMessage> {
    let (kind, fields) = split_first(rest);
    match kind {
        "SOLID" => {
            let mut rgb = [None; 3];
            for (slot, field) in rgb.iter_mut().zip(fields.split(',')) {
                *slot = field.trim().parse().ok();
            }
            Some(HostMessage::Solid(rgb))
        }
        "WHEEL" => fields.trim().parse().ok().map(HostMessage::Wheel),
        _ => None,
    }
}

fn parse_coord(rest: &str) -> Option<HostMessage> {
    if rest == "UNLOCK" {
        return Some(HostMessage::CoordUnlock);
    }
    let (kind, value) = split_first(rest);
    match kind {
        "VIEW" => CoordView::from_token(value).map(HostMessage::CoordView),
        "ACTIVE" => {
            let mut label = WcsLabel::new();
            let value = value.trim();
            if value.is_empty() || label.push_str(value).is_err() {
                return None;
            }
            Some(HostMessage::CoordActive(label))
        }
        _ => None,
    }
}

/// Splits `A,rest` into `("A", "rest")`; no comma gives `("A", "")`.
fn split_first(s: &str) -> (&str, &str) {
    s.split_once(',').unwrap_or((s, ""))
}

/// Parses `X,<f>,Y,<f>,Z,<f>` pairs in any order. Unknown keys are skipped.
fn parse_axis_values(fields: &str) -> AxisValues {
    let mut values = [None; 3];
    let mut parts = fields.split(',');
    while let (Some(key), Some(value)) = (parts.next(), parts.next()) {
        if let Some(axis) = Axis::from_token(key.trim()) {
            if let Ok(v) = value.trim().parse::<f32>() {
                if v.is_finite() {
                    values[axis.index()] = Some(v);
                }
            }
        }
    }
    values
}
