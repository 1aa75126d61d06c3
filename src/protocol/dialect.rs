//! Jog and stop syntax per CNC application family.

use core::fmt::{self, Write};

use crate::state::{Axis, Units};

/// Wire syntax for motion and stop commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    /// Native pendant lines: `JOG:<axis>,<d>,<f>`.
    Pendant,
    /// GRBL jogging: `$J=G91 G21 <axis><d> F<f>`.
    GcodeJog,
    /// Keystrokes relayed by the bridge: `KEY:RIGHT` etc.
    Keys,
    /// LinuxCNC MDI: `MDI:G91 G1 <axis><d> F<f>`.
    Mdi,
}

impl Dialect {
    /// Writes one jog command for a signed distance.
    pub fn write_jog<W: Write>(
        self,
        out: &mut W,
        axis: Axis,
        distance: f32,
        feed: f32,
        units: Units,
    ) -> fmt::Result {
        match self {
            Dialect::Pendant => {
                write!(out, "JOG:{},", axis.letter())?;
                write_distance(out, distance, units)?;
                out.write_char(',')?;
                write_feed(out, feed, units)
            }
            Dialect::GcodeJog => {
                let g = match units {
                    Units::Metric => "G21",
                    Units::Imperial => "G20",
                };
                write!(out, "$J=G91 {} {}", g, axis.letter())?;
                write_distance(out, distance, units)?;
                out.write_str(" F")?;
                write_feed(out, feed, units)
            }
            Dialect::Keys => out.write_str(key_for(axis, distance >= 0.0)),
            Dialect::Mdi => {
                write!(out, "MDI:G91 G1 {}", axis.letter())?;
                write_distance(out, distance, units)?;
                out.write_str(" F")?;
                write_feed(out, feed, units)
            }
        }
    }

    /// Stop command for this dialect.
    pub const fn stop_line(self) -> &'static str {
        match self {
            Dialect::Pendant => "JOG:STOP",
            Dialect::GcodeJog => "!",
            Dialect::Keys => "KEY:ESC",
            Dialect::Mdi => "MDI:ABORT",
        }
    }
}

fn key_for(axis: Axis, positive: bool) -> &'static str {
    match (axis, positive) {
        (Axis::X, true) => "KEY:RIGHT",
        (Axis::X, false) => "KEY:LEFT",
        (Axis::Y, true) => "KEY:UP",
        (Axis::Y, false) => "KEY:DOWN",
        (Axis::Z, true) => "KEY:PGUP",
        (Axis::Z, false) => "KEY:PGDN",
    }
}

/// Distance with 3 decimals (mm) or 4 (inch).
pub(crate) fn write_distance<W: Write>(out: &mut W, value: f32, units: Units) -> fmt::Result {
    match units {
        Units::Metric => write!(out, "{:.3}", value),
        Units::Imperial => write!(out, "{:.4}", value),
    }
}

fn write_feed<W: Write>(out: &mut W, feed: f32, units: Units) -> fmt::Result {
    match units {
        Units::Metric => write!(out, "{:.0}", feed),
        Units::Imperial => write!(out, "{:.1}", feed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Line;

    fn jog(dialect: Dialect, axis: Axis, d: f32, f: f32, units: Units) -> Line {
        let mut line = Line::new();
        dialect.write_jog(&mut line, axis, d, f, units).unwrap();
        line
    }

    #[test]
    fn pendant_jog() {
        assert_eq!(
            jog(Dialect::Pendant, Axis::Z, 0.1, 1000.0, Units::Metric).as_str(),
            "JOG:Z,0.100,1000"
        );
        assert_eq!(
            jog(Dialect::Pendant, Axis::X, -0.01, 1000.0 / 25.4, Units::Imperial).as_str(),
            "JOG:X,-0.0100,39.4"
        );
    }

    #[test]
    fn gcode_jog_selects_units() {
        assert_eq!(
            jog(Dialect::GcodeJog, Axis::Y, -1.0, 1500.0, Units::Metric).as_str(),
            "$J=G91 G21 Y-1.000 F1500"
        );
        assert_eq!(
            jog(Dialect::GcodeJog, Axis::Y, 0.1, 59.1, Units::Imperial).as_str(),
            "$J=G91 G20 Y0.1000 F59.1"
        );
    }

    #[test]
    fn key_jog_maps_direction() {
        let cases = [
            (Axis::X, 1.0, "KEY:RIGHT"),
            (Axis::X, -1.0, "KEY:LEFT"),
            (Axis::Y, 1.0, "KEY:UP"),
            (Axis::Y, -1.0, "KEY:DOWN"),
            (Axis::Z, 1.0, "KEY:PGUP"),
            (Axis::Z, -1.0, "KEY:PGDN"),
        ];
        for (axis, d, expected) in cases {
            assert_eq!(jog(Dialect::Keys, axis, d, 1000.0, Units::Metric).as_str(), expected);
        }
    }

    #[test]
    fn mdi_jog() {
        assert_eq!(
            jog(Dialect::Mdi, Axis::X, 0.5, 200.0, Units::Metric).as_str(),
            "MDI:G91 G1 X0.500 F200"
        );
    }

    #[test]
    fn stop_lines() {
        assert_eq!(Dialect::Pendant.stop_line(), "JOG:STOP");
        assert_eq!(Dialect::GcodeJog.stop_line(), "!");
        assert_eq!(Dialect::Keys.stop_line(), "KEY:ESC");
        assert_eq!(Dialect::Mdi.stop_line(), "MDI:ABORT");
    }
}
