//! Firmware → host lines.

use core::fmt::{self, Write};

use super::dialect::{write_distance, Dialect};
use crate::profile::MachineProfile;
use crate::state::{Axis, CoordView, FeedRate, JogDistance, Speed, Units};
use crate::traits::Line;

/// `ESTOP:` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EstopEvent {
    /// Switch opened.
    Activated,
    /// Switch closed again.
    Released,
    /// Movement arrived while the gate denied it.
    MotionBlocked,
}

impl EstopEvent {
    /// Wire token.
    pub const fn token(self) -> &'static str {
        match self {
            EstopEvent::Activated => "EMERGENCY_STOP_ACTIVATED",
            EstopEvent::Released => "EMERGENCY_STOP_RELEASED",
            EstopEvent::MotionBlocked => "MOTION_BLOCKED",
        }
    }
}

/// One outbound line, formatted on demand with [`Outbound::to_line`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outbound {
    /// `PENDANT:READY`
    Ready,
    /// `HOST:PONG`
    Pong,
    /// `AXIS:<X|Y|Z>`
    Axis(Axis),
    /// `DISTANCE:<float>` in the active units.
    Distance(f32, Units),
    /// `SPEED:<SLOW|MEDIUM|FAST>`
    Speed(Speed),
    /// `FEEDRATE:<pct>`
    FeedRate(FeedRate),
    /// `COORD:VIEW,<WCS|MCS>`
    CoordView(CoordView),
    /// `MACHINE:<NAME>`
    Machine(MachineProfile),
    /// `ESTOP:<event>`
    Estop(EstopEvent),
    /// One jog step in the profile's dialect.
    Jog {
        /// Syntax.
        dialect: Dialect,
        /// Axis.
        axis: Axis,
        /// Signed distance.
        distance: f32,
        /// Feed per minute in `units`.
        feed: f32,
        /// Unit system for formatting.
        units: Units,
    },
    /// The dialect's stop command.
    Stop(Dialect),
    /// `KEY:<1..4>` distance shortcut.
    DistanceShortcut(JogDistance),
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Outbound::Ready => f.write_str("PENDANT:READY"),
            Outbound::Pong => f.write_str("HOST:PONG"),
            Outbound::Axis(axis) => write!(f, "AXIS:{}", axis.letter()),
            Outbound::Distance(value, units) => {
                f.write_str("DISTANCE:")?;
                write_distance(f, value, units)
            }
            Outbound::Speed(speed) => write!(f, "SPEED:{}", speed.token()),
            Outbound::FeedRate(rate) => write!(f, "FEEDRATE:{}", rate.percent()),
            Outbound::CoordView(view) => write!(f, "COORD:VIEW,{}", view.token()),
            Outbound::Machine(profile) => write!(f, "MACHINE:{}", profile.name()),
            Outbound::Estop(event) => write!(f, "ESTOP:{}", event.token()),
            Outbound::Jog {
                dialect,
                axis,
                distance,
                feed,
                units,
            } => dialect.write_jog(f, axis, distance, feed, units),
            Outbound::Stop(dialect) => f.write_str(dialect.stop_line()),
            Outbound::DistanceShortcut(level) => write!(f, "KEY:{}", level.index() + 1),
        }
    }
}

impl Outbound {
    /// Formats into a line buffer. Fails only if the line would not fit.
    pub fn to_line(&self) -> Result<Line, fmt::Error> {
        let mut line = Line::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}
