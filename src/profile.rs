//! Machine profiles: which CNC control application is on the other end of the bridge.
//!
//! Each profile is a row in a static strategy table ([`ProfileSpec`]) giving
//! its wire dialect, whether button 2 selects speed or feed-rate, whether
//! distance changes also send numeric shortcuts, a display accent, and its
//! jog distance tables.
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::profile::{MachineProfile, RateMode};
//! use cnc_pendant::protocol::Dialect;
//!
//! let profile = MachineProfile::from_token("GSENDER").unwrap();
//! assert_eq!(profile, MachineProfile::Grbl);
//! assert_eq!(profile.spec().dialect, Dialect::GcodeJog);
//! assert_eq!(profile.spec().rate_mode, RateMode::FeedRate);
//!
//! assert_eq!(MachineProfile::detect("Grbl 1.1h ['$' for help]"), Some(MachineProfile::Grbl));
//! ```

use crate::protocol::Dialect;
use crate::state::{JogDistance, Units};
use crate::theme::Rgb;

/// What button 2 cycles through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateMode {
    /// Slow / medium / fast.
    Speed,
    /// 25 / 50 / 75 / 100 %.
    FeedRate,
}

/// Supported CNC control applications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MachineProfile {
    /// No application detected yet.
    #[default]
    Generic,
    /// CutControl.
    CutControl,
    /// GRBL senders (Candle, UGS, gSender).
    Grbl,
    /// Mach3.
    Mach3,
    /// Mach4.
    Mach4,
    /// UCCNC.
    Uccnc,
    /// LinuxCNC.
    LinuxCnc,
}

/// Per-profile behaviour.
#[derive(Debug)]
pub struct ProfileSpec {
    /// Wire name used in `MACHINE:` lines.
    pub name: &'static str,
    /// Jog/stop syntax.
    pub dialect: Dialect,
    /// What button 2 selects.
    pub rate_mode: RateMode,
    /// Whether distance changes also send `KEY:<n>`.
    pub distance_shortcuts: bool,
    /// Card and status accent colour.
    pub accent: Rgb,
    /// Jog lengths in mm, fine to large.
    pub distances_mm: [f32; 4],
    /// Jog lengths in inches, fine to large.
    pub distances_in: [f32; 4],
}

impl ProfileSpec {
    /// Jog length for a distance level in the given units.
    pub fn distance(&self, level: JogDistance, units: Units) -> f32 {
        match units {
            Units::Metric => self.distances_mm[level.index()],
            Units::Imperial => self.distances_in[level.index()],
        }
    }
}

const STANDARD_MM: [f32; 4] = [0.01, 0.1, 1.0, 10.0];
const STANDARD_IN: [f32; 4] = [0.001, 0.01, 0.1, 1.0];

// Order matches `MachineProfile` discriminants.
static PROFILES: [ProfileSpec; 7] = [
    ProfileSpec {
        name: "GENERIC",
        dialect: Dialect::Pendant,
        rate_mode: RateMode::Speed,
        distance_shortcuts: false,
        accent: Rgb::new(0, 200, 255),
        distances_mm: STANDARD_MM,
        distances_in: STANDARD_IN,
    },
    ProfileSpec {
        name: "CUTCONTROL",
        dialect: Dialect::Pendant,
        rate_mode: RateMode::FeedRate,
        distance_shortcuts: true,
        accent: Rgb::new(255, 140, 0),
        distances_mm: [0.01, 0.1, 1.0, 5.0],
        distances_in: [0.001, 0.01, 0.1, 0.5],
    },
    ProfileSpec {
        name: "GRBL",
        dialect: Dialect::GcodeJog,
        rate_mode: RateMode::FeedRate,
        distance_shortcuts: false,
        accent: Rgb::new(0, 220, 90),
        distances_mm: STANDARD_MM,
        distances_in: STANDARD_IN,
    },
    ProfileSpec {
        name: "MACH3",
        dialect: Dialect::Keys,
        rate_mode: RateMode::Speed,
        distance_shortcuts: false,
        accent: Rgb::new(60, 120, 255),
        distances_mm: STANDARD_MM,
        distances_in: STANDARD_IN,
    },
    ProfileSpec {
        name: "MACH4",
        dialect: Dialect::Keys,
        rate_mode: RateMode::Speed,
        distance_shortcuts: true,
        accent: Rgb::new(160, 80, 255),
        distances_mm: STANDARD_MM,
        distances_in: STANDARD_IN,
    },
    ProfileSpec {
        name: "UCCNC",
        dialect: Dialect::Keys,
        rate_mode: RateMode::Speed,
        distance_shortcuts: true,
        accent: Rgb::new(255, 210, 0),
        distances_mm: [0.001, 0.01, 0.1, 1.0],
        distances_in: [0.0001, 0.001, 0.01, 0.1],
    },
    ProfileSpec {
        name: "LINUXCNC",
        dialect: Dialect::Mdi,
        rate_mode: RateMode::Speed,
        distance_shortcuts: false,
        accent: Rgb::new(0, 170, 170),
        distances_mm: [0.005, 0.05, 0.5, 5.0],
        distances_in: [0.0005, 0.005, 0.05, 0.5],
    },
];

/// Substrings that identify an application in unsolicited host traffic.
const MARKERS: [(&str, MachineProfile); 9] = [
    ("Grbl", MachineProfile::Grbl),
    ("gSender", MachineProfile::Grbl),
    ("UGS", MachineProfile::Grbl),
    ("Candle", MachineProfile::Grbl),
    ("UCCNC", MachineProfile::Uccnc),
    ("Mach4", MachineProfile::Mach4),
    ("Mach3", MachineProfile::Mach3),
    ("LinuxCNC", MachineProfile::LinuxCnc),
    ("CutControl", MachineProfile::CutControl),
];

impl MachineProfile {
    /// All profiles in table order.
    pub const ALL: [MachineProfile; 7] = [
        MachineProfile::Generic,
        MachineProfile::CutControl,
        MachineProfile::Grbl,
        MachineProfile::Mach3,
        MachineProfile::Mach4,
        MachineProfile::Uccnc,
        MachineProfile::LinuxCnc,
    ];

    /// Strategy table row.
    #[inline]
    pub fn spec(self) -> &'static ProfileSpec {
        &PROFILES[self as usize]
    }

    /// Wire name.
    #[inline]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Parses a `MACHINE:` token, including sender aliases for GRBL.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "CANDLE" | "UGS" | "GSENDER" => return Some(MachineProfile::Grbl),
            _ => {}
        }
        Self::ALL.into_iter().find(|p| p.name() == token)
    }

    /// Guesses the profile from characteristic host output.
    ///
    /// GRBL response shapes (`ok`, `error:`, `ALARM:`, `$` settings,
    /// `<...>` status reports) or a product name anywhere in the line.
    pub fn detect(line: &str) -> Option<Self> {
        let line = line.trim();
        if line == "ok"
            || line.starts_with("error:")
            || line.starts_with("ALARM:")
            || line.starts_with('$')
            || line.starts_with('<')
        {
            return Some(MachineProfile::Grbl);
        }
        MARKERS
            .iter()
            .find(|(marker, _)| line.contains(marker))
            .map(|(_, profile)| *profile)
    }
}
