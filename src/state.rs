//! Pendant selections and the button-driven mode machine.
//!
//! [`PendantState`] holds everything the operator selects (axis, jog distance,
//! speed or feed-rate, coordinate view, help overlay) plus host-selected
//! context (units, machine profile, active work-offset label).
//! [`PendantState::apply_button`] is the state machine over classified
//! button events.
//!
//! | Event | Effect |
//! |-------|--------|
//! | Button 1 short | Axis Z → Y → X → Z |
//! | Button 1 long | Jog distance fine → small → medium → large → fine |
//! | Button 2 short | Speed or feed-rate (per profile) advances |
//! | Button 2 long | Coordinate view WCS ↔ MCS unless host-locked |
//! | Both held | Help overlay on/off; other events ignored while on |
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::input::{ButtonEvent, ChannelId, PressEvent, PressKind};
//! use cnc_pendant::state::{Axis, ModeChange, PendantState};
//!
//! let mut state = PendantState::default();
//! assert_eq!(state.axis, Axis::Z);
//!
//! let press = PressEvent {
//!     channel: ChannelId::Button1,
//!     started_ms: 0,
//!     duration_ms: 200,
//!     kind: PressKind::Short,
//! };
//! assert_eq!(state.apply_button(ButtonEvent::Press(press)), ModeChange::Axis(Axis::Y));
//! ```

use heapless::String;

use crate::input::{ButtonEvent, ChannelId, PressKind};
use crate::profile::{MachineProfile, RateMode};

/// Maximum length of a work-offset label such as `G54` or `G59.3`.
pub const MAX_LABEL_LEN: usize = 8;

/// Work-offset label (`G54`...).
pub type WcsLabel = String<MAX_LABEL_LEN>;

/// Machine axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    #[default]
    Z,
}

impl Axis {
    /// All axes in display order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Next axis in the selection cycle (Z → Y → X → Z).
    pub const fn next(self) -> Self {
        match self {
            Axis::Z => Axis::Y,
            Axis::Y => Axis::X,
            Axis::X => Axis::Z,
        }
    }

    /// Array index (X = 0).
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis letter.
    pub const fn letter(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// Parses an axis letter.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Jog distance level. The actual length comes from the profile's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JogDistance {
    /// Smallest step.
    Fine,
    /// Default step.
    #[default]
    Small,
    /// Medium step.
    Medium,
    /// Largest step.
    Large,
}

impl JogDistance {
    /// Next level, wrapping to [`Fine`](Self::Fine).
    pub const fn next(self) -> Self {
        match self {
            JogDistance::Fine => JogDistance::Small,
            JogDistance::Small => JogDistance::Medium,
            JogDistance::Medium => JogDistance::Large,
            JogDistance::Large => JogDistance::Fine,
        }
    }

    /// Table index (fine = 0).
    pub const fn index(self) -> usize {
        match self {
            JogDistance::Fine => 0,
            JogDistance::Small => 1,
            JogDistance::Medium => 2,
            JogDistance::Large => 3,
        }
    }
}

/// Jog speed for profiles in [`RateMode::Speed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Speed {
    /// Slow.
    Slow,
    /// Medium.
    #[default]
    Medium,
    /// Fast.
    Fast,
}

impl Speed {
    /// Next speed, wrapping.
    pub const fn next(self) -> Self {
        match self {
            Speed::Slow => Speed::Medium,
            Speed::Medium => Speed::Fast,
            Speed::Fast => Speed::Slow,
        }
    }

    /// Wire token.
    pub const fn token(self) -> &'static str {
        match self {
            Speed::Slow => "SLOW",
            Speed::Medium => "MEDIUM",
            Speed::Fast => "FAST",
        }
    }

    /// Jog feed in mm/min.
    pub const fn feed_mm_per_min(self) -> f32 {
        match self {
            Speed::Slow => 200.0,
            Speed::Medium => 1000.0,
            Speed::Fast => 3000.0,
        }
    }
}

/// Feed-rate override for profiles in [`RateMode::FeedRate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedRate {
    /// 25%.
    Pct25,
    /// 50%.
    #[default]
    Pct50,
    /// 75%.
    Pct75,
    /// 100%.
    Pct100,
}

impl FeedRate {
    /// Jog feed at 100%, in mm/min.
    pub const FULL_FEED_MM_PER_MIN: f32 = 2000.0;

    /// Next rate, wrapping.
    pub const fn next(self) -> Self {
        match self {
            FeedRate::Pct25 => FeedRate::Pct50,
            FeedRate::Pct50 => FeedRate::Pct75,
            FeedRate::Pct75 => FeedRate::Pct100,
            FeedRate::Pct100 => FeedRate::Pct25,
        }
    }

    /// Percentage.
    pub const fn percent(self) -> u8 {
        match self {
            FeedRate::Pct25 => 25,
            FeedRate::Pct50 => 50,
            FeedRate::Pct75 => 75,
            FeedRate::Pct100 => 100,
        }
    }

    /// Jog feed in mm/min.
    pub fn feed_mm_per_min(self) -> f32 {
        Self::FULL_FEED_MM_PER_MIN * f32::from(self.percent()) / 100.0
    }
}

/// Which coordinate frame the position readout shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordView {
    /// Work coordinates (WCS).
    #[default]
    Work,
    /// Machine coordinates (MCS).
    Machine,
}

impl CoordView {
    /// The other frame.
    pub const fn toggled(self) -> Self {
        match self {
            CoordView::Work => CoordView::Machine,
            CoordView::Machine => CoordView::Work,
        }
    }

    /// Wire token and display label.
    pub const fn token(self) -> &'static str {
        match self {
            CoordView::Work => "WCS",
            CoordView::Machine => "MCS",
        }
    }

    /// Parses `WCS` / `MCS`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "WCS" => Some(CoordView::Work),
            "MCS" => Some(CoordView::Machine),
            _ => None,
        }
    }
}

/// Unit system reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Units {
    /// Millimetres.
    #[default]
    Metric,
    /// Inches.
    Imperial,
}

impl Units {
    /// Parses `MM`, `IN`, or `INCHES`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "MM" => Some(Units::Metric),
            "IN" | "INCHES" => Some(Units::Imperial),
            _ => None,
        }
    }

    /// Short display label.
    pub const fn label(self) -> &'static str {
        match self {
            Units::Metric => "MM",
            Units::Imperial => "IN",
        }
    }

    /// Converts a feed in mm/min into this unit system.
    pub fn feed_from_mm(self, mm_per_min: f32) -> f32 {
        match self {
            Units::Metric => mm_per_min,
            Units::Imperial => mm_per_min / 25.4,
        }
    }
}

/// Normal panels or the static help overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UiView {
    /// Normal panels.
    #[default]
    Normal,
    /// Help overlay.
    Help,
}

/// Result of feeding a button event into [`PendantState::apply_button`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    /// Axis selection changed.
    Axis(Axis),
    /// Jog distance changed.
    Distance(JogDistance),
    /// Speed changed.
    Speed(Speed),
    /// Feed-rate changed.
    FeedRate(FeedRate),
    /// Coordinate view toggled locally.
    CoordView(CoordView),
    /// Help overlay entered or left.
    Help(UiView),
    /// Event consumed without effect (help shown, or view locked by host).
    Ignored,
}

/// Operator and host selections.
#[derive(Clone, Debug)]
pub struct PendantState {
    /// Selected jog axis.
    pub axis: Axis,
    /// Selected jog distance level.
    pub distance: JogDistance,
    /// Selected speed (speed-mode profiles).
    pub speed: Speed,
    /// Selected feed-rate (feed-rate-mode profiles).
    pub feed_rate: FeedRate,
    /// Coordinate frame shown in the position readout.
    pub coord_view: CoordView,
    /// Set by a host `COORD:VIEW` message; blocks local toggling.
    pub view_locked: bool,
    /// Active work-offset label reported by the host.
    pub active_wcs: WcsLabel,
    /// Unit system.
    pub units: Units,
    /// Active machine profile.
    pub profile: MachineProfile,
    /// True once the host selected a profile explicitly.
    pub profile_explicit: bool,
    /// Normal panels or help.
    pub ui_view: UiView,
}

impl Default for PendantState {
    fn default() -> Self {
        let mut active_wcs = WcsLabel::new();
        let _ = active_wcs.push_str("G54");
        Self {
            axis: Axis::default(),
            distance: JogDistance::default(),
            speed: Speed::default(),
            feed_rate: FeedRate::default(),
            coord_view: CoordView::default(),
            view_locked: false,
            active_wcs,
            units: Units::default(),
            profile: MachineProfile::default(),
            profile_explicit: false,
            ui_view: UiView::default(),
        }
    }
}

impl PendantState {
    /// Applies one classified button event.
    pub fn apply_button(&mut self, event: ButtonEvent) -> ModeChange {
        let press = match event {
            ButtonEvent::BothHeld => {
                self.ui_view = match self.ui_view {
                    UiView::Normal => UiView::Help,
                    UiView::Help => UiView::Normal,
                };
                return ModeChange::Help(self.ui_view);
            }
            ButtonEvent::Press(press) => press,
        };

        if self.ui_view == UiView::Help {
            return ModeChange::Ignored;
        }

        match (press.channel, press.kind) {
            (ChannelId::Button1, PressKind::Short) => {
                self.axis = self.axis.next();
                ModeChange::Axis(self.axis)
            }
            (ChannelId::Button1, PressKind::Long) => {
                self.distance = self.distance.next();
                ModeChange::Distance(self.distance)
            }
            (ChannelId::Button2, PressKind::Short) => match self.profile.spec().rate_mode {
                RateMode::Speed => {
                    self.speed = self.speed.next();
                    ModeChange::Speed(self.speed)
                }
                RateMode::FeedRate => {
                    self.feed_rate = self.feed_rate.next();
                    ModeChange::FeedRate(self.feed_rate)
                }
            },
            (ChannelId::Button2, PressKind::Long) => {
                if self.view_locked {
                    return ModeChange::Ignored;
                }
                self.coord_view = self.coord_view.toggled();
                ModeChange::CoordView(self.coord_view)
            }
            _ => ModeChange::Ignored,
        }
    }

    /// Host forced the coordinate view; local toggling stays off until unlocked.
    pub fn lock_view(&mut self, view: CoordView) {
        self.coord_view = view;
        self.view_locked = true;
    }

    /// Host lifted the view lock.
    pub fn unlock_view(&mut self) {
        self.view_locked = false;
    }

    /// Jog length for the current distance level and units.
    pub fn jog_length(&self) -> f32 {
        self.profile.spec().distance(self.distance, self.units)
    }

    /// Jog feed for the current profile, selection, and units.
    pub fn jog_feed(&self) -> f32 {
        let mm = match self.profile.spec().rate_mode {
            RateMode::Speed => self.speed.feed_mm_per_min(),
            RateMode::FeedRate => self.feed_rate.feed_mm_per_min(),
        };
        self.units.feed_from_mm(mm)
    }

    /// Leaves the help overlay if it is showing. Returns whether it was.
    pub fn dismiss_help(&mut self) -> bool {
        let was_help = self.ui_view == UiView::Help;
        self.ui_view = UiView::Normal;
        was_help
    }
}
