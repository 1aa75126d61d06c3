//! Round 240×240 layout on any embedded-graphics target.
//!
//! Works with any `DrawTarget<Color = Rgb565>`: the GC9A01 driver on the
//! device, a framebuffer in tests. Text is formatted into `heapless` buffers,
//! so rendering never allocates.
//!
//! # Layout
//!
//! | Region | Bounds | Contents |
//! |--------|--------|----------|
//! | Position | y 38..100 | X/Y/Z rows, freshness dot, frame |
//! | Card | y 105..171 | axis + distance, speed or feed, profile |
//! | Status | y 180..216 | pulse dot, arm + motion, units + offset |

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::{Rgb565, Rgb888},
    prelude::*,
    primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

use crate::position::PositionReadout;
use crate::profile::RateMode;
use crate::safety::MotionState;
use crate::state::{Axis, Units};
use crate::theme::{Rgb, Theme};
use crate::traits::{CardView, PendantDisplay, RateSelection, StatusView};

const CENTER: Point = Point::new(120, 120);
const BEZEL_DIAMETER: u32 = 236;

const POSITION_AREA: Rectangle = Rectangle::new(Point::new(40, 38), Size::new(160, 62));
const POSITION_ROWS: [i32; 3] = [50, 70, 90];
const FRESH_DOT: Point = Point::new(185, 62);

const CARD_AREA: Rectangle = Rectangle::new(Point::new(55, 105), Size::new(130, 66));

const STATUS_AREA: Rectangle = Rectangle::new(Point::new(50, 180), Size::new(140, 36));
const PULSE_DOT: Point = Point::new(66, 190);

const DOT_DIAMETER: u32 = 8;

const FRESH: Rgb = Rgb::new(0, 200, 80);
const PULSE_DIM: Rgb = Rgb::new(0, 90, 40);
const WAITING: Rgb = Rgb::new(255, 170, 0);
const STALE: Rgb = Rgb::new(110, 110, 110);
const CARD_FILL: Rgb = Rgb::new(32, 32, 32);

fn rgb565(color: Rgb) -> Rgb565 {
    Rgb888::new(color.r, color.g, color.b).into()
}

/// Black or white, whichever reads on `background`.
fn ink(background: Rgb) -> Rgb {
    let luma = u32::from(background.r) * 299 + u32::from(background.g) * 587 + u32::from(background.b) * 114;
    if luma > 128_000 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// One readout row, or dashes when the value does not fit.
fn position_row(axis: Axis, value: f32) -> String<24> {
    let mut row = String::new();
    if write!(row, "{} {:>9.3}", axis.letter(), value).is_err() {
        row.clear();
        let _ = write!(row, "{}  ------", axis.letter());
    }
    row
}

const fn motion_label(motion: MotionState) -> &'static str {
    match motion {
        MotionState::Idle => "IDLE",
        MotionState::Run => "RUN",
        MotionState::Hold => "HOLD",
    }
}

/// [`PendantDisplay`] over an embedded-graphics target.
///
/// # Example
///
/// ```rust,ignore
/// let lcd = mipidsi::Builder::new(GC9A01, di).init(&mut delay)?;
/// let mut display = GraphicsDisplay::new(lcd);
/// display.init()?;
/// ```
pub struct GraphicsDisplay<T> {
    target: T,
    background: Rgb,
}

impl<T> GraphicsDisplay<T>
where
    T: DrawTarget<Color = Rgb565>,
{
    /// Wraps a draw target.
    pub fn new(target: T) -> Self {
        Self {
            target,
            background: Rgb::BLACK,
        }
    }

    /// Underlying target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns the underlying target.
    pub fn into_inner(self) -> T {
        self.target
    }

    fn text(&mut self, s: &str, at: Point, font: &MonoFont<'_>, color: Rgb) -> Result<(), T::Error> {
        let style = MonoTextStyle::new(font, rgb565(color));
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(s, at, style, layout).draw(&mut self.target)?;
        Ok(())
    }

    fn fill(&mut self, area: Rectangle, color: Rgb) -> Result<(), T::Error> {
        area.into_styled(PrimitiveStyle::with_fill(rgb565(color)))
            .draw(&mut self.target)
    }

    fn dot(&mut self, center: Point, color: Rgb) -> Result<(), T::Error> {
        Circle::with_center(center, DOT_DIAMETER)
            .into_styled(PrimitiveStyle::with_fill(rgb565(color)))
            .draw(&mut self.target)
    }

    /// Full-screen overlay: title plus short lines.
    fn overlay(&mut self, fill: Rgb, title: &str, lines: &[&str]) -> Result<(), T::Error> {
        self.target.clear(rgb565(fill))?;
        let color = ink(fill);
        self.text(title, Point::new(120, 60), &FONT_10X20, color)?;
        for (row, line) in (0i32..).zip(lines) {
            self.text(line, Point::new(120, 95 + row * 18), &FONT_6X10, color)?;
        }
        Ok(())
    }
}

impl<T> PendantDisplay for GraphicsDisplay<T>
where
    T: DrawTarget<Color = Rgb565>,
    T::Error: core::fmt::Debug,
{
    type Error = T::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.clear()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.target.clear(rgb565(Rgb::BLACK))
    }

    fn draw_boot(&mut self, name: &str, version: &str) -> Result<(), Self::Error> {
        self.target.clear(rgb565(Rgb::BLACK))?;
        self.text(name, Point::new(120, 108), &FONT_10X20, Rgb::WHITE)?;
        let mut line: String<40> = String::new();
        let _ = write!(line, "v{}", version);
        self.text(&line, Point::new(120, 136), &FONT_6X10, STALE)
    }

    fn draw_background(&mut self, theme: &Theme, accent: Rgb) -> Result<(), Self::Error> {
        self.background = theme.background;
        self.target.clear(rgb565(theme.background))?;
        Circle::with_center(CENTER, BEZEL_DIAMETER)
            .into_styled(PrimitiveStyle::with_stroke(rgb565(accent), 3))
            .draw(&mut self.target)
    }

    fn draw_card(&mut self, card: &CardView) -> Result<(), Self::Error> {
        let style = PrimitiveStyleBuilder::new()
            .fill_color(rgb565(CARD_FILL))
            .stroke_color(rgb565(card.accent))
            .stroke_width(2)
            .build();
        RoundedRectangle::with_equal_corners(CARD_AREA, Size::new(10, 10))
            .into_styled(style)
            .draw(&mut self.target)?;

        let mut headline: String<24> = String::new();
        let _ = match card.units {
            Units::Metric => write!(headline, "{} {:.3}", card.axis.letter(), card.distance),
            Units::Imperial => write!(headline, "{} {:.4}", card.axis.letter(), card.distance),
        };
        self.text(&headline, Point::new(120, 124), &FONT_10X20, Rgb::WHITE)?;

        let mut rate: String<24> = String::new();
        let _ = match card.rate {
            RateSelection::Speed(speed) => write!(rate, "{} {}", speed.token(), card.units.label()),
            RateSelection::FeedRate(feed) => write!(rate, "FEED {}%", feed.percent()),
        };
        self.text(&rate, Point::new(120, 147), &FONT_6X10, Rgb::WHITE)?;
        self.text(card.profile, Point::new(120, 161), &FONT_6X10, card.accent)
    }

    fn draw_position(&mut self, readout: &PositionReadout) -> Result<(), Self::Error> {
        self.fill(POSITION_AREA, self.background)?;

        let color = if readout.fresh {
            ink(self.background)
        } else {
            STALE
        };
        for (axis, y) in Axis::ALL.into_iter().zip(POSITION_ROWS) {
            let row = position_row(axis, readout.values[axis.index()]);
            self.text(&row, Point::new(110, y), &FONT_10X20, color)?;
        }

        self.dot(FRESH_DOT, if readout.fresh { FRESH } else { STALE })?;
        self.text(
            readout.frame.token(),
            Point::new(185, 82),
            &FONT_6X10,
            ink(self.background),
        )
    }

    fn draw_status(&mut self, status: &StatusView<'_>) -> Result<(), Self::Error> {
        self.fill(STATUS_AREA, self.background)?;

        let link = match (status.connected, status.heartbeat) {
            (true, true) if status.pulse => FRESH,
            (true, true) => PULSE_DIM,
            (true, false) => WAITING,
            (false, _) => STALE,
        };
        self.dot(PULSE_DOT, link)?;

        let color = ink(self.background);
        let mut line: String<24> = String::new();
        let arm = if status.armed { "ARMED" } else { "SAFE" };
        let _ = write!(line, "{} {}", arm, motion_label(status.motion));
        self.text(&line, Point::new(126, 190), &FONT_6X10, color)?;

        line.clear();
        let _ = write!(line, "{} {}", status.units.label(), status.wcs);
        self.text(&line, Point::new(120, 205), &FONT_6X10, color)
    }

    fn draw_estop(&mut self, fault: bool) -> Result<(), Self::Error> {
        let cause = if fault { "OPEN AT BOOT" } else { "ACTIVE" };
        self.overlay(Rgb::ALERT, "E-STOP", &[cause, "", "RELEASE TO RESUME"])
    }

    fn draw_help(&mut self, rate_mode: RateMode) -> Result<(), Self::Error> {
        let rate = match rate_mode {
            RateMode::Speed => "B2 TAP    SPEED",
            RateMode::FeedRate => "B2 TAP    FEED %",
        };
        self.overlay(
            Rgb::BLACK,
            "HELP",
            &[
                "B1 TAP    AXIS",
                "B1 HOLD   DISTANCE",
                rate,
                "B2 HOLD   WCS/MCS",
                "B1+B2     CLOSE",
            ],
        )
    }
}
