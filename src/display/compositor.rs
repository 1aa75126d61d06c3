//! Screen-level state and rate-limited panel redraws.
//!
//! The compositor owns the per-panel dirty flags and decides what to draw on
//! each loop iteration. Modal screens (boot, help, E-stop, off) are drawn
//! immediately by their `show_*`/`enter_*` methods and suppress panel
//! rendering until [`Compositor::resume_normal`].
//!
//! Priority inside [`Compositor::render`]:
//!
//! 1. pending full redraw (theme, profile, wake, leaving an overlay)
//! 2. card, if dirty
//! 3. position, if dirty, past its interval, and changed beyond epsilon
//! 4. status, if dirty or its refresh interval elapsed

use crate::config::DisplayConfig;
use crate::position::PositionReadout;
use crate::profile::RateMode;
use crate::theme::Theme;
use crate::traits::{CardView, PendantDisplay, StatusView};

use super::panel::Panel;

/// What currently owns the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Boot splash; replaced by the first render.
    Boot,
    /// Normal panels.
    Normal,
    /// Help overlay.
    Help,
    /// E-stop overlay.
    Estop,
    /// Cleared by the sleep countdown.
    Off,
}

/// Everything one render pass may draw.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Background theme.
    pub theme: &'a Theme,
    /// Center card.
    pub card: CardView,
    /// Position readout.
    pub position: PositionReadout,
    /// Status bar; `pulse` is overwritten by the compositor.
    pub status: StatusView<'a>,
}

/// Panel scheduler for the round screen.
#[derive(Clone, Debug)]
pub struct Compositor {
    screen: Screen,
    full_redraw: bool,
    card: Panel,
    position: Panel,
    status: Panel,
    last_position: Option<PositionReadout>,
    epsilon: f32,
    pulse: bool,
}

impl Compositor {
    /// Creates a compositor in the boot screen.
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            screen: Screen::Boot,
            full_redraw: true,
            card: Panel::new(),
            position: Panel::throttled(config.position_min_interval_ms),
            status: Panel::refreshing(config.status_refresh_ms),
            last_position: None,
            epsilon: config.position_epsilon,
            pulse: false,
        }
    }

    /// Current screen owner.
    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// True while a full redraw is pending.
    #[inline]
    pub fn full_redraw_pending(&self) -> bool {
        self.full_redraw
    }

    /// Draws the boot splash now.
    pub fn show_boot<D: PendantDisplay>(
        &mut self,
        display: &mut D,
        name: &str,
        version: &str,
    ) -> Result<(), D::Error> {
        self.screen = Screen::Boot;
        self.full_redraw = true;
        display.draw_boot(name, version)
    }

    /// Draws the E-stop overlay now. It stays until [`resume_normal`](Self::resume_normal).
    pub fn show_estop<D: PendantDisplay>(&mut self, display: &mut D, fault: bool) -> Result<(), D::Error> {
        self.screen = Screen::Estop;
        display.draw_estop(fault)
    }

    /// Draws the help overlay now.
    pub fn show_help<D: PendantDisplay>(
        &mut self,
        display: &mut D,
        rate_mode: RateMode,
    ) -> Result<(), D::Error> {
        self.screen = Screen::Help;
        display.draw_help(rate_mode)
    }

    /// Clears the screen for sleep.
    pub fn enter_sleep<D: PendantDisplay>(&mut self, display: &mut D) -> Result<(), D::Error> {
        self.screen = Screen::Off;
        display.clear()
    }

    /// Returns to normal panels; the next render repaints everything.
    pub fn resume_normal(&mut self) {
        self.screen = Screen::Normal;
        self.full_redraw = true;
    }

    /// Schedules a full repaint (theme or profile change).
    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Card content changed.
    pub fn mark_card(&mut self) {
        self.card.mark_dirty();
    }

    /// Position content may have changed.
    pub fn mark_position(&mut self) {
        self.position.mark_dirty();
    }

    /// Status content changed.
    pub fn mark_status(&mut self) {
        self.status.mark_dirty();
    }

    /// Draws whatever is due. No-op while a modal screen is up.
    pub fn render<D: PendantDisplay>(
        &mut self,
        now_ms: u64,
        frame: &Frame<'_>,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self.screen {
            Screen::Normal => {}
            Screen::Boot => {
                self.screen = Screen::Normal;
                self.full_redraw = true;
            }
            Screen::Help | Screen::Estop | Screen::Off => return Ok(()),
        }

        if self.full_redraw {
            return self.draw_all(now_ms, frame, display);
        }

        if self.card.maybe_redraw(now_ms) {
            let result = display.draw_card(&frame.card);
            self.retry_on_error(result)?;
        }

        if let Some(last) = self.last_position {
            if last.fresh != frame.position.fresh || last.frame != frame.position.frame {
                self.position.mark_dirty();
            }
        }
        if self.position.is_dirty() {
            let changed = self
                .last_position
                .map_or(true, |last| last.differs(&frame.position, self.epsilon));
            if !changed {
                self.position.settle();
            } else if self.position.maybe_redraw(now_ms) {
                let result = display.draw_position(&frame.position);
                self.retry_on_error(result)?;
                self.last_position = Some(frame.position);
            }
        }

        if self.status.maybe_redraw(now_ms) {
            self.pulse = !self.pulse;
            let status = StatusView {
                pulse: self.pulse,
                ..frame.status
            };
            let result = display.draw_status(&status);
            self.retry_on_error(result)?;
        }

        Ok(())
    }

    fn draw_all<D: PendantDisplay>(
        &mut self,
        now_ms: u64,
        frame: &Frame<'_>,
        display: &mut D,
    ) -> Result<(), D::Error> {
        self.pulse = !self.pulse;
        let status = StatusView {
            pulse: self.pulse,
            ..frame.status
        };

        display.draw_background(frame.theme, frame.card.accent)?;
        display.draw_card(&frame.card)?;
        display.draw_position(&frame.position)?;
        display.draw_status(&status)?;

        self.full_redraw = false;
        self.card.mark_drawn(now_ms);
        self.position.mark_drawn(now_ms);
        self.status.mark_drawn(now_ms);
        self.last_position = Some(frame.position);
        Ok(())
    }

    // A failed partial draw leaves the panel in an unknown state.
    fn retry_on_error<E>(&mut self, result: Result<(), E>) -> Result<(), E> {
        if result.is_err() {
            self.full_redraw = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{DisplayCall, MockDisplay};
    use crate::safety::MotionState;
    use crate::state::{Axis, CoordView, Speed, Units};
    use crate::theme::Rgb;
    use crate::traits::RateSelection;

    fn card() -> CardView {
        CardView {
            axis: Axis::Z,
            distance: 0.1,
            units: Units::Metric,
            rate: RateSelection::Speed(Speed::Medium),
            profile: "GENERIC",
            accent: Rgb::WHITE,
        }
    }

    fn position(x: f32, fresh: bool) -> PositionReadout {
        PositionReadout {
            values: [x, 0.0, 0.0],
            fresh,
            frame: CoordView::Work,
        }
    }

    fn status() -> StatusView<'static> {
        StatusView {
            connected: true,
            heartbeat: true,
            armed: false,
            motion: MotionState::Idle,
            units: Units::Metric,
            wcs: "G54",
            pulse: false,
        }
    }

    fn frame(theme: &Theme, x: f32, fresh: bool) -> Frame<'_> {
        Frame {
            theme,
            card: card(),
            position: position(x, fresh),
            status: status(),
        }
    }

    /// Compositor after its first full redraw at t=0, with the call log cleared.
    fn settled() -> (Compositor, MockDisplay, Theme) {
        let theme = Theme::default();
        let mut compositor = Compositor::new(&DisplayConfig::default());
        let mut display = MockDisplay::new();
        compositor.render(0, &frame(&theme, 0.0, true), &mut display).unwrap();
        display.calls.clear();
        (compositor, display, theme)
    }

    // =========================================================================
    // Full Redraw Tests
    // =========================================================================

    #[test]
    fn first_render_after_boot_is_full() {
        let theme = Theme::default();
        let mut compositor = Compositor::new(&DisplayConfig::default());
        let mut display = MockDisplay::new();
        compositor.show_boot(&mut display, "PENDANT", "1.0").unwrap();
        compositor.render(0, &frame(&theme, 0.0, true), &mut display).unwrap();

        assert_eq!(compositor.screen(), Screen::Normal);
        assert_eq!(display.count(DisplayCall::is_background), 1);
        assert_eq!(display.count(DisplayCall::is_card), 1);
        assert_eq!(display.count(DisplayCall::is_position), 1);
        assert_eq!(display.count(DisplayCall::is_status), 1);
    }

    #[test]
    fn full_redraw_wins_over_partials() {
        let (mut compositor, mut display, theme) = settled();
        compositor.mark_card();
        compositor.mark_position();
        compositor.request_full_redraw();
        compositor.render(10, &frame(&theme, 5.0, true), &mut display).unwrap();
        // Exactly one pass: background first, one of each panel
        assert!(display.calls[0].is_background());
        assert_eq!(display.count(DisplayCall::is_card), 1);
        assert_eq!(display.count(DisplayCall::is_position), 1);
        assert!(!compositor.full_redraw_pending());
    }

    #[test]
    fn idle_render_draws_nothing() {
        let (mut compositor, mut display, theme) = settled();
        compositor.render(100, &frame(&theme, 0.0, true), &mut display).unwrap();
        assert!(display.calls.is_empty());
    }

    // =========================================================================
    // Partial Redraw Tests
    // =========================================================================

    #[test]
    fn dirty_card_redraws_alone() {
        let (mut compositor, mut display, theme) = settled();
        compositor.mark_card();
        compositor.render(5, &frame(&theme, 0.0, true), &mut display).unwrap();
        assert_eq!(display.calls.len(), 1);
        assert!(display.calls[0].is_card());
    }

    #[test]
    fn position_respects_min_interval() {
        let (mut compositor, mut display, theme) = settled();
        compositor.mark_position();
        compositor.render(100, &frame(&theme, 1.0, true), &mut display).unwrap();
        assert_eq!(display.count(DisplayCall::is_position), 0);

        compositor.render(250, &frame(&theme, 1.0, true), &mut display).unwrap();
        assert_eq!(display.count(DisplayCall::is_position), 1);
    }

    #[test]
    fn position_below_epsilon_is_skipped() {
        let (mut compositor, mut display, theme) = settled();
        compositor.mark_position();
        compositor.render(300, &frame(&theme, 0.0001, true), &mut display).unwrap();
        assert_eq!(display.count(DisplayCall::is_position), 0);
    }

    #[test]
    fn freshness_flip_redraws_position() {
        let (mut compositor, mut display, theme) = settled();
        compositor.render(300, &frame(&theme, 0.0, false), &mut display).unwrap();
        assert_eq!(display.count(DisplayCall::is_position), 1);
    }

    #[test]
    fn status_refreshes_on_interval_and_pulses() {
        let (mut compositor, mut display, theme) = settled();
        compositor.render(999, &frame(&theme, 0.0, true), &mut display).unwrap();
        assert!(display.calls.is_empty());

        compositor.render(1000, &frame(&theme, 0.0, true), &mut display).unwrap();
        compositor.render(2000, &frame(&theme, 0.0, true), &mut display).unwrap();
        let pulses: Vec<bool> = display
            .calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Status { pulse, .. } => Some(*pulse),
                _ => None,
            })
            .collect();
        assert_eq!(pulses.len(), 2);
        assert_ne!(pulses[0], pulses[1]);
    }

    // =========================================================================
    // Overlay Tests
    // =========================================================================

    #[test]
    fn overlays_suppress_rendering() {
        let (mut compositor, mut display, theme) = settled();
        compositor.show_estop(&mut display, false).unwrap();
        compositor.mark_card();
        compositor.render(5000, &frame(&theme, 9.0, false), &mut display).unwrap();
        assert_eq!(display.calls, vec![DisplayCall::Estop { fault: false }]);

        compositor.resume_normal();
        compositor.render(5001, &frame(&theme, 9.0, false), &mut display).unwrap();
        assert!(display.calls[1].is_background());
    }

    #[test]
    fn help_overlay_drawn_immediately() {
        let (mut compositor, mut display, _theme) = settled();
        compositor.show_help(&mut display, RateMode::FeedRate).unwrap();
        assert_eq!(compositor.screen(), Screen::Help);
        assert_eq!(
            display.calls,
            vec![DisplayCall::Help {
                rate_mode: RateMode::FeedRate
            }]
        );
    }

    #[test]
    fn sleep_clears_and_wake_repaints() {
        let (mut compositor, mut display, theme) = settled();
        compositor.enter_sleep(&mut display).unwrap();
        assert_eq!(display.calls, vec![DisplayCall::Clear]);
        compositor.render(100, &frame(&theme, 0.0, true), &mut display).unwrap();
        assert_eq!(display.calls.len(), 1);

        compositor.resume_normal();
        compositor.render(200, &frame(&theme, 0.0, true), &mut display).unwrap();
        assert!(display.calls[1].is_background());
    }

    #[test]
    fn failed_partial_draw_schedules_full_redraw() {
        let (mut compositor, mut display, theme) = settled();
        display.fail_draws = true;
        compositor.mark_card();
        assert!(compositor.render(5, &frame(&theme, 0.0, true), &mut display).is_err());
        assert!(compositor.full_redraw_pending());
    }
}
