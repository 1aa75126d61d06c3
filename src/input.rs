//! Debounced digital inputs and button press classification.
//!
//! Three layers, each testable without hardware:
//!
//! - [`InputChannel`]: polarity + settle-window debounce for one pin
//! - [`Button`]: a small state machine that turns debounced edges into
//!   short/long [`PressEvent`]s on release
//! - [`ButtonPair`]: two buttons plus the both-held gesture
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::input::{Button, ChannelId, PressKind};
//!
//! let mut button = Button::new(ChannelId::Button1, 30, 2000);
//!
//! // Active low: false = pressed
//! assert!(button.update(false, 0).is_none());
//! assert!(button.update(false, 40).is_none()); // debounced press
//! assert!(button.update(true, 2100).is_none());
//! let event = button.update(true, 2140).unwrap(); // debounced release
//! assert_eq!(event.kind, PressKind::Long);
//! ```

use heapless::Vec;

/// Identity of a digital input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelId {
    /// Axis / jog-distance button.
    Button1,
    /// Speed / coordinate-view button.
    Button2,
    /// Power toggle switch.
    Toggle,
    /// Emergency stop switch.
    Estop,
}

/// A debounced level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Input became active at the given time.
    Activated {
        /// Time the raw level first changed (ms).
        at_ms: u64,
    },
    /// Input became inactive at the given time.
    Deactivated {
        /// Time the raw level first changed (ms).
        at_ms: u64,
    },
}

/// One debounced digital input.
///
/// A raw level must hold for `debounce_ms` of continuous agreement before
/// the stable state follows it. Any disagreement restarts the window, so a
/// bounce that never settles never produces an [`Edge`].
#[derive(Clone, Debug)]
pub struct InputChannel {
    id: ChannelId,
    active_low: bool,
    debounce_ms: u32,
    /// Last raw sample, already polarity-corrected.
    raw: bool,
    /// Debounced state.
    stable: bool,
    /// When `raw` last changed.
    last_edge_ms: u64,
}

impl InputChannel {
    /// Creates a channel that starts inactive.
    pub const fn new(id: ChannelId, active_low: bool, debounce_ms: u32) -> Self {
        Self {
            id,
            active_low,
            debounce_ms,
            raw: false,
            stable: false,
            last_edge_ms: 0,
        }
    }

    /// Seeds the channel with a boot-time level without producing an edge.
    pub fn preset(&mut self, level: bool, now_ms: u64) {
        let active = level != self.active_low;
        self.raw = active;
        self.stable = active;
        self.last_edge_ms = now_ms;
    }

    /// Feeds one raw pin level. Returns an edge once the new level has settled.
    pub fn update(&mut self, level: bool, now_ms: u64) -> Option<Edge> {
        let active = level != self.active_low;

        if active != self.raw {
            self.raw = active;
            self.last_edge_ms = now_ms;
            return None;
        }

        if active == self.stable {
            return None;
        }

        if now_ms.saturating_sub(self.last_edge_ms) < u64::from(self.debounce_ms) {
            return None;
        }

        self.stable = active;
        let at_ms = self.last_edge_ms;
        Some(if active {
            Edge::Activated { at_ms }
        } else {
            Edge::Deactivated { at_ms }
        })
    }

    /// Returns the debounced state (`true` = pressed / ON).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.stable
    }

    /// Returns the last raw sample, polarity-corrected but not debounced.
    #[inline]
    pub fn raw_active(&self) -> bool {
        self.raw
    }

    /// Returns which input this is.
    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

/// Classification of a completed press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PressKind {
    /// Released before the long-press threshold.
    Short,
    /// Held for at least the long-press threshold.
    Long,
}

/// Classifies a held duration. The boundary belongs to [`PressKind::Long`].
#[inline]
pub fn classify(duration_ms: u64, long_press_ms: u32) -> PressKind {
    if duration_ms >= u64::from(long_press_ms) {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// A completed button press, produced on the debounced release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressEvent {
    /// Which button.
    pub channel: ChannelId,
    /// When the press started (ms).
    pub started_ms: u64,
    /// How long it was held (ms).
    pub duration_ms: u64,
    /// Short or long.
    pub kind: PressKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ButtonPhase {
    Idle,
    Pressed { since_ms: u64 },
    /// Claimed by a gesture; the release produces nothing.
    Consumed,
}

/// Debounced push button with short/long classification.
#[derive(Clone, Debug)]
pub struct Button {
    channel: InputChannel,
    long_press_ms: u32,
    phase: ButtonPhase,
}

impl Button {
    /// Creates an active-low button.
    pub const fn new(id: ChannelId, debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            channel: InputChannel::new(id, true, debounce_ms),
            long_press_ms,
            phase: ButtonPhase::Idle,
        }
    }

    /// Feeds one raw pin level.
    pub fn update(&mut self, level: bool, now_ms: u64) -> Option<PressEvent> {
        match self.channel.update(level, now_ms)? {
            Edge::Activated { at_ms } => {
                self.phase = ButtonPhase::Pressed { since_ms: at_ms };
                None
            }
            Edge::Deactivated { at_ms } => {
                let phase = core::mem::replace(&mut self.phase, ButtonPhase::Idle);
                match phase {
                    ButtonPhase::Pressed { since_ms } => {
                        let duration_ms = at_ms.saturating_sub(since_ms);
                        Some(PressEvent {
                            channel: self.channel.id(),
                            started_ms: since_ms,
                            duration_ms,
                            kind: classify(duration_ms, self.long_press_ms),
                        })
                    }
                    ButtonPhase::Idle | ButtonPhase::Consumed => None,
                }
            }
        }
    }

    /// Returns the press start time while the button is held and unclaimed.
    pub fn held_since(&self) -> Option<u64> {
        match self.phase {
            ButtonPhase::Pressed { since_ms } => Some(since_ms),
            _ => None,
        }
    }

    /// Claims the current press so its release is swallowed.
    pub fn consume(&mut self) {
        if matches!(self.phase, ButtonPhase::Pressed { .. }) {
            self.phase = ButtonPhase::Consumed;
        }
    }

    /// Returns the debounced pressed state.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.channel.is_active()
    }

    /// Returns the long-press threshold.
    #[inline]
    pub fn long_press_ms(&self) -> u32 {
        self.long_press_ms
    }
}

/// Output of [`ButtonPair::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// A single button was pressed and released.
    Press(PressEvent),
    /// Both buttons have been held together past the gesture threshold.
    BothHeld,
}

/// Button 1 and button 2, plus the both-held gesture.
///
/// The gesture fires once while both are still down; both presses are then
/// consumed so neither release produces a short/long event.
#[derive(Clone, Debug)]
pub struct ButtonPair {
    first: Button,
    second: Button,
    both_hold_ms: u32,
}

impl ButtonPair {
    /// Creates the pair from two buttons and the gesture threshold.
    pub const fn new(first: Button, second: Button, both_hold_ms: u32) -> Self {
        Self {
            first,
            second,
            both_hold_ms,
        }
    }

    /// Feeds raw levels for both buttons.
    pub fn update(&mut self, first: bool, second: bool, now_ms: u64) -> Vec<ButtonEvent, 3> {
        let mut events = Vec::new();

        if let Some(press) = self.first.update(first, now_ms) {
            let _ = events.push(ButtonEvent::Press(press));
        }
        if let Some(press) = self.second.update(second, now_ms) {
            let _ = events.push(ButtonEvent::Press(press));
        }

        if let (Some(a), Some(b)) = (self.first.held_since(), self.second.held_since()) {
            let together_since = a.max(b);
            if now_ms.saturating_sub(together_since) >= u64::from(self.both_hold_ms) {
                self.first.consume();
                self.second.consume();
                let _ = events.push(ButtonEvent::BothHeld);
            }
        }

        events
    }

    /// Button 1.
    pub fn first(&self) -> &Button {
        &self.first
    }

    /// Button 2.
    pub fn second(&self) -> &Button {
        &self.second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: u32 = 30;

    fn press_release(button: &mut Button, start: u64, hold: u64) -> Option<PressEvent> {
        // Press, let it settle, release, let it settle.
        assert!(button.update(false, start).is_none());
        assert!(button.update(false, start + u64::from(DEBOUNCE)).is_none());
        assert!(button.update(true, start + hold).is_none());
        button.update(true, start + hold + u64::from(DEBOUNCE))
    }

    // =========================================================================
    // InputChannel Tests
    // =========================================================================

    #[test]
    fn channel_starts_inactive() {
        let channel = InputChannel::new(ChannelId::Button1, true, DEBOUNCE);
        assert!(!channel.is_active());
        assert_eq!(channel.id(), ChannelId::Button1);
    }

    #[test]
    fn channel_active_low_polarity() {
        let mut channel = InputChannel::new(ChannelId::Estop, true, DEBOUNCE);
        channel.update(false, 0);
        assert_eq!(
            channel.update(false, 30),
            Some(Edge::Activated { at_ms: 0 })
        );
        assert!(channel.is_active());
    }

    #[test]
    fn channel_active_high_polarity() {
        let mut channel = InputChannel::new(ChannelId::Toggle, false, DEBOUNCE);
        channel.update(true, 0);
        assert_eq!(channel.update(true, 30), Some(Edge::Activated { at_ms: 0 }));
    }

    #[test]
    fn channel_requires_full_window() {
        let mut channel = InputChannel::new(ChannelId::Button1, true, DEBOUNCE);
        assert!(channel.update(false, 100).is_none());
        assert!(channel.update(false, 129).is_none());
        assert!(channel.update(false, 130).is_some());
        // Only one edge per transition
        assert!(channel.update(false, 200).is_none());
    }

    #[test]
    fn raw_level_leads_debounced_state() {
        let mut channel = InputChannel::new(ChannelId::Estop, true, DEBOUNCE);
        channel.preset(true, 0);
        channel.update(false, 10);
        assert!(channel.raw_active());
        assert!(!channel.is_active());

        channel.update(false, 40);
        channel.update(true, 50);
        assert!(!channel.raw_active());
        assert!(channel.is_active());
    }

    #[test]
    fn channel_bounce_never_emits() {
        let mut channel = InputChannel::new(ChannelId::Button1, true, DEBOUNCE);
        // Toggle every 10ms for a full second: never stable for 30ms
        for i in 0..100u64 {
            let level = i % 2 == 0;
            assert!(channel.update(level, i * 10).is_none());
        }
        assert!(!channel.is_active());
    }

    #[test]
    fn channel_bounce_then_settle_emits_once() {
        let mut channel = InputChannel::new(ChannelId::Button1, true, DEBOUNCE);
        for (t, level) in [(0, false), (5, true), (9, false), (14, true), (20, false)] {
            assert!(channel.update(level, t).is_none());
        }
        // Settles low from t=20
        assert!(channel.update(false, 45).is_none());
        assert_eq!(
            channel.update(false, 50),
            Some(Edge::Activated { at_ms: 20 })
        );
    }

    #[test]
    fn channel_preset_sets_state_without_edge() {
        let mut channel = InputChannel::new(ChannelId::Estop, true, DEBOUNCE);
        channel.preset(false, 0);
        assert!(channel.is_active());
        assert!(channel.update(false, 100).is_none());
    }

    // =========================================================================
    // Classification Tests
    // =========================================================================

    #[test]
    fn classify_boundary_is_long() {
        assert_eq!(classify(1999, 2000), PressKind::Short);
        assert_eq!(classify(2000, 2000), PressKind::Long);
        assert_eq!(classify(2001, 2000), PressKind::Long);
    }

    #[test]
    fn classify_all_durations_around_threshold() {
        for threshold in [1000u32, 1500, 2000] {
            for d in 0..3000u64 {
                let expected = if d >= u64::from(threshold) {
                    PressKind::Long
                } else {
                    PressKind::Short
                };
                assert_eq!(classify(d, threshold), expected);
            }
        }
    }

    // =========================================================================
    // Button Tests
    // =========================================================================

    #[test]
    fn button_short_press() {
        let mut button = Button::new(ChannelId::Button1, DEBOUNCE, 2000);
        let event = press_release(&mut button, 0, 300).unwrap();
        assert_eq!(event.kind, PressKind::Short);
        assert_eq!(event.channel, ChannelId::Button1);
        assert_eq!(event.duration_ms, 300);
    }

    #[test]
    fn button_long_press_2100ms() {
        let mut button = Button::new(ChannelId::Button1, DEBOUNCE, 2000);
        let event = press_release(&mut button, 1000, 2100).unwrap();
        assert_eq!(event.kind, PressKind::Long);
        assert_eq!(event.started_ms, 1000);
        assert_eq!(event.duration_ms, 2100);
    }

    #[test]
    fn button_nothing_while_held() {
        let mut button = Button::new(ChannelId::Button2, DEBOUNCE, 1000);
        button.update(false, 0);
        for t in (10..5000).step_by(10) {
            assert!(button.update(false, t).is_none());
        }
        assert_eq!(button.held_since(), Some(0));
        assert!(button.is_pressed());
    }

    #[test]
    fn button_bounce_shorter_than_window_no_event() {
        let mut button = Button::new(ChannelId::Button1, DEBOUNCE, 2000);
        // A 20ms blip is shorter than the settle window
        assert!(button.update(false, 0).is_none());
        assert!(button.update(false, 20).is_none());
        assert!(button.update(true, 21).is_none());
        assert!(button.update(true, 100).is_none());
        assert!(button.update(true, 200).is_none());
        assert!(!button.is_pressed());
    }

    #[test]
    fn button_consumed_release_is_silent() {
        let mut button = Button::new(ChannelId::Button1, DEBOUNCE, 2000);
        button.update(false, 0);
        button.update(false, 30);
        button.consume();
        assert!(button.held_since().is_none());
        button.update(true, 500);
        assert!(button.update(true, 530).is_none());
        // Next press works normally
        assert!(press_release(&mut button, 1000, 100).is_some());
    }

    // =========================================================================
    // ButtonPair Tests
    // =========================================================================

    fn pair() -> ButtonPair {
        ButtonPair::new(
            Button::new(ChannelId::Button1, DEBOUNCE, 2000),
            Button::new(ChannelId::Button2, DEBOUNCE, 1000),
            1500,
        )
    }

    #[test]
    fn pair_single_presses_pass_through() {
        let mut pair = pair();
        pair.update(false, true, 0);
        pair.update(false, true, 30);
        pair.update(true, true, 200);
        let events = pair.update(true, true, 230);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ButtonEvent::Press(PressEvent {
                channel: ChannelId::Button1,
                kind: PressKind::Short,
                ..
            })
        ));
    }

    #[test]
    fn pair_both_held_fires_once_and_swallows_releases() {
        let mut pair = pair();
        pair.update(false, false, 0);
        pair.update(false, false, 30);

        let mut gestures = 0;
        for t in (40..3000).step_by(10) {
            for e in pair.update(false, false, t) {
                assert_eq!(e, ButtonEvent::BothHeld);
                gestures += 1;
            }
        }
        assert_eq!(gestures, 1);

        // Releasing both produces nothing
        pair.update(true, true, 3000);
        assert!(pair.update(true, true, 3030).is_empty());
        assert!(!pair.first().is_pressed());
        assert!(!pair.second().is_pressed());
    }

    #[test]
    fn pair_gesture_measured_from_second_press() {
        let mut pair = pair();
        pair.update(false, true, 0);
        pair.update(false, true, 30);
        // Button 2 joins at t=1000
        pair.update(false, false, 1000);
        pair.update(false, false, 1030);
        assert!(pair.update(false, false, 2499).is_empty());
        assert_eq!(
            pair.update(false, false, 2500).as_slice(),
            &[ButtonEvent::BothHeld]
        );
    }

    #[test]
    fn pair_overlap_shorter_than_gesture_keeps_individual_events() {
        let mut pair = pair();
        pair.update(false, false, 0);
        pair.update(false, false, 30);
        // Release button 2 after 500ms of overlap
        pair.update(false, true, 500);
        let events = pair.update(false, true, 530);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ButtonEvent::Press(PressEvent {
                channel: ChannelId::Button2,
                ..
            })
        ));
    }
}
