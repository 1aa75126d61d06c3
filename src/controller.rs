//! The pendant control loop.
//!
//! [`PendantController`] owns the device state ([`PendantContext`]), the input
//! state machines, the compositor, and the two hardware links. The firmware
//! calls [`PendantController::tick`] every few milliseconds with freshly
//! sampled inputs and the encoder ticks taken from the ISR counter.
//!
//! Each tick runs, in order:
//!
//! 1. E-stop debounce; assert/release handled before anything else
//! 2. inbound host lines (bounded per tick)
//! 3. button classification → mode changes → echoes
//! 4. encoder scaling → safety gate → jog lines
//! 5. toggle → sleep countdown
//! 6. rate-limited rendering
//!
//! Serial and display failures never stop the tick. The first one is returned
//! once the tick finishes, so a broken screen cannot suppress an E-stop line
//! and a broken link cannot suppress the overlay.

use log::{debug, info, warn};

use crate::config::PendantConfig;
use crate::display::{Compositor, Frame};
use crate::encoder::JogScaler;
use crate::input::{Button, ButtonPair, ChannelId, Edge, InputChannel};
use crate::position::PositionTracker;
use crate::power::{PowerManager, PowerTransition};
use crate::profile::{MachineProfile, RateMode};
use crate::protocol::{self, EstopEvent, HostMessage, Outbound};
use crate::safety::{BlockReason, EstopState, SafetyGate};
use crate::state::{ModeChange, PendantState, UiView};
use crate::theme::Theme;
use crate::traits::{CardView, PendantDisplay, RateSelection, RawInputs, SerialLink, StatusView};

/// Error surfaced by a controller operation.
#[derive(Debug, thiserror::Error)]
pub enum PendantError<S, D> {
    /// Writing to the serial link failed.
    #[error("serial link error: {0:?}")]
    Serial(S),
    /// Drawing failed.
    #[error("display error: {0:?}")]
    Display(D),
}

/// Result alias for controller operations.
pub type PendantResult<S, D> = Result<(), PendantError<S, D>>;

/// All mutable device state, in one place.
#[derive(Clone, Debug)]
pub struct PendantContext {
    /// Operator and host selections.
    pub state: PendantState,
    /// Arming, heartbeat, motion, E-stop.
    pub safety: SafetyGate,
    /// Raw tick → jog step conversion.
    pub scaler: JogScaler,
    /// Host snapshots and dead reckoning.
    pub position: PositionTracker,
    /// Host-selected background.
    pub theme: Theme,
    /// Host application connected (`SOFTWARE:`).
    pub connected: bool,
    /// Screen sleep state.
    pub power: PowerManager,
}

impl PendantContext {
    /// Builds the boot-time context from configuration.
    pub fn new(config: &PendantConfig) -> Self {
        Self {
            state: PendantState::default(),
            safety: SafetyGate::new(config.safety.heartbeat_timeout_ms),
            scaler: JogScaler::new(config.encoder.scale),
            position: PositionTracker::new(config.display.stale_after_ms),
            theme: Theme::default(),
            connected: false,
            power: PowerManager::new(config.power.sleep_countdown_ms),
        }
    }

    fn card_view(&self) -> CardView {
        let spec = self.state.profile.spec();
        CardView {
            axis: self.state.axis,
            distance: self.state.jog_length(),
            units: self.state.units,
            rate: match spec.rate_mode {
                RateMode::Speed => RateSelection::Speed(self.state.speed),
                RateMode::FeedRate => RateSelection::FeedRate(self.state.feed_rate),
            },
            profile: spec.name,
            accent: spec.accent,
        }
    }

    fn status_view(&self, now_ms: u64) -> StatusView<'_> {
        StatusView {
            connected: self.connected,
            heartbeat: self.safety.heartbeat_fresh(now_ms),
            armed: self.safety.is_armed(),
            motion: self.safety.motion_state(),
            units: self.state.units,
            wcs: self.state.active_wcs.as_str(),
            pulse: false,
        }
    }

    fn rate_echo(&self) -> Outbound {
        match self.state.profile.spec().rate_mode {
            RateMode::Speed => Outbound::Speed(self.state.speed),
            RateMode::FeedRate => Outbound::FeedRate(self.state.feed_rate),
        }
    }
}

/// The pendant firmware, minus the hardware loop around it.
pub struct PendantController<S: SerialLink, D: PendantDisplay> {
    config: PendantConfig,
    ctx: PendantContext,
    buttons: ButtonPair,
    estop: InputChannel,
    toggle: InputChannel,
    compositor: Compositor,
    serial: S,
    display: D,
    last_blocked_notice_ms: Option<u64>,
    error: Option<PendantError<S::Error, D::Error>>,
}

impl<S: SerialLink, D: PendantDisplay> PendantController<S, D> {
    /// Creates a controller. Call [`start`](Self::start) before the first tick.
    pub fn new(config: PendantConfig, serial: S, display: D) -> Self {
        let input = &config.input;
        let buttons = ButtonPair::new(
            Button::new(ChannelId::Button1, input.debounce_ms, input.axis_long_press_ms),
            Button::new(ChannelId::Button2, input.debounce_ms, input.rate_long_press_ms),
            input.help_hold_ms,
        );
        Self {
            ctx: PendantContext::new(&config),
            buttons,
            estop: InputChannel::new(ChannelId::Estop, true, input.debounce_ms),
            toggle: InputChannel::new(ChannelId::Toggle, true, input.debounce_ms),
            compositor: Compositor::new(&config.display),
            serial,
            display,
            last_blocked_notice_ms: None,
            error: None,
            config,
        }
    }

    /// Boot sequence: init display, splash, seed switch levels, announce readiness.
    ///
    /// An E-stop already open at boot is reported as a fault and locks the pendant
    /// until it is released.
    pub fn start(&mut self, now_ms: u64, raw: RawInputs) -> PendantResult<S::Error, D::Error> {
        if let Err(e) = self.display.init() {
            self.note(PendantError::Display(e));
        }
        let device = &self.config.device;
        info!("{} {} starting", device.name, device.version);
        let boot = self
            .compositor
            .show_boot(&mut self.display, &device.name, &device.version);
        if let Err(e) = boot {
            self.note(PendantError::Display(e));
        }

        self.estop.preset(raw.estop, now_ms);
        self.toggle.preset(raw.toggle, now_ms);
        self.send(Outbound::Ready);

        if self.estop.is_active() {
            warn!("E-stop open at boot");
            self.estop_asserted(true);
        }

        self.finish()
    }

    /// Runs one loop iteration.
    pub fn tick(
        &mut self,
        now_ms: u64,
        raw: RawInputs,
        encoder_ticks: i32,
    ) -> PendantResult<S::Error, D::Error> {
        self.handle_estop(now_ms, raw.estop);
        self.drain_inbound(now_ms);
        self.handle_buttons(now_ms, raw.button1, raw.button2);
        self.handle_encoder(now_ms, encoder_ticks);
        self.handle_power(now_ms, raw.toggle);
        self.render(now_ms);
        self.finish()
    }

    // ========================================================================
    // E-stop
    // ========================================================================

    fn handle_estop(&mut self, now_ms: u64, level: bool) {
        match self.estop.update(level, now_ms) {
            Some(Edge::Activated { .. }) => self.estop_asserted(false),
            Some(Edge::Deactivated { .. }) => self.estop_released(),
            None => {}
        }
    }

    fn estop_asserted(&mut self, fault: bool) {
        let state = if fault {
            EstopState::Fault
        } else {
            EstopState::Pressed
        };
        self.ctx.safety.set_estop(state);
        self.ctx.scaler.reset_remainder();
        self.ctx.state.dismiss_help();
        self.ctx.power.suspend();
        info!("E-stop activated ({:?})", state);

        let dialect = self.ctx.state.profile.spec().dialect;
        self.send(Outbound::Stop(dialect));
        self.send(Outbound::Estop(EstopEvent::Activated));

        if let Err(e) = self.compositor.show_estop(&mut self.display, fault) {
            self.note(PendantError::Display(e));
        }
    }

    fn estop_released(&mut self) {
        self.ctx.safety.set_estop(EstopState::Released);
        info!("E-stop released");
        self.send(Outbound::Estop(EstopEvent::Released));
        self.compositor.resume_normal();
    }

    // ========================================================================
    // Host lines
    // ========================================================================

    fn drain_inbound(&mut self, now_ms: u64) {
        for _ in 0..self.config.serial.max_lines_per_tick {
            let Some(line) = self.serial.read_line() else {
                break;
            };
            debug!("<- {}", line);
            match protocol::parse(&line) {
                Some(message) => self.apply_host(now_ms, message),
                None => self.detect_profile(&line),
            }
        }
    }

    fn apply_host(&mut self, now_ms: u64, message: HostMessage) {
        match message {
            HostMessage::Solid(rgb) => {
                if self.ctx.theme.apply_solid(rgb) {
                    self.compositor.request_full_redraw();
                }
            }
            HostMessage::Wheel(hue) => {
                if self.ctx.theme.apply_wheel(hue) {
                    self.compositor.request_full_redraw();
                }
            }
            HostMessage::Machine(profile) => {
                self.ctx.state.profile_explicit = true;
                self.set_profile(profile);
            }
            HostMessage::Units(units) => {
                self.ctx.state.units = units;
                self.compositor.mark_card();
                self.compositor.mark_status();
            }
            HostMessage::Software(connected) => {
                self.ctx.connected = connected;
                if !connected {
                    self.ctx.safety.disarm();
                }
                self.compositor.mark_status();
            }
            HostMessage::Arm(armed) => {
                if armed {
                    self.ctx.safety.arm();
                } else {
                    self.ctx.safety.disarm();
                }
                self.compositor.mark_status();
            }
            HostMessage::Ping => {
                self.ctx.safety.heartbeat(now_ms);
                self.send(Outbound::Pong);
            }
            HostMessage::Hello => {
                self.ctx.safety.heartbeat(now_ms);
                self.send_hello_reply();
            }
            HostMessage::Motion(motion) => {
                self.ctx.safety.set_motion_state(motion);
                self.compositor.mark_status();
            }
            HostMessage::CoordView(view) => {
                self.ctx.state.lock_view(view);
                self.compositor.mark_position();
            }
            HostMessage::CoordUnlock => self.ctx.state.unlock_view(),
            HostMessage::CoordActive(label) => {
                self.ctx.state.active_wcs = label;
                self.compositor.mark_status();
                self.compositor.mark_position();
            }
            HostMessage::Position { frame, values } => {
                if self.ctx.position.apply_snapshot(frame, values, now_ms) {
                    self.compositor.mark_position();
                }
            }
            HostMessage::Offset { slot, values } => {
                self.ctx.position.apply_offset(slot, values);
                self.compositor.mark_position();
            }
            HostMessage::EncoderScale(scale) => {
                if self.ctx.scaler.set_scale(scale) {
                    debug!("encoder scale {}", scale);
                } else {
                    warn!("encoder scale {} out of range", scale);
                }
            }
        }
    }

    fn send_hello_reply(&mut self) {
        let state = &self.ctx.state;
        let echoes = [
            Outbound::Ready,
            Outbound::Machine(state.profile),
            Outbound::Axis(state.axis),
            Outbound::Distance(state.jog_length(), state.units),
            self.ctx.rate_echo(),
            Outbound::CoordView(state.coord_view),
        ];
        for echo in echoes {
            self.send(echo);
        }
    }

    fn detect_profile(&mut self, line: &str) {
        let state = &self.ctx.state;
        if state.profile_explicit || state.profile != MachineProfile::default() {
            return;
        }
        if let Some(profile) = MachineProfile::detect(line) {
            self.set_profile(profile);
            self.send(Outbound::Machine(profile));
        }
    }

    fn set_profile(&mut self, profile: MachineProfile) {
        if self.ctx.state.profile == profile {
            return;
        }
        info!("machine profile {}", profile.name());
        self.ctx.state.profile = profile;
        self.compositor.request_full_redraw();
    }

    // ========================================================================
    // Buttons
    // ========================================================================

    fn handle_buttons(&mut self, now_ms: u64, button1: bool, button2: bool) {
        let events = self.buttons.update(button1, button2, now_ms);
        for event in events {
            if self.ctx.safety.is_locked() {
                debug!("button ignored under E-stop: {:?}", event);
                continue;
            }
            if self.ctx.power.is_sleeping() {
                debug!("button ignored while asleep: {:?}", event);
                continue;
            }
            let change = self.ctx.state.apply_button(event);
            self.apply_mode_change(change);
        }
    }

    fn apply_mode_change(&mut self, change: ModeChange) {
        match change {
            ModeChange::Axis(axis) => {
                self.send(Outbound::Axis(axis));
                self.compositor.mark_card();
            }
            ModeChange::Distance(level) => {
                let state = &self.ctx.state;
                let echo = Outbound::Distance(state.jog_length(), state.units);
                let shortcut = state.profile.spec().distance_shortcuts;
                self.send(echo);
                if shortcut {
                    self.send(Outbound::DistanceShortcut(level));
                }
                self.compositor.mark_card();
            }
            ModeChange::Speed(speed) => {
                self.send(Outbound::Speed(speed));
                self.compositor.mark_card();
            }
            ModeChange::FeedRate(rate) => {
                self.send(Outbound::FeedRate(rate));
                self.compositor.mark_card();
            }
            ModeChange::CoordView(view) => {
                self.send(Outbound::CoordView(view));
                self.compositor.mark_position();
            }
            ModeChange::Help(UiView::Help) => {
                let rate_mode = self.ctx.state.profile.spec().rate_mode;
                if let Err(e) = self.compositor.show_help(&mut self.display, rate_mode) {
                    self.note(PendantError::Display(e));
                }
            }
            ModeChange::Help(UiView::Normal) => self.compositor.resume_normal(),
            ModeChange::Ignored => {}
        }
    }

    // ========================================================================
    // Encoder
    // ========================================================================

    // An open contact blocks motion from the first raw sample; the debounced
    // edge only drives the protocol and the overlay.
    fn motion_gate(&self, now_ms: u64) -> Result<(), BlockReason> {
        if self.estop.raw_active() {
            return Err(BlockReason::EstopActive);
        }
        self.ctx.safety.check(now_ms)
    }

    fn handle_encoder(&mut self, now_ms: u64, ticks: i32) {
        if ticks == 0 {
            if self.ctx.scaler.remainder() != 0 && self.motion_gate(now_ms).is_err() {
                self.ctx.scaler.reset_remainder();
            }
            return;
        }
        let steps = self.ctx.scaler.feed(ticks);

        if let Err(reason) = self.motion_gate(now_ms) {
            self.ctx.scaler.reset_remainder();
            if steps != 0 {
                self.notify_blocked(now_ms, reason);
            }
            return;
        }
        if steps == 0 {
            return;
        }

        let state = &self.ctx.state;
        let axis = state.axis;
        let length = state.jog_length();
        let distance = if steps > 0 { length } else { -length };
        let jog = Outbound::Jog {
            dialect: state.profile.spec().dialect,
            axis,
            distance,
            feed: state.jog_feed(),
            units: state.units,
        };
        for _ in 0..steps.unsigned_abs() {
            self.send(jog);
            self.ctx.position.record_jog(axis, distance);
        }
        self.compositor.mark_position();
    }

    fn notify_blocked(&mut self, now_ms: u64, reason: BlockReason) {
        let interval = u64::from(self.config.safety.blocked_notice_interval_ms);
        let due = self
            .last_blocked_notice_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= interval);
        if !due {
            return;
        }
        warn!("jog blocked: {:?}", reason);
        self.last_blocked_notice_ms = Some(now_ms);
        self.send(Outbound::Estop(EstopEvent::MotionBlocked));
    }

    // ========================================================================
    // Power and rendering
    // ========================================================================

    fn handle_power(&mut self, now_ms: u64, level: bool) {
        self.toggle.update(level, now_ms);
        let toggle_on = self.toggle.is_active();
        let locked = self.ctx.safety.is_locked();

        match self.ctx.power.update(toggle_on, locked, now_ms) {
            Some(PowerTransition::Slept) => {
                info!("display sleeping");
                self.ctx.state.dismiss_help();
                if let Err(e) = self.compositor.enter_sleep(&mut self.display) {
                    self.note(PendantError::Display(e));
                }
            }
            Some(PowerTransition::Woke) => {
                info!("display awake");
                self.compositor.resume_normal();
            }
            Some(transition) => debug!("power: {:?}", transition),
            None => {}
        }
    }

    fn render(&mut self, now_ms: u64) {
        let ctx = &self.ctx;
        let frame = Frame {
            theme: &ctx.theme,
            card: ctx.card_view(),
            position: ctx
                .position
                .readout(ctx.state.coord_view, &ctx.state.active_wcs, now_ms),
            status: ctx.status_view(now_ms),
        };
        if let Err(e) = self.compositor.render(now_ms, &frame, &mut self.display) {
            self.note(PendantError::Display(e));
        }
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn send(&mut self, message: Outbound) {
        let line = match message.to_line() {
            Ok(line) => line,
            Err(_) => {
                warn!("outbound line too long: {:?}", message);
                return;
            }
        };
        debug!("-> {}", line);
        if let Err(e) = self.serial.write_line(&line) {
            warn!("serial write dropped: {:?}", e);
            self.note(PendantError::Serial(e));
        }
    }

    fn note(&mut self, error: PendantError<S::Error, D::Error>) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn finish(&mut self) -> PendantResult<S::Error, D::Error> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Device state.
    pub fn context(&self) -> &PendantContext {
        &self.ctx
    }

    /// Compositor (screen owner and pending redraws).
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Serial link.
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Serial link, mutable.
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Display, mutable.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Configuration in use.
    pub fn config(&self) -> &PendantConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{DisplayCall, MockDisplay, MockInputs, MockSerial};
    use crate::state::Axis;
    use crate::traits::PendantInputs;

    type Pendant = PendantController<MockSerial, MockDisplay>;

    fn started() -> Pendant {
        let mut pendant = Pendant::new(PendantConfig::default(), MockSerial::new(), MockDisplay::new());
        pendant.start(0, RawInputs::IDLE).unwrap();
        pendant.serial_mut().sent.clear();
        pendant
    }

    fn host(pendant: &mut Pendant, now: u64, lines: &[&str]) {
        for line in lines {
            pendant.serial_mut().push_line(line);
        }
        pendant.tick(now, RawInputs::IDLE, 0).unwrap();
    }

    fn armed() -> Pendant {
        let mut pendant = started();
        host(&mut pendant, 0, &["ARM:ENABLE", "HOST:PING"]);
        pendant.serial_mut().sent.clear();
        pendant
    }

    // =========================================================================
    // Boot Tests
    // =========================================================================

    #[test]
    fn start_announces_ready() {
        let mut pendant = Pendant::new(PendantConfig::default(), MockSerial::new(), MockDisplay::new());
        pendant.start(0, RawInputs::IDLE).unwrap();
        assert_eq!(pendant.serial().sent_lines(), ["PENDANT:READY"]);
        assert_eq!(pendant.display().calls[0], DisplayCall::Init);
        assert!(matches!(pendant.display().calls[1], DisplayCall::Boot { .. }));
    }

    #[test]
    fn estop_open_at_boot_is_fault() {
        let mut inputs = MockInputs::new();
        inputs.press_estop();
        let mut pendant = Pendant::new(PendantConfig::default(), MockSerial::new(), MockDisplay::new());
        pendant.start(0, inputs.sample()).unwrap();

        assert_eq!(pendant.context().safety.estop(), EstopState::Fault);
        assert!(pendant.context().safety.is_locked());
        assert_eq!(
            pendant.serial().sent_lines(),
            ["PENDANT:READY", "JOG:STOP", "ESTOP:EMERGENCY_STOP_ACTIVATED"]
        );
        assert_eq!(pendant.display().last(), Some(&DisplayCall::Estop { fault: true }));
    }

    // =========================================================================
    // Host Line Tests
    // =========================================================================

    #[test]
    fn ping_replies_in_same_tick() {
        let mut pendant = started();
        host(&mut pendant, 10, &["HOST:PING"]);
        assert_eq!(pendant.serial().sent_lines(), ["HOST:PONG"]);
        assert!(pendant.context().safety.heartbeat_fresh(10));
    }

    #[test]
    fn hello_echoes_selections() {
        let mut pendant = started();
        host(&mut pendant, 10, &["HOST:HELLO"]);
        assert_eq!(
            pendant.serial().sent_lines(),
            [
                "PENDANT:READY",
                "MACHINE:GENERIC",
                "AXIS:Z",
                "DISTANCE:0.100",
                "SPEED:MEDIUM",
                "COORD:VIEW,WCS",
            ]
        );
    }

    #[test]
    fn disconnect_disarms() {
        let mut pendant = armed();
        host(&mut pendant, 10, &["SOFTWARE:CONNECTED"]);
        assert!(pendant.context().connected);
        host(&mut pendant, 20, &["SOFTWARE:DISCONNECTED"]);
        assert!(!pendant.context().connected);
        assert!(!pendant.context().safety.is_armed());
    }

    #[test]
    fn inbound_lines_bounded_per_tick() {
        let mut pendant = started();
        for _ in 0..20 {
            pendant.serial_mut().push_line("HOST:PING");
        }
        pendant.tick(10, RawInputs::IDLE, 0).unwrap();
        assert_eq!(pendant.serial().sent.len(), 8);
        assert_eq!(pendant.serial().inbox.len(), 12);
    }

    #[test]
    fn heuristic_detection_only_for_default_profile() {
        let mut pendant = started();
        host(&mut pendant, 10, &["Grbl 1.1h ['$' for help]"]);
        assert_eq!(pendant.context().state.profile, MachineProfile::Grbl);
        assert_eq!(pendant.serial().sent_lines(), ["MACHINE:GRBL"]);

        // Once detected, later hints are ignored
        host(&mut pendant, 20, &["Mach3 ready"]);
        assert_eq!(pendant.context().state.profile, MachineProfile::Grbl);
    }

    #[test]
    fn explicit_profile_beats_heuristics() {
        let mut pendant = started();
        host(&mut pendant, 10, &["MACHINE:GENERIC", "ok"]);
        assert_eq!(pendant.context().state.profile, MachineProfile::Generic);
        assert!(pendant.context().state.profile_explicit);
    }

    #[test]
    fn encoder_scale_out_of_range_ignored() {
        let mut pendant = started();
        host(&mut pendant, 10, &["ENCODER:SCALE,11"]);
        assert_eq!(pendant.context().scaler.scale(), 2);
        host(&mut pendant, 20, &["ENCODER:SCALE,7"]);
        assert_eq!(pendant.context().scaler.scale(), 7);
    }

    #[test]
    fn theme_change_schedules_full_redraw() {
        let mut pendant = started();
        pendant.tick(5, RawInputs::IDLE, 0).unwrap();
        pendant.display_mut().calls.clear();
        host(&mut pendant, 10, &["LCD:WHEEL,85"]);
        assert!(pendant.display().calls[0].is_background());
    }

    // =========================================================================
    // Encoder Tests
    // =========================================================================

    #[test]
    fn armed_encoder_emits_jogs() {
        let mut pendant = armed();
        pendant.tick(10, RawInputs::IDLE, 4).unwrap();
        assert_eq!(
            pendant.serial().sent_lines(),
            ["JOG:Z,0.100,1000", "JOG:Z,0.100,1000"]
        );
        assert_eq!(pendant.context().scaler.remainder(), 0);
    }

    #[test]
    fn negative_ticks_jog_negative() {
        let mut pendant = armed();
        pendant.tick(10, RawInputs::IDLE, -2).unwrap();
        assert_eq!(pendant.serial().sent_lines(), ["JOG:Z,-0.100,1000"]);
    }

    #[test]
    fn disarmed_encoder_blocks_and_clears_remainder() {
        let mut pendant = started();
        pendant.tick(10, RawInputs::IDLE, 3).unwrap();
        assert_eq!(pendant.serial().sent_lines(), ["ESTOP:MOTION_BLOCKED"]);
        assert_eq!(pendant.context().scaler.remainder(), 0);
    }

    #[test]
    fn open_contact_blocks_before_debounce() {
        let mut pendant = armed();
        let open = RawInputs {
            estop: false,
            ..RawInputs::IDLE
        };
        pendant.tick(10, open, 4).unwrap();
        pendant.tick(20, open, 4).unwrap();
        assert!(pendant.serial().sent_with_prefix("JOG:Z").is_empty());
        assert_eq!(pendant.serial().sent_lines(), ["ESTOP:MOTION_BLOCKED"]);
        assert_eq!(pendant.context().safety.estop(), EstopState::Released);
    }

    #[test]
    fn idle_tick_clears_remainder_when_blocked() {
        let mut pendant = armed();
        pendant.tick(10, RawInputs::IDLE, 1).unwrap();
        assert_eq!(pendant.context().scaler.remainder(), 1);

        host(&mut pendant, 20, &["ARM:DISABLE"]);
        assert_eq!(pendant.context().scaler.remainder(), 0);

        host(&mut pendant, 30, &["ARM:ENABLE", "HOST:PING"]);
        pendant.tick(40, RawInputs::IDLE, 1).unwrap();
        assert!(pendant.serial().sent_with_prefix("JOG:").is_empty());
    }

    #[test]
    fn blocked_notice_rate_limited() {
        let mut pendant = started();
        pendant.tick(10, RawInputs::IDLE, 2).unwrap();
        pendant.tick(500, RawInputs::IDLE, 2).unwrap();
        pendant.tick(1010, RawInputs::IDLE, 2).unwrap();
        assert_eq!(pendant.serial().sent_with_prefix("ESTOP:MOTION_BLOCKED").len(), 2);
    }

    #[test]
    fn stale_heartbeat_blocks_then_recovers() {
        let mut pendant = armed();
        pendant.tick(5000, RawInputs::IDLE, 2).unwrap();
        assert!(pendant.serial().sent_with_prefix("JOG:").is_empty());

        host(&mut pendant, 5001, &["HOST:PING"]);
        pendant.tick(5002, RawInputs::IDLE, 2).unwrap();
        assert_eq!(pendant.serial().sent_with_prefix("JOG:").len(), 1);
    }

    #[test]
    fn jogs_dead_reckon_position() {
        let mut pendant = armed();
        pendant.tick(10, RawInputs::IDLE, 6).unwrap();
        let readout = pendant
            .context()
            .position
            .readout(crate::state::CoordView::Machine, "G54", 10);
        assert!((readout.values[Axis::Z.index()] - 0.3).abs() < 1e-5);
    }

    // =========================================================================
    // Error Tests
    // =========================================================================

    #[test]
    fn serial_failure_does_not_stop_display() {
        let mut pendant = started();
        pendant.serial_mut().fail_writes = true;
        let mut inputs = MockInputs::new();
        inputs.press_estop();
        pendant.tick(10, inputs.sample(), 0).unwrap();
        let result = pendant.tick(40, inputs.sample(), 0);
        assert!(matches!(result, Err(PendantError::Serial(_))));
        assert_eq!(pendant.display().last(), Some(&DisplayCall::Estop { fault: false }));
    }

    #[test]
    fn display_failure_does_not_stop_serial() {
        let mut pendant = started();
        pendant.display_mut().fail_draws = true;
        let mut inputs = MockInputs::new();
        inputs.press_estop();
        let _ = pendant.tick(10, inputs.sample(), 0);
        let result = pendant.tick(40, inputs.sample(), 0);
        assert!(matches!(result, Err(PendantError::Display(_))));
        assert_eq!(
            pendant.serial().sent_lines(),
            ["JOG:STOP", "ESTOP:EMERGENCY_STOP_ACTIVATED"]
        );
    }

    #[test]
    fn error_display_text() {
        let error: PendantError<&str, ()> = PendantError::Serial("timeout");
        assert_eq!(error.to_string(), "serial link error: \"timeout\"");
    }
}
