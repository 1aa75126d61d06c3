//! Edge case and boundary condition tests for the pendant core

use cnc_pendant::hal::{DisplayCall, MockDisplay, MockSerial};
use cnc_pendant::input::classify;
use cnc_pendant::protocol::parse;
use cnc_pendant::{
    Button, ButtonEvent, ButtonPair, ChannelId, CoordView, Edge, HostMessage, InputChannel,
    JogDistance, JogScaler, MachineProfile, Outbound, PendantConfig, PendantController,
    PositionTracker, PressKind, RawInputs, SafetyGate, TickCounter, Units,
};

const DEBOUNCE: u32 = 30;

fn controller() -> PendantController<MockSerial, MockDisplay> {
    let mut pendant =
        PendantController::new(PendantConfig::default(), MockSerial::new(), MockDisplay::new());
    pendant.start(0, RawInputs::IDLE).unwrap();
    pendant.serial_mut().sent.clear();
    pendant
}

// ============================================================================
// Debounce Boundary Tests
// ============================================================================

#[test]
fn edge_exactly_at_debounce_window() {
    let mut channel = InputChannel::new(ChannelId::Button1, true, DEBOUNCE);
    channel.preset(true, 0);

    assert_eq!(channel.update(false, 100), None);
    assert_eq!(channel.update(false, 129), None);
    assert_eq!(
        channel.update(false, 130),
        Some(Edge::Activated { at_ms: 100 })
    );
    assert_eq!(channel.update(false, 131), None);
}

#[test]
fn bounce_restarts_window() {
    let mut channel = InputChannel::new(ChannelId::Estop, true, DEBOUNCE);
    channel.preset(true, 0);

    let mut now = 0;
    for _ in 0..20 {
        now += 10;
        assert_eq!(channel.update(false, now), None);
        now += 10;
        assert_eq!(channel.update(true, now), None);
    }
    assert!(!channel.is_active());
}

#[test]
fn preset_active_produces_no_edge() {
    let mut channel = InputChannel::new(ChannelId::Estop, true, DEBOUNCE);
    channel.preset(false, 0);
    assert!(channel.is_active());
    assert_eq!(channel.update(false, 1000), None);
}

#[test]
fn active_high_channel() {
    let mut channel = InputChannel::new(ChannelId::Toggle, false, DEBOUNCE);
    channel.preset(false, 0);
    channel.update(true, 10);
    assert_eq!(channel.update(true, 40), Some(Edge::Activated { at_ms: 10 }));
}

// ============================================================================
// Press Classification Boundary Tests
// ============================================================================

#[test]
fn classify_threshold_is_long() {
    assert_eq!(classify(1999, 2000), PressKind::Short);
    assert_eq!(classify(2000, 2000), PressKind::Long);
    assert_eq!(classify(0, 2000), PressKind::Short);
}

#[test]
fn press_duration_uses_raw_edge_times() {
    let mut button = Button::new(ChannelId::Button2, DEBOUNCE, 1000);
    button.update(true, 0);

    button.update(false, 100);
    assert_eq!(button.update(false, 130), None);
    button.update(true, 1100);
    let press = button.update(true, 1130).unwrap();

    assert_eq!(press.started_ms, 100);
    assert_eq!(press.duration_ms, 1000);
    assert_eq!(press.kind, PressKind::Long);
}

#[test]
fn release_without_press_is_silent() {
    let mut button = Button::new(ChannelId::Button1, DEBOUNCE, 2000);
    for t in (0..500).step_by(5) {
        assert_eq!(button.update(true, t), None);
    }
}

#[test]
fn both_held_measured_from_later_press() {
    let mut pair = ButtonPair::new(
        Button::new(ChannelId::Button1, DEBOUNCE, 2000),
        Button::new(ChannelId::Button2, DEBOUNCE, 1000),
        1500,
    );
    pair.update(true, true, 0);

    pair.update(false, true, 0);
    pair.update(false, true, 30);
    pair.update(false, false, 1000);
    pair.update(false, false, 1030);

    // Button 2 started at 1000, so the gesture is due at 2500
    assert!(pair.update(false, false, 2495).is_empty());
    let events = pair.update(false, false, 2500);
    assert_eq!(events.as_slice(), [ButtonEvent::BothHeld]);

    // Fires once, and neither release yields a press
    assert!(pair.update(false, false, 4000).is_empty());
    pair.update(true, true, 4100);
    assert!(pair.update(true, true, 4130).is_empty());
}

#[test]
fn simultaneous_releases_both_report() {
    let mut pair = ButtonPair::new(
        Button::new(ChannelId::Button1, DEBOUNCE, 2000),
        Button::new(ChannelId::Button2, DEBOUNCE, 1000),
        1500,
    );
    pair.update(true, true, 0);
    pair.update(false, false, 10);
    pair.update(false, false, 40);
    pair.update(true, true, 200);
    let events = pair.update(true, true, 230);
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| matches!(e, ButtonEvent::Press(p) if p.kind == PressKind::Short)));
}

// ============================================================================
// Encoder Boundary Tests
// ============================================================================

#[test]
fn counter_filters_fast_edges() {
    let counter = TickCounter::new(500);
    counter.on_phase_a_edge(false, 1000);
    counter.on_phase_a_edge(false, 1499);
    counter.on_phase_a_edge(false, 1500);
    assert_eq!(counter.take(), 2);
}

#[test]
fn counter_survives_timer_wrap() {
    let counter = TickCounter::new(500);
    counter.on_phase_a_edge(true, u32::MAX - 100);
    counter.on_phase_a_edge(true, 500);
    counter.on_phase_a_edge(true, 700);
    assert_eq!(counter.take(), -2);
    assert_eq!(counter.peek(), 0);
}

#[test]
fn scaler_sum_invariant_all_scales() {
    for scale in 1..=10u8 {
        let mut scaler = JogScaler::new(scale);
        let mut raw_total = 0;
        let mut steps_total = 0;
        for raw in -25..=25 {
            raw_total += raw;
            steps_total += scaler.feed(raw);
            assert!(scaler.remainder().abs() < i32::from(scale));
            assert_eq!(
                steps_total * i32::from(scale) + scaler.remainder(),
                raw_total,
                "scale {} after {}",
                scale,
                raw
            );
        }
    }
}

#[test]
fn scaler_rejects_out_of_range() {
    let mut scaler = JogScaler::new(4);
    scaler.feed(3);
    assert!(!scaler.set_scale(0));
    assert!(!scaler.set_scale(11));
    assert_eq!(scaler.scale(), 4);
    assert_eq!(scaler.remainder(), 3);
}

#[test]
fn scaler_clamps_construction() {
    assert_eq!(JogScaler::new(0).scale(), 1);
    assert_eq!(JogScaler::new(200).scale(), 10);
}

// ============================================================================
// Safety Boundary Tests
// ============================================================================

#[test]
fn heartbeat_timeout_is_inclusive() {
    let mut gate = SafetyGate::new(3000);
    gate.arm();
    gate.heartbeat(1000);
    assert!(gate.motion_authorized(4000));
    assert!(!gate.motion_authorized(4001));
}

#[test]
fn never_heard_host_is_stale() {
    let mut gate = SafetyGate::new(3000);
    gate.arm();
    assert!(!gate.motion_authorized(0));
}

// ============================================================================
// Protocol Boundary Tests
// ============================================================================

#[test]
fn overlong_line_is_dropped() {
    let mut pendant = controller();
    let long = format!("HOST:PING{}", " ".repeat(200));
    pendant.serial_mut().push_line(&long);
    pendant.tick(5, RawInputs::IDLE, 0).unwrap();
    assert!(pendant.serial().sent.is_empty());
}

#[test]
fn malformed_position_field_keeps_previous() {
    let mut pendant = controller();
    pendant.serial_mut().push_line("POS:MCS,X,1.0,Y,2.0,Z,3.0");
    pendant.serial_mut().push_line("POS:MCS,X,4.0,Y,nan?,Z,");
    pendant.tick(5, RawInputs::IDLE, 0).unwrap();

    let readout = pendant
        .context()
        .position
        .readout(CoordView::Machine, "G54", 5);
    assert!(readout.fresh);
    assert_eq!(readout.values, [4.0, 2.0, 3.0]);
}

#[test]
fn all_fields_malformed_leaves_snapshot_stale() {
    let mut tracker = PositionTracker::new(2000);
    assert!(!tracker.apply_snapshot(CoordView::Work, [None, None, None], 0));
    assert!(!tracker.is_fresh(CoordView::Work, 0));
}

#[test]
fn non_finite_positions_rejected() {
    assert_eq!(
        parse("POS:WCS,X,inf,Y,NaN,Z,1"),
        Some(HostMessage::Position {
            frame: CoordView::Work,
            values: [None, None, Some(1.0)],
        })
    );
}

#[test]
fn partial_solid_colour_keeps_components() {
    let mut pendant = controller();
    pendant.serial_mut().push_line("LCD:SOLID,10,20,30");
    pendant.serial_mut().push_line("LCD:SOLID,99,x,");
    pendant.tick(5, RawInputs::IDLE, 0).unwrap();

    let bg = pendant.context().theme.background;
    assert_eq!((bg.r, bg.g, bg.b), (99, 20, 30));
}

#[test]
fn active_wcs_label_reaches_status_bar() {
    let mut pendant = controller();
    pendant.tick(5, RawInputs::IDLE, 0).unwrap();
    pendant.serial_mut().push_line("COORD:ACTIVE,G55");
    pendant.tick(10, RawInputs::IDLE, 0).unwrap();

    let last_status = pendant
        .display()
        .calls
        .iter()
        .rev()
        .find_map(|c| match c {
            DisplayCall::Status { wcs, .. } => Some(wcs.clone()),
            _ => None,
        });
    assert_eq!(last_status.as_deref(), Some("G55"));
}

#[test]
fn offset_for_unknown_slot_falls_back_to_estimate() {
    let mut pendant = controller();
    pendant.serial_mut().push_line("OFFSET:G55,X,1,Y,1,Z,1");
    pendant.serial_mut().push_line("POS:MCS,X,5,Y,5,Z,5");
    pendant.serial_mut().push_line("COORD:ACTIVE,G54");
    pendant.tick(5, RawInputs::IDLE, 0).unwrap();

    // G54 has no stored offset, so the work view cannot be derived
    let work = pendant.context().position.readout(CoordView::Work, "G54", 5);
    assert_eq!(work.values, [0.0; 3]);
    assert!(!work.fresh);
}

#[test]
fn scale_line_with_whitespace() {
    assert_eq!(parse("ENCODER:SCALE, 7 "), Some(HostMessage::EncoderScale(7)));
    assert_eq!(parse("ENCODER:SCALE,-1"), None);
    assert_eq!(parse("ENCODER:SCALE,300"), None);
}

#[test]
fn imperial_distance_echo_precision() {
    let spec = MachineProfile::Uccnc.spec();
    let fine = spec.distance(JogDistance::Fine, Units::Imperial);
    let line = Outbound::Distance(fine, Units::Imperial).to_line().unwrap();
    assert_eq!(line.as_str(), "DISTANCE:0.0001");
}

#[test]
fn longest_jog_fits_in_a_line() {
    for profile in MachineProfile::ALL {
        let spec = profile.spec();
        for units in [Units::Metric, Units::Imperial] {
            let jog = Outbound::Jog {
                dialect: spec.dialect,
                axis: cnc_pendant::Axis::X,
                distance: -spec.distance(JogDistance::Large, units),
                feed: 99_999.0,
                units,
            };
            assert!(jog.to_line().is_ok(), "{}", spec.name);
        }
    }
}
