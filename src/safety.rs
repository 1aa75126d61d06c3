//! Safety and arming gate.
//!
//! Every motion-producing path asks [`SafetyGate::check`] immediately before
//! emitting. Motion is authorized only when all four hold:
//!
//! - the host has armed the pendant
//! - the last host heartbeat is no older than the timeout
//! - the host reports the machine idle
//! - the E-stop is released
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::safety::{BlockReason, EstopState, MotionState, SafetyGate};
//!
//! let mut gate = SafetyGate::new(3000);
//! assert_eq!(gate.check(0), Err(BlockReason::Disarmed));
//!
//! gate.heartbeat(0);
//! gate.arm();
//! assert!(gate.motion_authorized(100));
//!
//! gate.set_estop(EstopState::Pressed);
//! assert!(gate.is_locked());
//! assert_eq!(gate.check(100), Err(BlockReason::EstopActive));
//!
//! // Release unlocks; arming was never touched
//! gate.set_estop(EstopState::Released);
//! gate.set_motion_state(MotionState::Run);
//! assert_eq!(gate.check(100), Err(BlockReason::MachineBusy));
//! ```

/// Machine motion state as broadcast by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MotionState {
    /// Not moving; jogging allowed.
    #[default]
    Idle,
    /// Executing a program or jog.
    Run,
    /// Feed hold.
    Hold,
}

impl MotionState {
    /// Parses the wire token (`IDLE`, `RUN`, `HOLD`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "IDLE" => Some(MotionState::Idle),
            "RUN" => Some(MotionState::Run),
            "HOLD" => Some(MotionState::Hold),
            _ => None,
        }
    }
}

/// Emergency stop switch state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EstopState {
    /// Switch closed, normal operation.
    #[default]
    Released,
    /// Operator pressed the switch.
    Pressed,
    /// Switch was already open at boot.
    Fault,
}

/// Why the gate refused motion. Checked in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockReason {
    /// E-stop pressed or faulted.
    EstopActive,
    /// Host has not armed the pendant.
    Disarmed,
    /// No heartbeat within the timeout (or never).
    HeartbeatStale,
    /// Host reports the machine running or held.
    MachineBusy,
}

/// Arming, heartbeat, motion, and E-stop state.
#[derive(Clone, Debug)]
pub struct SafetyGate {
    armed: bool,
    last_heartbeat_ms: Option<u64>,
    heartbeat_timeout_ms: u32,
    motion: MotionState,
    estop: EstopState,
}

impl SafetyGate {
    /// Creates a disarmed gate that has never heard from the host.
    pub const fn new(heartbeat_timeout_ms: u32) -> Self {
        Self {
            armed: false,
            last_heartbeat_ms: None,
            heartbeat_timeout_ms,
            motion: MotionState::Idle,
            estop: EstopState::Released,
        }
    }

    /// Returns `Ok(())` if motion is authorized, otherwise the first failing condition.
    pub fn check(&self, now_ms: u64) -> Result<(), BlockReason> {
        if self.is_locked() {
            return Err(BlockReason::EstopActive);
        }
        if !self.armed {
            return Err(BlockReason::Disarmed);
        }
        if !self.heartbeat_fresh(now_ms) {
            return Err(BlockReason::HeartbeatStale);
        }
        if self.motion != MotionState::Idle {
            return Err(BlockReason::MachineBusy);
        }
        Ok(())
    }

    /// `armed AND heartbeat fresh AND idle AND E-stop released`.
    #[inline]
    pub fn motion_authorized(&self, now_ms: u64) -> bool {
        self.check(now_ms).is_ok()
    }

    /// True whenever the E-stop is not released, regardless of arming.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.estop != EstopState::Released
    }

    /// True if a heartbeat arrived within the timeout.
    pub fn heartbeat_fresh(&self, now_ms: u64) -> bool {
        match self.last_heartbeat_ms {
            Some(at) => now_ms.saturating_sub(at) <= u64::from(self.heartbeat_timeout_ms),
            None => false,
        }
    }

    /// Records a host heartbeat.
    pub fn heartbeat(&mut self, now_ms: u64) {
        self.last_heartbeat_ms = Some(now_ms);
    }

    /// Host granted motion permission.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Host revoked motion permission.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Updates the host-reported motion state.
    pub fn set_motion_state(&mut self, motion: MotionState) {
        self.motion = motion;
    }

    /// Updates the E-stop state. Never touches arming.
    pub fn set_estop(&mut self, estop: EstopState) {
        self.estop = estop;
    }

    /// Whether the host armed the pendant.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Host-reported motion state.
    #[inline]
    pub fn motion_state(&self) -> MotionState {
        self.motion
    }

    /// E-stop state.
    #[inline]
    pub fn estop(&self) -> EstopState {
        self.estop
    }
}
