//! Screen power state driven by the toggle switch.
//!
//! Toggle OFF starts a countdown; when it expires the screen is cleared.
//! Toggle ON cancels the countdown or wakes the screen. The countdown never
//! runs while the E-stop holds the display.

/// Current power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Screen on.
    #[default]
    Active,
    /// Toggle OFF, screen still on.
    CountingDown {
        /// When the countdown started (ms).
        since_ms: u64,
    },
    /// Screen cleared.
    Sleeping,
}

/// What changed in [`PowerManager::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerTransition {
    /// Toggle went OFF.
    CountdownStarted,
    /// Toggle went back ON before expiry.
    CountdownCancelled,
    /// Countdown expired; clear the screen.
    Slept,
    /// Toggle ON while asleep; redraw everything.
    Woke,
}

/// Toggle-driven sleep countdown.
#[derive(Clone, Debug)]
pub struct PowerManager {
    state: PowerState,
    countdown_ms: u32,
}

impl PowerManager {
    /// Creates an active manager.
    pub const fn new(countdown_ms: u32) -> Self {
        Self {
            state: PowerState::Active,
            countdown_ms,
        }
    }

    /// Advances the state machine. `suspended` is true while the E-stop is active.
    pub fn update(&mut self, toggle_on: bool, suspended: bool, now_ms: u64) -> Option<PowerTransition> {
        let (next, transition) = match (toggle_on, self.state) {
            (true, PowerState::Sleeping) => (PowerState::Active, PowerTransition::Woke),
            (true, PowerState::CountingDown { .. }) => {
                (PowerState::Active, PowerTransition::CountdownCancelled)
            }
            (false, PowerState::Active) if !suspended => (
                PowerState::CountingDown { since_ms: now_ms },
                PowerTransition::CountdownStarted,
            ),
            (false, PowerState::CountingDown { since_ms })
                if !suspended
                    && now_ms.saturating_sub(since_ms) >= u64::from(self.countdown_ms) =>
            {
                (PowerState::Sleeping, PowerTransition::Slept)
            }
            _ => return None,
        };
        self.state = next;
        Some(transition)
    }

    /// Drops any countdown or sleep; the E-stop overlay owns the screen now.
    ///
    /// Returns whether the state changed.
    pub fn suspend(&mut self) -> bool {
        let changed = self.state != PowerState::Active;
        self.state = PowerState::Active;
        changed
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// True once the countdown expired.
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.state == PowerState::Sleeping
    }
}
