//! Quadrature jog-wheel decoding.
//!
//! Two stages:
//!
//! 1. [`TickCounter`] lives in a `static` and is fed from the phase A edge
//!    interrupt. Direction comes from phase B's level at the A edge.
//! 2. [`JogScaler`] runs in the main loop and converts raw ticks into scaled
//!    jog steps, carrying the remainder between loop iterations.
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::encoder::{JogScaler, TickCounter};
//!
//! static COUNTER: TickCounter = TickCounter::new(1000);
//!
//! // Interrupt context
//! COUNTER.on_phase_a_edge(false, 10_000);
//! COUNTER.on_phase_a_edge(false, 12_000);
//! COUNTER.on_phase_a_edge(false, 14_000);
//!
//! // Main loop
//! let mut scaler = JogScaler::new(2);
//! assert_eq!(scaler.feed(COUNTER.take()), 1);
//! assert_eq!(scaler.remainder(), 1);
//! ```

use portable_atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::traits::EncoderInput;

/// Smallest and largest accepted scale divisors.
pub const SCALE_RANGE: core::ops::RangeInclusive<u8> = 1..=10;

/// Interrupt-shared raw tick counter.
///
/// The interrupt handler calls [`on_phase_a_edge`](Self::on_phase_a_edge);
/// the main loop calls [`take`](Self::take). The pending count is the only
/// state the two contexts share, and `take` clears it with a single atomic
/// swap so an edge landing mid-read is kept for the next loop.
#[derive(Debug)]
pub struct TickCounter {
    pending: AtomicI32,
    last_edge_us: AtomicU32,
    primed: AtomicBool,
    min_edge_us: u32,
}

impl TickCounter {
    /// Creates a counter that ignores A edges closer than `min_edge_us`.
    pub const fn new(min_edge_us: u32) -> Self {
        Self {
            pending: AtomicI32::new(0),
            last_edge_us: AtomicU32::new(0),
            primed: AtomicBool::new(false),
            min_edge_us,
        }
    }

    /// Interrupt handler body. Constant time, no I/O.
    ///
    /// `b_high` is phase B's level at the A edge; `now_us` is a free-running
    /// microsecond timer (wrapping is fine).
    #[inline]
    pub fn on_phase_a_edge(&self, b_high: bool, now_us: u32) {
        // Relaxed is enough: each field is only written from this handler.
        let last = self.last_edge_us.load(Ordering::Relaxed);
        if self.primed.load(Ordering::Relaxed) && now_us.wrapping_sub(last) < self.min_edge_us {
            return;
        }
        self.last_edge_us.store(now_us, Ordering::Relaxed);
        self.primed.store(true, Ordering::Relaxed);

        let step = if b_high { -1 } else { 1 };
        // AcqRel pairs with the swap in `take`.
        self.pending.fetch_add(step, Ordering::AcqRel);
    }

    /// Reads and clears the pending count.
    #[inline]
    pub fn take(&self) -> i32 {
        self.pending.swap(0, Ordering::AcqRel)
    }

    /// Returns the pending count without clearing it.
    pub fn peek(&self) -> i32 {
        self.pending.load(Ordering::Acquire)
    }
}

impl EncoderInput for &TickCounter {
    fn take_ticks(&mut self) -> i32 {
        self.take()
    }
}

/// Converts raw ticks to scaled jog steps.
///
/// Invariant: `|remainder| < scale`. Over any run at a fixed scale,
/// `sum(steps) * scale + remainder == sum(raw)`.
#[derive(Clone, Debug)]
pub struct JogScaler {
    scale: u8,
    remainder: i32,
    position: i64,
}

impl JogScaler {
    /// Creates a scaler. Out-of-range scales are clamped to [`SCALE_RANGE`].
    pub fn new(scale: u8) -> Self {
        Self {
            scale: scale.clamp(*SCALE_RANGE.start(), *SCALE_RANGE.end()),
            remainder: 0,
            position: 0,
        }
    }

    /// Accumulates raw ticks and returns whole scaled steps (signed).
    pub fn feed(&mut self, raw: i32) -> i32 {
        if raw == 0 {
            return 0;
        }
        self.position += i64::from(raw);

        let scale = i32::from(self.scale);
        let total = self.remainder + raw;
        // Truncating division keeps the remainder's sign equal to the total's.
        let steps = total / scale;
        self.remainder = total % scale;
        steps
    }

    /// Drops any partial step.
    pub fn reset_remainder(&mut self) {
        self.remainder = 0;
    }

    /// Changes the divisor. Returns `false` (and changes nothing) when out of range.
    ///
    /// A new scale discards the remainder, which was measured in the old one.
    pub fn set_scale(&mut self, scale: u8) -> bool {
        if !SCALE_RANGE.contains(&scale) {
            return false;
        }
        self.scale = scale;
        self.remainder = 0;
        true
    }

    /// Current divisor.
    #[inline]
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Partial step carried to the next feed.
    #[inline]
    pub fn remainder(&self) -> i32 {
        self.remainder
    }

    /// Total raw ticks ever fed.
    #[inline]
    pub fn position(&self) -> i64 {
        self.position
    }
}
