//! Dirty-flag bookkeeping for one screen region.

/// One independently redrawn region.
///
/// A panel is due when it is dirty and at least `min_interval_ms` passed since
/// its last draw, or, if it has a refresh interval, when that much time passed
/// regardless of the flag.
#[derive(Clone, Debug)]
pub struct Panel {
    dirty: bool,
    last_draw_ms: Option<u64>,
    min_interval_ms: u32,
    refresh_ms: Option<u32>,
}

impl Panel {
    /// Panel redrawn as soon as it is dirty.
    pub const fn new() -> Self {
        Self::throttled(0)
    }

    /// Panel redrawn at most once per `min_interval_ms`.
    pub const fn throttled(min_interval_ms: u32) -> Self {
        Self {
            dirty: false,
            last_draw_ms: None,
            min_interval_ms,
            refresh_ms: None,
        }
    }

    /// Panel also redrawn every `refresh_ms` even when clean.
    pub const fn refreshing(refresh_ms: u32) -> Self {
        Self {
            dirty: false,
            last_draw_ms: None,
            min_interval_ms: 0,
            refresh_ms: Some(refresh_ms),
        }
    }

    /// Requests a redraw.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a redraw was requested and not yet performed.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the panel should be drawn now.
    pub fn is_due(&self, now_ms: u64) -> bool {
        let Some(last) = self.last_draw_ms else {
            return self.dirty || self.refresh_ms.is_some();
        };
        let elapsed = now_ms.saturating_sub(last);
        let refresh = self
            .refresh_ms
            .is_some_and(|interval| elapsed >= u64::from(interval));
        refresh || (self.dirty && elapsed >= u64::from(self.min_interval_ms))
    }

    /// If due, records a draw at `now_ms` and returns `true`. The caller draws.
    pub fn maybe_redraw(&mut self, now_ms: u64) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.mark_drawn(now_ms);
        true
    }

    /// Records a draw that happened outside [`maybe_redraw`](Self::maybe_redraw).
    pub fn mark_drawn(&mut self, now_ms: u64) {
        self.dirty = false;
        self.last_draw_ms = Some(now_ms);
    }

    /// Drops the dirty flag without drawing (content turned out unchanged).
    pub fn settle(&mut self) {
        self.dirty = false;
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}
