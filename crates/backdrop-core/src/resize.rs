//! Coalesces bursts of viewport notifications into one settle event.

use crate::clock::{ScheduledTask, TaskSlot};
use crate::config::AdaptiveConfig;
use crate::viewport::{SignalKind, ViewportProfile, ViewportSignal};

#[derive(Debug)]
pub struct ResizeDebouncer {
    delay_ms: f64,
    orientation_delay_ms: f64,
    settle: TaskSlot,
    pending: Option<ViewportProfile>,
    // Widened window sticks for the rest of a burst once an orientation change is seen
    burst_has_orientation: bool,
    signals_in_burst: u32,
}

impl ResizeDebouncer {
    pub fn new(config: &AdaptiveConfig) -> Self {
        Self {
            delay_ms: config.debounce_ms,
            orientation_delay_ms: config.orientation_debounce_ms,
            settle: TaskSlot::new(),
            pending: None,
            burst_has_orientation: false,
            signals_in_burst: 0,
        }
    }

    /// Quiet period for plain resizes. Applies from the next signal; a
    /// deadline already scheduled is left alone.
    pub fn set_delay_ms(&mut self, delay_ms: f64) {
        if delay_ms.is_finite() && delay_ms >= 0.0 {
            self.delay_ms = delay_ms;
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Record a notification; returns the (re)scheduled settle deadline.
    pub fn signal(&mut self, signal: &ViewportSignal, now: f64) -> ScheduledTask {
        if signal.kind == SignalKind::OrientationChange {
            self.burst_has_orientation = true;
        }
        let window = if self.burst_has_orientation {
            self.orientation_delay_ms.max(self.delay_ms)
        } else {
            self.delay_ms
        };
        self.pending = Some(ViewportProfile::from_signal(signal));
        self.signals_in_burst += 1;
        let task = self.settle.schedule(now + window);
        log::trace!(
            "[resize] signal {}x{} ({:?}), settle at {:.0}",
            signal.width,
            signal.height,
            signal.kind,
            task.due_ms
        );
        task
    }

    /// Emit the final viewport once the window has passed without new signals.
    pub fn poll(&mut self, now: f64) -> Option<ViewportProfile> {
        self.settle.take_due(now)?;
        let settled = self.pending.take();
        if let Some(v) = &settled {
            log::debug!(
                "[resize] settled {}x{} {:?} after {} signal(s)",
                v.width,
                v.height,
                v.device_class,
                self.signals_in_burst
            );
        }
        self.burst_has_orientation = false;
        self.signals_in_burst = 0;
        settled
    }

    /// True between the first signal of a burst and its settle event.
    pub fn is_resizing(&self) -> bool {
        self.settle.is_pending()
    }

    pub fn pending_deadline(&self) -> Option<ScheduledTask> {
        self.settle.pending()
    }

    /// Drop the pending burst without emitting.
    pub fn cancel(&mut self) {
        self.settle.cancel();
        self.pending = None;
        self.burst_has_orientation = false;
        self.signals_in_burst = 0;
    }
}
