//! Frame-by-frame interpolation between two settings snapshots.
//!
//! Idle -> Transitioning -> Idle. Restarting while a transition is running
//! starts from the currently interpolated value, never from the old `from`.

use crate::settings::{blend_and_clamp, BlendPolicy, OptimizationSettings, SettingsBounds};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutQuad,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress in \[0, 1\] to eased progress in \[0, 1\].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

impl FromStr for Easing {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Easing::Linear),
            "ease-out-quad" => Ok(Easing::EaseOutQuad),
            "ease-out-cubic" => Ok(Easing::EaseOutCubic),
            "ease-in-out-cubic" => Ok(Easing::EaseInOutCubic),
            _ => Err(()),
        }
    }
}

/// Snapshot of an in-flight transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionState {
    pub from: OptimizationSettings,
    pub to: OptimizationSettings,
    pub start_time: f64,
    pub duration_ms: f64,
    /// Linear progress in \[0, 1\] as of the last update.
    pub progress: f32,
}

#[derive(Debug, Clone)]
pub struct TransitionManager {
    easing: Easing,
    bounds: SettingsBounds,
    state: Option<TransitionState>,
}

impl TransitionManager {
    pub fn new(easing: Easing, bounds: SettingsBounds) -> Self {
        Self {
            easing,
            bounds: bounds.sanitized(),
            state: None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    /// Begin moving toward `to`. Returns the settings to show right now.
    ///
    /// A degenerate duration (zero, negative, NaN) jumps straight to `to`.
    pub fn start_transition(
        &mut self,
        from: OptimizationSettings,
        to: OptimizationSettings,
        duration_ms: f64,
        now: f64,
    ) -> OptimizationSettings {
        let from = match self.state {
            Some(_) => self.sample(now).unwrap_or(from),
            None => from,
        };
        if !(duration_ms.is_finite() && duration_ms > 0.0) || !now.is_finite() {
            self.state = None;
            return to;
        }
        self.state = Some(TransitionState {
            from,
            to,
            start_time: now,
            duration_ms,
            progress: 0.0,
        });
        from
    }

    /// Advance to `now`. `None` when idle; the final value is returned once
    /// (exactly `to`) as the transition completes.
    pub fn update(&mut self, now: f64) -> Option<OptimizationSettings> {
        let state = self.state.as_mut()?;
        let progress = progress_at(state, now);
        state.progress = progress;
        if progress >= 1.0 {
            let to = state.to;
            self.state = None;
            return Some(to);
        }
        Some(interpolate(state, progress, self.easing, &self.bounds))
    }

    /// Interpolated value at `now` without advancing state.
    pub fn sample(&self, now: f64) -> Option<OptimizationSettings> {
        let state = self.state.as_ref()?;
        let progress = progress_at(state, now);
        if progress >= 1.0 {
            return Some(state.to);
        }
        Some(interpolate(state, progress, self.easing, &self.bounds))
    }

    /// Abort; the caller's current settings stay as they are.
    pub fn cancel_transition(&mut self) -> Option<TransitionState> {
        self.state.take()
    }
}

fn progress_at(state: &TransitionState, now: f64) -> f32 {
    let p = (now - state.start_time) / state.duration_ms;
    if p.is_nan() {
        1.0
    } else {
        p.clamp(0.0, 1.0) as f32
    }
}

fn interpolate(
    state: &TransitionState,
    progress: f32,
    easing: Easing,
    bounds: &SettingsBounds,
) -> OptimizationSettings {
    if progress <= 0.0 {
        return state.from;
    }
    let eased = easing.apply(progress);
    blend_and_clamp(
        &state.from,
        &state.to,
        BlendPolicy::interpolation(eased, progress),
        bounds,
    )
}
