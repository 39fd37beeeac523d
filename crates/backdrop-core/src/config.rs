//! Per-surface tunables for the adaptive controller.
//!
//! Out-of-range values are never an error: [`AdaptiveConfig::sanitized`]
//! corrects them and reports what it changed. String overrides (from the host
//! page) go through [`AdaptiveConfig::apply_override`].

use crate::constants::{MAX_ORIENTATION_DEBOUNCE_MS, MIN_ORIENTATION_DEBOUNCE_MS};
use crate::error::ConfigError;
use crate::settings::SettingsBounds;
use crate::transition::Easing;
use std::fmt;
use std::str::FromStr;

/// Keys accepted by [`AdaptiveConfig::apply_override`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "min-particles",
    "max-particles",
    "min-scale",
    "max-scale",
    "blend-factor",
    "cooldown-ms",
    "debounce-ms",
    "orientation-debounce-ms",
    "transition-ms",
    "easing",
    "recovery",
];

#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveConfig {
    pub bounds: SettingsBounds,
    /// Fraction of the remaining distance covered per adjustment.
    pub blend_factor: f32,
    /// Largest particle-count change per adjustment, relative to the current value.
    pub max_particle_step: f32,
    /// Largest render-scale change per adjustment, relative to the current value.
    pub max_scale_step: f32,
    /// Minimum time between two performance-driven adjustments.
    pub cooldown_ms: f64,
    /// Interval at which rolling metrics are recomputed.
    pub metrics_interval_ms: f64,
    /// Frame samples kept in the ring buffer.
    pub sample_window: usize,
    /// Per-interval fps values kept for stability/thermal analysis.
    pub fps_history_len: usize,
    pub debounce_ms: f64,
    pub orientation_debounce_ms: f64,
    pub transition_ms: f64,
    pub easing: Easing,
    /// Above this heap usage particle count is capped.
    pub memory_pressure_mb: f64,
    /// Above this heap usage performance is not considered acceptable.
    pub memory_limit_mb: f64,
    /// Render-scale multiplier applied while a resize burst is in progress.
    pub resize_scale_factor: f32,
    /// Blend back toward the responsive baseline when there is headroom.
    pub recovery_enabled: bool,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            bounds: SettingsBounds::default(),
            blend_factor: 0.3,
            max_particle_step: 0.3,
            max_scale_step: 0.2,
            cooldown_ms: 2000.0,
            metrics_interval_ms: 1000.0,
            sample_window: 60,
            fps_history_len: 30,
            debounce_ms: 150.0,
            orientation_debounce_ms: 400.0,
            transition_ms: 300.0,
            easing: Easing::EaseOutCubic,
            memory_pressure_mb: 200.0,
            memory_limit_mb: 300.0,
            resize_scale_factor: 0.8,
            recovery_enabled: true,
        }
    }
}

/// A correction made by [`AdaptiveConfig::sanitized`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

struct Corrections(Vec<ConfigWarning>);

impl Corrections {
    fn note(&mut self, field: &'static str, message: String) {
        log::warn!("[config] {field}: {message}");
        self.0.push(ConfigWarning { field, message });
    }

    fn unit(&mut self, field: &'static str, value: &mut f32, fallback: f32) {
        if !value.is_finite() {
            self.note(field, format!("{value} is not finite, using {fallback}"));
            *value = fallback;
        } else if !(0.0..=1.0).contains(value) {
            let fixed = value.clamp(0.0, 1.0);
            self.note(field, format!("{value} outside [0, 1], using {fixed}"));
            *value = fixed;
        }
    }

    fn millis(&mut self, field: &'static str, value: &mut f64, fallback: f64) {
        if !value.is_finite() || *value < 0.0 {
            self.note(field, format!("{value} is not a valid duration, using {fallback}"));
            *value = fallback;
        }
    }

    fn count(&mut self, field: &'static str, value: &mut usize, min: usize) {
        if *value < min {
            self.note(field, format!("{value} below minimum, using {min}"));
            *value = min;
        }
    }
}

impl AdaptiveConfig {
    /// Return a corrected copy together with the corrections applied.
    pub fn sanitized(mut self) -> (Self, Vec<ConfigWarning>) {
        let defaults = Self::default();
        let mut c = Corrections(Vec::new());

        let b = &mut self.bounds;
        if b.max_particles == 0 {
            c.note("bounds.max_particles", "0 is not usable, using 1".into());
            b.max_particles = 1;
        }
        if b.min_particles > b.max_particles {
            c.note(
                "bounds.min_particles",
                format!("{} exceeds max {}, swapping", b.min_particles, b.max_particles),
            );
            std::mem::swap(&mut b.min_particles, &mut b.max_particles);
        }
        if !b.min_render_scale.is_finite() || b.min_render_scale <= 0.0 {
            c.note(
                "bounds.min_render_scale",
                format!("{} is not usable, using {}", b.min_render_scale, defaults.bounds.min_render_scale),
            );
            b.min_render_scale = defaults.bounds.min_render_scale;
        }
        if !b.max_render_scale.is_finite() || b.max_render_scale <= 0.0 {
            c.note(
                "bounds.max_render_scale",
                format!("{} is not usable, using {}", b.max_render_scale, defaults.bounds.max_render_scale),
            );
            b.max_render_scale = defaults.bounds.max_render_scale;
        }
        if b.min_render_scale > b.max_render_scale {
            c.note(
                "bounds.min_render_scale",
                format!("{} exceeds max {}, swapping", b.min_render_scale, b.max_render_scale),
            );
            std::mem::swap(&mut b.min_render_scale, &mut b.max_render_scale);
        }

        c.unit("blend_factor", &mut self.blend_factor, defaults.blend_factor);
        c.unit("max_particle_step", &mut self.max_particle_step, defaults.max_particle_step);
        c.unit("max_scale_step", &mut self.max_scale_step, defaults.max_scale_step);
        c.unit("resize_scale_factor", &mut self.resize_scale_factor, defaults.resize_scale_factor);

        c.millis("cooldown_ms", &mut self.cooldown_ms, defaults.cooldown_ms);
        c.millis("debounce_ms", &mut self.debounce_ms, defaults.debounce_ms);
        c.millis("transition_ms", &mut self.transition_ms, defaults.transition_ms);
        c.millis("orientation_debounce_ms", &mut self.orientation_debounce_ms, defaults.orientation_debounce_ms);
        c.millis("memory_pressure_mb", &mut self.memory_pressure_mb, defaults.memory_pressure_mb);
        c.millis("memory_limit_mb", &mut self.memory_limit_mb, defaults.memory_limit_mb);
        if !self.metrics_interval_ms.is_finite() || self.metrics_interval_ms <= 0.0 {
            c.note(
                "metrics_interval_ms",
                format!("{} is not a valid interval, using {}", self.metrics_interval_ms, defaults.metrics_interval_ms),
            );
            self.metrics_interval_ms = defaults.metrics_interval_ms;
        }

        let widened = self
            .orientation_debounce_ms
            .clamp(MIN_ORIENTATION_DEBOUNCE_MS, MAX_ORIENTATION_DEBOUNCE_MS);
        if widened != self.orientation_debounce_ms {
            c.note(
                "orientation_debounce_ms",
                format!("{} outside [200, 600], using {widened}", self.orientation_debounce_ms),
            );
            self.orientation_debounce_ms = widened;
        }

        c.count("sample_window", &mut self.sample_window, 2);
        // Thermal analysis compares two halves of ten samples each
        c.count("fps_history_len", &mut self.fps_history_len, 20);

        (self, c.0)
    }

    /// Apply a single `key=value` override, e.g. from a `data-*` attribute.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "min-particles" => self.bounds.min_particles = parse(key, value)?,
            "max-particles" => self.bounds.max_particles = parse(key, value)?,
            "min-scale" => self.bounds.min_render_scale = parse(key, value)?,
            "max-scale" => self.bounds.max_render_scale = parse(key, value)?,
            "blend-factor" => self.blend_factor = parse(key, value)?,
            "cooldown-ms" => self.cooldown_ms = parse(key, value)?,
            "debounce-ms" => self.debounce_ms = parse(key, value)?,
            "orientation-debounce-ms" => self.orientation_debounce_ms = parse(key, value)?,
            "transition-ms" => self.transition_ms = parse(key, value)?,
            "easing" => self.easing = parse(key, value)?,
            "recovery" => self.recovery_enabled = parse(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
