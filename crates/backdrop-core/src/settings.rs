//! Rendering parameters handed to the external renderer, the typed diff used
//! to change them, and the single blend routine both the live controller and
//! the transition interpolator go through.

use crate::error::AdjustError;
use glam::FloatExt;

// Fixed ranges for fields that are not configurable per surface
pub const ANIMATION_SPEED_RANGE: (f32, f32) = (0.1, 2.0);
pub const INTERACTION_RADIUS_RANGE: (f32, f32) = (0.0, 1.0);
pub const QUALITY_RANGE: (f32, f32) = (0.0, 1.0);
pub const TARGET_FRAME_RATE_RANGE: (u32, u32) = (15, 240);
pub const DEBOUNCE_DELAY_RANGE_MS: (u32, u32) = (0, 2000);
pub const TRANSITION_DURATION_RANGE_MS: (u32, u32) = (0, 5000);

/// Complete set of parameters for one rendered frame.
///
/// The renderer treats these as plain numbers: it never sees transitions or
/// recommendations, only the value the controller settled on for this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizationSettings {
    pub particle_count: u32,
    pub render_scale: f32,
    pub animation_speed: f32,
    pub interaction_enabled: bool,
    pub interaction_radius: f32,
    /// Overall visual-fidelity dial in \[0, 1\].
    pub quality_level: f32,
    pub enable_advanced_effects: bool,
    pub target_frame_rate: u32,
    pub debounce_delay_ms: u32,
    pub transition_duration_ms: u32,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        Self {
            particle_count: 150,
            render_scale: 1.0,
            animation_speed: 1.0,
            interaction_enabled: true,
            interaction_radius: 0.4,
            quality_level: 0.8,
            enable_advanced_effects: true,
            target_frame_rate: 60,
            debounce_delay_ms: 150,
            transition_duration_ms: 300,
        }
    }
}

/// Configured limits for the two load-bearing fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettingsBounds {
    pub min_particles: u32,
    pub max_particles: u32,
    pub min_render_scale: f32,
    pub max_render_scale: f32,
}

impl Default for SettingsBounds {
    fn default() -> Self {
        Self {
            min_particles: 20,
            max_particles: 300,
            min_render_scale: 0.6,
            max_render_scale: 1.25,
        }
    }
}

impl SettingsBounds {
    /// Ordered, usable bounds: at least one particle, finite positive scales.
    /// Unusable scales fall back to the defaults; reversed pairs are swapped.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.max_particles = self.max_particles.max(1);
        if self.min_particles > self.max_particles {
            std::mem::swap(&mut self.min_particles, &mut self.max_particles);
        }
        if !(self.min_render_scale.is_finite() && self.min_render_scale > 0.0) {
            self.min_render_scale = defaults.min_render_scale;
        }
        if !(self.max_render_scale.is_finite() && self.max_render_scale > 0.0) {
            self.max_render_scale = defaults.max_render_scale;
        }
        if self.min_render_scale > self.max_render_scale {
            std::mem::swap(&mut self.min_render_scale, &mut self.max_render_scale);
        }
        self
    }
}

impl OptimizationSettings {
    /// Clamp every field to its documented range.
    pub fn clamped(mut self, bounds: &SettingsBounds) -> Self {
        let bounds = bounds.sanitized();
        self.particle_count = self
            .particle_count
            .clamp(bounds.min_particles, bounds.max_particles);
        self.render_scale = clamp_finite(
            self.render_scale,
            bounds.min_render_scale,
            bounds.max_render_scale,
        );
        self.animation_speed = clamp_finite(
            self.animation_speed,
            ANIMATION_SPEED_RANGE.0,
            ANIMATION_SPEED_RANGE.1,
        );
        self.interaction_radius = clamp_finite(
            self.interaction_radius,
            INTERACTION_RADIUS_RANGE.0,
            INTERACTION_RADIUS_RANGE.1,
        );
        self.quality_level = clamp_finite(self.quality_level, QUALITY_RANGE.0, QUALITY_RANGE.1);
        self.target_frame_rate = self
            .target_frame_rate
            .clamp(TARGET_FRAME_RATE_RANGE.0, TARGET_FRAME_RATE_RANGE.1);
        self.debounce_delay_ms = self
            .debounce_delay_ms
            .clamp(DEBOUNCE_DELAY_RANGE_MS.0, DEBOUNCE_DELAY_RANGE_MS.1);
        self.transition_duration_ms = self
            .transition_duration_ms
            .clamp(TRANSITION_DURATION_RANGE_MS.0, TRANSITION_DURATION_RANGE_MS.1);
        self
    }

    /// Reject values a renderer must never receive.
    pub fn validate(&self) -> Result<(), AdjustError> {
        let fields = [
            ("render_scale", self.render_scale),
            ("animation_speed", self.animation_speed),
            ("interaction_radius", self.interaction_radius),
            ("quality_level", self.quality_level),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AdjustError::NonFinite(name));
            }
        }
        Ok(())
    }

    /// Pack into the uniform layout consumed by the particle shaders.
    pub fn shader_params(&self) -> ShaderParams {
        ShaderParams {
            particle_count: self.particle_count as f32,
            render_scale: self.render_scale,
            animation_speed: self.animation_speed,
            interaction_radius: if self.interaction_enabled {
                self.interaction_radius
            } else {
                0.0
            },
            quality_level: self.quality_level,
            interaction_enabled: f32::from(u8::from(self.interaction_enabled)),
            advanced_effects: f32::from(u8::from(self.enable_advanced_effects)),
            target_frame_rate: self.target_frame_rate as f32,
        }
    }
}

/// Uniform block layout (32 bytes, 16-byte aligned rows).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderParams {
    pub particle_count: f32,
    pub render_scale: f32,
    pub animation_speed: f32,
    pub interaction_radius: f32,
    pub quality_level: f32,
    pub interaction_enabled: f32,
    pub advanced_effects: f32,
    pub target_frame_rate: f32,
}

/// Typed settings diff. `None` leaves a field untouched.
///
/// `max_particle_count` is a cap rather than a target: it only ever lowers
/// the particle count, whatever the other fields say.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub particle_count: Option<u32>,
    pub max_particle_count: Option<u32>,
    pub render_scale: Option<f32>,
    pub animation_speed: Option<f32>,
    pub interaction_enabled: Option<bool>,
    pub interaction_radius: Option<f32>,
    pub quality_level: Option<f32>,
    pub enable_advanced_effects: Option<bool>,
    pub target_frame_rate: Option<u32>,
    pub debounce_delay_ms: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two patches. Fields set in `later` win; caps combine by minimum.
    pub fn merge(self, later: SettingsPatch) -> SettingsPatch {
        SettingsPatch {
            particle_count: later.particle_count.or(self.particle_count),
            max_particle_count: match (self.max_particle_count, later.max_particle_count) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => b.or(a),
            },
            render_scale: later.render_scale.or(self.render_scale),
            animation_speed: later.animation_speed.or(self.animation_speed),
            interaction_enabled: later.interaction_enabled.or(self.interaction_enabled),
            interaction_radius: later.interaction_radius.or(self.interaction_radius),
            quality_level: later.quality_level.or(self.quality_level),
            enable_advanced_effects: later
                .enable_advanced_effects
                .or(self.enable_advanced_effects),
            target_frame_rate: later.target_frame_rate.or(self.target_frame_rate),
            debounce_delay_ms: later.debounce_delay_ms.or(self.debounce_delay_ms),
        }
    }

    /// The settings this patch asks for when applied on top of `base`.
    pub fn target_from(&self, base: &OptimizationSettings) -> OptimizationSettings {
        let mut out = *base;
        if let Some(v) = self.particle_count {
            out.particle_count = v;
        }
        if let Some(cap) = self.max_particle_count {
            out.particle_count = out.particle_count.min(cap);
        }
        if let Some(v) = self.render_scale {
            out.render_scale = v;
        }
        if let Some(v) = self.animation_speed {
            out.animation_speed = v;
        }
        if let Some(v) = self.interaction_enabled {
            out.interaction_enabled = v;
        }
        if let Some(v) = self.interaction_radius {
            out.interaction_radius = v;
        }
        if let Some(v) = self.quality_level {
            out.quality_level = v;
        }
        if let Some(v) = self.enable_advanced_effects {
            out.enable_advanced_effects = v;
        }
        if let Some(v) = self.target_frame_rate {
            out.target_frame_rate = v;
        }
        if let Some(v) = self.debounce_delay_ms {
            out.debounce_delay_ms = v;
        }
        out
    }

    /// Apply without smoothing, clamped to bounds.
    pub fn apply(&self, base: &OptimizationSettings, bounds: &SettingsBounds) -> OptimizationSettings {
        self.target_from(base).clamped(bounds)
    }
}

/// How far a blend moves and how far it is allowed to move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendPolicy {
    /// Fraction of the remaining distance covered by numeric fields.
    pub factor: f32,
    /// Boolean fields take the target value once this reaches 0.5.
    pub switch_progress: f32,
    /// Largest particle-count move as a fraction of the current value.
    pub max_particle_step: Option<f32>,
    /// Largest render-scale move as a fraction of the current value.
    pub max_scale_step: Option<f32>,
}

impl BlendPolicy {
    /// Live adjustment: partial numeric move, step-limited, booleans switch now.
    pub fn adjustment(factor: f32, max_particle_step: f32, max_scale_step: f32) -> Self {
        Self {
            factor,
            switch_progress: 1.0,
            max_particle_step: Some(max_particle_step),
            max_scale_step: Some(max_scale_step),
        }
    }

    /// Transition frame: eased numeric position, booleans flip at halfway.
    pub fn interpolation(eased: f32, progress: f32) -> Self {
        Self {
            factor: eased,
            switch_progress: progress,
            max_particle_step: None,
            max_scale_step: None,
        }
    }
}

/// Move `current` toward `target` under `policy`, then clamp to `bounds`.
pub fn blend_and_clamp(
    current: &OptimizationSettings,
    target: &OptimizationSettings,
    policy: BlendPolicy,
    bounds: &SettingsBounds,
) -> OptimizationSettings {
    let t = if policy.factor.is_finite() {
        policy.factor.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let switch = policy.switch_progress >= 0.5 || policy.switch_progress.is_nan();

    let particles = step_limited(
        current.particle_count as f32,
        mix(current.particle_count as f32, target.particle_count as f32, t),
        policy.max_particle_step,
    );
    let render_scale = step_limited(
        current.render_scale,
        mix(current.render_scale, target.render_scale, t),
        policy.max_scale_step,
    );

    OptimizationSettings {
        particle_count: particles.round().max(0.0) as u32,
        render_scale,
        animation_speed: mix(current.animation_speed, target.animation_speed, t),
        interaction_enabled: pick(switch, current.interaction_enabled, target.interaction_enabled),
        interaction_radius: mix(current.interaction_radius, target.interaction_radius, t),
        quality_level: mix(current.quality_level, target.quality_level, t),
        enable_advanced_effects: pick(
            switch,
            current.enable_advanced_effects,
            target.enable_advanced_effects,
        ),
        target_frame_rate: lerp_u32(current.target_frame_rate, target.target_frame_rate, t),
        debounce_delay_ms: lerp_u32(current.debounce_delay_ms, target.debounce_delay_ms, t),
        transition_duration_ms: lerp_u32(
            current.transition_duration_ms,
            target.transition_duration_ms,
            t,
        ),
    }
    .clamped(bounds)
}

#[inline]
fn pick(switch: bool, current: bool, target: bool) -> bool {
    if switch {
        target
    } else {
        current
    }
}

// Lands exactly on `b` at full weight
#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 {
        b
    } else {
        a.lerp(b, t)
    }
}

#[inline]
fn lerp_u32(a: u32, b: u32, t: f32) -> u32 {
    mix(a as f32, b as f32, t).round().max(0.0) as u32
}

fn step_limited(current: f32, proposed: f32, max_fraction: Option<f32>) -> f32 {
    match max_fraction {
        Some(fraction) if current.is_finite() && current > 0.0 => {
            let limit = current * fraction.max(0.0);
            current + (proposed - current).clamp(-limit, limit)
        }
        _ => proposed,
    }
}

/// Clamp that maps NaN to the lower bound instead of propagating it.
#[inline]
pub(crate) fn clamp_finite(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}
