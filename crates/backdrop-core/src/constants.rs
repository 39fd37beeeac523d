//! Tuning constants for scoring, monitoring and scaling.
//!
//! These constants express intended behavior (thresholds, caps, multipliers)
//! and keep magic numbers out of the algorithms. Anything a host may want to
//! tune per surface lives in [`crate::AdaptiveConfig`] instead.

// ---------------- Capability scoring ----------------

pub const BASE_SCORE: f32 = 0.3;
pub const MIN_SCORE: f32 = 0.1;
pub const MAX_SCORE: f32 = 1.0;

// GPU class contributions (renderer-string heuristics)
pub const GPU_HIGH_END_BONUS: f32 = 0.30;
pub const GPU_INTEGRATED_BONUS: f32 = 0.15;
pub const GPU_UNKNOWN_BONUS: f32 = 0.10;
pub const GPU_LOW_END_BONUS: f32 = 0.0;

// Core count and memory contributions, each capped individually
pub const CORES_FOR_FULL_BONUS: f32 = 8.0;
pub const CORES_BONUS_CAP: f32 = 0.15;
pub const MEMORY_GB_FOR_FULL_BONUS: f32 = 8.0;
pub const MEMORY_BONUS_CAP: f32 = 0.15;

// WebGL capability breadth
pub const WEBGL2_BONUS: f32 = 0.05;
pub const FLOAT_TEXTURE_BONUS: f32 = 0.03;
pub const LARGE_TEXTURE_BONUS: f32 = 0.02;
pub const LARGE_TEXTURE_SIZE: u32 = 8192;

// Platform factors applied after the additive terms
pub const MOBILE_PLATFORM_FACTOR: f32 = 0.6;
pub const TABLET_PLATFORM_FACTOR: f32 = 0.8;
pub const DESKTOP_PLATFORM_FACTOR: f32 = 1.0;

// Tier thresholds (monotonic: score >= HIGH => High, >= MEDIUM => Medium)
pub const HIGH_TIER_THRESHOLD: f32 = 0.7;
pub const MEDIUM_TIER_THRESHOLD: f32 = 0.4;

// Profile used when no graphics context can be created
pub const FALLBACK_SCORE: f32 = 0.2;
pub const FALLBACK_MAX_TEXTURE_SIZE: u32 = 2048;

// ---------------- Performance monitoring ----------------

/// Frame intervals above this are treated as a discontinuity (hidden tab).
pub const MAX_FRAME_GAP_MS: f64 = 1000.0;
/// Number of fps samples compared by the stability score.
pub const STABILITY_WINDOW: usize = 5;
/// Number of fps samples per half of the thermal trend comparison.
pub const THERMAL_WINDOW: usize = 10;

pub const THERMAL_CRITICAL_RATIO: f32 = 0.5;
pub const THERMAL_CRITICAL_FPS: f32 = 25.0;
pub const THERMAL_SERIOUS_RATIO: f32 = 0.7;
pub const THERMAL_SERIOUS_FPS: f32 = 40.0;
pub const THERMAL_FAIR_RATIO: f32 = 0.85;
pub const THERMAL_FAIR_FPS: f32 = 50.0;

/// Frame rate the bands below are written for. Measured fps is rescaled by
/// `REFERENCE_FRAME_RATE / target` first, so a 30 fps surface running at 30
/// lands where a 60 fps surface running at 60 does.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

// Recommendation bands
pub const FPS_AGGRESSIVE: f32 = 30.0;
pub const FPS_MODERATE: f32 = 45.0;
pub const FPS_MILD: f32 = 55.0;
pub const AGGRESSIVE_MIN_PARTICLES: u32 = 20;
pub const AGGRESSIVE_PARTICLES_PER_FPS: f32 = 2.0;
pub const AGGRESSIVE_RENDER_SCALE: f32 = 0.6;
pub const AGGRESSIVE_QUALITY: f32 = 0.3;
pub const MODERATE_MIN_PARTICLES: u32 = 50;
pub const MODERATE_PARTICLES_PER_FPS: f32 = 2.5;
pub const MODERATE_RENDER_SCALE: f32 = 0.75;
pub const MODERATE_QUALITY: f32 = 0.6;
pub const MILD_RENDER_SCALE: f32 = 0.9;
pub const MILD_QUALITY: f32 = 0.8;
pub const MEMORY_PRESSURE_PARTICLE_CAP: u32 = 75;
pub const THERMAL_ANIMATION_SPEED: f32 = 0.8;

/// Performance is acceptable at or above this frame rate (reference scale).
pub const ACCEPTABLE_FPS: f32 = 30.0;

// Recovery toward the responsive baseline
pub const RECOVERY_FPS: f32 = 58.0;
pub const RECOVERY_STABILITY: f32 = 0.9;

// ---------------- Responsive scaling ----------------

/// Reference viewport area (1920x1080) for the screen-area ratio.
pub const REFERENCE_AREA: f32 = 1920.0 * 1080.0;
pub const MIN_AREA_RATIO: f32 = 0.05;
pub const MAX_AREA_RATIO: f32 = 4.0;
pub const AREA_SCALE_EXPONENT: f32 = 0.3;

pub const MOBILE_SCALE_MULTIPLIER: f32 = 0.6;
pub const TABLET_SCALE_MULTIPLIER: f32 = 0.8;
pub const DESKTOP_SCALE_MULTIPLIER: f32 = 1.0;

pub const LOW_TIER_SCALE_MULTIPLIER: f32 = 0.7;
pub const MEDIUM_TIER_SCALE_MULTIPLIER: f32 = 0.9;
pub const HIGH_TIER_SCALE_MULTIPLIER: f32 = 1.1;

pub const VERY_HIGH_PIXEL_RATIO: f32 = 2.0;
pub const VERY_HIGH_PIXEL_RATIO_PENALTY: f32 = 0.8;
pub const HIGH_PIXEL_RATIO: f32 = 1.5;
pub const HIGH_PIXEL_RATIO_PENALTY: f32 = 0.9;

/// Particle count at the reference area before tier/platform caps.
pub const BASE_PARTICLE_COUNT: f32 = 200.0;
pub const LOW_TIER_PARTICLE_CAP: u32 = 80;
pub const MEDIUM_TIER_PARTICLE_CAP: u32 = 150;
pub const HIGH_TIER_PARTICLE_CAP: u32 = 250;
pub const MOBILE_PARTICLE_CAP: u32 = 60;
pub const TABLET_PARTICLE_CAP: u32 = 120;

// ---------------- Viewport classification ----------------

pub const MOBILE_MAX_WIDTH: f32 = 768.0;
pub const TABLET_MAX_WIDTH: f32 = 1024.0;
pub const ULTRAWIDE_ASPECT: f32 = 2.1;

// Orientation changes need extra settle time for mobile browser chrome
pub const MIN_ORIENTATION_DEBOUNCE_MS: f64 = 200.0;
pub const MAX_ORIENTATION_DEBOUNCE_MS: f64 = 600.0;
