//! Viewport- and device-driven baseline settings.
//!
//! The baseline ignores live performance entirely. The controller reconciles
//! it with the performance-driven target through [`reconcile`].

use crate::config::AdaptiveConfig;
use crate::constants::*;
use crate::device::{DeviceProfile, DeviceTier};
use crate::settings::{OptimizationSettings, SettingsBounds};
use crate::viewport::{DeviceClass, ViewportProfile};

/// Per class/tier values that are looked up rather than computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassTierEntry {
    pub interaction_radius: f32,
    pub animation_speed: f32,
    pub quality_level: f32,
    pub enable_advanced_effects: bool,
    pub interaction_enabled: bool,
    pub target_frame_rate: u32,
}

const fn entry(
    interaction_radius: f32,
    animation_speed: f32,
    quality_level: f32,
    enable_advanced_effects: bool,
    interaction_enabled: bool,
    target_frame_rate: u32,
) -> ClassTierEntry {
    ClassTierEntry {
        interaction_radius,
        animation_speed,
        quality_level,
        enable_advanced_effects,
        interaction_enabled,
        target_frame_rate,
    }
}

// class    tier    radius speed quality advanced interaction fps
// Mobile   Low     0.25   0.7   0.35    no       no          30
// Mobile   Medium  0.25   0.8   0.50    no       yes         60
// Mobile   High    0.25   0.9   0.65    no       yes         60
// Tablet   Low     0.30   0.8   0.45    no       yes         30
// Tablet   Medium  0.32   0.9   0.60    no       yes         60
// Tablet   High    0.35   1.0   0.75    yes      yes         60
// Desktop  Low     0.35   0.9   0.55    no       yes         60
// Desktop  Medium  0.40   1.0   0.75    yes      yes         60
// Desktop  High    0.45   1.0   0.90    yes      yes         60
const CLASS_TIER_TABLE: [[ClassTierEntry; 3]; 3] = [
    [
        entry(0.25, 0.7, 0.35, false, false, 30),
        entry(0.25, 0.8, 0.50, false, true, 60),
        entry(0.25, 0.9, 0.65, false, true, 60),
    ],
    [
        entry(0.30, 0.8, 0.45, false, true, 30),
        entry(0.32, 0.9, 0.60, false, true, 60),
        entry(0.35, 1.0, 0.75, true, true, 60),
    ],
    [
        entry(0.35, 0.9, 0.55, false, true, 60),
        entry(0.40, 1.0, 0.75, true, true, 60),
        entry(0.45, 1.0, 0.90, true, true, 60),
    ],
];

pub fn class_tier_entry(class: DeviceClass, tier: DeviceTier) -> ClassTierEntry {
    let row = match class {
        DeviceClass::Mobile => 0,
        DeviceClass::Tablet => 1,
        DeviceClass::Desktop => 2,
    };
    let col = match tier {
        DeviceTier::Low => 0,
        DeviceTier::Medium => 1,
        DeviceTier::High => 2,
    };
    CLASS_TIER_TABLE[row][col]
}

fn class_scale(class: DeviceClass) -> f32 {
    match class {
        DeviceClass::Mobile => MOBILE_SCALE_MULTIPLIER,
        DeviceClass::Tablet => TABLET_SCALE_MULTIPLIER,
        DeviceClass::Desktop => DESKTOP_SCALE_MULTIPLIER,
    }
}

fn tier_scale(tier: DeviceTier) -> f32 {
    match tier {
        DeviceTier::Low => LOW_TIER_SCALE_MULTIPLIER,
        DeviceTier::Medium => MEDIUM_TIER_SCALE_MULTIPLIER,
        DeviceTier::High => HIGH_TIER_SCALE_MULTIPLIER,
    }
}

fn pixel_ratio_penalty(pixel_ratio: f32) -> f32 {
    if pixel_ratio > VERY_HIGH_PIXEL_RATIO {
        VERY_HIGH_PIXEL_RATIO_PENALTY
    } else if pixel_ratio > HIGH_PIXEL_RATIO {
        HIGH_PIXEL_RATIO_PENALTY
    } else {
        1.0
    }
}

fn tier_particle_cap(tier: DeviceTier) -> u32 {
    match tier {
        DeviceTier::Low => LOW_TIER_PARTICLE_CAP,
        DeviceTier::Medium => MEDIUM_TIER_PARTICLE_CAP,
        DeviceTier::High => HIGH_TIER_PARTICLE_CAP,
    }
}

/// Viewport area relative to 1920x1080, kept within sane limits.
pub fn screen_area_ratio(viewport: &ViewportProfile) -> f32 {
    (viewport.area() / REFERENCE_AREA).clamp(MIN_AREA_RATIO, MAX_AREA_RATIO)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResponsiveScaler {
    bounds: SettingsBounds,
    debounce_ms: u32,
    transition_ms: u32,
}

impl ResponsiveScaler {
    pub fn new(config: &AdaptiveConfig) -> Self {
        Self {
            bounds: config.bounds.sanitized(),
            debounce_ms: config.debounce_ms.round() as u32,
            transition_ms: config.transition_ms.round() as u32,
        }
    }

    /// Baseline settings for a viewport on a device. Pure.
    pub fn baseline(
        &self,
        viewport: &ViewportProfile,
        device: &DeviceProfile,
    ) -> OptimizationSettings {
        let class = viewport.device_class;
        let area_ratio = screen_area_ratio(viewport);

        let render_scale = class_scale(class)
            * tier_scale(device.tier)
            * pixel_ratio_penalty(viewport.pixel_ratio)
            * area_ratio.powf(AREA_SCALE_EXPONENT);

        let mut particles =
            ((BASE_PARTICLE_COUNT * area_ratio.sqrt()).round() as u32).min(tier_particle_cap(device.tier));
        particles = match class {
            DeviceClass::Mobile => particles.min(MOBILE_PARTICLE_CAP),
            DeviceClass::Tablet => particles.min(TABLET_PARTICLE_CAP),
            DeviceClass::Desktop => particles,
        };

        let e = class_tier_entry(class, device.tier);
        OptimizationSettings {
            particle_count: particles,
            render_scale,
            animation_speed: e.animation_speed,
            interaction_enabled: e.interaction_enabled,
            interaction_radius: e.interaction_radius,
            quality_level: e.quality_level,
            enable_advanced_effects: e.enable_advanced_effects,
            target_frame_rate: e.target_frame_rate,
            debounce_delay_ms: self.debounce_ms,
            transition_duration_ms: self.transition_ms,
        }
        .clamped(&self.bounds)
    }
}

/// Merge the responsive baseline with the performance-driven settings.
///
/// Load-reducing fields take the more conservative source; fields the
/// performance monitor has no opinion on come from the baseline.
pub fn reconcile(
    baseline: &OptimizationSettings,
    live: &OptimizationSettings,
) -> OptimizationSettings {
    OptimizationSettings {
        particle_count: baseline.particle_count.min(live.particle_count),
        render_scale: baseline.render_scale.min(live.render_scale),
        animation_speed: baseline.animation_speed.min(live.animation_speed),
        interaction_enabled: baseline.interaction_enabled && live.interaction_enabled,
        interaction_radius: baseline.interaction_radius,
        quality_level: baseline.quality_level.min(live.quality_level),
        enable_advanced_effects: baseline.enable_advanced_effects && live.enable_advanced_effects,
        target_frame_rate: baseline.target_frame_rate.min(live.target_frame_rate),
        debounce_delay_ms: baseline.debounce_delay_ms,
        transition_duration_ms: baseline.transition_duration_ms,
    }
}
