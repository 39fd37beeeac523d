// Host-side tests for settings diffs, blending and clamping.

use backdrop_core::*;
use rand::prelude::*;

fn settings(particles: u32, scale: f32) -> OptimizationSettings {
    OptimizationSettings {
        particle_count: particles,
        render_scale: scale,
        ..OptimizationSettings::default()
    }
}

#[test]
fn adjustment_blend_moves_thirty_percent() {
    let bounds = SettingsBounds::default();
    let from = settings(200, 1.0);
    let to = settings(50, 0.6);
    let out = blend_and_clamp(&from, &to, BlendPolicy::adjustment(0.3, 0.3, 0.2), &bounds);
    assert_eq!(out.particle_count, 155);
    assert!((out.render_scale - 0.88).abs() < 1e-5, "scale {}", out.render_scale);
}

#[test]
fn step_limits_bound_a_single_recompute() {
    let bounds = SettingsBounds::default();
    let from = settings(200, 1.0);
    let to = settings(20, 0.6);
    let out = blend_and_clamp(&from, &to, BlendPolicy::adjustment(1.0, 0.3, 0.2), &bounds);
    assert_eq!(out.particle_count, 140);
    assert!((out.render_scale - 0.8).abs() < 1e-5);

    let up = blend_and_clamp(&to, &from, BlendPolicy::adjustment(1.0, 0.3, 0.2), &bounds);
    assert_eq!(up.particle_count, 26);
    assert!((up.render_scale - 0.72).abs() < 1e-5);
}

#[test]
fn booleans_switch_immediately_when_adjusting_but_halfway_when_interpolating() {
    let bounds = SettingsBounds::default();
    let from = OptimizationSettings::default();
    let to = OptimizationSettings {
        enable_advanced_effects: false,
        interaction_enabled: false,
        ..from
    };
    let adjusted = blend_and_clamp(&from, &to, BlendPolicy::adjustment(0.3, 0.3, 0.2), &bounds);
    assert!(!adjusted.enable_advanced_effects);
    assert!(!adjusted.interaction_enabled);

    let early = blend_and_clamp(&from, &to, BlendPolicy::interpolation(0.9, 0.49), &bounds);
    assert!(early.enable_advanced_effects);
    let late = blend_and_clamp(&from, &to, BlendPolicy::interpolation(0.9, 0.5), &bounds);
    assert!(!late.enable_advanced_effects);
}

#[test]
fn clamped_enforces_bounds_and_scrubs_nan() {
    let bounds = SettingsBounds::default();
    let wild = OptimizationSettings {
        particle_count: 10_000,
        render_scale: f32::NAN,
        animation_speed: 50.0,
        quality_level: -1.0,
        target_frame_rate: 1,
        ..OptimizationSettings::default()
    };
    assert!(wild.validate().is_err());
    let fixed = wild.clamped(&bounds);
    assert_eq!(fixed.particle_count, bounds.max_particles);
    assert_eq!(fixed.render_scale, bounds.min_render_scale);
    assert_eq!(fixed.animation_speed, 2.0);
    assert_eq!(fixed.quality_level, 0.0);
    assert_eq!(fixed.target_frame_rate, 15);
    assert!(fixed.validate().is_ok());
}

#[test]
fn validate_names_the_bad_field() {
    let s = OptimizationSettings {
        quality_level: f32::INFINITY,
        ..OptimizationSettings::default()
    };
    assert_eq!(s.validate(), Err(AdjustError::NonFinite("quality_level")));
}

#[test]
fn patch_merge_prefers_later_and_keeps_tightest_cap() {
    let first = SettingsPatch {
        particle_count: Some(100),
        max_particle_count: Some(75),
        render_scale: Some(0.9),
        ..SettingsPatch::default()
    };
    let second = SettingsPatch {
        particle_count: Some(60),
        max_particle_count: Some(90),
        enable_advanced_effects: Some(false),
        ..SettingsPatch::default()
    };
    let merged = first.merge(second);
    assert_eq!(merged.particle_count, Some(60));
    assert_eq!(merged.max_particle_count, Some(75));
    assert_eq!(merged.render_scale, Some(0.9));
    assert_eq!(merged.enable_advanced_effects, Some(false));
    assert!(SettingsPatch::default().is_empty());
    assert!(!merged.is_empty());
}

#[test]
fn cap_only_lowers_particle_count() {
    let cap = SettingsPatch {
        max_particle_count: Some(75),
        ..SettingsPatch::default()
    };
    assert_eq!(cap.target_from(&settings(200, 1.0)).particle_count, 75);
    assert_eq!(cap.target_from(&settings(40, 1.0)).particle_count, 40);
}

#[test]
fn shader_params_pack_into_uniform_block() {
    assert_eq!(std::mem::size_of::<ShaderParams>(), 32);
    let s = OptimizationSettings {
        interaction_enabled: false,
        ..OptimizationSettings::default()
    };
    let p = s.shader_params();
    assert_eq!(p.interaction_radius, 0.0);
    assert_eq!(p.interaction_enabled, 0.0);
    assert_eq!(p.advanced_effects, 1.0);
    assert_eq!(p.particle_count, s.particle_count as f32);
}

#[test]
fn blended_settings_stay_within_bounds() {
    let bounds = SettingsBounds::default();
    let mut rng = StdRng::seed_from_u64(7);
    let random_settings = |rng: &mut StdRng| OptimizationSettings {
        particle_count: rng.gen_range(bounds.min_particles..=bounds.max_particles),
        render_scale: rng.gen_range(bounds.min_render_scale..=bounds.max_render_scale),
        animation_speed: rng.gen_range(0.1..2.0),
        interaction_enabled: rng.gen(),
        interaction_radius: rng.gen_range(0.0..1.0),
        quality_level: rng.gen_range(0.0..1.0),
        enable_advanced_effects: rng.gen(),
        target_frame_rate: rng.gen_range(30..=120),
        debounce_delay_ms: rng.gen_range(0..500),
        transition_duration_ms: rng.gen_range(0..1000),
    };
    for _ in 0..1000 {
        let a = random_settings(&mut rng);
        let b = random_settings(&mut rng);
        let factor = rng.gen_range(-0.5..1.5);
        for policy in [
            BlendPolicy::adjustment(factor, 0.3, 0.2),
            BlendPolicy::interpolation(factor, factor),
        ] {
            let out = blend_and_clamp(&a, &b, policy, &bounds);
            assert!((bounds.min_particles..=bounds.max_particles).contains(&out.particle_count));
            assert!(out.render_scale >= bounds.min_render_scale);
            assert!(out.render_scale <= bounds.max_render_scale);
            assert!(out.validate().is_ok());
        }
        let limited = blend_and_clamp(&a, &b, BlendPolicy::adjustment(factor, 0.3, 0.2), &bounds);
        let moved = (limited.particle_count as f32 - a.particle_count as f32).abs();
        assert!(moved <= a.particle_count as f32 * 0.3 + 1.0);
        assert!((limited.render_scale - a.render_scale).abs() <= a.render_scale * 0.2 + 1e-5);
    }
}

#[test]
fn unusable_bounds_are_repaired_before_clamping() {
    let bounds = SettingsBounds {
        min_particles: 300,
        max_particles: 20,
        min_render_scale: f32::NAN,
        max_render_scale: 0.5,
    };
    let fixed = bounds.sanitized();
    assert_eq!((fixed.min_particles, fixed.max_particles), (20, 300));
    assert_eq!((fixed.min_render_scale, fixed.max_render_scale), (0.5, 0.6));

    let s = OptimizationSettings::default().clamped(&bounds);
    assert_eq!(s.particle_count, 150);
    assert_eq!(s.render_scale, 0.6);

    let empty = SettingsBounds {
        max_particles: 0,
        ..SettingsBounds::default()
    }
    .sanitized();
    assert_eq!((empty.min_particles, empty.max_particles), (1, 20));
}
