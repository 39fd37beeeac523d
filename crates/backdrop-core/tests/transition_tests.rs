// Host-side tests for eased settings transitions.

use backdrop_core::*;

fn scale(v: f32) -> OptimizationSettings {
    OptimizationSettings {
        render_scale: v,
        ..OptimizationSettings::default()
    }
}

fn manager() -> TransitionManager {
    TransitionManager::new(Easing::EaseOutCubic, SettingsBounds::default())
}

#[test]
fn ease_out_cubic_midpoint() {
    let mut tm = manager();
    tm.start_transition(scale(0.8), scale(1.0), 300.0, 1000.0);
    let mid = tm.update(1150.0).expect("transition in flight");
    assert!((mid.render_scale - 0.975).abs() < 1e-4, "scale {}", mid.render_scale);
    assert!(tm.is_transitioning());
    assert!((tm.state().unwrap().progress - 0.5).abs() < 1e-6);
}

#[test]
fn endpoints_are_exact() {
    let from = OptimizationSettings {
        particle_count: 200,
        render_scale: 1.1,
        quality_level: 0.9,
        ..OptimizationSettings::default()
    };
    let to = OptimizationSettings {
        particle_count: 155,
        render_scale: 0.95,
        quality_level: 0.3,
        enable_advanced_effects: false,
        ..OptimizationSettings::default()
    };
    let mut tm = manager();
    assert_eq!(tm.start_transition(from, to, 300.0, 0.0), from);
    assert_eq!(tm.update(0.0), Some(from));
    assert_eq!(tm.update(300.0), Some(to));
    assert!(!tm.is_transitioning());
    assert_eq!(tm.update(400.0), None);

    let mut late = manager();
    late.start_transition(from, to, 300.0, 0.0);
    assert_eq!(late.update(10_000.0), Some(to));
}

#[test]
fn degenerate_durations_jump_to_target() {
    for duration in [0.0, -50.0, f64::NAN, f64::INFINITY] {
        let mut tm = manager();
        let shown = tm.start_transition(scale(0.8), scale(1.0), duration, 0.0);
        assert_eq!(shown, scale(1.0), "duration {duration}");
        assert!(!tm.is_transitioning());
        assert_eq!(tm.update(1.0), None);
    }
}

#[test]
fn restart_continues_from_interpolated_value() {
    let mut tm = manager();
    tm.start_transition(scale(0.8), scale(1.0), 300.0, 0.0);
    let shown = tm.start_transition(scale(0.8), scale(0.6), 300.0, 150.0);
    assert!((shown.render_scale - 0.975).abs() < 1e-4, "snapped back to {}", shown.render_scale);
    let state = tm.state().unwrap();
    assert!((state.from.render_scale - 0.975).abs() < 1e-4);
    let next = tm.update(150.0).unwrap();
    assert!((next.render_scale - 0.975).abs() < 1e-4);
    let later = tm.update(300.0).unwrap();
    assert!(later.render_scale < next.render_scale);
}

#[test]
fn booleans_flip_at_halfway() {
    let from = OptimizationSettings::default();
    let to = OptimizationSettings {
        enable_advanced_effects: false,
        ..from
    };
    let mut tm = manager();
    tm.start_transition(from, to, 100.0, 0.0);
    assert!(tm.update(40.0).unwrap().enable_advanced_effects);
    assert!(!tm.update(50.0).unwrap().enable_advanced_effects);
}

#[test]
fn cancel_aborts_without_finalizing() {
    let mut tm = manager();
    tm.start_transition(scale(0.8), scale(1.0), 300.0, 0.0);
    tm.update(100.0);
    let cancelled = tm.cancel_transition().expect("was in flight");
    assert_eq!(cancelled.to, scale(1.0));
    assert!(!tm.is_transitioning());
    assert_eq!(tm.update(500.0), None);
    assert!(tm.cancel_transition().is_none());
}

#[test]
fn sample_does_not_advance() {
    let mut tm = manager();
    tm.start_transition(scale(0.8), scale(1.0), 300.0, 0.0);
    let peek = tm.sample(400.0).unwrap();
    assert_eq!(peek, scale(1.0));
    assert!(tm.is_transitioning());
}

#[test]
fn easings_hit_endpoints_and_are_monotonic() {
    for easing in [
        Easing::Linear,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
    ] {
        assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = easing.apply(i as f32 / 100.0);
            assert!(v >= prev, "{easing:?} not monotonic at {i}");
            prev = v;
        }
        assert_eq!(easing.apply(-1.0), easing.apply(0.0));
        assert_eq!(easing.apply(2.0), easing.apply(1.0));
    }
    assert!((Easing::EaseOutCubic.apply(0.5) - 0.875).abs() < 1e-6);
}

#[test]
fn easing_parses_from_config_names() {
    assert_eq!("linear".parse::<Easing>(), Ok(Easing::Linear));
    assert_eq!("ease-in-out-cubic".parse::<Easing>(), Ok(Easing::EaseInOutCubic));
    assert!("bounce".parse::<Easing>().is_err());
}

#[test]
fn reversed_bounds_are_usable() {
    let bounds = SettingsBounds {
        min_particles: 300,
        max_particles: 20,
        min_render_scale: 0.9,
        max_render_scale: f32::NAN,
    };
    let mut tm = TransitionManager::new(Easing::EaseOutCubic, bounds);
    tm.start_transition(scale(0.8), scale(1.0), 300.0, 0.0);
    let mid = tm.update(150.0).expect("transition in flight");
    assert!((mid.render_scale - 0.975).abs() < 1e-4, "scale {}", mid.render_scale);
    assert_eq!(mid.particle_count, 150);
}
