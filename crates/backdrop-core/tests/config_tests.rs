// Host-side tests for configuration sanitizing and string overrides.

use backdrop_core::*;

#[test]
fn defaults_need_no_correction() {
    let (config, warnings) = AdaptiveConfig::default().sanitized();
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(config, AdaptiveConfig::default());
}

#[test]
fn reversed_bounds_are_swapped() {
    let mut config = AdaptiveConfig::default();
    config.bounds.min_particles = 300;
    config.bounds.max_particles = 20;
    config.bounds.min_render_scale = 1.5;
    config.bounds.max_render_scale = 0.5;
    let (fixed, warnings) = config.sanitized();
    assert_eq!(fixed.bounds.min_particles, 20);
    assert_eq!(fixed.bounds.max_particles, 300);
    assert_eq!(fixed.bounds.min_render_scale, 0.5);
    assert_eq!(fixed.bounds.max_render_scale, 1.5);
    assert_eq!(warnings.len(), 2);
}

#[test]
fn out_of_range_values_are_corrected_and_reported() {
    let config = AdaptiveConfig {
        blend_factor: 3.0,
        max_scale_step: f32::NAN,
        cooldown_ms: -10.0,
        metrics_interval_ms: 0.0,
        orientation_debounce_ms: 50.0,
        fps_history_len: 4,
        ..AdaptiveConfig::default()
    };
    let (fixed, warnings) = config.sanitized();
    assert_eq!(fixed.blend_factor, 1.0);
    assert_eq!(fixed.max_scale_step, 0.2);
    assert_eq!(fixed.cooldown_ms, 2000.0);
    assert_eq!(fixed.metrics_interval_ms, 1000.0);
    assert_eq!(fixed.orientation_debounce_ms, 200.0);
    assert_eq!(fixed.fps_history_len, 20);

    let fields: Vec<_> = warnings.iter().map(|w| w.field).collect();
    for expected in [
        "blend_factor",
        "max_scale_step",
        "cooldown_ms",
        "metrics_interval_ms",
        "orientation_debounce_ms",
        "fps_history_len",
    ] {
        assert!(fields.contains(&expected), "missing warning for {expected}");
    }
    assert!(warnings[0].to_string().starts_with("blend_factor: "));
}

#[test]
fn zero_max_particles_is_usable() {
    let mut config = AdaptiveConfig::default();
    config.bounds.min_particles = 0;
    config.bounds.max_particles = 0;
    let (fixed, _) = config.sanitized();
    assert_eq!(fixed.bounds.max_particles, 1);
    assert!(fixed.bounds.min_particles <= fixed.bounds.max_particles);
}

#[test]
fn overrides_parse_known_keys() {
    let mut config = AdaptiveConfig::default();
    config.apply_override("max-particles", " 120 ").unwrap();
    config.apply_override("blend-factor", "0.5").unwrap();
    config.apply_override("easing", "linear").unwrap();
    config.apply_override("recovery", "false").unwrap();
    config.apply_override("cooldown-ms", "3000").unwrap();
    assert_eq!(config.bounds.max_particles, 120);
    assert_eq!(config.blend_factor, 0.5);
    assert_eq!(config.easing, Easing::Linear);
    assert!(!config.recovery_enabled);
    assert_eq!(config.cooldown_ms, 3000.0);
}

#[test]
fn overrides_reject_bad_input() {
    let mut config = AdaptiveConfig::default();
    assert_eq!(
        config.apply_override("sparkle", "1"),
        Err(ConfigError::UnknownKey("sparkle".into()))
    );
    assert_eq!(
        config.apply_override("max-particles", "lots"),
        Err(ConfigError::InvalidValue {
            key: "max-particles".into(),
            value: "lots".into()
        })
    );
    assert!(config.apply_override("easing", "bounce").is_err());
    assert_eq!(config, AdaptiveConfig::default());
}

#[test]
fn manager_reports_corrections() {
    let config = AdaptiveConfig {
        blend_factor: -1.0,
        ..AdaptiveConfig::default()
    };
    let viewport = ViewportProfile::from_signal(&ViewportSignal::resize(1920.0, 1080.0, 1.0));
    let device = DeviceProfile::conservative(&PlatformSignals::default());
    let manager = AdaptiveQualityManager::new(config, device, viewport, Box::new(NoMemoryApi));
    assert_eq!(manager.config_warnings().len(), 1);
    assert_eq!(manager.config().blend_factor, 0.0);
}

#[test]
fn every_listed_key_is_accepted() {
    let samples = [
        ("min-particles", "30"),
        ("max-particles", "250"),
        ("min-scale", "0.5"),
        ("max-scale", "1.0"),
        ("blend-factor", "0.4"),
        ("cooldown-ms", "1500"),
        ("debounce-ms", "100"),
        ("orientation-debounce-ms", "500"),
        ("transition-ms", "250"),
        ("easing", "ease-out-quad"),
        ("recovery", "true"),
    ];
    assert_eq!(samples.len(), OVERRIDE_KEYS.len());
    let mut config = AdaptiveConfig::default();
    for (key, value) in samples {
        assert!(OVERRIDE_KEYS.contains(&key));
        config.apply_override(key, value).unwrap();
    }
    let (_, warnings) = config.sanitized();
    assert!(warnings.is_empty(), "{warnings:?}");
}
