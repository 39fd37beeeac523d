//! The adaptive control loop for one rendering surface.
//!
//! Typical usage:
//! - Score the device once with [`crate::CapabilityScorer::detect`]
//! - Construct with `AdaptiveQualityManager::new(config, device, viewport, memory)`
//! - Call `tick(timestamp_ms)` from every frame callback and forward the
//!   returned settings to the renderer
//! - Forward viewport notifications to `notify_viewport`
//! - Call `dispose()` when the surface goes away

use crate::clock::{ScheduledTask, TaskSlot};
use crate::config::{AdaptiveConfig, ConfigWarning};
use crate::device::DeviceProfile;
use crate::error::AdjustError;
use crate::monitor::{MemorySource, PerformanceMetrics, PerformanceMonitor};
use crate::resize::ResizeDebouncer;
use crate::scaler::{reconcile, ResponsiveScaler};
use crate::settings::{blend_and_clamp, BlendPolicy, OptimizationSettings, SettingsPatch, ShaderParams};
use crate::transition::TransitionManager;
use crate::viewport::{ViewportProfile, ViewportSignal};

// Float fields closer than this to their goal are considered arrived
const SETTLE_EPSILON: f32 = 1e-3;

/// Why a new target was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reason {
    Performance,
    Recovery,
    Baseline,
}

pub struct AdaptiveQualityManager {
    config: AdaptiveConfig,
    warnings: Vec<ConfigWarning>,
    device: DeviceProfile,
    viewport: ViewportProfile,
    scaler: ResponsiveScaler,
    monitor: PerformanceMonitor,
    transitions: TransitionManager,
    debouncer: ResizeDebouncer,
    overrides: SettingsPatch,
    baseline: OptimizationSettings,
    target: OptimizationSettings,
    current: OptimizationSettings,
    cooldown: TaskSlot,
    started: bool,
    adjustments: u64,
    disposed: bool,
}

impl std::fmt::Debug for AdaptiveQualityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveQualityManager")
            .field("tier", &self.device.tier)
            .field("viewport", &self.viewport)
            .field("current", &self.current)
            .field("target", &self.target)
            .field("adjustments", &self.adjustments)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl AdaptiveQualityManager {
    pub fn new(
        config: AdaptiveConfig,
        device: DeviceProfile,
        viewport: ViewportProfile,
        memory: Box<dyn MemorySource>,
    ) -> Self {
        let (config, warnings) = config.sanitized();
        let scaler = ResponsiveScaler::new(&config);
        let baseline = scaler.baseline(&viewport, &device);
        let monitor = PerformanceMonitor::new(&config, memory);
        log::info!(
            "[quality] start tier={:?} class={:?} particles={} scale={:.2}",
            device.tier,
            viewport.device_class,
            baseline.particle_count,
            baseline.render_scale
        );
        let mut manager = Self {
            transitions: TransitionManager::new(config.easing, config.bounds),
            debouncer: ResizeDebouncer::new(&config),
            scaler,
            monitor,
            config,
            warnings,
            device,
            viewport,
            overrides: SettingsPatch::default(),
            baseline,
            target: baseline,
            current: baseline,
            cooldown: TaskSlot::new(),
            started: false,
            adjustments: 0,
            disposed: false,
        };
        manager.follow_target();
        manager
    }

    /// Advance one frame. Never fails; returns the settings for this frame.
    pub fn tick(&mut self, now: f64) -> OptimizationSettings {
        if self.disposed {
            return self.current;
        }
        if !now.is_finite() {
            return self.frame_settings();
        }
        self.monitor.update(now);
        if !self.started {
            self.started = true;
            self.cooldown.schedule(now + self.config.cooldown_ms);
        }
        self.poll_resize(now);

        if self.cooldown_elapsed(now) {
            match self.next_target() {
                Ok(Some((next, reason))) => self.retarget(next, reason, now),
                Ok(None) => {}
                Err(e) => log::warn!("[quality] keeping last settings: {e}"),
            }
        }

        if let Some(s) = self.transitions.update(now) {
            self.current = s;
        }
        self.frame_settings()
    }

    /// Settings for the renderer, including temporary resize degradation.
    pub fn frame_settings(&self) -> OptimizationSettings {
        if !self.debouncer.is_resizing() {
            return self.current;
        }
        let mut s = self.current;
        s.enable_advanced_effects = false;
        s.render_scale *= self.config.resize_scale_factor;
        s.clamped(&self.config.bounds)
    }

    pub fn shader_params(&self) -> ShaderParams {
        self.frame_settings().shader_params()
    }

    /// Apply a patch immediately, skipping blending and cooldown.
    ///
    /// The patch also stays layered over every later baseline, so explicit
    /// workarounds are not undone by recovery or viewport changes.
    pub fn force_adjustment(&mut self, patch: SettingsPatch, now: f64) {
        if self.disposed || patch.is_empty() {
            return;
        }
        self.overrides = self.overrides.merge(patch);
        self.baseline = self
            .overrides
            .apply(&self.scaler.baseline(&self.viewport, &self.device), &self.config.bounds);
        self.transitions.cancel_transition();
        self.current = patch.apply(&self.current, &self.config.bounds);
        self.target = self.current;
        self.follow_target();
        if now.is_finite() {
            self.started = true;
            self.cooldown.schedule(now + self.config.cooldown_ms);
        }
        log::info!("[quality] forced {patch:?}");
    }

    /// Forward a resize/orientation notification. Returns the settle deadline
    /// so hosts with real timers can wake up for it.
    pub fn notify_viewport(&mut self, signal: &ViewportSignal, now: f64) -> Option<ScheduledTask> {
        if self.disposed || !now.is_finite() {
            return None;
        }
        Some(self.debouncer.signal(signal, now))
    }

    /// Handle a settled viewport if its window has passed. Returns true if
    /// the baseline was recomputed.
    pub fn poll_resize(&mut self, now: f64) -> bool {
        if self.disposed {
            return false;
        }
        let Some(viewport) = self.debouncer.poll(now) else {
            return false;
        };
        self.viewport = viewport;
        self.rebaseline(now);
        true
    }

    /// Replace the device profile after an explicit re-probe.
    pub fn reinit(&mut self, device: DeviceProfile, now: f64) {
        if self.disposed {
            return;
        }
        log::info!(
            "[quality] re-detected tier={:?} score={:.2}",
            device.tier,
            device.score
        );
        self.device = device;
        self.rebaseline(now);
    }

    /// Cancel every pending deadline and stop reacting to input.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.transitions.cancel_transition();
        self.debouncer.cancel();
        self.cooldown.cancel();
        self.disposed = true;
        log::debug!("[quality] disposed after {} adjustment(s)", self.adjustments);
    }

    pub fn current_settings(&self) -> &OptimizationSettings {
        &self.current
    }

    pub fn target_settings(&self) -> &OptimizationSettings {
        &self.target
    }

    pub fn baseline_settings(&self) -> &OptimizationSettings {
        &self.baseline
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.monitor.metrics()
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn viewport(&self) -> &ViewportProfile {
        &self.viewport
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Corrections applied to the configuration at construction.
    pub fn config_warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn is_resizing(&self) -> bool {
        self.debouncer.is_resizing()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_transitioning()
    }

    pub fn is_performance_acceptable(&self) -> bool {
        self.monitor.is_performance_acceptable()
    }

    pub fn adjustments(&self) -> u64 {
        self.adjustments
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn cooldown_elapsed(&mut self, now: f64) -> bool {
        self.cooldown.take_due(now);
        !self.cooldown.is_pending()
    }

    fn next_target(&self) -> Result<Option<(OptimizationSettings, Reason)>, AdjustError> {
        let cfg = &self.config;
        let recommended = self.monitor.recommendations();
        let (goal, factor, reason) = if !recommended.is_empty() {
            // Recommendations only ever lower load; raising it is recovery's job
            let lowered = reconcile(&self.target, &recommended.target_from(&self.target));
            let goal = reconcile(&self.baseline, &lowered);
            (goal, cfg.blend_factor, Reason::Performance)
        } else if cfg.recovery_enabled && self.monitor.has_headroom() {
            (self.baseline, cfg.blend_factor, Reason::Recovery)
        } else {
            (reconcile(&self.baseline, &self.target), 1.0, Reason::Baseline)
        };
        goal.validate()?;

        let policy = BlendPolicy::adjustment(factor, cfg.max_particle_step, cfg.max_scale_step);
        let mut next = blend_and_clamp(&self.target, &goal, policy, &cfg.bounds);
        if settings_close(&next, &goal) {
            next = goal.clamped(&cfg.bounds);
        }
        next.validate()?;
        if next == self.target {
            return Ok(None);
        }
        Ok(Some((next, reason)))
    }

    fn retarget(&mut self, next: OptimizationSettings, reason: Reason, now: f64) {
        log::info!(
            "[quality] {:?}: particles {} -> {}, scale {:.2} -> {:.2}, effects {} (fps {:.1})",
            reason,
            self.target.particle_count,
            next.particle_count,
            self.target.render_scale,
            next.render_scale,
            next.enable_advanced_effects,
            self.monitor.metrics().fps
        );
        self.current = self.transitions.start_transition(
            self.current,
            next,
            f64::from(next.transition_duration_ms),
            now,
        );
        self.target = next;
        self.follow_target();
        self.cooldown.schedule(now + self.config.cooldown_ms);
        if reason != Reason::Baseline {
            self.adjustments += 1;
        }
    }

    /// Point the frame budget and resize window at the current target.
    fn follow_target(&mut self) {
        self.monitor.set_target_frame_rate(self.target.target_frame_rate);
        self.debouncer.set_delay_ms(f64::from(self.target.debounce_delay_ms));
    }

    fn rebaseline(&mut self, now: f64) {
        let fresh = self.scaler.baseline(&self.viewport, &self.device);
        self.baseline = self.overrides.apply(&fresh, &self.config.bounds);
        log::info!(
            "[quality] baseline {:?} {}x{}: particles {}, scale {:.2}",
            self.viewport.device_class,
            self.viewport.width,
            self.viewport.height,
            self.baseline.particle_count,
            self.baseline.render_scale
        );
        match self.next_baseline_target() {
            Ok(Some(next)) => self.retarget(next, Reason::Baseline, now),
            Ok(None) => {}
            Err(e) => log::warn!("[quality] keeping last settings: {e}"),
        }
    }

    fn next_baseline_target(&self) -> Result<Option<OptimizationSettings>, AdjustError> {
        let cfg = &self.config;
        let goal = reconcile(&self.baseline, &self.target);
        goal.validate()?;
        let policy = BlendPolicy::adjustment(1.0, cfg.max_particle_step, cfg.max_scale_step);
        let next = blend_and_clamp(&self.target, &goal, policy, &cfg.bounds);
        next.validate()?;
        Ok((next != self.target).then_some(next))
    }
}

fn settings_close(a: &OptimizationSettings, b: &OptimizationSettings) -> bool {
    let near = |x: f32, y: f32| (x - y).abs() < SETTLE_EPSILON;
    a.particle_count.abs_diff(b.particle_count) <= 1
        && near(a.render_scale, b.render_scale)
        && near(a.animation_speed, b.animation_speed)
        && near(a.interaction_radius, b.interaction_radius)
        && near(a.quality_level, b.quality_level)
        && a.interaction_enabled == b.interaction_enabled
        && a.enable_advanced_effects == b.enable_advanced_effects
        && a.target_frame_rate == b.target_frame_rate
        && a.debounce_delay_ms == b.debounce_delay_ms
        && a.transition_duration_ms == b.transition_duration_ms
}
