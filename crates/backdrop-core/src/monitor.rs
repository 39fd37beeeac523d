//! Per-frame sampling and rolling performance statistics.
//!
//! `update` is called once per displayed frame with the frame callback's
//! timestamp. Samples go into a fixed-size ring; everything derived from them
//! (fps, stability, thermal trend, memory) is recomputed only when a metrics
//! interval boundary is crossed, so the per-frame cost is a push and a
//! comparison.

use crate::config::AdaptiveConfig;
use crate::constants::*;
use crate::settings::SettingsPatch;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Heuristic classification of sustained frame-rate degradation.
///
/// Derived purely from the fps trend; it is not a temperature reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThermalState {
    #[default]
    Normal,
    Fair,
    Serious,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceSample {
    pub timestamp_ms: f64,
    pub frame_time_ms: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceMetrics {
    /// Frames per second over the last metrics interval.
    pub fps: f32,
    /// Mean of the fps history.
    pub avg_fps: f32,
    /// Most recent frame interval.
    pub frame_time: f32,
    /// Mean frame interval across the sample window.
    pub avg_frame_time: f32,
    pub stability_score: f32,
    pub thermal_state: ThermalState,
    /// Last known heap usage; 0 until a memory reading is available.
    pub memory_mb: f64,
    /// Frames in the window longer than twice the frame budget.
    pub jank_frames: u32,
    /// Number of completed metrics intervals.
    pub intervals: u64,
}

/// Host heap usage, when the platform exposes it.
pub trait MemorySource {
    fn used_memory_mb(&self) -> Option<f64>;
}

/// Memory source for hosts without a memory API.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMemoryApi;

impl MemorySource for NoMemoryApi {
    fn used_memory_mb(&self) -> Option<f64> {
        None
    }
}

pub struct PerformanceMonitor {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
    fps_history: SmallVec<[f32; 32]>,
    history_len: usize,
    interval_ms: f64,
    interval_start: Option<f64>,
    frames_in_interval: u32,
    last_timestamp: Option<f64>,
    frame_budget_ms: f64,
    target_fps: f32,
    memory_pressure_mb: f64,
    memory_limit_mb: f64,
    memory: Box<dyn MemorySource>,
    metrics: PerformanceMetrics,
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("samples", &self.samples.len())
            .field("fps_history", &self.fps_history.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl PerformanceMonitor {
    pub fn new(config: &AdaptiveConfig, memory: Box<dyn MemorySource>) -> Self {
        let capacity = config.sample_window.max(2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            fps_history: SmallVec::new(),
            history_len: config.fps_history_len.max(2 * THERMAL_WINDOW),
            interval_ms: config.metrics_interval_ms,
            interval_start: None,
            frames_in_interval: 0,
            last_timestamp: None,
            frame_budget_ms: 1000.0 / f64::from(REFERENCE_FRAME_RATE),
            target_fps: REFERENCE_FRAME_RATE,
            memory_pressure_mb: config.memory_pressure_mb,
            memory_limit_mb: config.memory_limit_mb,
            memory,
            metrics: PerformanceMetrics::default(),
        }
    }

    /// Frame rate the surface aims for. Sets the jank budget and the scale
    /// the recommendation bands are read on.
    pub fn set_target_frame_rate(&mut self, fps: u32) {
        let fps = fps.max(1);
        self.frame_budget_ms = 1000.0 / f64::from(fps);
        self.target_fps = fps as f32;
    }

    /// Latest fps expressed against a 60 fps target.
    pub fn relative_fps(&self) -> f32 {
        self.metrics.fps * REFERENCE_FRAME_RATE / self.target_fps
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn samples(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    pub fn fps_history(&self) -> &[f32] {
        &self.fps_history
    }

    /// True once at least one metrics interval has completed.
    pub fn has_metrics(&self) -> bool {
        !self.fps_history.is_empty()
    }

    /// Record a frame. Returns true when metrics were recomputed.
    pub fn update(&mut self, timestamp_ms: f64) -> bool {
        if !timestamp_ms.is_finite() {
            return false;
        }
        let Some(prev) = self.last_timestamp else {
            self.last_timestamp = Some(timestamp_ms);
            self.interval_start = Some(timestamp_ms);
            return false;
        };
        let frame_time = timestamp_ms - prev;
        if frame_time <= 0.0 {
            // Duplicate or out-of-order callback
            return false;
        }
        self.last_timestamp = Some(timestamp_ms);

        if frame_time > MAX_FRAME_GAP_MS {
            log::debug!("[monitor] {frame_time:.0}ms gap, restarting interval");
            self.interval_start = Some(timestamp_ms);
            self.frames_in_interval = 0;
            return false;
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(PerformanceSample {
            timestamp_ms,
            frame_time_ms: frame_time,
        });
        self.frames_in_interval += 1;

        let start = *self.interval_start.get_or_insert(prev);
        let elapsed = timestamp_ms - start;
        if elapsed >= self.interval_ms {
            self.recompute(elapsed, frame_time);
            self.interval_start = Some(timestamp_ms);
            self.frames_in_interval = 0;
            true
        } else {
            false
        }
    }

    fn recompute(&mut self, elapsed_ms: f64, last_frame_time: f64) {
        let fps = (f64::from(self.frames_in_interval) * 1000.0 / elapsed_ms) as f32;

        if self.fps_history.len() == self.history_len {
            self.fps_history.remove(0);
        }
        self.fps_history.push(fps);

        let n = self.samples.len().max(1) as f64;
        let avg_frame_time = self.samples.iter().map(|s| s.frame_time_ms).sum::<f64>() / n;
        let jank_limit = self.frame_budget_ms * 2.0;
        let jank_frames = self
            .samples
            .iter()
            .filter(|s| s.frame_time_ms > jank_limit)
            .count() as u32;

        let m = &mut self.metrics;
        m.fps = fps;
        m.avg_fps = mean(&self.fps_history);
        m.frame_time = last_frame_time as f32;
        m.avg_frame_time = avg_frame_time as f32;
        m.stability_score = stability_score(&self.fps_history);
        m.thermal_state = thermal_state(&self.fps_history);
        m.jank_frames = jank_frames;
        m.intervals += 1;
        if let Some(mb) = self.memory.used_memory_mb().filter(|mb| mb.is_finite()) {
            m.memory_mb = mb;
        }

        log::trace!(
            "[monitor] fps={:.1} avg={:.1} ft={:.2}ms stability={:.2} thermal={:?} mem={:.0}MB",
            m.fps,
            m.avg_fps,
            m.avg_frame_time,
            m.stability_score,
            m.thermal_state,
            m.memory_mb
        );
    }

    /// Partial settings the current metrics call for. Empty means "no opinion".
    pub fn recommendations(&self) -> SettingsPatch {
        if !self.has_metrics() {
            return SettingsPatch::default();
        }
        let m = &self.metrics;
        let fps = self.relative_fps();
        let mut patch = SettingsPatch::default();

        if fps < FPS_AGGRESSIVE || m.thermal_state == ThermalState::Critical {
            let particles = (fps * AGGRESSIVE_PARTICLES_PER_FPS).round() as u32;
            patch.particle_count = Some(particles.max(AGGRESSIVE_MIN_PARTICLES));
            patch.render_scale = Some(AGGRESSIVE_RENDER_SCALE);
            patch.quality_level = Some(AGGRESSIVE_QUALITY);
            patch.enable_advanced_effects = Some(false);
            patch.interaction_enabled = Some(false);
        } else if fps < FPS_MODERATE {
            let particles = (fps * MODERATE_PARTICLES_PER_FPS).round() as u32;
            patch.particle_count = Some(particles.max(MODERATE_MIN_PARTICLES));
            patch.render_scale = Some(MODERATE_RENDER_SCALE);
            patch.quality_level = Some(MODERATE_QUALITY);
            patch.enable_advanced_effects = Some(false);
        } else if fps < FPS_MILD {
            patch.render_scale = Some(MILD_RENDER_SCALE);
            patch.quality_level = Some(MILD_QUALITY);
        }

        if m.thermal_state >= ThermalState::Serious {
            patch.animation_speed = Some(THERMAL_ANIMATION_SPEED);
        }
        if m.memory_mb > self.memory_pressure_mb {
            patch.max_particle_count = Some(MEMORY_PRESSURE_PARTICLE_CAP);
        }
        patch
    }

    /// Whether the metrics show room to restore quality.
    pub fn has_headroom(&self) -> bool {
        let m = &self.metrics;
        self.has_metrics()
            && self.relative_fps() >= RECOVERY_FPS
            && m.stability_score >= RECOVERY_STABILITY
            && m.thermal_state == ThermalState::Normal
            && m.memory_mb <= self.memory_pressure_mb
    }

    /// Acceptable until proven otherwise: true before the first interval.
    pub fn is_performance_acceptable(&self) -> bool {
        if !self.has_metrics() {
            return true;
        }
        self.relative_fps() >= ACCEPTABLE_FPS && self.metrics.memory_mb < self.memory_limit_mb
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// `1 - σ/μ` over the most recent fps values, clamped to \[0, 1\].
pub fn stability_score(fps_history: &[f32]) -> f32 {
    let recent = &fps_history[fps_history.len().saturating_sub(STABILITY_WINDOW)..];
    if recent.len() < 2 {
        return 1.0;
    }
    let mu = mean(recent);
    if mu <= 0.0 {
        return 0.0;
    }
    let variance = recent.iter().map(|v| (v - mu).powi(2)).sum::<f32>() / recent.len() as f32;
    (1.0 - variance.sqrt() / mu).clamp(0.0, 1.0)
}

/// Compare the latest ten fps values against the ten before them.
pub fn thermal_state(fps_history: &[f32]) -> ThermalState {
    let n = fps_history.len();
    if n < 2 * THERMAL_WINDOW {
        return ThermalState::Normal;
    }
    let recent = mean(&fps_history[n - THERMAL_WINDOW..]);
    let previous = mean(&fps_history[n - 2 * THERMAL_WINDOW..n - THERMAL_WINDOW]);
    if previous <= 0.0 {
        return ThermalState::Normal;
    }
    let ratio = recent / previous;
    if ratio < THERMAL_CRITICAL_RATIO && recent < THERMAL_CRITICAL_FPS {
        ThermalState::Critical
    } else if ratio < THERMAL_SERIOUS_RATIO && recent < THERMAL_SERIOUS_FPS {
        ThermalState::Serious
    } else if ratio < THERMAL_FAIR_RATIO && recent < THERMAL_FAIR_FPS {
        ThermalState::Fair
    } else {
        ThermalState::Normal
    }
}
