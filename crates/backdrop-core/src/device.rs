//! One-shot device capability scoring.
//!
//! The host supplies platform signals and a [`GraphicsProbe`] that opens a
//! throwaway graphics context. The scorer combines both into an immutable
//! [`DeviceProfile`]; probing again means calling [`CapabilityScorer::detect`]
//! again and handing the new profile to the manager explicitly.

use crate::constants::*;
use crate::error::ProbeError;

/// Coarse bucket summarizing expected rendering headroom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceTier {
    Low,
    Medium,
    High,
}

impl DeviceTier {
    /// Monotonic in `score`.
    pub fn from_score(score: f32) -> Self {
        if score >= HIGH_TIER_THRESHOLD {
            DeviceTier::High
        } else if score >= MEDIUM_TIER_THRESHOLD {
            DeviceTier::Medium
        } else {
            DeviceTier::Low
        }
    }
}

/// GPU class guessed from the renderer string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpuClass {
    HighEnd,
    Integrated,
    LowEnd,
    Unknown,
}

impl GpuClass {
    fn bonus(self) -> f32 {
        match self {
            GpuClass::HighEnd => GPU_HIGH_END_BONUS,
            GpuClass::Integrated => GPU_INTEGRATED_BONUS,
            GpuClass::LowEnd => GPU_LOW_END_BONUS,
            GpuClass::Unknown => GPU_UNKNOWN_BONUS,
        }
    }
}

// Checked in order: software/low-end first so "ANGLE (Google, SwiftShader)"
// never matches a vendor name further down.
const LOW_END_MARKERS: &[&str] = &[
    "swiftshader",
    "llvmpipe",
    "softpipe",
    "software",
    "microsoft basic render",
    "mali-4",
    "mali-t",
    "adreno (tm) 3",
    "adreno (tm) 4",
    "powervr sgx",
    "hd graphics 2",
    "hd graphics 3",
    "gma ",
];
const HIGH_END_MARKERS: &[&str] = &[
    "nvidia",
    "geforce",
    "quadro",
    "rtx",
    "gtx",
    "radeon rx",
    "radeon pro",
    "radeon(tm) rx",
    "apple m1",
    "apple m2",
    "apple m3",
    "apple m4",
];
const INTEGRATED_MARKERS: &[&str] = &[
    "intel", "iris", "uhd", "apple", "adreno", "mali", "radeon", "powervr", "vega",
];

pub fn classify_renderer(renderer: &str) -> GpuClass {
    let r = renderer.to_ascii_lowercase();
    if r.trim().is_empty() {
        GpuClass::Unknown
    } else if LOW_END_MARKERS.iter().any(|m| r.contains(m)) {
        GpuClass::LowEnd
    } else if HIGH_END_MARKERS.iter().any(|m| r.contains(m)) {
        GpuClass::HighEnd
    } else if INTEGRATED_MARKERS.iter().any(|m| r.contains(m)) {
        GpuClass::Integrated
    } else {
        GpuClass::Unknown
    }
}

// What browsers report when the real renderer is hidden
const MASKED_RENDERERS: &[&str] = &["webkit webgl", "mozilla", "generic renderer"];

/// True when a renderer string carries no hardware information.
pub fn is_masked_renderer(renderer: &str) -> bool {
    let r = renderer.trim().to_ascii_lowercase();
    r.is_empty() || MASKED_RENDERERS.contains(&r.as_str())
}

/// Raw answers from the disposable graphics context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphicsInfo {
    /// Unmasked renderer string when available, else the masked one.
    pub renderer: String,
    pub vendor: String,
    pub webgl2: bool,
    pub max_texture_size: u32,
    pub extensions: Vec<String>,
    /// A WebGPU adapter could be acquired.
    pub webgpu: bool,
}

impl GraphicsInfo {
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(name))
    }

    pub fn float_textures(&self) -> bool {
        self.has_extension("OES_texture_float") || self.has_extension("EXT_color_buffer_float")
    }
}

/// Host-provided access to a throwaway graphics context.
pub trait GraphicsProbe {
    fn probe(&self) -> Result<GraphicsInfo, ProbeError>;
}

/// Host facts that do not need a graphics context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSignals {
    pub cores: Option<u32>,
    pub memory_gb: Option<f32>,
    pub pixel_ratio: f32,
    pub is_mobile: bool,
    pub is_tablet: bool,
}

impl Default for PlatformSignals {
    fn default() -> Self {
        Self {
            cores: None,
            memory_gb: None,
            pixel_ratio: 1.0,
            is_mobile: false,
            is_tablet: false,
        }
    }
}

// Browsers without navigator.deviceMemory / hardwareConcurrency
const ASSUMED_CORES: u32 = 4;
const ASSUMED_MEMORY_GB: f32 = 4.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceFeatures {
    pub webgl2: bool,
    pub float_textures: bool,
    pub max_texture_size: u32,
    pub webgpu: bool,
    pub renderer: Option<String>,
}

/// Immutable summary of the device's rendering headroom.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
    /// Always within \[0.1, 1.0\].
    pub score: f32,
    pub gpu_class: GpuClass,
    pub cores: u32,
    pub memory_gb: f32,
    pub pixel_ratio: f32,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub features: DeviceFeatures,
}

impl DeviceProfile {
    /// Conservative profile used when the graphics context is unavailable.
    ///
    /// Score, tier and features are fixed; platform facts are kept since they
    /// were gathered without a context.
    pub fn conservative(platform: &PlatformSignals) -> Self {
        Self {
            tier: DeviceTier::Low,
            score: FALLBACK_SCORE,
            gpu_class: GpuClass::Unknown,
            cores: platform.cores.unwrap_or(ASSUMED_CORES).max(1),
            memory_gb: platform.memory_gb.unwrap_or(ASSUMED_MEMORY_GB),
            pixel_ratio: sanitize_pixel_ratio(platform.pixel_ratio),
            is_mobile: platform.is_mobile,
            is_tablet: platform.is_tablet,
            features: DeviceFeatures {
                max_texture_size: FALLBACK_MAX_TEXTURE_SIZE,
                ..DeviceFeatures::default()
            },
        }
    }
}

pub struct CapabilityScorer;

impl CapabilityScorer {
    /// Probe the host once and score it. Never fails.
    pub fn detect(platform: &PlatformSignals, probe: &dyn GraphicsProbe) -> DeviceProfile {
        match probe.probe() {
            Ok(info) => Self::score(platform, &info),
            Err(e) => {
                log::warn!("[probe] {e}; using conservative profile");
                DeviceProfile::conservative(platform)
            }
        }
    }

    /// Score already-gathered graphics information.
    pub fn score(platform: &PlatformSignals, info: &GraphicsInfo) -> DeviceProfile {
        let gpu_class = classify_renderer(&info.renderer);
        let cores = platform.cores.unwrap_or(ASSUMED_CORES).max(1);
        let memory_gb = match platform.memory_gb {
            Some(gb) if gb.is_finite() && gb > 0.0 => gb,
            _ => ASSUMED_MEMORY_GB,
        };
        let float_textures = info.float_textures();

        let mut score = BASE_SCORE + gpu_class.bonus();
        score += (cores as f32 / CORES_FOR_FULL_BONUS).min(1.0) * CORES_BONUS_CAP;
        score += (memory_gb / MEMORY_GB_FOR_FULL_BONUS).min(1.0) * MEMORY_BONUS_CAP;
        if info.webgl2 {
            score += WEBGL2_BONUS;
        }
        if float_textures {
            score += FLOAT_TEXTURE_BONUS;
        }
        if info.max_texture_size >= LARGE_TEXTURE_SIZE {
            score += LARGE_TEXTURE_BONUS;
        }
        score *= platform_factor(platform);
        let score = if score.is_finite() {
            score.clamp(MIN_SCORE, MAX_SCORE)
        } else {
            FALLBACK_SCORE
        };
        let tier = DeviceTier::from_score(score);

        log::info!(
            "[probe] renderer=\"{}\" gpu={:?} cores={} mem={:.1}GB webgl2={} score={:.2} tier={:?}",
            info.renderer,
            gpu_class,
            cores,
            memory_gb,
            info.webgl2,
            score,
            tier
        );

        DeviceProfile {
            tier,
            score,
            gpu_class,
            cores,
            memory_gb,
            pixel_ratio: sanitize_pixel_ratio(platform.pixel_ratio),
            is_mobile: platform.is_mobile,
            is_tablet: platform.is_tablet,
            features: DeviceFeatures {
                webgl2: info.webgl2,
                float_textures,
                max_texture_size: info.max_texture_size,
                webgpu: info.webgpu,
                renderer: (!info.renderer.is_empty()).then(|| info.renderer.clone()),
            },
        }
    }
}

fn platform_factor(platform: &PlatformSignals) -> f32 {
    if platform.is_mobile {
        MOBILE_PLATFORM_FACTOR
    } else if platform.is_tablet {
        TABLET_PLATFORM_FACTOR
    } else {
        DESKTOP_PLATFORM_FACTOR
    }
}

pub(crate) fn sanitize_pixel_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
