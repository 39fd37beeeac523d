// Shared fixtures for the host-side integration tests.
#![allow(dead_code)]

use backdrop_core::*;

pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
pub const DESKTOP_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub fn high_end_info() -> GraphicsInfo {
    GraphicsInfo {
        renderer: "ANGLE (NVIDIA, NVIDIA GeForce RTX 3080 Direct3D11 vs_5_0 ps_5_0)".into(),
        vendor: "Google Inc. (NVIDIA)".into(),
        webgl2: true,
        max_texture_size: 16384,
        extensions: vec!["EXT_color_buffer_float".into(), "OES_texture_float_linear".into()],
        webgpu: true,
    }
}

pub fn desktop_platform() -> PlatformSignals {
    PlatformSignals {
        cores: Some(16),
        memory_gb: Some(8.0),
        pixel_ratio: 1.0,
        is_mobile: false,
        is_tablet: false,
    }
}

/// Score-0.9 high-tier desktop profile.
pub fn high_tier_device() -> DeviceProfile {
    DeviceProfile {
        tier: DeviceTier::High,
        score: 0.9,
        gpu_class: GpuClass::HighEnd,
        cores: 8,
        memory_gb: 8.0,
        pixel_ratio: 1.0,
        is_mobile: false,
        is_tablet: false,
        features: DeviceFeatures {
            webgl2: true,
            float_textures: true,
            max_texture_size: 16384,
            webgpu: false,
            renderer: Some("NVIDIA GeForce RTX 3080".into()),
        },
    }
}

pub fn low_tier_device() -> DeviceProfile {
    DeviceProfile::conservative(&PlatformSignals::default())
}

pub fn desktop_viewport() -> ViewportProfile {
    ViewportProfile::from_signal(&ViewportSignal::resize(1920.0, 1080.0, 1.0))
}

pub fn mobile_signal() -> ViewportSignal {
    ViewportSignal::resize(375.0, 667.0, 2.0).with_class_hint(DeviceClass::Mobile)
}

pub fn manager_for(device: DeviceProfile, viewport: ViewportProfile) -> AdaptiveQualityManager {
    AdaptiveQualityManager::new(AdaptiveConfig::default(), device, viewport, Box::new(NoMemoryApi))
}

/// Tick `manager` at `from + k * interval` for every k while the time is
/// `<= until`. Returns the last timestamp used.
pub fn run_frames(manager: &mut AdaptiveQualityManager, from: f64, interval: f64, until: f64) -> f64 {
    let mut k = 0u32;
    let mut last = from;
    loop {
        let t = from + f64::from(k) * interval;
        if t > until {
            return last;
        }
        manager.tick(t);
        last = t;
        k += 1;
    }
}

/// Same as [`run_frames`] for a bare monitor.
pub fn feed_monitor(monitor: &mut PerformanceMonitor, from: f64, interval: f64, until: f64) -> f64 {
    let mut k = 0u32;
    let mut last = from;
    loop {
        let t = from + f64::from(k) * interval;
        if t > until {
            return last;
        }
        monitor.update(t);
        last = t;
        k += 1;
    }
}
