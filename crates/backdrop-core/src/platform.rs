//! User-agent classification and known browser workarounds.

use crate::settings::SettingsPatch;
use smallvec::SmallVec;

/// What the user-agent string (plus touch support) says about the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub is_mobile: bool,
    pub is_tablet: bool,
}

/// Classify a user-agent string.
///
/// `max_touch_points` disambiguates iPadOS, which reports a desktop
/// `Macintosh` user agent.
pub fn classify_user_agent(ua: &str, max_touch_points: u32) -> UserAgentInfo {
    let ua = ua.to_ascii_lowercase();
    let is_ipad = ua.contains("ipad") || (ua.contains("macintosh") && max_touch_points > 1);
    let is_android_tablet = ua.contains("android") && !ua.contains("mobile");
    let is_tablet = is_ipad || is_android_tablet || ua.contains("tablet") || ua.contains("silk/");
    let is_mobile = !is_tablet
        && (ua.contains("mobi")
            || ua.contains("iphone")
            || ua.contains("ipod")
            || ua.contains("windows phone"));
    UserAgentInfo {
        is_mobile,
        is_tablet,
    }
}

/// Browser environments that need a fixed settings override at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserQuirk {
    /// iOS WebKit kills pages that hold large canvases under memory pressure.
    IosWebKit,
    /// Firefox composites full-screen blended layers noticeably slower.
    Firefox,
    /// In-app webviews (social apps) throttle rAF and share the host's budget.
    InAppWebView,
}

impl BrowserQuirk {
    pub fn patch(self) -> SettingsPatch {
        match self {
            BrowserQuirk::IosWebKit => SettingsPatch {
                max_particle_count: Some(100),
                render_scale: Some(0.85),
                ..SettingsPatch::default()
            },
            BrowserQuirk::Firefox => SettingsPatch {
                quality_level: Some(0.7),
                ..SettingsPatch::default()
            },
            BrowserQuirk::InAppWebView => SettingsPatch {
                enable_advanced_effects: Some(false),
                target_frame_rate: Some(30),
                ..SettingsPatch::default()
            },
        }
    }
}

pub fn detect_quirks(ua: &str, max_touch_points: u32) -> SmallVec<[BrowserQuirk; 3]> {
    let lower = ua.to_ascii_lowercase();
    let mut quirks = SmallVec::new();
    let ios = lower.contains("iphone")
        || lower.contains("ipad")
        || lower.contains("ipod")
        || (lower.contains("macintosh") && max_touch_points > 1);
    if ios {
        quirks.push(BrowserQuirk::IosWebKit);
    }
    if lower.contains("firefox/") && !lower.contains("seamonkey") {
        quirks.push(BrowserQuirk::Firefox);
    }
    if ["fban", "fbav", "instagram", "line/", "; wv)", "micromessenger"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        quirks.push(BrowserQuirk::InAppWebView);
    }
    quirks
}

/// Merge every detected workaround into one override.
pub fn quirk_overrides(quirks: &[BrowserQuirk]) -> SettingsPatch {
    quirks
        .iter()
        .fold(SettingsPatch::default(), |acc, q| acc.merge(q.patch()))
}
