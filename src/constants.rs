/// Browser-side constants for probing and wiring the backdrop.
///
/// Tuning of the adaptive controller itself lives in `backdrop_core`; these
/// only describe the page and the WebGL API surface.
// Canvas picked up automatically at startup
pub const BACKDROP_CANVAS_ID: &str = "backdrop-canvas";

// WEBGL_debug_renderer_info enums (not exposed as web-sys constants)
pub const DEBUG_RENDERER_INFO_EXT: &str = "WEBGL_debug_renderer_info";
pub const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
pub const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

pub const LOSE_CONTEXT_EXT: &str = "WEBGL_lose_context";

// performance.memory reports bytes
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// Backing store never collapses below one device pixel
pub const MIN_BACKING_PX: u32 = 1;

// Extra slack before polling a resize settle deadline from a timer
pub const SETTLE_TIMER_SLACK_MS: f64 = 1.0;
