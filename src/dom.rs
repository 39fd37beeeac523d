use crate::constants::MIN_BACKING_PX;
use backdrop_core::{AdaptiveConfig, OVERRIDE_KEYS};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Size the canvas backing store to CSS size * devicePixelRatio * render scale.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, render_scale: f32) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio() * f64::from(render_scale);
        let rect = canvas.get_bounding_client_rect();
        let w_px = ((rect.width() * dpr).round() as u32).max(MIN_BACKING_PX);
        let h_px = ((rect.height() * dpr).round() as u32).max(MIN_BACKING_PX);
        // Writing width/height clears the drawing buffer even when unchanged
        if canvas.width() != w_px {
            canvas.set_width(w_px);
        }
        if canvas.height() != h_px {
            canvas.set_height(h_px);
        }
    }
}

/// Defaults overridden by `data-*` attributes on the canvas, e.g.
/// `<canvas data-max-particles="120" data-easing="linear">`.
pub fn read_config(element: &web::HtmlElement) -> AdaptiveConfig {
    let dataset = element.dataset();
    let mut config = AdaptiveConfig::default();
    for key in OVERRIDE_KEYS {
        let Some(value) = dataset.get(&dataset_name(key)) else {
            continue;
        };
        match config.apply_override(key, &value) {
            Ok(()) => log::info!("[config] {key} = {value}"),
            Err(e) => log::warn!("[config] ignoring data-{key}: {e}"),
        }
    }
    config
}

/// `max-particles` -> `maxParticles`, the DOMStringMap spelling.
fn dataset_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
