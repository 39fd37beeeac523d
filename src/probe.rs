//! Browser capability probes feeding the core scorer.

use crate::constants::*;
use backdrop_core::{
    classify_user_agent, is_masked_renderer, GraphicsInfo, GraphicsProbe, PlatformSignals, ProbeError,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Platform facts plus the raw inputs quirk detection needs.
pub struct PlatformReport {
    pub signals: PlatformSignals,
    pub user_agent: String,
    pub max_touch_points: u32,
}

pub fn platform_report(window: &web::Window) -> PlatformReport {
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let max_touch_points = reflect_f64(&navigator, "maxTouchPoints")
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0);
    let ua = classify_user_agent(&user_agent, max_touch_points);

    let cores = navigator.hardware_concurrency();
    let signals = PlatformSignals {
        cores: (cores.is_finite() && cores >= 1.0).then_some(cores as u32),
        // Chromium only; rounded down by the browser for privacy
        memory_gb: reflect_f64(&navigator, "deviceMemory").map(|v| v as f32),
        pixel_ratio: window.device_pixel_ratio() as f32,
        is_mobile: ua.is_mobile,
        is_tablet: ua.is_tablet,
    };
    log::debug!(
        "[probe] cores={:?} memory={:?}GB dpr={:.2} mobile={} tablet={} touch={}",
        signals.cores,
        signals.memory_gb,
        signals.pixel_ratio,
        signals.is_mobile,
        signals.is_tablet,
        max_touch_points
    );
    PlatformReport {
        signals,
        user_agent,
        max_touch_points,
    }
}

fn reflect_f64(target: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_f64()
        .filter(|v| v.is_finite())
}

enum GlContext {
    Gl2(web::WebGl2RenderingContext),
    Gl1(web::WebGlRenderingContext),
}

impl GlContext {
    fn parameter(&self, pname: u32) -> Result<JsValue, JsValue> {
        match self {
            GlContext::Gl2(gl) => gl.get_parameter(pname),
            GlContext::Gl1(gl) => gl.get_parameter(pname),
        }
    }

    fn has_extension(&self, name: &str) -> bool {
        let ext = match self {
            GlContext::Gl2(gl) => gl.get_extension(name),
            GlContext::Gl1(gl) => gl.get_extension(name),
        };
        matches!(ext, Ok(Some(_)))
    }

    fn extension(&self, name: &str) -> Option<js_sys::Object> {
        match self {
            GlContext::Gl2(gl) => gl.get_extension(name),
            GlContext::Gl1(gl) => gl.get_extension(name),
        }
        .ok()
        .flatten()
    }

    fn supported_extensions(&self) -> Option<js_sys::Array> {
        match self {
            GlContext::Gl2(gl) => gl.get_supported_extensions(),
            GlContext::Gl1(gl) => gl.get_supported_extensions(),
        }
    }

    /// Give the context back to the browser right away instead of waiting
    /// for GC; pages only get a handful of live contexts.
    fn release(&self) {
        if let Some(ext) = self.extension(LOSE_CONTEXT_EXT) {
            ext.unchecked_into::<web::WebglLoseContext>().lose_context();
        }
    }
}

/// Probes WebGL on a throwaway canvas.
pub struct WebGlProbe {
    document: web::Document,
    webgpu_adapter: Option<String>,
}

impl WebGlProbe {
    pub fn new(document: web::Document, webgpu_adapter: Option<String>) -> Self {
        Self {
            document,
            webgpu_adapter,
        }
    }

    fn create_context(&self) -> Result<GlContext, ProbeError> {
        let canvas = self
            .document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
            .ok_or(ProbeError::ContextUnavailable)?;
        if let Ok(Some(ctx)) = canvas.get_context("webgl2") {
            if let Ok(gl) = ctx.dyn_into::<web::WebGl2RenderingContext>() {
                return Ok(GlContext::Gl2(gl));
            }
        }
        match canvas.get_context("webgl") {
            Ok(Some(ctx)) => ctx
                .dyn_into::<web::WebGlRenderingContext>()
                .map(GlContext::Gl1)
                .map_err(|_| ProbeError::ContextUnavailable),
            _ => Err(ProbeError::ContextUnavailable),
        }
    }

    fn query(&self, gl: &GlContext) -> Result<GraphicsInfo, ProbeError> {
        let (vendor_enum, renderer_enum) = if gl.has_extension(DEBUG_RENDERER_INFO_EXT) {
            (UNMASKED_VENDOR_WEBGL, UNMASKED_RENDERER_WEBGL)
        } else {
            (
                web::WebGlRenderingContext::VENDOR,
                web::WebGlRenderingContext::RENDERER,
            )
        };
        let string_param = |pname: u32| -> Result<String, ProbeError> {
            gl.parameter(pname)
                .map(|v| v.as_string().unwrap_or_default())
                .map_err(|e| ProbeError::LimitQuery(format!("{:?}", e)))
        };
        let renderer = match (string_param(renderer_enum)?, &self.webgpu_adapter) {
            (masked, Some(adapter)) if is_masked_renderer(&masked) && !adapter.is_empty() => {
                log::debug!("[probe] renderer masked as {masked:?}, using WebGPU adapter {adapter:?}");
                adapter.clone()
            }
            (renderer, _) => renderer,
        };
        let vendor = string_param(vendor_enum)?;
        let max_texture_size = gl
            .parameter(web::WebGlRenderingContext::MAX_TEXTURE_SIZE)
            .map_err(|e| ProbeError::LimitQuery(format!("{:?}", e)))?
            .as_f64()
            .ok_or_else(|| ProbeError::LimitQuery("MAX_TEXTURE_SIZE is not a number".into()))?
            as u32;
        let extensions = gl
            .supported_extensions()
            .ok_or_else(|| ProbeError::ExtensionQuery("context lost during probe".into()))?
            .iter()
            .filter_map(|v| v.as_string())
            .collect();

        Ok(GraphicsInfo {
            renderer,
            vendor,
            webgl2: matches!(gl, GlContext::Gl2(_)),
            max_texture_size,
            extensions,
            webgpu: self.webgpu_adapter.is_some(),
        })
    }
}

impl GraphicsProbe for WebGlProbe {
    fn probe(&self) -> Result<GraphicsInfo, ProbeError> {
        let gl = self.create_context()?;
        let info = self.query(&gl);
        gl.release();
        info
    }
}
