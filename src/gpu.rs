use wasm_bindgen::JsValue;
use web_sys as web;

/// Ask the browser for a WebGPU adapter and report its name.
///
/// Only used as a capability signal; no device is requested and nothing is
/// rendered through it. `None` when WebGPU is missing or no adapter is offered.
pub async fn probe_webgpu(navigator: &web::Navigator) -> Option<String> {
    let has_gpu = js_sys::Reflect::has(navigator, &JsValue::from_str("gpu")).unwrap_or(false);
    if !has_gpu {
        log::info!("[probe] WebGPU not exposed by this browser");
        return None;
    }
    let instance = wgpu::Instance::default();
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await;
    match adapter {
        Some(adapter) => {
            let info = adapter.get_info();
            log::info!("[probe] WebGPU adapter: {:?} ({:?})", info.name, info.backend);
            Some(info.name)
        }
        None => {
            log::info!("[probe] WebGPU present but no adapter available");
            None
        }
    }
}
