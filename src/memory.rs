use crate::constants::BYTES_PER_MB;
use backdrop_core::MemorySource;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Reads the non-standard `performance.memory.usedJSHeapSize` (Chromium only).
pub struct JsHeapMemory {
    performance: web::Performance,
}

impl JsHeapMemory {
    pub fn new(performance: web::Performance) -> Self {
        Self { performance }
    }

    pub fn is_supported(&self) -> bool {
        self.used_memory_mb().is_some()
    }
}

impl MemorySource for JsHeapMemory {
    fn used_memory_mb(&self) -> Option<f64> {
        let memory = js_sys::Reflect::get(&self.performance, &JsValue::from_str("memory")).ok()?;
        if memory.is_undefined() || memory.is_null() {
            return None;
        }
        let used = js_sys::Reflect::get(&memory, &JsValue::from_str("usedJSHeapSize"))
            .ok()?
            .as_f64()?;
        Some(used / BYTES_PER_MB)
    }
}
