use crate::timers::ListenerHandle;
use backdrop_core::{DeviceClass, PlatformSignals, SignalKind, ViewportSignal};
use web_sys as web;

/// Device class implied by the user agent, if any; otherwise width decides.
pub fn class_hint(platform: &PlatformSignals) -> Option<DeviceClass> {
    if platform.is_tablet {
        Some(DeviceClass::Tablet)
    } else if platform.is_mobile {
        Some(DeviceClass::Mobile)
    } else {
        None
    }
}

/// Current layout viewport as a core signal.
pub fn current_signal(window: &web::Window, hint: Option<DeviceClass>, kind: SignalKind) -> ViewportSignal {
    let extent = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    let mut signal = ViewportSignal::resize(
        extent(window.inner_width()),
        extent(window.inner_height()),
        window.device_pixel_ratio() as f32,
    );
    signal.class_hint = hint;
    signal.kind = kind;
    signal
}

/// Listen for `resize` and `orientationchange` on the window.
pub fn wire_viewport_events(
    window: &web::Window,
    mut on_signal: impl FnMut(SignalKind) + 'static + Clone,
) -> Vec<ListenerHandle> {
    let mut on_orientation = on_signal.clone();
    [
        ListenerHandle::listen(window, "resize", move |_| on_signal(SignalKind::Resize)),
        ListenerHandle::listen(window, "orientationchange", move |_| {
            on_orientation(SignalKind::OrientationChange)
        }),
    ]
    .into_iter()
    .flatten()
    .collect()
}
