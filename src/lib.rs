#![cfg(target_arch = "wasm32")]
//! Browser front-end for the adaptive backdrop.
//!
//! Probes the device, wires viewport events and a frame loop to
//! [`backdrop_core::AdaptiveQualityManager`], and exposes the per-frame
//! settings to the page's renderer.

use backdrop_core::{
    detect_quirks, quirk_overrides, AdaptiveQualityManager, CapabilityScorer, Clock, DeviceClass,
    InstantClock, OptimizationSettings, SettingsPatch, ShaderParams, SignalKind, ViewportProfile,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod backing;
mod constants;
mod dom;
mod frame;
mod gpu;
mod memory;
mod probe;
mod timers;
mod viewport;

use backing::BackingTracker;
use frame::AnimationFrameLoop;
use timers::{ListenerHandle, TimeoutHandle};

thread_local! {
    static AUTO_BACKDROP: RefCell<Option<AdaptiveBackdrop>> = const { RefCell::new(None) };
}

struct Backdrop {
    manager: AdaptiveQualityManager,
    canvas: web::HtmlCanvasElement,
    window: web::Window,
    clock: InstantClock,
    class_hint: Option<DeviceClass>,
    webgpu_adapter: Option<String>,
    settle_timer: Option<TimeoutHandle>,
    frame: OptimizationSettings,
    backing: BackingTracker,
}

impl Backdrop {
    fn on_frame(&mut self, ts: f64) {
        self.frame = self.manager.tick(ts);
        self.sync_backing();
    }

    fn sync_backing(&mut self) {
        if self.backing.needs_resize(self.frame.render_scale, self.manager.viewport()) {
            dom::sync_canvas_backing_size(&self.canvas, self.frame.render_scale);
        }
    }

    fn on_viewport(this: &Rc<RefCell<Self>>, kind: SignalKind) {
        let weak = Rc::downgrade(this);
        let mut b = this.borrow_mut();
        let now = b.clock.now_ms();
        let signal = viewport::current_signal(&b.window, b.class_hint, kind);
        let Some(task) = b.manager.notify_viewport(&signal, now) else {
            return;
        };
        // Settle even if no frames are being drawn (hidden tab, paused loop)
        let delay = task.remaining_ms(now) + constants::SETTLE_TIMER_SLACK_MS;
        b.settle_timer = TimeoutHandle::schedule(delay, move || Self::on_settle_timer(&weak));
    }

    fn on_settle_timer(weak: &Weak<RefCell<Self>>) {
        let Some(this) = weak.upgrade() else {
            return;
        };
        // A frame callback may be mid-tick; it will poll the deadline itself
        let Ok(mut b) = this.try_borrow_mut() else {
            return;
        };
        let now = b.clock.now_ms();
        if b.manager.poll_resize(now) {
            b.frame = b.manager.frame_settings();
            b.sync_backing();
        }
    }
}

/// Handle returned to JavaScript. Owns the frame loop and event listeners;
/// call `dispose()` (or let it be garbage collected) to tear everything down.
#[wasm_bindgen]
pub struct AdaptiveBackdrop {
    inner: Rc<RefCell<Backdrop>>,
    frame_loop: Option<AnimationFrameLoop>,
    listeners: Vec<ListenerHandle>,
}

#[wasm_bindgen]
impl AdaptiveBackdrop {
    /// Advance one frame when the page drives its own loop.
    pub fn tick(&self, timestamp_ms: f64) {
        self.inner.borrow_mut().on_frame(timestamp_ms);
    }

    /// Uniform block for the particle shader (8 floats, see `ShaderParams`).
    pub fn uniforms(&self) -> js_sys::Float32Array {
        let params: ShaderParams = self.inner.borrow().frame.shader_params();
        js_sys::Float32Array::from(bytemuck::cast_slice::<ShaderParams, f32>(&[params]))
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.inner.borrow().frame.particle_count
    }

    #[wasm_bindgen(getter, js_name = renderScale)]
    pub fn render_scale(&self) -> f32 {
        self.inner.borrow().frame.render_scale
    }

    #[wasm_bindgen(getter, js_name = animationSpeed)]
    pub fn animation_speed(&self) -> f32 {
        self.inner.borrow().frame.animation_speed
    }

    #[wasm_bindgen(getter, js_name = qualityLevel)]
    pub fn quality_level(&self) -> f32 {
        self.inner.borrow().frame.quality_level
    }

    #[wasm_bindgen(getter, js_name = advancedEffects)]
    pub fn advanced_effects(&self) -> bool {
        self.inner.borrow().frame.enable_advanced_effects
    }

    #[wasm_bindgen(getter, js_name = interactionEnabled)]
    pub fn interaction_enabled(&self) -> bool {
        self.inner.borrow().frame.interaction_enabled
    }

    #[wasm_bindgen(getter, js_name = interactionRadius)]
    pub fn interaction_radius(&self) -> f32 {
        self.inner.borrow().frame.interaction_radius
    }

    #[wasm_bindgen(getter, js_name = targetFrameRate)]
    pub fn target_frame_rate(&self) -> u32 {
        self.inner.borrow().frame.target_frame_rate
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> f32 {
        self.inner.borrow().manager.metrics().fps
    }

    #[wasm_bindgen(getter)]
    pub fn tier(&self) -> String {
        format!("{:?}", self.inner.borrow().manager.device().tier).to_lowercase()
    }

    #[wasm_bindgen(getter, js_name = isResizing)]
    pub fn is_resizing(&self) -> bool {
        self.inner.borrow().manager.is_resizing()
    }

    #[wasm_bindgen(getter, js_name = isPerformanceAcceptable)]
    pub fn is_performance_acceptable(&self) -> bool {
        self.inner.borrow().manager.is_performance_acceptable()
    }

    /// Apply settings immediately; omitted fields are left alone.
    #[wasm_bindgen(js_name = forceAdjustment)]
    pub fn force_adjustment(
        &self,
        particle_count: Option<u32>,
        render_scale: Option<f32>,
        quality_level: Option<f32>,
        advanced_effects: Option<bool>,
        interaction_enabled: Option<bool>,
    ) {
        let patch = SettingsPatch {
            particle_count,
            render_scale,
            quality_level,
            enable_advanced_effects: advanced_effects,
            interaction_enabled,
            ..SettingsPatch::default()
        };
        let mut b = self.inner.borrow_mut();
        let now = b.clock.now_ms();
        b.manager.force_adjustment(patch, now);
        b.frame = b.manager.frame_settings();
        b.sync_backing();
    }

    /// Re-run the WebGL probe (e.g. after a context loss) and rebaseline.
    pub fn redetect(&self) {
        let mut b = self.inner.borrow_mut();
        let Some(document) = b.window.document() else {
            return;
        };
        let report = probe::platform_report(&b.window);
        let gl_probe = probe::WebGlProbe::new(document, b.webgpu_adapter.clone());
        let device = CapabilityScorer::detect(&report.signals, &gl_probe);
        let now = b.clock.now_ms();
        b.manager.reinit(device, now);
        // A lost context may have reset the canvas size
        b.backing.invalidate();
    }

    pub fn dispose(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        self.listeners.clear();
        let mut b = self.inner.borrow_mut();
        b.settle_timer = None;
        b.manager.dispose();
    }
}

/// Probe the device and attach an adaptive controller to `canvas`.
///
/// With `drive_loop` the backdrop runs its own animation frame loop;
/// otherwise the page calls `tick(timestamp)` from its loop.
#[wasm_bindgen(js_name = createBackdrop)]
pub async fn create_backdrop(
    canvas: web::HtmlCanvasElement,
    drive_loop: bool,
) -> Result<AdaptiveBackdrop, JsValue> {
    build(canvas, drive_loop)
        .await
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))
}

async fn build(canvas: web::HtmlCanvasElement, drive_loop: bool) -> anyhow::Result<AdaptiveBackdrop> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let performance = window
        .performance()
        .ok_or_else(|| anyhow::anyhow!("no performance API"))?;

    let config = dom::read_config(&canvas);
    let report = probe::platform_report(&window);
    let webgpu_adapter = gpu::probe_webgpu(&window.navigator()).await;
    let device = CapabilityScorer::detect(
        &report.signals,
        &probe::WebGlProbe::new(document, webgpu_adapter.clone()),
    );

    let class_hint = viewport::class_hint(&report.signals);
    let viewport = ViewportProfile::from_signal(&viewport::current_signal(
        &window,
        class_hint,
        SignalKind::Resize,
    ));
    let heap = memory::JsHeapMemory::new(performance);
    if !heap.is_supported() {
        log::debug!("[monitor] performance.memory unavailable, memory pressure disabled");
    }
    let clock = InstantClock;
    let mut manager = AdaptiveQualityManager::new(config, device, viewport, Box::new(heap));

    let quirks = detect_quirks(&report.user_agent, report.max_touch_points);
    if !quirks.is_empty() {
        log::info!("[quality] browser workarounds: {:?}", quirks);
        manager.force_adjustment(quirk_overrides(&quirks), clock.now_ms());
    }

    let frame = manager.frame_settings();
    let inner = Rc::new(RefCell::new(Backdrop {
        manager,
        canvas,
        window: window.clone(),
        clock,
        class_hint,
        webgpu_adapter,
        settle_timer: None,
        frame,
        backing: BackingTracker::default(),
    }));
    inner.borrow_mut().sync_backing();

    let weak = Rc::downgrade(&inner);
    let listeners = viewport::wire_viewport_events(&window, move |kind| {
        if let Some(this) = weak.upgrade() {
            Backdrop::on_viewport(&this, kind);
        }
    });

    let frame_loop = drive_loop.then(|| {
        let weak = Rc::downgrade(&inner);
        AnimationFrameLoop::start(move |ts| {
            if let Some(this) = weak.upgrade() {
                this.borrow_mut().on_frame(ts);
            }
        })
    });

    Ok(AdaptiveBackdrop {
        inner,
        frame_loop,
        listeners,
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Attach to `#backdrop-canvas` if the page has one.
async fn init() -> anyhow::Result<()> {
    let Some(document) = dom::window_document() else {
        return Ok(());
    };
    let Some(el) = document.get_element_by_id(constants::BACKDROP_CANVAS_ID) else {
        log::info!("no #{} on page, waiting for createBackdrop()", constants::BACKDROP_CANVAS_ID);
        return Ok(());
    };
    let canvas: web::HtmlCanvasElement = el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let backdrop = build(canvas, true).await?;
    AUTO_BACKDROP.with(|slot| {
        if let Some(mut previous) = slot.borrow_mut().replace(backdrop) {
            previous.dispose();
        }
    });
    Ok(())
}
