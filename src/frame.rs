use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A `requestAnimationFrame` loop that can be stopped.
///
/// The callback receives the frame timestamp in milliseconds. Stopping (or
/// dropping) cancels the pending frame and releases the callback.
pub struct AnimationFrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl AnimationFrameLoop {
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let callback_tick = callback.clone();
        let pending_tick = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_tick.set(None);
            on_frame(ts);
            pending_tick.set(request(&callback_tick));
        }) as Box<dyn FnMut(f64)>));
        pending.set(request(&callback));

        Self { callback, pending }
    }

    pub fn is_running(&self) -> bool {
        self.callback.borrow().is_some()
    }

    pub fn stop(&self) {
        if let (Some(id), Some(w)) = (self.pending.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // Breaks the self-reference held by the closure
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationFrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request(callback: &FrameCallback) -> Option<i32> {
    let window = web::window()?;
    let slot = callback.borrow();
    let closure = slot.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .map_err(|e| log::warn!("[frame] requestAnimationFrame failed: {:?}", e))
        .ok()
}
