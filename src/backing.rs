use backdrop_core::ViewportProfile;

/// Remembers the render scale and settled viewport the canvas backing store
/// was last sized for. Measuring the canvas forces a layout read, so frames
/// that change neither skip it.
#[derive(Debug, Default)]
pub struct BackingTracker {
    last: Option<(f32, ViewportProfile)>,
}

impl BackingTracker {
    /// True when the backing store needs resizing; the inputs are remembered.
    pub fn needs_resize(&mut self, render_scale: f32, viewport: &ViewportProfile) -> bool {
        let key = (render_scale, *viewport);
        if self.last == Some(key) {
            return false;
        }
        self.last = Some(key);
        true
    }

    /// Forget the last size so the next check resizes.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
