// Host-side tests for canvas backing-store bookkeeping.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod backing {
    include!("../src/backing.rs");
}

use backdrop_core::{ViewportProfile, ViewportSignal};
use backing::BackingTracker;

fn viewport(width: f32, height: f32) -> ViewportProfile {
    ViewportProfile::from_signal(&ViewportSignal::resize(width, height, 1.0))
}

#[test]
fn steady_frames_skip_the_resize() {
    let mut tracker = BackingTracker::default();
    let desktop = viewport(1920.0, 1080.0);
    assert!(tracker.needs_resize(1.1, &desktop));
    for _ in 0..100 {
        assert!(!tracker.needs_resize(1.1, &desktop));
    }
}

#[test]
fn scale_or_viewport_change_resizes_once() {
    let mut tracker = BackingTracker::default();
    let desktop = viewport(1920.0, 1080.0);
    tracker.needs_resize(1.1, &desktop);

    assert!(tracker.needs_resize(0.88, &desktop));
    assert!(!tracker.needs_resize(0.88, &desktop));

    let narrow = viewport(800.0, 1080.0);
    assert!(tracker.needs_resize(0.88, &narrow));
    assert!(!tracker.needs_resize(0.88, &narrow));

    tracker.invalidate();
    assert!(tracker.needs_resize(0.88, &narrow));
}
