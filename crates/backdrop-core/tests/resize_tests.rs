// Host-side tests for viewport classification, resize debouncing and deadlines.

use backdrop_core::*;

fn debouncer() -> ResizeDebouncer {
    ResizeDebouncer::new(&AdaptiveConfig::default())
}

#[test]
fn burst_settles_once_with_last_viewport() {
    let mut d = debouncer();
    let mut last_task = None;
    for (k, width) in [1200.0, 1100.0, 1000.0, 900.0, 800.0].into_iter().enumerate() {
        let now = k as f64 * 30.0;
        last_task = Some(d.signal(&ViewportSignal::resize(width, 700.0, 1.0), now));
        assert!(d.is_resizing());
        assert!(d.poll(now).is_none());
    }
    let task = last_task.unwrap();
    assert!((task.due_ms - 270.0).abs() < 1e-9);

    assert!(d.poll(269.0).is_none());
    let settled = d.poll(270.0).expect("settled");
    assert_eq!(settled.width, 800.0);
    assert_eq!(settled.device_class, DeviceClass::Tablet);
    assert!(!d.is_resizing());
    assert!(d.poll(1000.0).is_none());
}

#[test]
fn orientation_change_widens_window_for_the_burst() {
    let mut d = debouncer();
    let rotate = ViewportSignal::resize(667.0, 375.0, 2.0).orientation_change();
    assert!((d.signal(&rotate, 0.0).due_ms - 400.0).abs() < 1e-9);
    // Trailing resize events from browser chrome keep the wider window
    let task = d.signal(&ViewportSignal::resize(667.0, 360.0, 2.0), 100.0);
    assert!((task.due_ms - 500.0).abs() < 1e-9);
    assert!(d.poll(300.0).is_none());
    let settled = d.poll(500.0).unwrap();
    assert_eq!(settled.orientation, Orientation::Landscape);

    // Next burst starts with the normal window again
    let next = d.signal(&ViewportSignal::resize(375.0, 667.0, 2.0), 600.0);
    assert!((next.due_ms - 750.0).abs() < 1e-9);
}

#[test]
fn cancel_drops_pending_burst() {
    let mut d = debouncer();
    d.signal(&ViewportSignal::resize(800.0, 600.0, 1.0), 0.0);
    d.cancel();
    assert!(!d.is_resizing());
    assert!(d.pending_deadline().is_none());
    assert!(d.poll(10_000.0).is_none());
}

#[test]
fn viewport_profile_classifies_shape() {
    let portrait = ViewportProfile::from_signal(&ViewportSignal::resize(390.0, 844.0, 3.0));
    assert_eq!(portrait.orientation, Orientation::Portrait);
    assert_eq!(portrait.device_class, DeviceClass::Mobile);
    assert!(!portrait.is_ultrawide);

    let ultrawide = ViewportProfile::from_signal(&ViewportSignal::resize(3440.0, 1440.0, 1.0));
    assert!(ultrawide.is_ultrawide);
    assert_eq!(ultrawide.device_class, DeviceClass::Desktop);

    let square = ViewportProfile::from_signal(&ViewportSignal::resize(800.0, 800.0, 1.0));
    assert_eq!(square.orientation, Orientation::Landscape);
}

#[test]
fn class_hint_overrides_width() {
    let signal = ViewportSignal::resize(1180.0, 820.0, 2.0).with_class_hint(DeviceClass::Tablet);
    assert_eq!(ViewportProfile::from_signal(&signal).device_class, DeviceClass::Tablet);
}

#[test]
fn degenerate_extents_are_sanitized() {
    let collapsed = ViewportProfile::from_signal(&ViewportSignal::resize(1024.0, 0.0, f32::NAN));
    assert_eq!(collapsed.height, 1.0);
    assert!(collapsed.aspect_ratio.is_finite());
    assert!(collapsed.pixel_ratio.is_finite() && collapsed.pixel_ratio > 0.0);
    assert!(collapsed.is_ultrawide);

    let hidden = ViewportProfile::from_signal(&ViewportSignal::resize(f32::NAN, -5.0, 1.0));
    assert_eq!(hidden.area(), 1.0);
}

#[test]
fn task_slot_reschedule_replaces_deadline() {
    let mut slot = TaskSlot::new();
    let first = slot.schedule(100.0);
    let second = slot.schedule(250.0);
    assert_ne!(first.id, second.id);
    assert_eq!(slot.pending(), Some(second));
    assert!(slot.take_due(100.0).is_none());
    assert_eq!(second.remaining_ms(200.0), 50.0);
    assert_eq!(second.remaining_ms(300.0), 0.0);
    assert_eq!(slot.take_due(250.0), Some(second));
    assert!(!slot.is_pending());
}

#[test]
fn task_slot_cancel() {
    let mut slot = TaskSlot::new();
    assert!(slot.cancel().is_none());
    slot.schedule(10.0);
    assert!(slot.cancel().is_some());
    assert!(slot.take_due(100.0).is_none());
}

#[test]
fn instant_clock_deadlines_are_pending() {
    let clock = InstantClock;
    let now = clock.now_ms();
    assert!(now.is_finite() && now > 0.0);

    let mut slot = TaskSlot::new();
    let task = slot.schedule(now + 60_000.0);
    let later = clock.now_ms();
    assert!(later >= now);
    assert!(!task.is_due(later));
    assert!((task.remaining_ms(later) - 60_000.0).abs() < 1_000.0);
}

#[test]
fn delay_can_be_retuned_between_bursts() {
    let mut d = debouncer();
    d.set_delay_ms(300.0);
    let plain = d.signal(&ViewportSignal::resize(800.0, 600.0, 1.0), 0.0);
    assert_eq!(plain.due_ms, 300.0);

    d.set_delay_ms(f64::NAN);
    d.set_delay_ms(-1.0);
    assert_eq!(d.delay_ms(), 300.0);

    // Orientation window never drops below the plain one
    d.set_delay_ms(700.0);
    let turned = d.signal(&ViewportSignal::resize(600.0, 800.0, 1.0).orientation_change(), 10.0);
    assert_eq!(turned.due_ms, 710.0);
}
