use crate::constants::{MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH, ULTRAWIDE_ASPECT};
use crate::device::sanitize_pixel_ratio;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Width-based guess, used when the host has no better hint.
    pub fn from_width(css_width: f32) -> Self {
        if css_width < MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if css_width < TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// What triggered a viewport notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Resize,
    OrientationChange,
}

/// Raw viewport notification as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSignal {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    /// Device class from the user agent, if the host could tell.
    pub class_hint: Option<DeviceClass>,
    pub kind: SignalKind,
}

impl ViewportSignal {
    pub fn resize(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
            class_hint: None,
            kind: SignalKind::Resize,
        }
    }

    pub fn with_class_hint(mut self, hint: DeviceClass) -> Self {
        self.class_hint = Some(hint);
        self
    }

    pub fn orientation_change(mut self) -> Self {
        self.kind = SignalKind::OrientationChange;
        self
    }
}

/// Settled description of the drawing surface in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportProfile {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub aspect_ratio: f32,
    pub orientation: Orientation,
    pub device_class: DeviceClass,
    pub is_ultrawide: bool,
}

impl ViewportProfile {
    pub fn from_signal(signal: &ViewportSignal) -> Self {
        let width = sanitize_extent(signal.width);
        let height = sanitize_extent(signal.height);
        let aspect_ratio = width / height;
        Self {
            width,
            height,
            pixel_ratio: sanitize_pixel_ratio(signal.pixel_ratio),
            aspect_ratio,
            orientation: if height > width {
                Orientation::Portrait
            } else {
                Orientation::Landscape
            },
            device_class: signal
                .class_hint
                .unwrap_or_else(|| DeviceClass::from_width(width)),
            is_ultrawide: aspect_ratio >= ULTRAWIDE_ASPECT,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v >= 1.0 {
        v
    } else {
        1.0
    }
}
