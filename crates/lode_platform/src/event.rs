//! Viewport events delivered by the host shell

/// Screen orientation derived from the viewport aspect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait when the viewport is at least as tall as it is wide
    pub fn from_size(width: f32, height: f32) -> Self {
        if height >= width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Why the viewport is being re-measured
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewportChange {
    /// First measurement at startup
    #[default]
    Initial,
    /// Window or canvas was resized
    Resized,
    /// Device rotated
    OrientationChanged,
    /// The host's safe area settled or changed without a size change
    InsetsChanged,
}

/// A viewport measurement in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportEvent {
    pub width: f32,
    pub height: f32,
    pub change: ViewportChange,
}

impl ViewportEvent {
    pub fn new(width: f32, height: f32, change: ViewportChange) -> Self {
        Self {
            width,
            height,
            change,
        }
    }

    pub fn resized(width: f32, height: f32) -> Self {
        Self::new(width, height, ViewportChange::Resized)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_size(self.width, self.height)
    }

    /// Width and height with negative or non-finite values clamped to zero
    pub fn sanitized_size(&self) -> (f32, f32) {
        fn clean(v: f32) -> f32 {
            if v.is_finite() {
                v.max(0.0)
            } else {
                0.0
            }
        }
        (clean(self.width), clean(self.height))
    }
}
