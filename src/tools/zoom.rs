// SPDX-License-Identifier: MPL-2.0
//! Drag-to-zoom.
//!
//! Vertical mouse movement is converted to zoom ticks (100 pixels per tick).
//! Scales grow geometrically: each tick multiplies the scale by 1.7. The image
//! point under the cursor when the drag started stays under that same canvas
//! point while zooming.

use crate::viewport::Viewport;
use iced::{Point, Size};

pub const DEFAULT_MIN_SCALE: f32 = 0.25;
pub const DEFAULT_MAX_SCALE: f32 = 20.0;

const SCALE_BASE: f32 = 1.7;
const PIXELS_PER_TICK: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Dragging up zooms in instead of out.
    pub invert: bool,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            invert: false,
        }
    }
}

impl ZoomConfig {
    /// Orders the bounds and keeps them positive.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let min = if self.min_scale.is_finite() && self.min_scale > 0.0 {
            self.min_scale
        } else {
            DEFAULT_MIN_SCALE
        };
        let max = if self.max_scale.is_finite() && self.max_scale > 0.0 {
            self.max_scale
        } else {
            DEFAULT_MAX_SCALE
        };
        Self {
            min_scale: min.min(max),
            max_scale: min.max(max),
            invert: self.invert,
        }
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Fixed point of a zoom drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnchor {
    pub canvas: Point,
    pub image: Point,
}

impl ZoomAnchor {
    #[must_use]
    pub fn new(viewport: &Viewport, image: Size, surface: Size, canvas: Point) -> Self {
        Self {
            canvas,
            image: viewport.canvas_to_image(image, surface, canvas),
        }
    }
}

/// Scale after moving `ticks` steps from `scale`.
#[must_use]
pub fn change_scale(scale: f32, ticks: f32, config: &ZoomConfig) -> f32 {
    let current = scale.max(f32::MIN_POSITIVE);
    let exponent = current.ln() / SCALE_BASE.ln() + ticks;
    config.clamp_scale(SCALE_BASE.powf(exponent))
}

/// Applies one drag step of `delta_y` canvas pixels to `viewport`.
pub fn apply_drag(
    viewport: &mut Viewport,
    config: &ZoomConfig,
    anchor: ZoomAnchor,
    image: Size,
    surface: Size,
    delta_y: f32,
) {
    let ticks = if config.invert {
        -delta_y / PIXELS_PER_TICK
    } else {
        delta_y / PIXELS_PER_TICK
    };
    let scale = change_scale(viewport.scale, ticks, config);
    viewport.scale = scale;
    viewport.translation.x =
        (anchor.canvas.x - surface.width / 2.0) / scale - anchor.image.x + image.width / 2.0;
    viewport.translation.y =
        (anchor.canvas.y - surface.height / 2.0) / scale - anchor.image.y + image.height / 2.0;
}
