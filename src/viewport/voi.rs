// SPDX-License-Identifier: MPL-2.0
//! Linear VOI (window center / width) transform.
//!
//! Follows the DICOM linear function (PS3.3 C.11.2.1.2.1):
//!
//! ```text
//! x <= c - 0.5 - (w - 1) / 2  -> 0
//! x >  c - 0.5 + (w - 1) / 2  -> 255
//! otherwise                   -> ((x - (c - 0.5)) / (w - 1) + 0.5) * 255
//! ```
//!
//! A width of 1 is a threshold at `c - 0.5`.

use crate::dicom::DicomImage;

/// Smallest window width accepted by the viewport.
pub const MIN_WINDOW_WIDTH: f32 = 1.0;

/// Window center and width, in modality units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiWindow {
    pub window_center: f32,
    pub window_width: f32,
}

impl VoiWindow {
    #[must_use]
    pub fn new(window_center: f32, window_width: f32) -> Self {
        Self {
            window_center,
            window_width,
        }
    }

    /// Replaces non-finite values and enforces [`MIN_WINDOW_WIDTH`].
    #[must_use]
    pub fn sanitized(self) -> Self {
        let window_center = if self.window_center.is_finite() {
            self.window_center
        } else {
            0.0
        };
        let window_width = if self.window_width.is_finite() {
            self.window_width.max(MIN_WINDOW_WIDTH)
        } else {
            MIN_WINDOW_WIDTH
        };
        Self {
            window_center,
            window_width,
        }
    }

    /// Values at or below this render black.
    pub fn lower_bound(&self) -> f32 {
        self.window_center - 0.5 - (self.window_width - 1.0) / 2.0
    }

    /// Values above this render white.
    pub fn upper_bound(&self) -> f32 {
        self.window_center - 0.5 + (self.window_width - 1.0) / 2.0
    }

    /// Maps a modality value to a display intensity. NaN maps to 0.
    pub fn eval(&self, value: f32) -> u8 {
        if value.is_nan() || value <= self.lower_bound() {
            return 0;
        }
        if value > self.upper_bound() {
            return 255;
        }
        let span = self.window_width - 1.0;
        if span <= 0.0 {
            return 255;
        }
        let normalized = (value - (self.window_center - 0.5)) / span + 0.5;
        (normalized * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Renders `image` to tightly packed RGBA8.
///
/// Grayscale intensities are replicated to the three color channels. Color
/// images get the window applied to each channel.
#[must_use]
pub fn render_rgba(image: &DicomImage, voi: VoiWindow, invert: bool) -> Vec<u8> {
    let voi = voi.sanitized();
    let pixel_count = image.columns() as usize * image.rows() as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);
    let map = |value: f32| {
        let intensity = voi.eval(value);
        if invert {
            255 - intensity
        } else {
            intensity
        }
    };

    if image.is_color() {
        for rgb in image.pixels().chunks_exact(3) {
            rgba.extend_from_slice(&[map(rgb[0]), map(rgb[1]), map(rgb[2]), 255]);
        }
    } else {
        for &value in image.pixels() {
            let intensity = map(value);
            rgba.extend_from_slice(&[intensity, intensity, intensity, 255]);
        }
    }
    rgba
}
