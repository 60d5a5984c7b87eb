// SPDX-License-Identifier: MPL-2.0
//! Per-surface display state: scale, translation and VOI.
//!
//! The transform from image pixels to surface (canvas) coordinates is
//!
//! ```text
//! canvas = (pixel - image_size / 2 + translation) * scale + surface_size / 2
//! ```
//!
//! so a zero translation keeps the image centered and `translation` is
//! expressed in image pixels.

pub mod surface;
pub mod voi;

pub use surface::{DisplaySurface, RenderedFrame};
pub use voi::VoiWindow;

use crate::dicom::DicomImage;
use iced::{Point, Rectangle, Size, Vector};

/// Smallest scale accepted by the viewport.
pub const MIN_SCALE: f32 = 0.0001;

/// Display parameters of one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub translation: Vector,
    pub voi: VoiWindow,
    pub invert: bool,
    /// Draw with nearest-neighbour filtering instead of linear.
    pub pixel_replication: bool,
}

impl Viewport {
    /// Viewport that fits the whole image in the surface, centered, with the
    /// image's own VOI.
    #[must_use]
    pub fn default_for(image: &DicomImage, surface: Size) -> Self {
        Self {
            scale: fit_scale(image.size(), surface),
            translation: Vector::new(0.0, 0.0),
            voi: VoiWindow::new(image.window_center(), image.window_width()),
            invert: image.invert(),
            pixel_replication: false,
        }
    }

    /// Applies the viewport invariants.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.scale = if self.scale.is_finite() {
            self.scale.max(MIN_SCALE)
        } else {
            1.0
        };
        if !self.translation.x.is_finite() || !self.translation.y.is_finite() {
            self.translation = Vector::new(0.0, 0.0);
        }
        self.voi = self.voi.sanitized();
        self
    }

    /// Maps an image pixel coordinate to surface coordinates.
    #[must_use]
    pub fn image_to_canvas(&self, image: Size, surface: Size, pixel: Point) -> Point {
        Point::new(
            (pixel.x - image.width / 2.0 + self.translation.x) * self.scale + surface.width / 2.0,
            (pixel.y - image.height / 2.0 + self.translation.y) * self.scale
                + surface.height / 2.0,
        )
    }

    /// Maps a surface coordinate back to image pixel coordinates.
    #[must_use]
    pub fn canvas_to_image(&self, image: Size, surface: Size, canvas: Point) -> Point {
        Point::new(
            (canvas.x - surface.width / 2.0) / self.scale - self.translation.x + image.width / 2.0,
            (canvas.y - surface.height / 2.0) / self.scale - self.translation.y
                + image.height / 2.0,
        )
    }

    /// Area of the surface covered by the image.
    #[must_use]
    pub fn image_bounds(&self, image: Size, surface: Size) -> Rectangle {
        let top_left = self.image_to_canvas(image, surface, Point::ORIGIN);
        Rectangle::new(
            top_left,
            Size::new(image.width * self.scale, image.height * self.scale),
        )
    }
}

/// Largest scale at which the whole image is visible.
#[must_use]
pub fn fit_scale(image: Size, surface: Size) -> f32 {
    if image.width <= 0.0 || image.height <= 0.0 {
        return 1.0;
    }
    let scale = (surface.width / image.width).min(surface.height / image.height);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::image::{MONOCHROME1, MONOCHROME2};
    use crate::test_utils::assert_abs_diff_eq;

    fn image(columns: u32, rows: u32, photometric: &str) -> DicomImage {
        let pixels = vec![0.0; (columns * rows) as usize];
        DicomImage::from_pixels(columns, rows, 1, pixels, Some((40.0, 400.0)), photometric)
            .expect("valid image")
    }

    #[test]
    fn default_viewport_fits_and_centers() {
        let viewport = Viewport::default_for(&image(256, 128, MONOCHROME2), Size::new(512.0, 512.0));
        assert_abs_diff_eq!(viewport.scale, 2.0);
        assert_eq!(viewport.translation, Vector::new(0.0, 0.0));
        assert_eq!(viewport.voi, VoiWindow::new(40.0, 400.0));
        assert!(!viewport.invert);
    }

    #[test]
    fn default_viewport_inverts_monochrome1() {
        let viewport = Viewport::default_for(&image(4, 4, MONOCHROME1), Size::new(512.0, 512.0));
        assert!(viewport.invert);
    }

    #[test]
    fn fit_scale_uses_limiting_dimension() {
        assert_abs_diff_eq!(fit_scale(Size::new(1024.0, 512.0), Size::new(512.0, 512.0)), 0.5);
        assert_abs_diff_eq!(fit_scale(Size::new(0.0, 512.0), Size::new(512.0, 512.0)), 1.0);
    }

    #[test]
    fn transform_round_trips() {
        let viewport = Viewport {
            scale: 1.7,
            translation: Vector::new(12.0, -30.0),
            ..Viewport::default_for(&image(300, 200, MONOCHROME2), Size::new(512.0, 512.0))
        };
        let image_size = Size::new(300.0, 200.0);
        let surface = Size::new(512.0, 512.0);
        let pixel = Point::new(42.0, 117.0);

        let canvas = viewport.image_to_canvas(image_size, surface, pixel);
        let back = viewport.canvas_to_image(image_size, surface, canvas);
        assert_abs_diff_eq!(back.x, pixel.x, epsilon = 1e-3);
        assert_abs_diff_eq!(back.y, pixel.y, epsilon = 1e-3);
    }

    #[test]
    fn centered_image_bounds_are_symmetric() {
        let viewport = Viewport::default_for(&image(256, 256, MONOCHROME2), Size::new(512.0, 512.0));
        let bounds = viewport.image_bounds(Size::new(256.0, 256.0), Size::new(512.0, 512.0));
        assert_abs_diff_eq!(bounds.x, 0.0);
        assert_abs_diff_eq!(bounds.y, 0.0);
        assert_abs_diff_eq!(bounds.width, 512.0);
        assert_abs_diff_eq!(bounds.height, 512.0);
    }

    #[test]
    fn sanitized_clamps_scale_and_width() {
        let viewport = Viewport {
            scale: 0.0,
            translation: Vector::new(f32::NAN, 1.0),
            voi: VoiWindow::new(10.0, 0.0),
            invert: false,
            pixel_replication: false,
        }
        .sanitized();
        assert_abs_diff_eq!(viewport.scale, MIN_SCALE);
        assert_eq!(viewport.translation, Vector::new(0.0, 0.0));
        assert_abs_diff_eq!(viewport.voi.window_width, 1.0);
    }
}
