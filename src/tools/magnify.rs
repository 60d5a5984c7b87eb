// SPDX-License-Identifier: MPL-2.0
//! Magnifying lens shown while the magnify button is held.

use crate::viewport::Viewport;
use iced::{Point, Rectangle, Size};

pub const DEFAULT_MAGNIFY_SIZE: f32 = 100.0;
pub const DEFAULT_MAGNIFICATION_LEVEL: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifyConfig {
    /// Side of the square lens in canvas pixels.
    pub magnify_size: f32,
    /// Lens zoom relative to the viewport scale.
    pub magnification_level: f32,
}

impl Default for MagnifyConfig {
    fn default() -> Self {
        Self {
            magnify_size: DEFAULT_MAGNIFY_SIZE,
            magnification_level: DEFAULT_MAGNIFICATION_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnifierLens {
    /// Lens center in canvas coordinates (the cursor).
    pub center: Point,
    /// Image pixel shown at the lens center.
    pub image_point: Point,
    pub size: f32,
    /// Effective scale inside the lens.
    pub scale: f32,
}

impl MagnifierLens {
    #[must_use]
    pub fn new(
        viewport: &Viewport,
        image: Size,
        surface: Size,
        cursor: Point,
        config: &MagnifyConfig,
    ) -> Self {
        Self {
            center: cursor,
            image_point: viewport.canvas_to_image(image, surface, cursor),
            size: config.magnify_size.max(1.0),
            scale: viewport.scale * config.magnification_level.max(1.0),
        }
    }

    /// Square lens area on the canvas.
    pub fn bounds(&self) -> Rectangle {
        let half = self.size / 2.0;
        Rectangle::new(
            Point::new(self.center.x - half, self.center.y - half),
            Size::new(self.size, self.size),
        )
    }

    /// Where the whole image must be drawn, in canvas coordinates, so that
    /// `image_point` lands on the lens center at the lens scale.
    pub fn image_rect(&self, image: Size) -> Rectangle {
        Rectangle::new(
            Point::new(
                self.center.x - self.image_point.x * self.scale,
                self.center.y - self.image_point.y * self.scale,
            ),
            Size::new(image.width * self.scale, image.height * self.scale),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use crate::viewport::VoiWindow;
    use iced::Vector;

    fn viewport() -> Viewport {
        Viewport {
            scale: 2.0,
            translation: Vector::new(0.0, 0.0),
            voi: VoiWindow::new(0.0, 10.0),
            invert: false,
            pixel_replication: false,
        }
    }

    #[test]
    fn lens_is_centered_on_cursor() {
        let lens = MagnifierLens::new(
            &viewport(),
            Size::new(256.0, 256.0),
            Size::new(512.0, 512.0),
            Point::new(200.0, 300.0),
            &MagnifyConfig::default(),
        );
        let bounds = lens.bounds();
        assert_abs_diff_eq!(bounds.x, 150.0);
        assert_abs_diff_eq!(bounds.y, 250.0);
        assert_abs_diff_eq!(bounds.width, DEFAULT_MAGNIFY_SIZE);
        assert_abs_diff_eq!(lens.scale, 4.0);
    }

    #[test]
    fn lens_shows_image_point_under_cursor() {
        let image = Size::new(256.0, 256.0);
        let lens = MagnifierLens::new(
            &viewport(),
            image,
            Size::new(512.0, 512.0),
            Point::new(200.0, 300.0),
            &MagnifyConfig::default(),
        );
        assert_abs_diff_eq!(lens.image_point.x, 100.0);
        assert_abs_diff_eq!(lens.image_point.y, 150.0);

        let rect = lens.image_rect(image);
        let center_x = rect.x + lens.image_point.x * lens.scale;
        let center_y = rect.y + lens.image_point.y * lens.scale;
        assert_abs_diff_eq!(center_x, 200.0);
        assert_abs_diff_eq!(center_y, 300.0);
        assert_abs_diff_eq!(rect.width, 1024.0);
    }

    #[test]
    fn magnification_below_one_is_raised() {
        let config = MagnifyConfig {
            magnify_size: 0.0,
            magnification_level: 0.5,
        };
        let lens = MagnifierLens::new(
            &viewport(),
            Size::new(10.0, 10.0),
            Size::new(10.0, 10.0),
            Point::ORIGIN,
            &config,
        );
        assert_abs_diff_eq!(lens.size, 1.0);
        assert_abs_diff_eq!(lens.scale, 2.0);
    }
}
