// SPDX-License-Identifier: MPL-2.0
//! The display surface an image is drawn into.
//!
//! A surface must be enabled with its size before anything can be displayed.
//! It owns the current image, its viewport, and the RGBA frame produced by the
//! VOI transform. The frame is regenerated only when the VOI or inversion
//! changes; scale and translation are applied at draw time.

use super::voi::{self, VoiWindow};
use super::Viewport;
use crate::dicom::DicomImage;
use crate::error::{Result, SurfaceError};
use iced::widget::image::Handle;
use iced::Size;

/// RGBA frame ready to hand to the renderer.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
    pub voi: VoiWindow,
    pub invert: bool,
}

#[derive(Debug, Default)]
pub struct DisplaySurface {
    size: Option<Size>,
    image: Option<DicomImage>,
    viewport: Option<Viewport>,
    rendered: Option<RenderedFrame>,
}

impl DisplaySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the surface with a fixed size in logical pixels.
    pub fn enable(&mut self, size: Size) {
        self.size = Some(size);
    }

    /// Disables the surface and drops the image, viewport and frame.
    pub fn disable(&mut self) {
        self.size = None;
        self.image = None;
        self.viewport = None;
        self.rendered = None;
    }

    /// Drops the image, viewport and frame but stays enabled.
    pub fn clear(&mut self) {
        self.image = None;
        self.viewport = None;
        self.rendered = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.size.is_some()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn image(&self) -> Option<&DicomImage> {
        self.image.as_ref()
    }

    pub fn rendered(&self) -> Option<&RenderedFrame> {
        self.rendered.as_ref()
    }

    /// Shows `image`. An existing viewport is kept; call [`Self::reset`] to
    /// fit the new image.
    pub fn display_image(&mut self, image: DicomImage) -> Result<()> {
        let size = self.size.ok_or(SurfaceError::NotEnabled)?;
        let viewport = self
            .viewport
            .unwrap_or_else(|| Viewport::default_for(&image, size));
        self.image = Some(image);
        self.viewport = Some(viewport.sanitized());
        self.rendered = None;
        self.render();
        Ok(())
    }

    /// Restores the default viewport for the current image.
    pub fn reset(&mut self) -> Result<()> {
        let size = self.size.ok_or(SurfaceError::NotEnabled)?;
        let image = self.image.as_ref().ok_or(SurfaceError::NoImage)?;
        let pixel_replication = self.viewport.is_some_and(|vp| vp.pixel_replication);
        self.viewport = Some(Viewport {
            pixel_replication,
            ..Viewport::default_for(image, size)
        });
        self.render();
        Ok(())
    }

    /// A copy of the current viewport.
    pub fn get_viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Replaces the viewport, re-rendering when VOI or inversion changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if !self.is_enabled() {
            return Err(SurfaceError::NotEnabled.into());
        }
        if self.image.is_none() {
            return Err(SurfaceError::NoImage.into());
        }
        self.viewport = Some(viewport.sanitized());
        self.render();
        Ok(())
    }

    fn render(&mut self) {
        let (Some(image), Some(viewport)) = (&self.image, &self.viewport) else {
            return;
        };
        let up_to_date = self
            .rendered
            .as_ref()
            .is_some_and(|frame| frame.voi == viewport.voi && frame.invert == viewport.invert);
        if up_to_date {
            return;
        }

        let rgba = voi::render_rgba(image, viewport.voi, viewport.invert);
        self.rendered = Some(RenderedFrame {
            handle: Handle::from_rgba(image.columns(), image.rows(), rgba),
            width: image.columns(),
            height: image.rows(),
            voi: viewport.voi,
            invert: viewport.invert,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::image::MONOCHROME2;
    use crate::error::Error;
    use crate::test_utils::assert_abs_diff_eq;
    use iced::Vector;

    fn surface_size() -> Size {
        Size::new(512.0, 512.0)
    }

    fn image(columns: u32, rows: u32) -> DicomImage {
        let pixels = (0..columns * rows).map(|v| v as f32).collect();
        DicomImage::from_pixels(columns, rows, 1, pixels, Some((40.0, 400.0)), MONOCHROME2)
            .expect("valid image")
    }

    #[test]
    fn display_fails_when_not_enabled() {
        let mut surface = DisplaySurface::new();
        let result = surface.display_image(image(4, 4));
        assert_eq!(result, Err(Error::Surface(SurfaceError::NotEnabled)));
        assert!(surface.image().is_none());
    }

    #[test]
    fn clear_keeps_surface_enabled() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(4, 4)).expect("display should succeed");

        surface.clear();
        assert!(surface.is_enabled());
        assert!(surface.image().is_none());
        assert!(surface.get_viewport().is_none());
        assert!(surface.rendered().is_none());
    }

    #[test]
    fn set_viewport_requires_an_image() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        let viewport = Viewport::default_for(&image(4, 4), surface_size());
        assert_eq!(
            surface.set_viewport(viewport),
            Err(Error::Surface(SurfaceError::NoImage))
        );
    }

    #[test]
    fn display_renders_with_default_viewport() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(128, 64)).expect("display should succeed");

        let viewport = surface.get_viewport().expect("viewport after display");
        assert_abs_diff_eq!(viewport.scale, 4.0);
        let frame = surface.rendered().expect("frame after display");
        assert_eq!((frame.width, frame.height), (128, 64));
        assert_eq!(frame.voi, VoiWindow::new(40.0, 400.0));
    }

    #[test]
    fn second_image_keeps_viewport_until_reset() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(128, 128)).expect("display should succeed");
        let mut viewport = surface.get_viewport().expect("viewport");
        viewport.translation = Vector::new(10.0, 5.0);
        surface.set_viewport(viewport).expect("set viewport");

        surface.display_image(image(256, 256)).expect("display should succeed");
        let kept = surface.get_viewport().expect("viewport");
        assert_eq!(kept.translation, Vector::new(10.0, 5.0));
        assert_abs_diff_eq!(kept.scale, 4.0);

        surface.reset().expect("reset should succeed");
        let reset = surface.get_viewport().expect("viewport");
        assert_eq!(reset.translation, Vector::new(0.0, 0.0));
        assert_abs_diff_eq!(reset.scale, 2.0);
    }

    #[test]
    fn voi_change_rerenders_frame() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(8, 8)).expect("display should succeed");

        let mut viewport = surface.get_viewport().expect("viewport");
        viewport.voi = VoiWindow::new(128.0, 256.0);
        surface.set_viewport(viewport).expect("set viewport");

        let frame = surface.rendered().expect("frame");
        assert_eq!(frame.voi, VoiWindow::new(128.0, 256.0));
    }

    #[test]
    fn set_viewport_applies_invariants() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(8, 8)).expect("display should succeed");

        let mut viewport = surface.get_viewport().expect("viewport");
        viewport.scale = -3.0;
        viewport.voi.window_width = 0.0;
        surface.set_viewport(viewport).expect("set viewport");

        let stored = surface.get_viewport().expect("viewport");
        assert!(stored.scale > 0.0);
        assert_abs_diff_eq!(stored.voi.window_width, 1.0);
    }

    #[test]
    fn disable_drops_everything() {
        let mut surface = DisplaySurface::new();
        surface.enable(surface_size());
        surface.display_image(image(8, 8)).expect("display should succeed");
        surface.disable();

        assert!(!surface.is_enabled());
        assert!(surface.image().is_none());
        assert!(surface.get_viewport().is_none());
        assert!(surface.rendered().is_none());
        assert_eq!(surface.reset(), Err(Error::Surface(SurfaceError::NotEnabled)));
    }
}
