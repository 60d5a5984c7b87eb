// SPDX-License-Identifier: MPL-2.0
//! Decoded DICOM image ready for VOI rendering.
//!
//! The pixel values stored here already went through the modality LUT
//! (rescale slope and intercept), so for CT they are Hounsfield units. Only the
//! first frame of multi-frame objects is kept.

use crate::error::{Error, Result};
use dicom::object::{open_file, FileDicomObject, InMemDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption};
use dicom_dictionary_std::tags;
use ndarray::s;
use std::path::Path;
use std::sync::Arc;

/// Photometric interpretation where the lowest value is displayed white.
pub const MONOCHROME1: &str = "MONOCHROME1";
/// Photometric interpretation assumed when the tag is missing.
pub const MONOCHROME2: &str = "MONOCHROME2";

/// A single decoded frame with the display hints found in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct DicomImage {
    columns: u32,
    rows: u32,
    samples_per_pixel: u16,
    pixels: Arc<Vec<f32>>,
    min_pixel_value: f32,
    max_pixel_value: f32,
    window_center: f32,
    window_width: f32,
    photometric_interpretation: String,
    modality: Option<String>,
}

impl DicomImage {
    /// Builds an image from modality pixel values in row-major order.
    ///
    /// `window` is the (center, width) pair read from the file. When it is
    /// missing or not finite, a window covering the full pixel range is used.
    pub fn from_pixels(
        columns: u32,
        rows: u32,
        samples_per_pixel: u16,
        pixels: Vec<f32>,
        window: Option<(f32, f32)>,
        photometric_interpretation: impl Into<String>,
    ) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::Decode(format!(
                "image has no pixels ({}x{})",
                columns, rows
            )));
        }
        if samples_per_pixel != 1 && samples_per_pixel != 3 {
            return Err(Error::Decode(format!(
                "unsupported samples per pixel: {}",
                samples_per_pixel
            )));
        }
        let expected = columns as usize * rows as usize * samples_per_pixel as usize;
        if pixels.len() != expected {
            return Err(Error::Decode(format!(
                "expected {} pixel values, got {}",
                expected,
                pixels.len()
            )));
        }

        let (min_pixel_value, max_pixel_value) = pixel_range(&pixels);
        let (window_center, window_width) = window
            .filter(|(center, width)| center.is_finite() && width.is_finite())
            .unwrap_or_else(|| {
                (
                    (max_pixel_value + min_pixel_value) / 2.0,
                    (max_pixel_value - min_pixel_value).max(1.0),
                )
            });

        Ok(Self {
            columns,
            rows,
            samples_per_pixel,
            pixels: Arc::new(pixels),
            min_pixel_value,
            max_pixel_value,
            window_center,
            window_width,
            photometric_interpretation: photometric_interpretation.into(),
            modality: None,
        })
    }

    #[must_use]
    pub fn with_modality(mut self, modality: Option<String>) -> Self {
        self.modality = modality;
        self
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.samples_per_pixel
    }

    pub fn is_color(&self) -> bool {
        self.samples_per_pixel == 3
    }

    /// Modality pixel values, `samples_per_pixel` values per pixel.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn min_pixel_value(&self) -> f32 {
        self.min_pixel_value
    }

    pub fn max_pixel_value(&self) -> f32 {
        self.max_pixel_value
    }

    pub fn window_center(&self) -> f32 {
        self.window_center
    }

    pub fn window_width(&self) -> f32 {
        self.window_width
    }

    /// True when the image should be displayed with inverted grayscale.
    pub fn invert(&self) -> bool {
        self.photometric_interpretation == MONOCHROME1
    }

    pub fn photometric_interpretation(&self) -> &str {
        &self.photometric_interpretation
    }

    pub fn modality(&self) -> Option<&str> {
        self.modality.as_deref()
    }

    /// Image size in pixels, as used by the viewport transform.
    pub fn size(&self) -> iced::Size {
        iced::Size::new(self.columns as f32, self.rows as f32)
    }
}

/// Reads and decodes the first frame of a DICOM file.
pub fn decode_file(path: &Path) -> Result<DicomImage> {
    let object = open_file(path)?;
    decode_object(&object)
}

/// Decodes the first frame of an already parsed DICOM object.
pub fn decode_object(object: &FileDicomObject<InMemDicomObject>) -> Result<DicomImage> {
    let pixel_data = object.decode_pixel_data()?;
    let columns = pixel_data.columns();
    let rows = pixel_data.rows();
    let samples_per_pixel = pixel_data.samples_per_pixel();

    let options = ConvertOptions::new()
        .with_modality_lut(ModalityLutOption::Default)
        .with_voi_lut(VoiLutOption::Identity);
    let frames = pixel_data.to_ndarray_with_options::<f32>(&options)?;
    if frames.shape().first().copied().unwrap_or(0) == 0 {
        return Err(Error::Decode("pixel data has no frames".to_string()));
    }
    let first_frame = frames.slice_move(s![0, .., .., ..]);
    let pixels: Vec<f32> = first_frame.iter().copied().collect();

    let window =
        first_float(object, tags::WINDOW_CENTER).zip(first_float(object, tags::WINDOW_WIDTH));
    let photometric = text_value(object, tags::PHOTOMETRIC_INTERPRETATION)
        .unwrap_or_else(|| MONOCHROME2.to_string());

    DicomImage::from_pixels(columns, rows, samples_per_pixel, pixels, window, photometric)
        .map(|image| image.with_modality(text_value(object, tags::MODALITY)))
}

fn first_float(object: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<f32> {
    object
        .element(tag)
        .ok()?
        .to_multi_float32()
        .ok()?
        .first()
        .copied()
        .filter(|value| value.is_finite())
}

fn text_value(object: &FileDicomObject<InMemDicomObject>, tag: dicom::core::Tag) -> Option<String> {
    let value = object.element(tag).ok()?.to_str().ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Smallest and largest finite value. An image without finite values maps to (0, 0).
fn pixel_range(pixels: &[f32]) -> (f32, f32) {
    let (min, max) = pixels
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, write_test_dicom, TestDicom};
    use tempfile::tempdir;

    #[test]
    fn from_pixels_rejects_mismatched_length() {
        let err = DicomImage::from_pixels(2, 2, 1, vec![0.0; 3], None, MONOCHROME2)
            .expect_err("length mismatch must fail");
        assert!(matches!(err, Error::Decode(message) if message.contains("expected 4")));
    }

    #[test]
    fn from_pixels_rejects_empty_image() {
        let result = DicomImage::from_pixels(0, 4, 1, Vec::new(), None, MONOCHROME2);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn missing_window_is_derived_from_pixel_range() {
        let pixels = vec![-100.0, 0.0, 100.0, 300.0];
        let image =
            DicomImage::from_pixels(2, 2, 1, pixels, None, MONOCHROME2).expect("valid image");
        assert_abs_diff_eq!(image.window_center(), 100.0);
        assert_abs_diff_eq!(image.window_width(), 400.0);
        assert_abs_diff_eq!(image.min_pixel_value(), -100.0);
        assert_abs_diff_eq!(image.max_pixel_value(), 300.0);
    }

    #[test]
    fn flat_image_gets_minimum_window_width() {
        let image = DicomImage::from_pixels(1, 2, 1, vec![7.0, 7.0], None, MONOCHROME2)
            .expect("valid image");
        assert_abs_diff_eq!(image.window_width(), 1.0);
        assert_abs_diff_eq!(image.window_center(), 7.0);
    }

    #[test]
    fn non_finite_window_falls_back_to_range() {
        let window = Some((f32::NAN, 5.0));
        let image = DicomImage::from_pixels(1, 2, 1, vec![0.0, 10.0], window, MONOCHROME2)
            .expect("valid image");
        assert_abs_diff_eq!(image.window_center(), 5.0);
        assert_abs_diff_eq!(image.window_width(), 10.0);
    }

    #[test]
    fn pixel_range_ignores_nan() {
        assert_eq!(pixel_range(&[f32::NAN, 3.0, -2.0]), (-2.0, 3.0));
        assert_eq!(pixel_range(&[f32::NAN]), (0.0, 0.0));
    }

    #[test]
    fn monochrome1_is_inverted() {
        let image =
            DicomImage::from_pixels(1, 1, 1, vec![0.0], None, MONOCHROME1).expect("valid image");
        assert!(image.invert());
        let image =
            DicomImage::from_pixels(1, 1, 1, vec![0.0], None, MONOCHROME2).expect("valid image");
        assert!(!image.invert());
    }

    #[test]
    fn decode_file_reads_dimensions_and_window_tags() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("ct.dcm");
        write_test_dicom(
            &path,
            &TestDicom {
                columns: 3,
                rows: 2,
                pixels: vec![0, 10, 20, 30, 40, 50],
                window: Some(("40", "400")),
                ..TestDicom::default()
            },
        );

        let image = decode_file(&path).expect("failed to decode test file");
        assert_eq!(image.columns(), 3);
        assert_eq!(image.rows(), 2);
        assert_eq!(image.samples_per_pixel(), 1);
        assert_eq!(image.pixels().len(), 6);
        assert_abs_diff_eq!(image.window_center(), 40.0);
        assert_abs_diff_eq!(image.window_width(), 400.0);
        assert_eq!(image.modality(), Some("CT"));
        assert!(!image.invert());
    }

    #[test]
    fn decode_file_applies_rescale_intercept() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("ct.dcm");
        write_test_dicom(
            &path,
            &TestDicom {
                columns: 2,
                rows: 1,
                pixels: vec![1024, 1064],
                rescale_intercept: "-1024",
                ..TestDicom::default()
            },
        );

        let image = decode_file(&path).expect("failed to decode test file");
        assert_abs_diff_eq!(image.pixels()[0], 0.0);
        assert_abs_diff_eq!(image.pixels()[1], 40.0);
    }

    #[test]
    fn decode_file_without_window_tags_uses_range() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("mr.dcm");
        write_test_dicom(
            &path,
            &TestDicom {
                columns: 2,
                rows: 2,
                pixels: vec![100, 200, 300, 500],
                photometric: MONOCHROME1,
                ..TestDicom::default()
            },
        );

        let image = decode_file(&path).expect("failed to decode test file");
        assert_abs_diff_eq!(image.window_center(), 300.0);
        assert_abs_diff_eq!(image.window_width(), 400.0);
        assert!(image.invert());
    }

    #[test]
    fn decode_file_reports_missing_file_as_dicom_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let result = decode_file(&dir.path().join("missing.dcm"));
        assert!(matches!(result, Err(Error::Dicom(_))));
    }

    #[test]
    fn decode_file_rejects_non_dicom_content() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("notes.dcm");
        std::fs::write(&path, b"definitely not a dicom file").expect("failed to write file");
        assert!(matches!(decode_file(&path), Err(Error::Dicom(_))));
    }
}
