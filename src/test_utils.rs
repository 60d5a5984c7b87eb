// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and other common test helpers.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.
//! It also writes small uncompressed DICOM files for decode tests.

// Re-export approx macros for convenient use in tests
pub use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};
use std::path::Path;

/// Default epsilon for f32 comparisons.
/// Suitable for values that should be "exactly equal" but may have minor floating-point errors.
pub const F32_EPSILON: f32 = 1e-6;

/// Description of a 16-bit grayscale test image.
#[derive(Debug, Clone)]
pub struct TestDicom {
    pub columns: u16,
    pub rows: u16,
    pub pixels: Vec<u16>,
    /// Window center and width as DICOM decimal strings.
    pub window: Option<(&'static str, &'static str)>,
    pub photometric: &'static str,
    pub rescale_intercept: &'static str,
}

impl Default for TestDicom {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 2,
            pixels: vec![0, 100, 200, 300],
            window: None,
            photometric: "MONOCHROME2",
            rescale_intercept: "0",
        }
    }
}

/// Writes `spec` as an explicit VR little endian CT image file.
///
/// # Panics
///
/// Panics if the object cannot be built or written.
pub fn write_test_dicom(path: &Path, spec: &TestDicom) {
    let sop_instance_uid = "2.25.300000000000000000000000000000000001";
    let mut object = InMemDicomObject::new_empty();
    object.put(DataElement::new(
        tags::SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(uids::CT_IMAGE_STORAGE),
    ));
    object.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(sop_instance_uid),
    ));
    object.put(DataElement::new(tags::MODALITY, VR::CS, PrimitiveValue::from("CT")));
    object.put(DataElement::new(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(1_u16),
    ));
    object.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from(spec.photometric),
    ));
    object.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(spec.rows)));
    object.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(spec.columns),
    ));
    object.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
    object.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
    object.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
    object.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));
    object.put(DataElement::new(
        tags::RESCALE_INTERCEPT,
        VR::DS,
        PrimitiveValue::from(spec.rescale_intercept),
    ));
    object.put(DataElement::new(tags::RESCALE_SLOPE, VR::DS, PrimitiveValue::from("1")));
    if let Some((center, width)) = spec.window {
        object.put(DataElement::new(tags::WINDOW_CENTER, VR::DS, PrimitiveValue::from(center)));
        object.put(DataElement::new(tags::WINDOW_WIDTH, VR::DS, PrimitiveValue::from(width)));
    }
    object.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(spec.pixels.iter().copied().collect()),
    ));

    let file_object = object
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(sop_instance_uid),
        )
        .expect("failed to build file meta group");
    file_object
        .write_to_file(path)
        .expect("failed to write test DICOM file");
}
