// SPDX-License-Identifier: MPL-2.0
//! DICOM file handling: decoding, file registration and the decode worker pool.
//!
//! Parsing and pixel-data decoding are delegated to `dicom-rs`. This module
//! only turns a decoded object into a [`DicomImage`] the viewport can render,
//! hands out image identifiers for local files, and bounds how many decodes run
//! at the same time.

pub mod file_manager;
pub mod image;
pub mod worker_pool;

pub use file_manager::{FileManager, ImageId};
pub use image::DicomImage;
pub use worker_pool::{DecodeWorkerPool, PoolConfig, PoolStats};

/// File extensions offered by the open-file dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["dcm", "DCM"];

/// Returns true if the path has a DICOM file extension (case-insensitive).
#[must_use]
pub fn has_dicom_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
}
