// SPDX-License-Identifier: MPL-2.0
//! `dicom_lens` is a minimal DICOM image viewer built with the Iced GUI framework.
//!
//! It opens a single local DICOM file, decodes it on a pool of blocking
//! workers, and shows it on a display surface with zoom, pan, magnifier and
//! window center/width controls.

#![doc(html_root_url = "https://docs.rs/dicom_lens/0.1.0")]

pub mod app;
pub mod dicom;
pub mod error;
pub mod i18n;
pub mod tools;
pub mod ui;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;
