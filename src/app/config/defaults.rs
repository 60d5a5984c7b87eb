// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Display**: Surface size and the window used before an image is loaded
//! - **Sliders**: Window center / width slider ranges
//! - **Tools**: Zoom bounds and magnifier geometry

// ==========================================================================
// Display Defaults
// ==========================================================================

/// Side of the square display surface, in logical pixels.
pub const DEFAULT_SURFACE_SIZE: f32 = 512.0;

/// Smallest accepted display surface side.
pub const MIN_SURFACE_SIZE: f32 = 128.0;

/// Largest accepted display surface side.
pub const MAX_SURFACE_SIZE: f32 = 2048.0;

/// Window center used when an image does not provide a usable one.
pub const DEFAULT_WINDOW_CENTER: f32 = 128.0;

/// Window width used when an image does not provide a usable one.
pub const DEFAULT_WINDOW_WIDTH: f32 = 256.0;

// ==========================================================================
// Slider Ranges
// ==========================================================================

pub const WINDOW_CENTER_MIN: f32 = -500.0;
pub const WINDOW_CENTER_MAX: f32 = 500.0;
pub const WINDOW_WIDTH_MIN: f32 = 1.0;
pub const WINDOW_WIDTH_MAX: f32 = 1000.0;

/// Slider increment for both window sliders.
pub const WINDOW_SLIDER_STEP: f32 = 1.0;

// ==========================================================================
// Tool Defaults
// ==========================================================================

pub use crate::tools::magnify::{DEFAULT_MAGNIFICATION_LEVEL, DEFAULT_MAGNIFY_SIZE};
pub use crate::tools::zoom::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};
