// SPDX-License-Identifier: MPL-2.0
//! UI state management modules
//!
//! This module contains interaction state kept apart from the viewer
//! component's update logic.

pub mod drag;

// Re-export commonly used types for convenience
pub use drag::DragState;
