// SPDX-License-Identifier: MPL-2.0
//! Image viewer module: the display surface canvas, the window sliders and
//! the component tying them to the tools.

pub mod canvas;
pub mod component;
pub mod controls;

pub use canvas::PointerEvent;
pub use component::{Effect, Message, State, ViewerSettings};
