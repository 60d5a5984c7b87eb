// SPDX-License-Identifier: MPL-2.0
//! User interface: design tokens, theming, interaction state and the viewer.

pub mod design_tokens;
pub mod state;
pub mod theming;
pub mod viewer;
