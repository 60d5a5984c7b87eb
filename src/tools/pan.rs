// SPDX-License-Identifier: MPL-2.0
//! Drag-to-pan. Translation is in image pixels, so canvas deltas are divided
//! by the current scale.

use crate::viewport::Viewport;
use iced::Vector;

pub fn apply_drag(viewport: &mut Viewport, delta: Vector) {
    let scale = viewport.scale.max(crate::viewport::MIN_SCALE);
    viewport.translation.x += delta.x / scale;
    viewport.translation.y += delta.y / scale;
}
