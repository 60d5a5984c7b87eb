// SPDX-License-Identifier: MPL-2.0
//! Drag state management
//!
//! Tracks a press-move-release gesture on the display surface and which tool
//! the pressed button was routed to.

use crate::tools::zoom::ZoomAnchor;
use crate::tools::ToolKind;
use iced::{mouse, Point, Vector};

/// Manages press-and-drag state
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Whether a drag operation is currently active
    pub is_dragging: bool,

    /// Button that started the drag
    pub button: Option<mouse::Button>,

    /// Tool the button is bound to
    pub tool: Option<ToolKind>,

    /// Position where the drag started
    pub start_position: Option<Point>,

    /// Position of the previous move event
    pub last_position: Option<Point>,

    /// Fixed point of a zoom drag
    pub zoom_anchor: Option<ZoomAnchor>,
}

impl DragState {
    /// Starts a drag operation
    pub fn start(&mut self, button: mouse::Button, tool: ToolKind, position: Point) {
        self.is_dragging = true;
        self.button = Some(button);
        self.tool = Some(tool);
        self.start_position = Some(position);
        self.last_position = Some(position);
        self.zoom_anchor = None;
    }

    /// Stops the drag operation
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Whether `button` is the one holding the current drag.
    #[must_use]
    pub fn is_held_by(&self, button: mouse::Button) -> bool {
        self.is_dragging && self.button == Some(button)
    }

    /// Movement since the previous event; records `current` as the new last
    /// position.
    pub fn advance(&mut self, current: Point) -> Option<Vector> {
        let delta = self.delta(current)?;
        self.last_position = Some(current);
        Some(delta)
    }

    /// Movement since the previous event
    #[must_use]
    pub fn delta(&self, current: Point) -> Option<Vector> {
        if !self.is_dragging {
            return None;
        }
        let last = self.last_position?;
        Some(current - last)
    }
}
