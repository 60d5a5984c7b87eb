// SPDX-License-Identifier: MPL-2.0
//! Interaction tool registry.
//!
//! Tools are added to the registry once and then activated on a mouse button
//! mask. A mouse press is routed to the active tool whose mask contains the
//! pressed button. Masks use the same bit values as the browser `buttons`
//! field: left is 1, right is 2, middle is 4.
//!
//! Activating a tool on buttons another active tool already uses turns that
//! other tool passive, so a button always maps to at most one tool.

pub mod magnify;
pub mod pan;
pub mod zoom;

use crate::error::{Error, Result};
use iced::mouse;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// The interaction tools the viewer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Zoom,
    Pan,
    Magnify,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Zoom, ToolKind::Pan, ToolKind::Magnify];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Zoom => "Zoom",
            ToolKind::Pan => "Pan",
            ToolKind::Magnify => "Magnify",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MouseButtonMask(u8);

impl MouseButtonMask {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Mask for a single iced mouse button. Extra buttons have no mask.
    #[must_use]
    pub fn from_button(button: mouse::Button) -> Option<Self> {
        match button {
            mouse::Button::Left => Some(Self::LEFT),
            mouse::Button::Right => Some(Self::RIGHT),
            mouse::Button::Middle => Some(Self::MIDDLE),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for MouseButtonMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Mouse button as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButtonBinding {
    Left,
    Right,
    Middle,
}

impl From<MouseButtonBinding> for MouseButtonMask {
    fn from(binding: MouseButtonBinding) -> Self {
        match binding {
            MouseButtonBinding::Left => MouseButtonMask::LEFT,
            MouseButtonBinding::Right => MouseButtonMask::RIGHT,
            MouseButtonBinding::Middle => MouseButtonMask::MIDDLE,
        }
    }
}

/// How a registered tool reacts to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    /// Receives presses of the buttons in the mask.
    Active(MouseButtonMask),
    Passive,
    Disabled,
}

/// Button masks each tool is activated on at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolBindings {
    pub zoom: MouseButtonMask,
    pub pan: MouseButtonMask,
    pub magnify: MouseButtonMask,
}

impl Default for ToolBindings {
    fn default() -> Self {
        Self {
            zoom: MouseButtonMask::LEFT,
            pan: MouseButtonMask::RIGHT,
            magnify: MouseButtonMask::MIDDLE,
        }
    }
}

#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<(ToolKind, ToolMode)>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn init() -> Self {
        debug!("Tool registry initialized");
        Self::default()
    }

    /// Creates a registry with every tool added and activated on `bindings`.
    pub fn with_bindings(bindings: ToolBindings) -> Result<Self> {
        let mut registry = Self::init();
        for kind in ToolKind::ALL {
            registry.add_tool(kind);
        }
        registry.set_tool_active(ToolKind::Zoom.name(), bindings.zoom)?;
        registry.set_tool_active(ToolKind::Pan.name(), bindings.pan)?;
        registry.set_tool_active(ToolKind::Magnify.name(), bindings.magnify)?;
        Ok(registry)
    }

    /// Adds a tool in disabled mode. Returns false if it was already added.
    pub fn add_tool(&mut self, kind: ToolKind) -> bool {
        if self.mode(kind).is_some() {
            warn!("{} tool has already been added", kind);
            return false;
        }
        self.tools.push((kind, ToolMode::Disabled));
        true
    }

    /// Activates the named tool on `mask`.
    pub fn set_tool_active(&mut self, name: &str, mask: MouseButtonMask) -> Result<()> {
        let kind = ToolKind::from_name(name)
            .ok_or_else(|| Error::Tool(format!("unknown tool: {}", name)))?;
        if self.mode(kind).is_none() {
            return Err(Error::Tool(format!("{} tool has not been added", kind)));
        }

        for (other, mode) in &mut self.tools {
            if *other == kind {
                continue;
            }
            if let ToolMode::Active(other_mask) = *mode {
                if other_mask.intersects(mask) {
                    warn!("{} tool is now passive; its buttons went to {}", other, kind);
                    *mode = ToolMode::Passive;
                }
            }
        }
        self.set_mode(kind, ToolMode::Active(mask));
        debug!("{} tool active on buttons {:#05b}", kind, mask.bits());
        Ok(())
    }

    pub fn mode(&self, kind: ToolKind) -> Option<ToolMode> {
        self.tools
            .iter()
            .find(|(registered, _)| *registered == kind)
            .map(|(_, mode)| *mode)
    }

    /// The active tool bound to `button`, if any.
    pub fn active_tool_for(&self, button: mouse::Button) -> Option<ToolKind> {
        let pressed = MouseButtonMask::from_button(button)?;
        self.tools.iter().find_map(|(kind, mode)| match mode {
            ToolMode::Active(mask) if mask.intersects(pressed) => Some(*kind),
            _ => None,
        })
    }

    fn set_mode(&mut self, kind: ToolKind, mode: ToolMode) {
        if let Some(entry) = self.tools.iter_mut().find(|(registered, _)| *registered == kind) {
            entry.1 = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_route_buttons() {
        let registry = ToolRegistry::with_bindings(ToolBindings::default()).expect("bindings");
        assert_eq!(registry.active_tool_for(mouse::Button::Left), Some(ToolKind::Zoom));
        assert_eq!(registry.active_tool_for(mouse::Button::Right), Some(ToolKind::Pan));
        assert_eq!(
            registry.active_tool_for(mouse::Button::Middle),
            Some(ToolKind::Magnify)
        );
        assert_eq!(registry.active_tool_for(mouse::Button::Back), None);
    }

    #[test]
    fn added_tool_starts_disabled() {
        let mut registry = ToolRegistry::init();
        assert!(registry.add_tool(ToolKind::Pan));
        assert_eq!(registry.mode(ToolKind::Pan), Some(ToolMode::Disabled));
        assert_eq!(registry.active_tool_for(mouse::Button::Left), None);
    }

    #[test]
    fn adding_twice_is_a_no_op() {
        let mut registry = ToolRegistry::init();
        assert!(registry.add_tool(ToolKind::Zoom));
        registry
            .set_tool_active("Zoom", MouseButtonMask::LEFT)
            .expect("activate");
        assert!(!registry.add_tool(ToolKind::Zoom));
        assert_eq!(
            registry.mode(ToolKind::Zoom),
            Some(ToolMode::Active(MouseButtonMask::LEFT))
        );
    }

    #[test]
    fn activating_unknown_or_missing_tool_fails() {
        let mut registry = ToolRegistry::init();
        assert!(matches!(
            registry.set_tool_active("Rotate", MouseButtonMask::LEFT),
            Err(Error::Tool(message)) if message.contains("unknown")
        ));
        assert!(matches!(
            registry.set_tool_active("Pan", MouseButtonMask::LEFT),
            Err(Error::Tool(message)) if message.contains("not been added")
        ));
    }

    #[test]
    fn conflicting_activation_makes_previous_tool_passive() {
        let mut registry = ToolRegistry::with_bindings(ToolBindings::default()).expect("bindings");
        registry
            .set_tool_active("Pan", MouseButtonMask::LEFT)
            .expect("activate");

        assert_eq!(registry.mode(ToolKind::Zoom), Some(ToolMode::Passive));
        assert_eq!(registry.active_tool_for(mouse::Button::Left), Some(ToolKind::Pan));
        assert_eq!(registry.active_tool_for(mouse::Button::Right), None);
    }

    #[test]
    fn combined_mask_routes_both_buttons() {
        let mut registry = ToolRegistry::init();
        registry.add_tool(ToolKind::Pan);
        registry
            .set_tool_active("Pan", MouseButtonMask::LEFT | MouseButtonMask::RIGHT)
            .expect("activate");
        assert_eq!(registry.active_tool_for(mouse::Button::Left), Some(ToolKind::Pan));
        assert_eq!(registry.active_tool_for(mouse::Button::Right), Some(ToolKind::Pan));
    }

    #[test]
    fn mask_bits_match_browser_buttons() {
        assert_eq!(MouseButtonMask::LEFT.bits(), 1);
        assert_eq!(MouseButtonMask::RIGHT.bits(), 2);
        assert_eq!(MouseButtonMask::MIDDLE.bits(), 4);
        assert_eq!(MouseButtonMask::from_bits(0xff).bits(), 7);
        assert!(MouseButtonMask::NONE.is_empty());
        assert_eq!(
            MouseButtonMask::from(MouseButtonBinding::Middle),
            MouseButtonMask::MIDDLE
        );
    }

    #[test]
    fn tool_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("zoom"), None);
    }
}
