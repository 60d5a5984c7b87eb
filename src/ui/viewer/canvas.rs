// SPDX-License-Identifier: MPL-2.0
//! Canvas program that draws the display surface and turns mouse input into
//! pointer events for the tools.

use super::component::Message;
use crate::tools::magnify::MagnifierLens;
use crate::tools::MouseButtonMask;
use crate::ui::design_tokens::border;
use crate::ui::theming::ColorScheme;
use crate::viewport::surface::DisplaySurface;
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::widget::image::FilterMethod;
use iced::widget::Action;
use iced::{mouse, Point, Rectangle, Size};

/// Mouse input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { button: mouse::Button, position: Point },
    Moved { position: Point },
    Released { button: mouse::Button },
}

/// Buttons pressed inside the surface and not yet released.
#[derive(Debug, Default)]
pub struct CanvasState {
    held: MouseButtonMask,
}

pub struct ViewportCanvas<'a> {
    pub surface: &'a DisplaySurface,
    pub magnifier: Option<MagnifierLens>,
    pub colors: ColorScheme,
}

impl<'a> ViewportCanvas<'a> {
    fn draw_image(&self, frame: &mut Frame, size: Size) {
        let (Some(image), Some(frame_data), Some(viewport)) = (
            self.surface.image(),
            self.surface.rendered(),
            self.surface.get_viewport(),
        ) else {
            return;
        };
        let filter = filter_method(viewport.pixel_replication);
        let bounds = viewport.image_bounds(image.size(), size);
        frame.draw_image(
            bounds,
            canvas::Image::new(frame_data.handle.clone()).filter_method(filter),
        );

        let Some(lens) = self.magnifier else {
            return;
        };
        let region = lens.bounds();
        let magnified = lens.image_rect(image.size());
        frame.with_clip(region, |clip| {
            // Clip frames are positioned at the region origin.
            let local = Rectangle::new(
                Point::new(magnified.x - region.x, magnified.y - region.y),
                magnified.size(),
            );
            clip.fill_rectangle(Point::ORIGIN, region.size(), self.colors.magnifier_shade);
            clip.draw_image(
                local,
                canvas::Image::new(frame_data.handle.clone()).filter_method(filter),
            );
        });
        frame.stroke(
            &Path::rectangle(region.position(), region.size()),
            Stroke::default()
                .with_width(border::WIDTH_MD)
                .with_color(self.colors.magnifier_border),
        );
    }
}

impl<'a> canvas::Program<Message> for ViewportCanvas<'a> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let iced::Event::Mouse(event) = event else {
            return None;
        };

        let pointer = match *event {
            mouse::Event::ButtonPressed(button) => {
                let position = cursor.position_in(bounds)?;
                let mask = MouseButtonMask::from_button(button)?;
                state.held = state.held | mask;
                PointerEvent::Pressed { button, position }
            }
            mouse::Event::CursorMoved { position } => {
                if state.held.is_empty() {
                    return None;
                }
                // Keep tracking outside the surface while a button is held.
                PointerEvent::Moved {
                    position: Point::new(position.x - bounds.x, position.y - bounds.y),
                }
            }
            mouse::Event::ButtonReleased(button) => {
                let mask = MouseButtonMask::from_button(button)?;
                if !state.held.intersects(mask) {
                    return None;
                }
                state.held = MouseButtonMask::from_bits(state.held.bits() & !mask.bits());
                PointerEvent::Released { button }
            }
            _ => return None,
        };

        Some(Action::publish(Message::Pointer(pointer)).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), self.colors.viewport_background);

        let size = self.surface.size().unwrap_or(bounds.size());
        self.draw_image(&mut frame, size);

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.surface.image().is_none() {
            return mouse::Interaction::default();
        }
        if !state.held.is_empty() {
            return mouse::Interaction::Grabbing;
        }
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Nearest filtering when pixel replication is on.
pub fn filter_method(pixel_replication: bool) -> FilterMethod {
    if pixel_replication {
        FilterMethod::Nearest
    } else {
        FilterMethod::Linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_replication_selects_nearest_filter() {
        assert_eq!(filter_method(true), FilterMethod::Nearest);
        assert_eq!(filter_method(false), FilterMethod::Linear);
    }

    #[test]
    fn canvas_state_starts_with_no_buttons() {
        assert!(CanvasState::default().held.is_empty());
    }
}
