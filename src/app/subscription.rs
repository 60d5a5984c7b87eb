// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Only window events reach the app here. Mouse input on the display surface
//! is handled by the viewer canvas itself.

use super::Message;
use iced::{event, Subscription};

/// Routes window close requests and dropped files.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, window_id| match event {
        event::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        event::Event::Window(iced::window::Event::FileDropped(path)) => {
            Some(Message::FileDropped(path))
        }
        _ => None,
    })
}
