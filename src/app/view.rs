// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::ui::theming::ColorScheme;
use crate::ui::viewer::component;
use iced::{
    widget::{container, scrollable, Container},
    Element, Length, Theme,
};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub viewer: &'a component::State,
    pub colors: &'a ColorScheme,
}

/// Renders the viewer screen. Small windows scroll.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let viewer = ctx
        .viewer
        .view(ctx.i18n, ctx.colors.clone())
        .map(Message::Viewer);

    let background = ctx.colors.surface_primary;
    Container::new(scrollable(viewer))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(background.into()),
            ..Default::default()
        })
        .into()
}
