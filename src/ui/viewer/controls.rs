// SPDX-License-Identifier: MPL-2.0
//! Window center and width sliders.

use super::component::Message;
use crate::app::config::{
    WINDOW_CENTER_MAX, WINDOW_CENTER_MIN, WINDOW_SLIDER_STEP, WINDOW_WIDTH_MAX, WINDOW_WIDTH_MIN,
};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use iced::widget::{slider, text, Column, Row};
use iced::{alignment, Element, Length};

pub fn view<'a>(window_center: f32, window_width: f32, i18n: &I18n) -> Element<'a, Message> {
    let center = labeled_slider(
        label(&i18n.tr("window-center-label"), window_center),
        slider(
            WINDOW_CENTER_MIN..=WINDOW_CENTER_MAX,
            window_center,
            Message::WindowCenterChanged,
        )
        .step(WINDOW_SLIDER_STEP),
    );
    let width = labeled_slider(
        label(&i18n.tr("window-width-label"), window_width),
        slider(
            WINDOW_WIDTH_MIN..=WINDOW_WIDTH_MAX,
            window_width,
            Message::WindowWidthChanged,
        )
        .step(WINDOW_SLIDER_STEP),
    );

    Column::new()
        .spacing(spacing::XS)
        .push(center)
        .push(width)
        .into()
}

fn labeled_slider<'a>(
    caption: String,
    slider: slider::Slider<'a, f32, Message>,
) -> Row<'a, Message> {
    Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            text(caption)
                .size(typography::BODY)
                .width(Length::Fixed(sizing::SLIDER_LABEL_WIDTH)),
        )
        .push(slider.width(Length::Fill))
}

/// Label text with the current value.
pub fn label(name: &str, value: f32) -> String {
    format!("{}: {}", name, format_number(value))
}

/// Whole numbers without a fraction, others with up to two decimals.
pub fn format_number(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.2}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
