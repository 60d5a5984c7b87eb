// SPDX-License-Identifier: MPL-2.0
//! Viewer component encapsulating state and update logic.
//!
//! The component owns the display surface, the tool registry and the two
//! slider values. Decoding happens elsewhere; finished images arrive through
//! [`Message::ImageLoaded`].

use super::canvas::{PointerEvent, ViewportCanvas};
use super::controls;
use crate::app::config::Config;
use crate::dicom::{DicomImage, ImageId};
use crate::error::{Error, Result, SurfaceError};
use crate::i18n::fluent::I18n;
use crate::tools::magnify::{MagnifierLens, MagnifyConfig};
use crate::tools::zoom::{self, ZoomAnchor, ZoomConfig};
use crate::tools::{pan, ToolBindings, ToolKind, ToolRegistry};
use crate::ui::design_tokens::{border, sizing, spacing, typography};
use crate::ui::state::DragState;
use crate::ui::theming::ColorScheme;
use crate::viewport::surface::DisplaySurface;
use crate::viewport::VoiWindow;
use iced::widget::{button, canvas, container, Column, Container, Text};
use iced::{alignment, Border, Element, Length, Size, Task, Theme};
use log::{error, info, warn};

/// Messages emitted by viewer-related widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Request to open the file dialog.
    OpenFileRequested,
    ImageLoaded {
        image_id: ImageId,
        result: std::result::Result<DicomImage, Error>,
    },
    WindowCenterChanged(f32),
    WindowWidthChanged(f32),
    Pointer(PointerEvent),
}

/// Side effects the application should perform after handling a viewer message.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    OpenFileDialog,
}

/// Viewer settings taken from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub surface_size: Size,
    pub pixel_replication: bool,
    /// Used when an image reports a window center or width of 0 or NaN.
    pub fallback_window: VoiWindow,
    pub bindings: ToolBindings,
    pub zoom: ZoomConfig,
    pub magnify: MagnifyConfig,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ViewerSettings {
    fn from(config: &Config) -> Self {
        let side = config.display.surface_size();
        Self {
            surface_size: Size::new(side, side),
            pixel_replication: config.display.pixel_replication.unwrap_or(false),
            fallback_window: config.display.fallback_window(),
            bindings: config.tools.bindings(),
            zoom: config.tools.zoom(),
            magnify: config.tools.magnify(),
        }
    }
}

#[derive(Debug)]
pub struct State {
    window_center: f32,
    window_width: f32,
    surface: DisplaySurface,
    tools: ToolRegistry,
    drag: DragState,
    magnifier: Option<MagnifierLens>,
    current_image: Option<ImageId>,
    settings: ViewerSettings,
}

impl State {
    /// Sets up the tools and enables the display surface.
    pub fn mount(settings: ViewerSettings) -> Result<Self> {
        let tools = ToolRegistry::with_bindings(settings.bindings)?;
        let mut surface = DisplaySurface::new();
        surface.enable(settings.surface_size);

        Ok(Self {
            window_center: settings.fallback_window.window_center,
            window_width: settings.fallback_window.window_width,
            surface,
            tools,
            drag: DragState::default(),
            magnifier: None,
            current_image: None,
            settings,
        })
    }

    /// Disables the display surface. Later images are rejected.
    pub fn unmount(&mut self) {
        self.surface.disable();
        self.drag.stop();
        self.magnifier = None;
        self.current_image = None;
    }

    pub fn window_center(&self) -> f32 {
        self.window_center
    }

    pub fn window_width(&self) -> f32 {
        self.window_width
    }

    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    pub fn current_image(&self) -> Option<ImageId> {
        self.current_image
    }

    pub fn magnifier(&self) -> Option<MagnifierLens> {
        self.magnifier
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::OpenFileRequested => (Effect::OpenFileDialog, Task::none()),
            Message::ImageLoaded { image_id, result } => {
                self.on_image_loaded(image_id, result);
                (Effect::None, Task::none())
            }
            Message::WindowCenterChanged(value) => {
                self.window_center = value;
                self.push_voi();
                (Effect::None, Task::none())
            }
            Message::WindowWidthChanged(value) => {
                self.window_width = value;
                self.push_voi();
                (Effect::None, Task::none())
            }
            Message::Pointer(event) => {
                if let Err(err) = self.handle_pointer(event) {
                    warn!("Pointer input ignored: {}", err);
                }
                (Effect::None, Task::none())
            }
        }
    }

    fn on_image_loaded(
        &mut self,
        image_id: ImageId,
        result: std::result::Result<DicomImage, Error>,
    ) {
        match result.and_then(|image| self.show_image(image)) {
            Ok(()) => {
                self.current_image = Some(image_id);
                info!("Displayed {}", image_id);
            }
            Err(err) => error!("Failed to display {}: {}", image_id, err),
        }
    }

    fn show_image(&mut self, image: DicomImage) -> Result<()> {
        let center = image.window_center();
        let width = image.window_width();

        self.surface.display_image(image)?;
        if let Err(err) = self.fit_displayed_image(center, width) {
            self.discard_displayed_image();
            return Err(err);
        }
        Ok(())
    }

    /// Resets the viewport for a freshly displayed image and takes its window.
    fn fit_displayed_image(&mut self, center: f32, width: f32) -> Result<()> {
        self.window_center = or_fallback(center, self.settings.fallback_window.window_center);
        self.window_width = or_fallback(width, self.settings.fallback_window.window_width);
        self.drag.stop();
        self.magnifier = None;

        self.surface.reset()?;
        let mut viewport = self.surface.get_viewport().ok_or(SurfaceError::NoImage)?;
        viewport.pixel_replication = self.settings.pixel_replication;
        self.surface.set_viewport(viewport)?;
        self.sync_voi()
    }

    /// Returns to the empty state after a display that failed half way.
    fn discard_displayed_image(&mut self) {
        self.surface.clear();
        self.current_image = None;
        self.window_center = self.settings.fallback_window.window_center;
        self.window_width = self.settings.fallback_window.window_width;
        self.drag.stop();
        self.magnifier = None;
    }

    /// Applies the slider values to the viewport, if an image is shown.
    fn push_voi(&mut self) {
        if self.surface.image().is_none() {
            return;
        }
        if let Err(err) = self.sync_voi() {
            error!("Failed to update window: {}", err);
        }
    }

    fn sync_voi(&mut self) -> Result<()> {
        let mut viewport = self.surface.get_viewport().ok_or(SurfaceError::NoImage)?;
        viewport.voi.window_center = self.window_center;
        viewport.voi.window_width = self.window_width;
        self.surface.set_viewport(viewport)
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> Result<()> {
        if self.surface.image().is_none() {
            return Ok(());
        }
        match event {
            PointerEvent::Pressed { button, position } => {
                if self.drag.is_dragging {
                    return Ok(());
                }
                let Some(tool) = self.tools.active_tool_for(button) else {
                    return Ok(());
                };
                let (image, surface) = self.geometry()?;
                let viewport = self.surface.get_viewport().ok_or(SurfaceError::NoImage)?;

                self.drag.start(button, tool, position);
                match tool {
                    ToolKind::Zoom => {
                        self.drag.zoom_anchor =
                            Some(ZoomAnchor::new(&viewport, image, surface, position));
                    }
                    ToolKind::Magnify => {
                        self.magnifier = Some(MagnifierLens::new(
                            &viewport,
                            image,
                            surface,
                            position,
                            &self.settings.magnify,
                        ));
                    }
                    ToolKind::Pan => {}
                }
                Ok(())
            }
            PointerEvent::Moved { position } => {
                let Some(tool) = self.drag.tool else {
                    return Ok(());
                };
                let Some(delta) = self.drag.advance(position) else {
                    return Ok(());
                };
                let (image, surface) = self.geometry()?;
                let mut viewport = self.surface.get_viewport().ok_or(SurfaceError::NoImage)?;

                match tool {
                    ToolKind::Pan => {
                        pan::apply_drag(&mut viewport, delta);
                        self.surface.set_viewport(viewport)
                    }
                    ToolKind::Zoom => {
                        let anchor = self.drag.zoom_anchor.unwrap_or_else(|| {
                            ZoomAnchor::new(&viewport, image, surface, position)
                        });
                        zoom::apply_drag(
                            &mut viewport,
                            &self.settings.zoom,
                            anchor,
                            image,
                            surface,
                            delta.y,
                        );
                        self.surface.set_viewport(viewport)
                    }
                    ToolKind::Magnify => {
                        self.magnifier = Some(MagnifierLens::new(
                            &viewport,
                            image,
                            surface,
                            position,
                            &self.settings.magnify,
                        ));
                        Ok(())
                    }
                }
            }
            PointerEvent::Released { button } => {
                if self.drag.is_held_by(button) {
                    self.drag.stop();
                    self.magnifier = None;
                }
                Ok(())
            }
        }
    }

    /// Image and surface sizes.
    fn geometry(&self) -> Result<(Size, Size)> {
        let surface = self.surface.size().ok_or(SurfaceError::NotEnabled)?;
        let image = self.surface.image().ok_or(SurfaceError::NoImage)?;
        Ok((image.size(), surface))
    }

    pub fn view<'a>(&'a self, i18n: &I18n, colors: ColorScheme) -> Element<'a, Message> {
        let heading = Text::new(i18n.tr("viewer-heading"))
            .size(typography::TITLE_MD)
            .color(colors.text_primary);

        let open_button = button(Text::new(i18n.tr("open-file-button")))
            .height(Length::Fixed(sizing::BUTTON_HEIGHT))
            .padding([spacing::XS, spacing::MD])
            .on_press(Message::OpenFileRequested);

        let size = self.settings.surface_size;
        let border_color = colors.viewport_border;
        let hint_color = colors.text_secondary;
        let surface = Container::new(
            canvas::Canvas::new(ViewportCanvas {
                surface: &self.surface,
                magnifier: self.magnifier,
                colors,
            })
            .width(Length::Fixed(size.width))
            .height(Length::Fixed(size.height)),
        )
        .padding(border::WIDTH_SM)
        .style(move |_theme: &Theme| container::Style {
            border: Border {
                color: border_color,
                width: border::WIDTH_SM,
                ..Default::default()
            },
            ..Default::default()
        });

        let mut content = Column::new()
            .spacing(spacing::MD)
            .align_x(alignment::Horizontal::Left)
            .push(heading)
            .push(open_button)
            .push(surface);

        if self.surface.image().is_none() {
            content = content.push(
                Text::new(i18n.tr("empty-state-hint"))
                    .size(typography::CAPTION)
                    .color(hint_color),
            );
        }

        content = content.push(
            Container::new(controls::view(self.window_center, self.window_width, i18n))
                .width(Length::Fixed(size.width + 2.0 * border::WIDTH_SM)),
        );

        Container::new(content).padding(spacing::LG).into()
    }
}

/// Window values of 0 or NaN fall back to the configured default.
pub fn or_fallback(value: f32, fallback: f32) -> f32 {
    if value == 0.0 || value.is_nan() {
        fallback
    } else {
        value
    }
}
