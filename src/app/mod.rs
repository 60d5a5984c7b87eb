// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration around the viewer.
//!
//! The `App` struct owns the decode worker pool, the file registry and the
//! viewer component, and translates messages into side effects like opening
//! the file dialog or starting a decode.

pub mod config;
mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::dicom::{DecodeWorkerPool, FileManager};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::spacing;
use crate::ui::theming::{ColorScheme, ThemeMode};
use crate::ui::viewer::component::{self, ViewerSettings};
use config::Config;
use iced::{window, Element, Size, Subscription, Task, Theme};
use log::{error, warn};
use std::fmt;
use std::path::PathBuf;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    viewer: component::State,
    pool: DecodeWorkerPool,
    files: FileManager,
    theme: Theme,
    colors: ColorScheme,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("current_image", &self.viewer.current_image())
            .field("pool", &self.pool.stats())
            .finish()
    }
}

/// Height taken by the heading, button, sliders and paddings around the
/// display surface.
const CHROME_HEIGHT: f32 = 300.0;

/// Builds the window settings for a display surface of `surface` size.
pub fn window_settings(surface: Size) -> window::Settings {
    let width = surface.width + 2.0 * spacing::LG + spacing::MD;
    let height = surface.height + CHROME_HEIGHT;

    window::Settings {
        size: Size::new(width, height),
        min_size: Some(Size::new(width.min(400.0), 400.0)),
        // Closing goes through WindowCloseRequested so the viewer can unmount.
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    let (config, config_warning) = config::load();
    match config_warning {
        Some(warning) => {
            let message = I18n::new(flags.lang.clone(), &config).tr(warning.key);
            warn!("{} {}", message, warning.detail);
        }
        None => {
            if let Err(err) = config::create_if_missing(&config) {
                warn!("Could not write default settings: {}", err);
            }
        }
    }
    let settings = window_settings(ViewerSettings::from(&config).surface_size);

    // Wrap in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming them once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some((flags, config)));
    let boot = move || {
        let (flags, config) = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags, config)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(settings)
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Mounts the viewer: starts the decode pool, registers the tools,
    /// enables the surface and optionally opens the file from `Flags`.
    fn new(flags: Flags, config: Config) -> (Self, Task<Message>) {
        let i18n = I18n::new(flags.lang.clone(), &config);
        let mut app = Self::with_config(i18n, &config);

        let task = match flags.file_path {
            Some(path) => app.open_file(Some(path)),
            None => Task::none(),
        };
        (app, task)
    }

    /// Builds the mounted application state from `config`.
    pub fn with_config(i18n: I18n, config: &Config) -> Self {
        let pool = DecodeWorkerPool::initialize(&config.decoder.pool_config());
        let viewer = match component::State::mount(ViewerSettings::from(config)) {
            Ok(viewer) => viewer,
            Err(err) => {
                error!("Invalid tool settings, using defaults: {}", err);
                component::State::mount(ViewerSettings::default())
                    .expect("default tool bindings are valid")
            }
        };
        // Resolve System once; detection is too slow to repeat per frame.
        let mode = if config.general.theme_mode.is_dark() {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };

        Self {
            i18n,
            viewer,
            pool,
            files: FileManager::new(),
            theme: mode.iced_theme(),
            colors: ColorScheme::for_mode(mode),
        }
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        let file_name = self
            .viewer
            .current_image()
            .and_then(|id| self.files.get(&id))
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str());

        match file_name {
            Some(name) => format!("{name} - {app_name}"),
            None => app_name,
        }
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::create_event_subscription()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Viewer(message) => {
                let filter = self.i18n.tr("file-dialog-filter");
                update::handle_viewer_message(&mut self.context(), message, filter)
            }
            Message::OpenFileDialogResult(path) => self.open_file(path),
            Message::FileDropped(path) => self.open_file(Some(path)),
            Message::WindowCloseRequested(_window_id) => {
                update::handle_window_close(&mut self.context())
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            viewer: &self.viewer,
            colors: &self.colors,
        })
    }

    fn open_file(&mut self, path: Option<PathBuf>) -> Task<Message> {
        update::handle_file_selected(&mut self.context(), path)
    }

    fn context(&mut self) -> update::UpdateContext<'_> {
        update::UpdateContext {
            viewer: &mut self.viewer,
            pool: &self.pool,
            files: &mut self.files,
        }
    }
}
