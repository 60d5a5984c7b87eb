// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::ui::viewer::component;
use std::path::PathBuf;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Viewer(component::Message),
    /// Result from the open file dialog.
    OpenFileDialogResult(Option<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Runtime flags passed in from the CLI or launcher to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `zh-TW`, `en-US`).
    pub lang: Option<String>,
    /// Optional DICOM file to open on startup. Kept as a path so names that
    /// are not valid UTF-8 still open.
    pub file_path: Option<PathBuf>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `DICOM_LENS_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
