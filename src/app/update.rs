// SPDX-License-Identifier: MPL-2.0
//! Message handlers for the application.
//!
//! Each handler receives an [`UpdateContext`] borrowing the parts of `App`
//! it touches, so the handlers stay testable without a running window.

use super::Message;
use crate::dicom::{self, DecodeWorkerPool, FileManager};
use crate::ui::viewer::component::{self, Effect};
use iced::Task;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Mutable view over the application state used by the handlers.
pub struct UpdateContext<'a> {
    pub viewer: &'a mut component::State,
    pub pool: &'a DecodeWorkerPool,
    pub files: &'a mut FileManager,
}

/// Forwards a message to the viewer and performs the effect it asks for.
pub fn handle_viewer_message(
    ctx: &mut UpdateContext<'_>,
    message: component::Message,
    dialog_filter: String,
) -> Task<Message> {
    let (effect, task) = ctx.viewer.handle_message(message);
    let task = task.map(Message::Viewer);
    match effect {
        Effect::None => task,
        Effect::OpenFileDialog => Task::batch([task, handle_open_file_dialog(dialog_filter)]),
    }
}

/// Opens the native file dialog filtered to DICOM files.
pub fn handle_open_file_dialog(filter_name: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .add_filter(filter_name, dicom::SUPPORTED_EXTENSIONS)
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        },
        Message::OpenFileDialogResult,
    )
}

/// Handles a file chosen in the dialog, dropped on the window or given on
/// the command line.
pub fn handle_file_selected(ctx: &mut UpdateContext<'_>, path: Option<PathBuf>) -> Task<Message> {
    let Some(path) = path else {
        // User cancelled the dialog
        return Task::none();
    };
    if !dicom::has_dicom_extension(&path) {
        warn!("{} has no .dcm extension; trying to read it anyway", path.display());
    }

    let image_id = ctx.files.add(path.clone());
    debug!("Registered {} as {}", path.display(), image_id);

    Task::perform(ctx.pool.load(image_id, path), move |result| {
        Message::Viewer(component::Message::ImageLoaded { image_id, result })
    })
}

/// Tears the viewer down and exits.
pub fn handle_window_close(ctx: &mut UpdateContext<'_>) -> Task<Message> {
    unmount(ctx);
    iced::exit()
}

/// Disables the surface, stops the pool and forgets registered files.
pub fn unmount(ctx: &mut UpdateContext<'_>) {
    ctx.viewer.unmount();
    ctx.pool.terminate();
    ctx.files.purge();
    info!("Viewer unmounted");
}
