//! Seam towards the windowing toolkit's file dialogs.
//!
//! Cancellation is always `None`; the widget decides per operation what a
//! missing selection means.

use std::path::PathBuf;

/// Directory and file choosers consumed by the curation widget.
pub trait DialogProvider {
    /// Open a directory chooser with the given title.
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf>;

    /// Open a file chooser restricted to cell list XML files.
    fn pick_cells_file(&mut self, title: &str) -> Option<PathBuf>;
}

/// Native dialogs backed by `rfd`.
#[derive(Debug, Default)]
pub struct NativeDialogs;

impl DialogProvider for NativeDialogs {
    fn pick_directory(&mut self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(title).pick_folder()
    }

    fn pick_cells_file(&mut self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Cell list XML", &["xml"])
            .pick_file()
    }
}
