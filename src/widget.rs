//! The curation widget: a four-action interaction state machine.
//!
//! One session owns at most one signal directory, one output directory and
//! a handle to the current "cells" point layer. Every operation runs to
//! completion on the caller's thread; failures never propagate out of
//! [`CurationWidget::update`], they are surfaced through the status text and
//! the log only.

use std::path::{Path, PathBuf};

use crate::config::CurationConfig;
use crate::constants::{CELL_LAYER_NAME, CELLS_FILE_NAME, SIGNAL_LAYER_NAME, status};
use crate::dialog::DialogProvider;
use crate::format::cell_xml;
use crate::message::Message;
use crate::model::{Cell, CellType, storage_order};
use crate::stack::ImageStack;
use crate::viewer::{LayerId, PointStyle, ViewerHost};

/// Stateful curation panel over a viewer host and a dialog provider.
pub struct CurationWidget<V, D> {
    viewer: V,
    dialogs: D,
    /// Signal source directory; empty until the first selection.
    signal_directory: PathBuf,
    /// Output directory, resolved lazily on first save and cached for the
    /// whole session. A cancelled chooser caches an empty path.
    output_directory: Option<PathBuf>,
    signal_layer: Option<LayerId>,
    cell_layer: Option<LayerId>,
    cell_style: PointStyle,
    status: String,
}

impl<V: ViewerHost, D: DialogProvider> CurationWidget<V, D> {
    /// Create a widget with the cell layer style from the user config.
    pub fn new(viewer: V, dialogs: D) -> Self {
        Self::with_style(viewer, dialogs, CurationConfig::load().cell_layer.to_point_style())
    }

    /// Create a widget with an explicit cell layer style.
    pub fn with_style(viewer: V, dialogs: D, cell_style: PointStyle) -> Self {
        Self {
            viewer,
            dialogs,
            signal_directory: PathBuf::new(),
            output_directory: None,
            signal_layer: None,
            cell_layer: None,
            cell_style,
            status: status::READY.to_string(),
        }
    }

    /// Current status label text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Signal directory, once one has been selected.
    pub fn signal_directory(&self) -> Option<&Path> {
        if self.signal_directory.as_os_str().is_empty() {
            None
        } else {
            Some(&self.signal_directory)
        }
    }

    /// Output directory, once one has been resolved (possibly empty when the
    /// chooser was cancelled).
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// Handle of the signal image layer, if one was registered.
    pub fn signal_layer(&self) -> Option<LayerId> {
        self.signal_layer
    }

    /// Handle of the most recently added cell layer.
    pub fn cell_layer(&self) -> Option<LayerId> {
        self.cell_layer
    }

    /// Access the viewer host, e.g. to wire it into the surrounding UI.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Mutable access to the viewer host.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Process one user action.
    pub fn update(&mut self, message: Message) {
        match message {
            Message::LoadSignal => self.load_signal(),
            Message::AddCellLayer => self.add_cell_layer(),
            Message::LoadCells => self.load_cells(),
            Message::SaveCells => self.save_cells(),
        }
    }

    fn load_signal(&mut self) {
        self.set_status(status::LOADING);

        let Some(directory) = self.dialogs.pick_directory("Select signal channel") else {
            self.set_status(status::READY);
            return;
        };

        if self.signal_directory == directory {
            log::info!("{:?} already loaded.", directory);
            self.set_status(status::READY);
            return;
        }
        self.signal_directory = directory;

        // The directory stays stored even when the load below fails, so a
        // retry with the same path is rejected as already loaded. Dead-end
        // behaviour kept as observed in the original workflow.
        match ImageStack::open(&self.signal_directory) {
            Ok(stack) => {
                let layer = self.viewer.add_image_layer(stack, SIGNAL_LAYER_NAME);
                self.signal_layer = Some(layer);
            }
            Err(e) => {
                log::error!(
                    "The directory ({:?}) cannot be loaded, please try again: {}",
                    self.signal_directory,
                    e
                );
            }
        }

        self.set_status(status::READY);
    }

    fn add_cell_layer(&mut self) {
        // No duplicate guard: a second call registers a second "cells" layer
        // and the handle moves to the newest one.
        let layer = self
            .viewer
            .add_point_layer(CELL_LAYER_NAME, self.cell_style.clone());
        log::info!("Added point layer {:?} ({})", layer, CELL_LAYER_NAME);
        self.cell_layer = Some(layer);
    }

    fn load_cells(&mut self) {
        log::warn!("Loading saved cells is not available yet");
        self.set_status("Loading cells is not available yet");
    }

    fn save_cells(&mut self) {
        self.set_status(status::SAVING);
        log::info!("Saving cells");

        let output_directory = self.resolve_output_directory();
        if output_directory.as_os_str().is_empty() {
            // A cancelled first-save chooser cached an empty path; every
            // save for the rest of the session lands here.
            log::error!(
                "No output directory selected, cannot build a path for {}",
                CELLS_FILE_NAME
            );
            self.set_status(status::READY);
            return;
        }
        let filename = output_directory.join(CELLS_FILE_NAME);

        let Some(layer) = self.cell_layer else {
            log::error!("No cell layer to save, add a cell layer first");
            self.set_status(status::READY);
            return;
        };
        let Some(points) = self.viewer.point_layer_data(layer) else {
            log::error!("Viewer host does not know point layer {:?}", layer);
            self.set_status(status::READY);
            return;
        };

        let cells: Vec<Cell> = points
            .iter()
            .map(|&point| Cell::new(storage_order(point), CellType::Cell))
            .collect();

        match cell_xml::write_cells(&filename, &cells) {
            Ok(()) => log::info!("Done!"),
            Err(e) => log::error!("Failed to write {:?}: {}", filename, e),
        }

        self.set_status(status::READY);
    }

    /// Resolve the session output directory, prompting only on first use.
    fn resolve_output_directory(&mut self) -> PathBuf {
        if self.output_directory.is_none() {
            let picked = self.dialogs.pick_directory("Select output directory");
            // Cancellation caches an empty path and the session is never
            // re-prompted. Kept as observed.
            self.output_directory = Some(picked.unwrap_or_default());
        }
        self.output_directory.clone().unwrap_or_default()
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::cell_xml::read_cells;
    use image::{GrayImage, Luma};
    use std::collections::VecDeque;

    /// Dialog double replaying a fixed sequence of directory selections.
    struct ScriptedDialogs {
        directories: VecDeque<Option<PathBuf>>,
        directory_prompts: usize,
    }

    impl ScriptedDialogs {
        fn new(directories: Vec<Option<PathBuf>>) -> Self {
            Self {
                directories: directories.into(),
                directory_prompts: 0,
            }
        }
    }

    impl DialogProvider for ScriptedDialogs {
        fn pick_directory(&mut self, _title: &str) -> Option<PathBuf> {
            self.directory_prompts += 1;
            self.directories.pop_front().flatten()
        }

        fn pick_cells_file(&mut self, _title: &str) -> Option<PathBuf> {
            None
        }
    }

    enum LayerData {
        Image { slices: usize },
        Points(Vec<[f64; 3]>),
    }

    /// In-memory viewer host recording registered layers.
    struct TestViewer {
        layers: Vec<(String, LayerData)>,
    }

    impl TestViewer {
        fn new() -> Self {
            Self { layers: Vec::new() }
        }

        fn layers_named(&self, name: &str) -> usize {
            self.layers.iter().filter(|(n, _)| n == name).count()
        }

        fn image_layer_count(&self) -> usize {
            self.layers
                .iter()
                .filter(|(_, data)| matches!(data, LayerData::Image { .. }))
                .count()
        }

        fn image_slices(&self) -> Option<usize> {
            self.layers.iter().find_map(|(_, data)| match data {
                LayerData::Image { slices } => Some(*slices),
                LayerData::Points(_) => None,
            })
        }

        fn push_point(&mut self, layer: LayerId, point: [f64; 3]) {
            match &mut self.layers[layer.0 as usize].1 {
                LayerData::Points(points) => points.push(point),
                LayerData::Image { .. } => panic!("not a point layer"),
            }
        }
    }

    impl ViewerHost for TestViewer {
        fn add_image_layer(&mut self, stack: ImageStack, name: &str) -> LayerId {
            self.layers
                .push((name.to_string(), LayerData::Image { slices: stack.len() }));
            LayerId(self.layers.len() as u64 - 1)
        }

        fn add_point_layer(&mut self, name: &str, _style: PointStyle) -> LayerId {
            self.layers.push((name.to_string(), LayerData::Points(Vec::new())));
            LayerId(self.layers.len() as u64 - 1)
        }

        fn point_layer_data(&self, layer: LayerId) -> Option<&[[f64; 3]]> {
            match &self.layers.get(layer.0 as usize)?.1 {
                LayerData::Points(points) => Some(points),
                LayerData::Image { .. } => None,
            }
        }
    }

    fn widget(dialogs: ScriptedDialogs) -> CurationWidget<TestViewer, ScriptedDialogs> {
        CurationWidget::with_style(TestViewer::new(), dialogs, PointStyle::default())
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cellcurate_widget_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn signal_dir(name: &str, slices: usize) -> PathBuf {
        let dir = temp_dir(name);
        for i in 0..slices {
            let img = GrayImage::from_pixel(4, 4, Luma([64u8]));
            img.save(dir.join(format!("z{i:03}.tif"))).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_signal_registers_image_layer() {
        let dir = signal_dir("load_ok", 2);
        let mut w = widget(ScriptedDialogs::new(vec![Some(dir.clone())]));

        w.update(Message::LoadSignal);

        assert_eq!(w.viewer().image_layer_count(), 1);
        assert_eq!(w.viewer().image_slices(), Some(2));
        assert!(w.signal_layer().is_some());
        assert_eq!(w.signal_directory(), Some(dir.as_path()));
        assert_eq!(w.status(), status::READY);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_selecting_same_directory_twice_is_a_noop() {
        let dir = signal_dir("dup", 1);
        let mut w = widget(ScriptedDialogs::new(vec![
            Some(dir.clone()),
            Some(dir.clone()),
        ]));

        w.update(Message::LoadSignal);
        w.update(Message::LoadSignal);

        // Second selection must not reload or add another layer
        assert_eq!(w.viewer().image_layer_count(), 1);
        assert_eq!(w.signal_directory(), Some(dir.as_path()));
        assert_eq!(w.status(), status::READY);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cancelled_signal_dialog_leaves_session_untouched() {
        let mut w = widget(ScriptedDialogs::new(vec![None]));

        w.update(Message::LoadSignal);

        assert_eq!(w.viewer().image_layer_count(), 0);
        assert_eq!(w.signal_directory(), None);
        assert_eq!(w.status(), status::READY);
    }

    #[test]
    fn test_invalid_stack_reports_failure_but_keeps_directory() {
        // Files named .tif that are not TIFFs: the load fails, no volume is
        // added, yet the directory stays stored and blocks a retry.
        let dir = temp_dir("invalid");
        std::fs::write(dir.join("a.tif"), b"not a tiff").unwrap();
        std::fs::write(dir.join("b.tif"), b"not a tiff either").unwrap();

        let mut w = widget(ScriptedDialogs::new(vec![
            Some(dir.clone()),
            Some(dir.clone()),
        ]));

        w.update(Message::LoadSignal);
        assert_eq!(w.viewer().image_layer_count(), 0);
        assert!(w.signal_layer().is_none());
        assert_eq!(w.signal_directory(), Some(dir.as_path()));
        assert_eq!(w.status(), status::READY);

        // Retry with the same path is treated as already loaded
        w.update(Message::LoadSignal);
        assert_eq!(w.viewer().image_layer_count(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_add_cell_layer_twice_creates_two_layers() {
        let mut w = widget(ScriptedDialogs::new(vec![]));

        w.update(Message::AddCellLayer);
        let first = w.cell_layer().unwrap();
        w.update(Message::AddCellLayer);
        let second = w.cell_layer().unwrap();

        assert_ne!(first, second);
        assert_eq!(w.viewer().layers_named(CELL_LAYER_NAME), 2);
    }

    #[test]
    fn test_save_writes_permuted_cells() {
        let out = temp_dir("save_ok");
        let mut w = widget(ScriptedDialogs::new(vec![Some(out.clone())]));

        w.update(Message::AddCellLayer);
        let layer = w.cell_layer().unwrap();
        w.viewer_mut().push_point(layer, [0.0, 0.0, 0.0]);
        w.viewer_mut().push_point(layer, [1.0, 2.0, 3.0]);
        w.viewer_mut().push_point(layer, [5.0, 5.0, 5.0]);

        w.update(Message::SaveCells);
        assert_eq!(w.status(), status::READY);

        let cells = read_cells(&out.join(CELLS_FILE_NAME)).unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].pos, [0.0, 0.0, 0.0]);
        assert_eq!(cells[1].pos, [3.0, 2.0, 1.0]);
        assert_eq!(cells[2].pos, [5.0, 5.0, 5.0]);
        assert!(cells.iter().all(|c| c.tag == CellType::Cell));

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_output_directory_is_cached_across_saves() {
        let out = temp_dir("cache_out");
        let mut w = widget(ScriptedDialogs::new(vec![Some(out.clone())]));

        w.update(Message::AddCellLayer);
        w.update(Message::SaveCells);
        w.update(Message::SaveCells);

        // Only the first save may prompt
        assert_eq!(w.dialogs.directory_prompts, 1);
        assert_eq!(w.output_directory(), Some(out.as_path()));

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_cancelled_output_chooser_fails_saves_without_reprompt() {
        let mut w = widget(ScriptedDialogs::new(vec![None]));

        w.update(Message::AddCellLayer);
        let layer = w.cell_layer().unwrap();
        w.viewer_mut().push_point(layer, [1.0, 2.0, 3.0]);

        w.update(Message::SaveCells);
        // Empty path is cached for the session
        assert_eq!(w.output_directory(), Some(Path::new("")));
        assert_eq!(w.status(), status::READY);

        w.update(Message::SaveCells);
        assert_eq!(w.dialogs.directory_prompts, 1);
        assert_eq!(w.status(), status::READY);
    }

    #[test]
    fn test_save_without_cell_layer_does_not_panic() {
        let out = temp_dir("no_layer");
        let mut w = widget(ScriptedDialogs::new(vec![Some(out.clone())]));

        w.update(Message::SaveCells);

        assert_eq!(w.status(), status::READY);
        assert!(!out.join(CELLS_FILE_NAME).exists());

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_load_cells_is_explicitly_unavailable() {
        let mut w = widget(ScriptedDialogs::new(vec![]));
        w.update(Message::LoadCells);
        assert_eq!(w.status(), "Loading cells is not available yet");
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let out = temp_dir("overwrite");
        let mut w = widget(ScriptedDialogs::new(vec![Some(out.clone())]));

        w.update(Message::AddCellLayer);
        let layer = w.cell_layer().unwrap();
        w.viewer_mut().push_point(layer, [1.0, 1.0, 1.0]);
        w.update(Message::SaveCells);

        w.viewer_mut().push_point(layer, [2.0, 2.0, 2.0]);
        w.update(Message::SaveCells);

        let cells = read_cells(&out.join(CELLS_FILE_NAME)).unwrap();
        assert_eq!(cells.len(), 2);

        std::fs::remove_dir_all(&out).unwrap();
    }
}
