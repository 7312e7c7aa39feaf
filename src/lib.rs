//! cellcurate - manual curation of detected cell positions.
//!
//! A stateful curation widget over a volumetric image viewer: load a signal
//! TIFF stack, place point annotations on a "cells" layer, and save the
//! curated points as a CellCounter marker XML file. The viewer host and the
//! windowing toolkit stay external, reached through the [`viewer::ViewerHost`]
//! and [`dialog::DialogProvider`] seams.

pub mod config;
mod constants;
pub mod dialog;
pub mod format;
mod message;
pub mod model;
pub mod stack;
pub mod viewer;
mod widget;

pub use constants::{CELL_LAYER_NAME, CELLS_FILE_NAME, SIGNAL_EXTENSION, SIGNAL_LAYER_NAME};
pub use message::Message;
pub use widget::CurationWidget;
