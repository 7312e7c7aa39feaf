//! Fixed names and defaults used throughout the curation workflow.

/// File extension accepted for signal image slices.
pub const SIGNAL_EXTENSION: &str = "tif";

/// Fixed name of the point-annotation layer holding curated cells.
pub const CELL_LAYER_NAME: &str = "cells";

/// Fixed name of the signal image layer.
pub const SIGNAL_LAYER_NAME: &str = "signal";

/// Fixed output filename, always written into the session output directory.
pub const CELLS_FILE_NAME: &str = "cells.xml";

/// Status label texts.
pub mod status {
    pub const READY: &str = "Ready";
    pub const LOADING: &str = "Loading...";
    pub const SAVING: &str = "Saving cells";
}

/// Default display attributes of the cell layer.
pub mod cell_layer {
    pub const SYMBOL: &str = "ring";
    pub const SIZE: f32 = 10.0;
    pub const OPACITY: f32 = 0.6;
    pub const FACE_COLOR: &str = "lightgoldenrodyellow";
}
