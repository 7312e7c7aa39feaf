//! Application message types for the curation widget.
//!
//! Each user-triggered action is a message in the Elm architecture style;
//! the hosting UI wires one button per variant.

/// Messages that can be sent to update the curation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Choose a signal image directory and load it as a stack
    LoadSignal,
    /// Add an empty "cells" point-annotation layer
    AddCellLayer,
    /// Load previously saved cells (not yet available)
    LoadCells,
    /// Save the curated cells to the session output directory
    SaveCells,
}
