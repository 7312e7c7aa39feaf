//! Data models for the curation workflow.

mod cell;

pub use cell::{Cell, CellType, storage_order};
