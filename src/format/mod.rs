//! Cell list file IO.
//!
//! The curation workflow persists exactly one artefact: a CellCounter marker
//! XML file listing every curated point with its type tag.

pub mod cell_xml;
mod error;

pub use error::FormatError;
