//! Signal image stack loading.
//!
//! A stack is an ordered sequence of single-plane TIFF files in one
//! directory, composed into a 3D volume by sorted path order. Slices are
//! decoded on demand and cached; only the first slice is decoded eagerly,
//! to validate the directory and establish the plane dimensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

use crate::constants::SIGNAL_EXTENSION;

/// Errors that can occur while opening or reading an image stack.
#[derive(Error, Debug)]
pub enum StackError {
    /// Directory could not be enumerated
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No files with the expected extension were found
    #[error("no .{extension} files found in {directory:?}")]
    EmptyStack {
        /// The directory that was scanned
        directory: PathBuf,
        /// The extension that was looked for
        extension: String,
    },

    /// A slice file could not be decoded as an image
    #[error("failed to decode slice {path:?}: {source}")]
    Decode {
        /// Path of the offending slice
        path: PathBuf,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// Slice index beyond the end of the stack
    #[error("slice index {index} out of range (stack has {len} slices)")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of slices in the stack
        len: usize,
    },
}

/// Enumerate the slice files of a stack directory in sorted path order.
///
/// Extension matching is case-insensitive. The sort is plain lexicographic
/// path order, which is the external ordering contract for stacks.
pub fn sorted_slice_paths(directory: &Path, extension: &str) -> Result<Vec<PathBuf>, StackError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();

    paths.sort();
    Ok(paths)
}

/// An ordered TIFF sequence viewable as one volume.
///
/// Holds slice paths rather than pixel data; individual planes are decoded
/// lazily via [`ImageStack::slice`].
#[derive(Debug)]
pub struct ImageStack {
    directory: PathBuf,
    slices: Vec<PathBuf>,
    width: u32,
    height: u32,
    decoded: HashMap<usize, DynamicImage>,
}

impl ImageStack {
    /// Open a directory as an image stack.
    ///
    /// Fails when the directory holds no `.tif` files or when the first
    /// slice does not decode; a directory of misnamed non-TIFF files is
    /// rejected here rather than at first display.
    pub fn open(directory: &Path) -> Result<Self, StackError> {
        let slices = sorted_slice_paths(directory, SIGNAL_EXTENSION)?;
        if slices.is_empty() {
            return Err(StackError::EmptyStack {
                directory: directory.to_path_buf(),
                extension: SIGNAL_EXTENSION.to_string(),
            });
        }

        let first = image::open(&slices[0]).map_err(|source| StackError::Decode {
            path: slices[0].clone(),
            source,
        })?;
        let (width, height) = (first.width(), first.height());

        log::info!(
            "Opened stack {:?}: {} slices of {}x{}",
            directory,
            slices.len(),
            width,
            height
        );

        let mut decoded = HashMap::new();
        decoded.insert(0, first);

        Ok(Self {
            directory: directory.to_path_buf(),
            slices,
            width,
            height,
            decoded,
        })
    }

    /// Directory this stack was opened from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of slices (the z extent of the volume).
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True when the stack has no slices. Never the case for an opened stack.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Plane dimensions, taken from the first slice.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Path of the slice at `index`.
    pub fn slice_path(&self, index: usize) -> Option<&Path> {
        self.slices.get(index).map(PathBuf::as_path)
    }

    /// Decode the slice at `index`, caching the result.
    pub fn slice(&mut self, index: usize) -> Result<&DynamicImage, StackError> {
        if index >= self.slices.len() {
            return Err(StackError::OutOfRange {
                index,
                len: self.slices.len(),
            });
        }

        if !self.decoded.contains_key(&index) {
            let path = &self.slices[index];
            log::debug!("Decoding slice {} from {:?}", index, path);
            let img = image::open(path).map_err(|source| StackError::Decode {
                path: path.clone(),
                source,
            })?;
            self.decoded.insert(index, img);
        }

        // Just inserted above when missing
        Ok(&self.decoded[&index])
    }
}
