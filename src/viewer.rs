//! Seam towards the image-viewer host.
//!
//! The viewer owns layers, their rendering, and all point editing
//! interaction; the curation widget only registers layers and reads point
//! data back at save time. Everything else about the host's layer and event
//! model stays on the host's side of this trait.

use crate::stack::ImageStack;

/// Opaque handle to a layer registered with the viewer host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Display attributes for a point-annotation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    /// Marker symbol, e.g. "ring"
    pub symbol: String,
    /// Marker size in display units
    pub size: f32,
    /// Layer opacity, 0.0 to 1.0
    pub opacity: f32,
    /// Marker face colour name
    pub face_color: String,
}

impl Default for PointStyle {
    fn default() -> Self {
        use crate::constants::cell_layer;
        Self {
            symbol: cell_layer::SYMBOL.to_string(),
            size: cell_layer::SIZE,
            opacity: cell_layer::OPACITY,
            face_color: cell_layer::FACE_COLOR.to_string(),
        }
    }
}

/// Capabilities the curation widget consumes from its viewer host.
pub trait ViewerHost {
    /// Register an image stack as a viewable volume layer.
    fn add_image_layer(&mut self, stack: ImageStack, name: &str) -> LayerId;

    /// Register an empty, always-visible point-annotation layer.
    ///
    /// The host is free to create as many layers with the same name as it is
    /// asked for; the widget deliberately does not guard against duplicates.
    fn add_point_layer(&mut self, name: &str, style: PointStyle) -> LayerId;

    /// Point coordinates currently held by a point layer, in display axis
    /// order (dim0, dim1, dim2) and insertion order. `None` when the handle
    /// does not refer to a point layer of this host.
    fn point_layer_data(&self, layer: LayerId) -> Option<&[[f64; 3]]>;
}
