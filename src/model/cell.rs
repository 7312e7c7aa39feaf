//! Cell record types.

/// Type tags carried by persisted cell records.
///
/// The integer codes match the CellCounter marker schema that the curation
/// output is consumed by downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Confirmed cell
    Cell,
    /// Reviewed and rejected
    NoCell,
    /// Not yet reviewed
    Unknown,
}

impl CellType {
    /// Integer code used in the cell list file.
    pub fn code(&self) -> i32 {
        match self {
            CellType::Cell => 2,
            CellType::NoCell => 1,
            CellType::Unknown => -1,
        }
    }

    /// Map a file type code back to a tag. Unrecognised codes become `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => CellType::Cell,
            1 => CellType::NoCell,
            _ => CellType::Unknown,
        }
    }

    /// Display name for logs and UI.
    pub fn name(&self) -> &'static str {
        match self {
            CellType::Cell => "CELL",
            CellType::NoCell => "NO_CELL",
            CellType::Unknown => "UNKNOWN",
        }
    }
}

/// A single persisted point annotation: a 3D coordinate plus a type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Coordinate in storage axis order (x, y, z).
    pub pos: [f64; 3],
    /// Type tag.
    pub tag: CellType,
}

impl Cell {
    /// Create a cell record from a coordinate already in storage order.
    pub fn new(pos: [f64; 3], tag: CellType) -> Self {
        Self { pos, tag }
    }
}

/// Permute a point from display axis order to storage axis order.
///
/// The viewer holds points as (dim0, dim1, dim2); the cell list stores them
/// reversed as (dim2, dim1, dim0). No inverse is applied anywhere on load;
/// this mirrors the observed behaviour and is deliberately left as is.
pub fn storage_order(point: [f64; 3]) -> [f64; 3] {
    [point[2], point[1], point[0]]
}
