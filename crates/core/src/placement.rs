//! Placement of a piece on a sheet.

use crate::geometry::{Cell, PieceId, ShapeMask};
use crate::grid::ColorId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A piece bound to a sheet at an offset, optionally rotated by 90°.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Placed piece.
    pub piece_id: PieceId,
    /// Piece color.
    pub color: ColorId,
    /// Sheet column of the footprint's left edge.
    pub x: usize,
    /// Sheet row of the footprint's top edge.
    pub y: usize,
    /// Whether the piece is rotated by 90°.
    pub rotated: bool,
    /// Footprint width after rotation.
    pub width: usize,
    /// Footprint height after rotation.
    pub height: usize,
    /// Covered cell count of the piece.
    pub area: usize,
    /// True when the piece was nested inside another piece's cavity.
    pub nested: bool,
}

impl Placement {
    /// Sheet cells covered by `mask` under this placement.
    ///
    /// `mask` must be the mask of the placed piece.
    pub fn covered_cells<'a>(&self, mask: &'a ShapeMask) -> impl Iterator<Item = Cell> + 'a {
        let (x, y) = (self.x, self.y);
        mask.oriented_cells(self.rotated)
            .map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Returns true if the footprint rectangle contains sheet cell `(x, y)`.
    pub fn footprint_contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}
