//! Cavity detection inside placed piece masks.

use mosaic_cut_core::{Bounds, Cell, ShapeMask};

use crate::fill::fill_region;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An empty region inside a placed piece's footprint, in sheet coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cavity {
    /// Empty cells of the region.
    pub cells: Vec<Cell>,
    /// Tight bounds of `cells`.
    pub bounds: Bounds,
}

impl Cavity {
    /// Number of cells in the cavity.
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

/// Finds cavities of a placed mask.
///
/// `mask` must already be in its placed orientation and `offset` is its
/// sheet position. Flood fills start only from empty cells off the mask's
/// border rows and columns, then spread over any empty cell of the mask, so
/// a notch reached from the interior counts as well. Regions with at most
/// `min_cells` cells are discarded.
pub fn find_cavities(mask: &ShapeMask, offset: Cell, min_cells: usize) -> Vec<Cavity> {
    let (width, height) = (mask.width(), mask.height());
    if width < 3 || height < 3 {
        return Vec::new();
    }

    let mut visited = vec![false; width * height];
    let mut cavities = Vec::new();

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let region = fill_region(width, height, (x, y), &mut visited, |cx, cy| {
                !mask.get(cx, cy)
            });
            if region.len() <= min_cells {
                continue;
            }

            let cells: Vec<Cell> = region
                .into_iter()
                .map(|(cx, cy)| (cx + offset.0, cy + offset.1))
                .collect();
            if let Some(bounds) = Bounds::from_cells(&cells) {
                cavities.push(Cavity { cells, bounds });
            }
        }
    }

    cavities
}
