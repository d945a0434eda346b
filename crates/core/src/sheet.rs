//! Sheet sizes, the size catalog, and the occupancy-backed sheet.

use crate::geometry::{Piece, ShapeMask};
use crate::grid::ColorId;
use crate::placement::Placement;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A candidate material size.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetSize {
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// Human readable name.
    pub label: String,
}

impl SheetSize {
    /// Creates a sheet size.
    pub fn new(width: usize, height: usize, label: impl Into<String>) -> Self {
        Self {
            width,
            height,
            label: label.into(),
        }
    }

    /// Creates a sheet size labeled `"{w}x{h}"`.
    pub fn sized(width: usize, height: usize) -> Self {
        Self::new(width, height, format!("{}x{}", width, height))
    }

    /// Area in cells.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Larger of the two dimensions.
    pub fn max_dimension(&self) -> usize {
        self.width.max(self.height)
    }

    /// Rejects zero-sized sheets.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSheet(format!(
                "sheet '{}' has zero dimension ({}x{})",
                self.label, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Ordered list of available sheet sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetCatalog {
    sizes: Vec<SheetSize>,
}

impl Default for SheetCatalog {
    fn default() -> Self {
        Self {
            sizes: vec![
                SheetSize::new(30, 30, "30x30 Standard"),
                SheetSize::new(20, 20, "20x20 Small"),
                SheetSize::new(40, 20, "40x20 Rectangle"),
                SheetSize::new(25, 25, "25x25 Medium"),
            ],
        }
    }
}

impl SheetCatalog {
    /// Creates a catalog, validating every entry.
    pub fn new(sizes: Vec<SheetSize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidSheet("sheet catalog is empty".into()));
        }
        for size in &sizes {
            size.validate()?;
        }
        Ok(Self { sizes })
    }

    /// Returns the size at `index`.
    pub fn get(&self, index: usize) -> Result<&SheetSize> {
        self.sizes.get(index).ok_or_else(|| {
            Error::InvalidSheet(format!(
                "sheet index {} out of range (catalog has {})",
                index,
                self.sizes.len()
            ))
        })
    }

    /// Max over `max(width, height)` of every entry; the default split ceiling.
    pub fn max_dimension(&self) -> usize {
        self.sizes
            .iter()
            .map(SheetSize::max_dimension)
            .max()
            .unwrap_or(0)
    }

    /// Iterates sizes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &SheetSize> {
        self.sizes.iter()
    }

    /// Number of sizes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns true if the catalog has no sizes.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Per-sheet occupancy bitmap.
///
/// Only [`Sheet`] writes to it, and only through a checked placement, so two
/// placements can never claim the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Grid width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether `(x, y)` is occupied. Outside the grid counts as occupied.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x >= self.width || y >= self.height || self.cells[y * self.width + x]
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Returns true if every covered cell of `mask`, oriented and offset by
    /// `(x, y)`, is inside the grid and free.
    pub fn can_place(&self, mask: &ShapeMask, x: usize, y: usize, rotated: bool) -> bool {
        let (w, h) = mask.oriented_size(rotated);
        if x + w > self.width || y + h > self.height {
            return false;
        }
        mask.oriented_cells(rotated)
            .all(|(dx, dy)| !self.cells[(y + dy) * self.width + (x + dx)])
    }

    /// Marks the cells of a placement. Caller must have checked `can_place`.
    fn occupy(&mut self, mask: &ShapeMask, x: usize, y: usize, rotated: bool) {
        for (dx, dy) in mask.oriented_cells(rotated) {
            self.cells[(y + dy) * self.width + (x + dx)] = true;
        }
    }

    /// Occupancy as nested rows, for renderers.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.width.max(1))
            .map(<[bool]>::to_vec)
            .collect()
    }
}

/// A fixed-size sheet with its placements.
///
/// Placements are append-only for the life of a packing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    size: SheetSize,
    color: Option<ColorId>,
    occupancy: OccupancyGrid,
    placements: Vec<Placement>,
}

impl Sheet {
    /// Opens an empty sheet.
    pub fn new(size: SheetSize) -> Self {
        let occupancy = OccupancyGrid::new(size.width, size.height);
        Self {
            size,
            color: None,
            occupancy,
            placements: Vec::new(),
        }
    }

    /// Sheet size.
    pub fn size(&self) -> &SheetSize {
        &self.size
    }

    /// Sheet width.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Sheet height.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Color group this sheet was packed for, if tagged.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Tags the sheet with its color group.
    pub fn set_color(&mut self, color: impl Into<ColorId>) {
        self.color = Some(color.into());
    }

    /// Read-only occupancy bitmap.
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Placements in the order they were made.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns true if no piece has been placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns true if `piece` can be placed at `(x, y)` in the given orientation.
    pub fn can_place(&self, piece: &Piece, x: usize, y: usize, rotated: bool) -> bool {
        self.occupancy.can_place(&piece.mask, x, y, rotated)
    }

    /// Places `piece`, marking its cells occupied.
    ///
    /// Fails with [`Error::Occupied`] if any mapped cell is outside the sheet
    /// or already taken; the sheet is left untouched in that case.
    pub fn place(
        &mut self,
        piece: &Piece,
        x: usize,
        y: usize,
        rotated: bool,
    ) -> Result<&Placement> {
        self.insert(piece, x, y, rotated, false)
    }

    /// Places `piece` unrotated inside a cavity of an earlier placement.
    ///
    /// Same occupancy check as [`Sheet::place`]; the placement is marked nested.
    pub fn place_nested(&mut self, piece: &Piece, x: usize, y: usize) -> Result<&Placement> {
        self.insert(piece, x, y, false, true)
    }

    fn insert(
        &mut self,
        piece: &Piece,
        x: usize,
        y: usize,
        rotated: bool,
        nested: bool,
    ) -> Result<&Placement> {
        if !self.occupancy.can_place(&piece.mask, x, y, rotated) {
            return Err(Error::Occupied {
                piece_id: piece.id,
                x,
                y,
            });
        }
        self.occupancy.occupy(&piece.mask, x, y, rotated);

        let (width, height) = piece.mask.oriented_size(rotated);
        self.placements.push(Placement {
            piece_id: piece.id,
            color: piece.color.clone(),
            x,
            y,
            rotated,
            width,
            height,
            area: piece.area(),
            nested,
        });
        // Just pushed, never empty.
        self.placements
            .last()
            .ok_or_else(|| Error::Internal("placement list empty after push".into()))
    }

    /// Total covered area of all placements.
    pub fn used_area(&self) -> usize {
        self.placements.iter().map(|p| p.area).sum()
    }

    /// Used area as a percentage of the sheet area.
    pub fn efficiency(&self) -> f64 {
        let area = self.size.area();
        if area == 0 {
            return 0.0;
        }
        self.used_area() as f64 / area as f64 * 100.0
    }
}
