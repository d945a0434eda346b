//! Cell geometry: bounding boxes, shape masks, components and pieces.

use crate::grid::ColorId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An absolute `(x, y)` cell coordinate.
pub type Cell = (usize, usize);

/// Unique identifier for a piece.
pub type PieceId = usize;

/// Axis-aligned bounding box in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Leftmost column.
    pub min_x: usize,
    /// Topmost row.
    pub min_y: usize,
    /// Number of columns spanned.
    pub width: usize,
    /// Number of rows spanned.
    pub height: usize,
}

impl Bounds {
    /// Creates a bounding box from its origin and size.
    pub fn new(min_x: usize, min_y: usize, width: usize, height: usize) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Computes the tight bounds of a cell set. Returns `None` for no cells.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Option<Self> {
        let mut iter = cells.into_iter();
        let &(x0, y0) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);

        for &(x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Last column covered (inclusive).
    pub fn max_x(&self) -> usize {
        self.min_x + self.width.saturating_sub(1)
    }

    /// Last row covered (inclusive).
    pub fn max_y(&self) -> usize {
        self.min_y + self.height.saturating_sub(1)
    }

    /// Area of the box itself (not of the shape inside it).
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if both dimensions are at most `limit`.
    pub fn fits_square(&self, limit: usize) -> bool {
        self.width <= limit && self.height <= limit
    }

    /// Returns true if the box fits `width x height` as-is.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.width <= width && self.height <= height
    }

    /// Returns true if the box fits `width x height` as-is or rotated by 90°.
    pub fn fits_rotated(&self, width: usize, height: usize) -> bool {
        self.fits_within(width, height) || (self.height <= width && self.width <= height)
    }

    /// Returns the box translated by `(dx, dy)`.
    pub fn translated(&self, dx: usize, dy: usize) -> Self {
        Self::new(self.min_x + dx, self.min_y + dy, self.width, self.height)
    }
}

/// Boolean occupancy mask local to a bounding box.
///
/// Cell `(x, y)` is true where the shape covers local column `x`, row `y`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl ShapeMask {
    /// Creates an empty mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Creates a fully covered rectangular mask.
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Builds the mask of absolute `cells` relative to `bounds`.
    ///
    /// Cells outside `bounds` are ignored.
    pub fn from_cells<'a>(bounds: &Bounds, cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut mask = Self::new(bounds.width, bounds.height);
        for &(x, y) in cells {
            if x >= bounds.min_x && y >= bounds.min_y {
                mask.set(x - bounds.min_x, y - bounds.min_y, true);
            }
        }
        mask
    }

    /// Parses a mask from rows of text, `#` marking covered cells.
    ///
    /// Rows shorter than the longest row are padded with empty cells.
    pub fn from_pattern(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut mask = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Mask width (columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height (rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether local cell `(x, y)` is covered. Outside the mask is empty.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    /// Sets local cell `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Number of covered cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Covered cells in row-major order.
    pub fn covered(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    /// Footprint size `(width, height)` for the given orientation.
    pub fn oriented_size(&self, rotated: bool) -> (usize, usize) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Covered cells mapped into the footprint for the given orientation.
    ///
    /// A 90° rotation sends local `(px, py)` to `(py, width - 1 - px)`.
    pub fn oriented_cells(&self, rotated: bool) -> impl Iterator<Item = Cell> + '_ {
        let w = self.width;
        self.covered().map(move |(px, py)| {
            if rotated {
                (py, w - 1 - px)
            } else {
                (px, py)
            }
        })
    }

    /// Returns the mask rotated by 90° using the same mapping as
    /// [`oriented_cells`](Self::oriented_cells).
    pub fn rotated(&self) -> Self {
        let (w, h) = self.oriented_size(true);
        let mut out = Self::new(w, h);
        for (x, y) in self.oriented_cells(true) {
            out.set(x, y, true);
        }
        out
    }

    /// Mask as nested rows, for renderers.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.width.max(1)).map(<[bool]>::to_vec).collect()
    }
}

/// A maximal 4-connected region of same-colored cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Component {
    /// Discovery index (row-major scan order of the first cell found).
    pub index: usize,
    /// Shared color of every cell.
    pub color: ColorId,
    /// Absolute cell coordinates, in flood fill order.
    pub cells: Vec<Cell>,
    /// Tight bounding box of `cells`.
    pub bounds: Bounds,
    /// Local mask sized like `bounds`.
    pub mask: ShapeMask,
}

impl Component {
    /// Builds a component from its cells. Returns `None` for an empty cell set.
    pub fn from_cells(index: usize, color: impl Into<ColorId>, cells: Vec<Cell>) -> Option<Self> {
        let bounds = Bounds::from_cells(&cells)?;
        let mask = ShapeMask::from_cells(&bounds, &cells);
        Some(Self {
            index,
            color: color.into(),
            cells,
            bounds,
            mask,
        })
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

/// The unit placed onto sheets: a whole component or a fragment of one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    /// Unique id, assigned sequentially during extraction.
    pub id: PieceId,
    /// Color shared with the source component.
    pub color: ColorId,
    /// Index of the component this piece came from.
    pub component_index: usize,
    /// Absolute cells covered by this piece.
    pub cells: Vec<Cell>,
    /// Tight bounding box of `cells`.
    pub bounds: Bounds,
    /// Local mask sized like `bounds`.
    pub mask: ShapeMask,
    /// True when the piece is a split fragment.
    pub is_cut: bool,
    /// Parent component index for split fragments.
    pub parent_id: Option<usize>,
}

impl Piece {
    /// Wraps a component unchanged.
    pub fn from_component(id: PieceId, component: Component) -> Self {
        Self {
            id,
            color: component.color,
            component_index: component.index,
            cells: component.cells,
            bounds: component.bounds,
            mask: component.mask,
            is_cut: false,
            parent_id: None,
        }
    }

    /// Builds a split fragment of `parent`. Returns `None` for no cells.
    pub fn fragment(
        id: PieceId,
        color: impl Into<ColorId>,
        parent: usize,
        cells: Vec<Cell>,
    ) -> Option<Self> {
        let bounds = Bounds::from_cells(&cells)?;
        let mask = ShapeMask::from_cells(&bounds, &cells);
        Some(Self {
            id,
            color: color.into(),
            component_index: parent,
            cells,
            bounds,
            mask,
            is_cut: true,
            parent_id: Some(parent),
        })
    }

    /// Builds a standalone piece from a mask, positioned at the origin.
    ///
    /// Useful for feeding packers directly without a color grid.
    pub fn from_mask(id: PieceId, color: impl Into<ColorId>, mask: ShapeMask) -> Self {
        let cells: Vec<Cell> = mask.covered().collect();
        let bounds = Bounds::new(0, 0, mask.width(), mask.height());
        Self {
            id,
            color: color.into(),
            component_index: id,
            cells,
            bounds,
            mask,
            is_cut: false,
            parent_id: None,
        }
    }

    /// Number of covered cells.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Bounding box width.
    pub fn width(&self) -> usize {
        self.bounds.width
    }

    /// Bounding box height.
    pub fn height(&self) -> usize {
        self.bounds.height
    }
}
