//! Color grid input.

use std::collections::HashMap;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque color token (e.g. `"#ff8800"`). Only equality is ever inspected.
pub type ColorId = String;

/// A rectangular, row-major matrix of color tokens.
///
/// Construction validates the shape, so every `ColorGrid` is non-empty and
/// rectangular.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Vec<ColorId>>", into = "Vec<Vec<ColorId>>")
)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    cells: Vec<ColorId>,
}

impl ColorGrid {
    /// Builds a grid from rows of color tokens.
    ///
    /// Fails with [`Error::InvalidGrid`] when there are no rows, the first row
    /// is empty, or any row differs in length from the first.
    pub fn from_rows<C, R>(rows: R) -> Result<Self>
    where
        C: Into<ColorId>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();

        for (y, row) in rows.into_iter().enumerate() {
            let before = cells.len();
            cells.extend(row.into_iter().map(Into::into));
            let len = cells.len() - before;

            match width {
                None if len == 0 => {
                    return Err(Error::InvalidGrid("first row is empty".into()));
                }
                None => width = Some(len),
                Some(w) if w != len => {
                    return Err(Error::InvalidGrid(format!(
                        "row {} has {} cells, expected {}",
                        y, len, w
                    )));
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.ok_or_else(|| Error::InvalidGrid("grid has no rows".into()))?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a grid filled with a single color.
    pub fn filled(width: usize, height: usize, color: impl Into<ColorId>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGrid(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cells: vec![color.into(); width * height],
        })
    }

    /// Returns the grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the color at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x].as_str())
    }

    /// Overwrites the color at `(x, y)`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: impl Into<ColorId>) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = color.into();
        }
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[ColorId]> {
        self.cells.chunks(self.width)
    }

    /// Counts tiles per color, in first-appearance (row-major) order.
    pub fn tile_counts(&self) -> Vec<(ColorId, usize)> {
        let mut order: Vec<(ColorId, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for color in &self.cells {
            match index.get(color.as_str()) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(color.as_str(), order.len());
                    order.push((color.clone(), 1));
                }
            }
        }
        order
    }
}

impl TryFrom<Vec<Vec<ColorId>>> for ColorGrid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<ColorId>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<ColorGrid> for Vec<Vec<ColorId>> {
    fn from(grid: ColorGrid) -> Self {
        grid.rows().map(|row| row.to_vec()).collect()
    }
}
