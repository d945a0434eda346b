//! Result types for cutting plan generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use mosaic_cut_core::{ColorId, PieceId};

/// Ordered cutting instructions for a set of sheets.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CuttingPlan {
    /// One entry per sheet, in sheet order.
    pub sheets: Vec<SheetPlan>,
}

impl CuttingPlan {
    /// Number of sheets in the plan.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Number of pieces to cut across all sheets.
    pub fn piece_count(&self) -> usize {
        self.sheets.iter().map(|s| s.pieces.len()).sum()
    }

    /// Iterates all entries with their 1-based sheet number.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &CutEntry)> {
        self.sheets
            .iter()
            .flat_map(|s| s.pieces.iter().map(move |e| (s.sheet_number, e)))
    }
}

/// Cutting instructions for one sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SheetPlan {
    /// 1-based sheet number.
    pub sheet_number: usize,
    /// Color group the sheet was cut for.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<ColorId>,
    /// Pieces in placement order.
    pub pieces: Vec<CutEntry>,
}

impl SheetPlan {
    /// Covered area of all pieces on the sheet.
    pub fn used_area(&self) -> usize {
        self.pieces.iter().map(|p| p.area).sum()
    }
}

/// Top-left corner of a footprint on its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// Column of the left edge.
    pub x: usize,
    /// Row of the top edge.
    pub y: usize,
}

/// Footprint size after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// Footprint width in cells.
    pub width: usize,
    /// Footprint height in cells.
    pub height: usize,
}

/// One piece to cut.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CutEntry {
    /// Piece id.
    pub piece_id: PieceId,
    /// Piece color.
    pub color: ColorId,
    /// Sheet position.
    pub position: Position,
    /// Effective width and height on the sheet.
    pub dimensions: Dimensions,
    /// Whether the piece is turned by 90°.
    pub rotated: bool,
    /// Covered cell count.
    pub area: usize,
    /// Whether the piece sits inside another piece's cavity.
    pub nested: bool,
}

/// Aggregate material statistics for a set of sheets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlanStatistics {
    /// Sheets used.
    pub total_sheets: usize,
    /// Sum of sheet areas.
    pub total_sheet_area: usize,
    /// Area covered by pieces.
    pub used_area: usize,
    /// `total_sheet_area - used_area`.
    pub wasted_area: usize,
    /// Used over total area, as a percentage.
    pub efficiency: f64,
    /// `100 - efficiency`, or 0 with no sheets.
    pub waste_percentage: f64,
}

impl Default for PlanStatistics {
    fn default() -> Self {
        Self {
            total_sheets: 0,
            total_sheet_area: 0,
            used_area: 0,
            wasted_area: 0,
            efficiency: 0.0,
            waste_percentage: 0.0,
        }
    }
}
