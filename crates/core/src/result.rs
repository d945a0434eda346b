//! Pack result representation.

use crate::geometry::PieceId;
use crate::sheet::Sheet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of packing one set of pieces onto sheets of one size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// Sheets in the order they were opened.
    pub sheets: Vec<Sheet>,

    /// Placed area over total sheet area, as a percentage (0 - 100).
    pub efficiency: f64,

    /// Pieces left unplaced (only when cancelled).
    pub unplaced: Vec<PieceId>,

    /// Whether the pack was cancelled before completion.
    pub cancelled: bool,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Strategy that produced the result.
    pub strategy: Option<String>,
}

impl PackResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            efficiency: 0.0,
            unplaced: Vec::new(),
            cancelled: false,
            computation_time_ms: 0,
            strategy: None,
        }
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Number of sheets used.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Number of placements across all sheets, nested ones included.
    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements().len()).sum()
    }

    /// Returns true if nothing was left unplaced.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Total placed area.
    pub fn used_area(&self) -> usize {
        self.sheets.iter().map(Sheet::used_area).sum()
    }

    /// Total sheet area.
    pub fn sheet_area(&self) -> usize {
        self.sheets.iter().map(|s| s.size().area()).sum()
    }

    /// Recomputes [`efficiency`](Self::efficiency) from the sheets.
    pub fn recompute_efficiency(&mut self) {
        self.efficiency = efficiency_percent(self.used_area(), self.sheet_area());
    }

    /// Waste percentage (`100 - efficiency`), or 0 with no sheets.
    pub fn waste_percentage(&self) -> f64 {
        if self.sheets.is_empty() {
            0.0
        } else {
            100.0 - self.efficiency
        }
    }

    /// Efficiency as a display string.
    pub fn efficiency_percent(&self) -> String {
        format!("{:.1}%", self.efficiency)
    }
}

impl Default for PackResult {
    fn default() -> Self {
        Self::new()
    }
}

/// `used / total * 100`, or 0 when `total` is 0.
pub fn efficiency_percent(used: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Summary statistics for a pack result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackSummary {
    /// Pieces placed.
    pub total_placed: usize,
    /// Pieces left unplaced.
    pub total_unplaced: usize,
    /// Sheets used.
    pub sheets_used: usize,
    /// Efficiency percentage.
    pub efficiency: f64,
    /// Waste percentage.
    pub waste_percentage: f64,
    /// Computation time in milliseconds.
    pub time_ms: u64,
    /// Strategy used.
    pub strategy: String,
}

impl From<&PackResult> for PackSummary {
    fn from(result: &PackResult) -> Self {
        Self {
            total_placed: result.placed_count(),
            total_unplaced: result.unplaced.len(),
            sheets_used: result.sheet_count(),
            efficiency: result.efficiency,
            waste_percentage: result.waste_percentage(),
            time_ms: result.computation_time_ms,
            strategy: result
                .strategy
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Piece, ShapeMask};
    use crate::sheet::SheetSize;

    fn filled_sheet(cells: usize) -> Sheet {
        let mut sheet = Sheet::new(SheetSize::sized(4, 4));
        let piece = Piece::from_mask(0, "c", ShapeMask::solid(cells, 1));
        sheet.place(&piece, 0, 0, false).unwrap();
        sheet
    }

    #[test]
    fn test_result_new() {
        let result = PackResult::new();
        assert!(result.sheets.is_empty());
        assert_eq!(result.efficiency, 0.0);
        assert_eq!(result.waste_percentage(), 0.0);
        assert!(result.all_placed());
    }

    #[test]
    fn test_recompute_efficiency() {
        let mut result = PackResult::new().with_strategy("shape-nesting");
        result.sheets.push(filled_sheet(4));
        result.sheets.push(filled_sheet(2));
        result.recompute_efficiency();

        assert_eq!(result.used_area(), 6);
        assert_eq!(result.sheet_area(), 32);
        assert!((result.efficiency - 18.75).abs() < 1e-9);
        assert!((result.waste_percentage() - 81.25).abs() < 1e-9);
        assert_eq!(result.efficiency_percent(), "18.8%");
    }

    #[test]
    fn test_summary() {
        let mut result = PackResult::new().with_strategy("rectangle-packing");
        result.sheets.push(filled_sheet(4));
        result.recompute_efficiency();
        result.unplaced.push(9);

        let summary = PackSummary::from(&result);
        assert_eq!(summary.total_placed, 1);
        assert_eq!(summary.total_unplaced, 1);
        assert_eq!(summary.sheets_used, 1);
        assert_eq!(summary.efficiency, 25.0);
        assert_eq!(summary.strategy, "rectangle-packing");
    }

    #[test]
    fn test_efficiency_percent_zero_total() {
        assert_eq!(efficiency_percent(5, 0), 0.0);
        assert_eq!(efficiency_percent(1, 4), 25.0);
    }
}
