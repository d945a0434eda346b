//! End-to-end mosaic planning: grid to pieces to per-color sheets.

use std::collections::HashMap;
use std::time::Instant;

use mosaic_cut_core::{
    efficiency_percent, CancelToken, ColorGrid, ColorId, Config, Error, PackSummary, Piece,
    PieceId, Result, Sheet, SheetCatalog, SheetPacker, SheetSize, SplitCeiling, Strategy,
};

use crate::components::extract_components;
use crate::guillotine::RectanglePacker;
use crate::shape_nester::ShapeNester;
use crate::splitter::extract_pieces;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pieces sharing one color, nested together.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColorGroup {
    /// Group color.
    pub color: ColorId,
    /// Pieces in extraction order.
    pub pieces: Vec<Piece>,
}

impl ColorGroup {
    /// Total covered area of the group.
    pub fn area(&self) -> usize {
        self.pieces.iter().map(Piece::area).sum()
    }
}

/// Per-color outcome inside a [`MosaicLayout`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColorLayout {
    /// Group color.
    pub color: ColorId,
    /// Pieces in the group.
    pub piece_count: usize,
    /// Index of the group's first sheet in [`MosaicLayout::sheets`].
    pub first_sheet: usize,
    /// Sheets used by the group.
    pub sheet_count: usize,
    /// Group efficiency percentage.
    pub efficiency: f64,
}

/// Sheets for a whole mosaic at one sheet size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MosaicLayout {
    /// Sheet size used for every sheet.
    pub sheet_size: SheetSize,
    /// All sheets, grouped by color in group order and tagged with it.
    pub sheets: Vec<Sheet>,
    /// Per-color breakdown, in group order.
    pub colors: Vec<ColorLayout>,
    /// Placed area over total sheet area, as a percentage.
    pub efficiency: f64,
    /// Pieces left unplaced by a cancelled run.
    pub unplaced: Vec<PieceId>,
    /// Whether planning was cancelled.
    pub cancelled: bool,
    /// Packing strategy name.
    pub strategy: String,
    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl MosaicLayout {
    fn new(sheet_size: SheetSize, strategy: &str) -> Self {
        Self {
            sheet_size,
            sheets: Vec::new(),
            colors: Vec::new(),
            efficiency: 0.0,
            unplaced: Vec::new(),
            cancelled: false,
            strategy: strategy.to_string(),
            computation_time_ms: 0,
        }
    }

    /// Number of sheets across all colors.
    pub fn total_sheets(&self) -> usize {
        self.sheets.len()
    }

    /// Placements across all sheets, nested ones included.
    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements().len()).sum()
    }

    /// Total placed area.
    pub fn used_area(&self) -> usize {
        self.sheets.iter().map(Sheet::used_area).sum()
    }

    /// Total sheet area.
    pub fn sheet_area(&self) -> usize {
        self.sheets.len() * self.sheet_size.area()
    }

    /// Waste percentage (`100 - efficiency`), or 0 with no sheets.
    pub fn waste_percentage(&self) -> f64 {
        if self.sheets.is_empty() {
            0.0
        } else {
            100.0 - self.efficiency
        }
    }
}

impl From<&MosaicLayout> for PackSummary {
    fn from(layout: &MosaicLayout) -> Self {
        Self {
            total_placed: layout.placed_count(),
            total_unplaced: layout.unplaced.len(),
            sheets_used: layout.total_sheets(),
            efficiency: layout.efficiency,
            waste_percentage: layout.waste_percentage(),
            time_ms: layout.computation_time_ms,
            strategy: layout.strategy.clone(),
        }
    }
}

/// Runs the full pipeline for a color grid against a sheet catalog.
pub struct Planner {
    config: Config,
    catalog: SheetCatalog,
    cancelled: CancelToken,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Config::default(), SheetCatalog::default())
    }
}

impl Planner {
    /// Creates a planner.
    pub fn new(config: Config, catalog: SheetCatalog) -> Self {
        Self {
            config,
            catalog,
            cancelled: CancelToken::new(),
        }
    }

    /// Planner configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sheet catalog.
    pub fn catalog(&self) -> &SheetCatalog {
        &self.catalog
    }

    /// Handle that cancels this planner's packers. Stays cancelled until reset.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancelled.clone()
    }

    /// Requests cancellation of the running or next plan.
    pub fn cancel(&self) {
        self.cancelled.cancel();
    }

    /// Split ceiling used when nesting onto `sheet`.
    pub fn split_ceiling(&self, sheet: &SheetSize) -> usize {
        match self.config.split_ceiling {
            SplitCeiling::CatalogMaximum => self.catalog.max_dimension(),
            SplitCeiling::SelectedSheet => sheet.width.min(sheet.height),
        }
    }

    /// Extracts and splits the pieces of `grid` for nesting onto `sheet`.
    pub fn extract_pieces(&self, grid: &ColorGrid, sheet: &SheetSize) -> Vec<Piece> {
        let components = extract_components(grid);
        extract_pieces(components, self.split_ceiling(sheet))
    }

    /// Groups pieces by color, groups ordered by first appearance.
    pub fn group_by_color(pieces: Vec<Piece>) -> Vec<ColorGroup> {
        let mut groups: Vec<ColorGroup> = Vec::new();
        let mut index: HashMap<ColorId, usize> = HashMap::new();

        for piece in pieces {
            let slot = *index.entry(piece.color.clone()).or_insert_with(|| {
                groups.push(ColorGroup {
                    color: piece.color.clone(),
                    pieces: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].pieces.push(piece);
        }

        groups
    }

    fn packer(&self) -> Box<dyn SheetPacker> {
        match self.config.strategy {
            Strategy::ShapeNesting => Box::new(
                ShapeNester::new(self.config.clone()).with_cancel_token(self.cancelled.clone()),
            ),
            Strategy::RectanglePacking => Box::new(
                RectanglePacker::new(self.config.clone())
                    .with_cancel_token(self.cancelled.clone()),
            ),
        }
    }

    /// Plans `grid` onto sheets of `sheet` size.
    pub fn plan(&self, grid: &ColorGrid, sheet: &SheetSize) -> Result<MosaicLayout> {
        sheet.validate()?;
        let pieces = self.extract_pieces(grid, sheet);
        self.plan_pieces(pieces, sheet)
    }

    /// Plans `grid` onto the catalog size at `index`.
    pub fn plan_with_index(&self, grid: &ColorGrid, index: usize) -> Result<MosaicLayout> {
        let sheet = self.catalog.get(index)?.clone();
        self.plan(grid, &sheet)
    }

    /// Nests already extracted pieces, one packer run per color group.
    pub fn plan_pieces(&self, pieces: Vec<Piece>, sheet: &SheetSize) -> Result<MosaicLayout> {
        sheet.validate()?;
        let start = Instant::now();
        let packer = self.packer();
        let mut layout = MosaicLayout::new(sheet.clone(), packer.name());

        let mut groups = Self::group_by_color(pieces).into_iter();
        for group in groups.by_ref() {
            log::info!(
                "Nesting {} {} pieces ({} cells) on {}",
                group.pieces.len(),
                group.color,
                group.area(),
                sheet.label
            );
            let result = packer.pack(&group.pieces, sheet)?;

            layout.colors.push(ColorLayout {
                color: group.color.clone(),
                piece_count: group.pieces.len(),
                first_sheet: layout.sheets.len(),
                sheet_count: result.sheet_count(),
                efficiency: result.efficiency,
            });
            for mut placed in result.sheets {
                placed.set_color(group.color.clone());
                layout.sheets.push(placed);
            }
            layout.unplaced.extend(result.unplaced);

            if result.cancelled {
                layout.cancelled = true;
                break;
            }
        }
        for group in groups {
            layout.unplaced.extend(group.pieces.iter().map(|p| p.id));
        }

        layout.efficiency = efficiency_percent(layout.used_area(), layout.sheet_area());
        layout.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Planned {} sheets of {} at {:.1}% efficiency in {} ms",
            layout.total_sheets(),
            sheet.label,
            layout.efficiency,
            layout.computation_time_ms
        );
        Ok(layout)
    }

    /// Plans `grid` against every catalog size and keeps the most efficient.
    ///
    /// Sizes that cannot hold some piece are skipped. The first size wins
    /// ties. A cancelled run is returned as soon as it happens.
    pub fn best_sheet_size(&self, grid: &ColorGrid) -> Result<MosaicLayout> {
        let mut best: Option<MosaicLayout> = None;

        for sheet in self.catalog.iter() {
            let layout = match self.plan(grid, sheet) {
                Ok(layout) => layout,
                Err(err @ Error::PieceTooLarge { .. }) => {
                    log::warn!("Skipping sheet size {}: {}", sheet.label, err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            if layout.cancelled {
                return Ok(layout);
            }
            log::debug!(
                "Sheet size {} gives {:.1}% efficiency",
                sheet.label,
                layout.efficiency
            );
            if best
                .as_ref()
                .map_or(true, |b| layout.efficiency > b.efficiency)
            {
                best = Some(layout);
            }
        }

        best.ok_or_else(|| {
            Error::InvalidSheet("no catalog sheet size can hold every piece".into())
        })
    }
}
