//! # Mosaic-Cut Nest
//!
//! Piece extraction and sheet nesting for the mosaic-cut engine.
//!
//! This crate turns a [`ColorGrid`] into pieces and packs them onto
//! fixed-size sheets, one color at a time.
//!
//! ## Pipeline
//!
//! 1. [`extract_components`] - 4-connected same-color regions
//! 2. [`extract_pieces`] - split regions larger than the sheet ceiling
//! 3. [`Planner::group_by_color`] - one group per color
//! 4. [`ShapeNester`] or [`RectanglePacker`] - sheets per group
//!
//! ## Quick Start
//!
//! ```rust
//! use mosaic_cut_nest::{ColorGrid, Config, Planner, SheetCatalog, SheetSize};
//!
//! let grid = ColorGrid::from_rows(vec![
//!     vec!["red", "red", "blue"],
//!     vec!["red", "blue", "blue"],
//! ])
//! .unwrap();
//!
//! let planner = Planner::new(Config::new(), SheetCatalog::default());
//! let layout = planner.plan(&grid, &SheetSize::sized(3, 3)).unwrap();
//!
//! println!("{} sheets at {:.1}% efficiency", layout.total_sheets(), layout.efficiency);
//! ```
//!
//! ## Packing Pieces Directly
//!
//! ```rust
//! use mosaic_cut_nest::{Piece, ShapeMask, ShapeNester, SheetPacker, SheetSize};
//!
//! let ring = Piece::from_mask(0, "red", ShapeMask::from_pattern(&[
//!     "#####",
//!     "#...#",
//!     "#...#",
//!     "#...#",
//!     "#####",
//! ]));
//! let plug = Piece::from_mask(1, "red", ShapeMask::solid(2, 2));
//!
//! let result = ShapeNester::default_config()
//!     .pack(&[ring, plug], &SheetSize::sized(8, 8))
//!     .unwrap();
//!
//! assert_eq!(result.sheet_count(), 1);
//! assert!(result.sheets[0].placements()[1].nested);
//! ```

pub mod analysis;
pub mod cavity;
pub mod components;
mod fill;
pub mod guillotine;
pub mod planner;
pub mod shape_nester;
pub mod splitter;

pub use analysis::{analyze, ColorCount, MosaicAnalysis};
pub use cavity::{find_cavities, Cavity};
pub use components::extract_components;
pub use guillotine::{GuillotineBin, RectanglePacker};
pub use planner::{ColorGroup, ColorLayout, MosaicLayout, Planner};
pub use shape_nester::ShapeNester;
pub use splitter::{cut_positions, extract_pieces, split_component};

// Re-export core types
pub use mosaic_cut_core::{
    Bounds, CancelToken, Cell, ColorGrid, ColorId, Component, Config, Error, OccupancyGrid,
    PackResult, PackSummary, Piece, PieceId, Placement, ProgressCallback, ProgressInfo, Result,
    ShapeMask, Sheet, SheetCatalog, SheetPacker, SheetSize, SplitCeiling, Strategy,
};
