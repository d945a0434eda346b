//! # Mosaic-Cut Core
//!
//! Core types and traits for the mosaic-cut sheet nesting engine.
//!
//! This crate provides the data model shared between piece extraction,
//! the packing strategies and the cutting plan generator.
//!
//! ## Core Components
//!
//! - **Input**: [`ColorGrid`] - validated row-major matrix of color tokens
//! - **Geometry**: [`Bounds`], [`ShapeMask`], [`Component`], [`Piece`]
//! - **Sheets**: [`SheetSize`], [`SheetCatalog`], [`Sheet`], [`OccupancyGrid`], [`Placement`]
//! - **Packing trait**: [`SheetPacker`] - common interface for every packing strategy
//! - **Results**: [`PackResult`], [`PackSummary`]
//!
//! ## Packing Strategies
//!
//! | Strategy | Shape aware | Description |
//! |----------|-------------|-------------|
//! | `ShapeNesting` | Yes | First-fit scan of true shapes with 90° rotation and cavity filling |
//! | `RectanglePacking` | No | Guillotine bin packing of bounding boxes |
//!
//! ## Configuration
//!
//! ```rust
//! use mosaic_cut_core::{Config, SplitCeiling, Strategy};
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::ShapeNesting)
//!     .with_rotation(true)
//!     .with_min_cavity_cells(4)
//!     .with_split_ceiling(SplitCeiling::SelectedSheet);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geometry;
pub mod grid;
pub mod placement;
pub mod result;
pub mod sheet;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Bounds, Cell, Component, Piece, PieceId, ShapeMask};
pub use grid::{ColorGrid, ColorId};
pub use placement::Placement;
pub use result::{efficiency_percent, PackResult, PackSummary};
pub use sheet::{OccupancyGrid, Sheet, SheetCatalog, SheetSize};
pub use solver::{
    CancelToken, Config, ProgressCallback, ProgressInfo, SheetPacker, SplitCeiling, Strategy,
};
