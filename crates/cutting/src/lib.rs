//! Cutting plan generation for mosaic-cut sheet layouts.
//!
//! Given the sheets produced by a packer (pieces placed with positions and
//! rotations), this crate builds the instructions a cutter works from:
//! - One numbered entry list per sheet, in placement order
//! - Footprint dimensions after rotation
//! - Aggregate efficiency and waste figures
//!
//! The plan is a pure projection of its input sheets.

pub mod plan;
pub mod result;

pub use plan::{generate_cutting_plan, material_cost};
pub use result::{CutEntry, CuttingPlan, Dimensions, PlanStatistics, Position, SheetPlan};
