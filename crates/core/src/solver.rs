//! Packing strategy trait and configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::geometry::Piece;
use crate::result::PackResult;
use crate::sheet::SheetSize;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sheet packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// True-shape first-fit nesting with cavity filling (primary).
    #[default]
    ShapeNesting,
    /// Guillotine bin packing of bounding boxes only.
    RectanglePacking,
}

impl Strategy {
    /// Short name used in results and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShapeNesting => "shape-nesting",
            Self::RectanglePacking => "rectangle-packing",
        }
    }
}

/// Which size bounds oversized components before nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitCeiling {
    /// Largest dimension over the whole sheet catalog.
    ///
    /// A fragment may still exceed a smaller selected sheet; packing then
    /// reports [`Error::PieceTooLarge`](crate::Error::PieceTooLarge).
    #[default]
    CatalogMaximum,
    /// Smaller dimension of the sheet actually selected for nesting, so
    /// every fragment fits that sheet.
    SelectedSheet,
}

/// Common configuration for packers and the planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Packing strategy.
    pub strategy: Strategy,

    /// Whether the 90° orientation may be tried.
    pub allow_rotation: bool,

    /// Whether smaller pieces may be nested in cavities of placed pieces.
    pub nest_in_cavities: bool,

    /// A cavity must have strictly more cells than this to host a piece.
    pub min_cavity_cells: usize,

    /// Ceiling used by the splitter.
    pub split_ceiling: SplitCeiling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            allow_rotation: true,
            nest_in_cavities: true,
            min_cavity_cells: 4,
            split_ceiling: SplitCeiling::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packing strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables 90° rotation.
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }

    /// Enables or disables cavity nesting.
    pub fn with_cavity_nesting(mut self, enabled: bool) -> Self {
        self.nest_in_cavities = enabled;
        self
    }

    /// Sets the cavity size threshold.
    pub fn with_min_cavity_cells(mut self, cells: usize) -> Self {
        self.min_cavity_cells = cells;
        self
    }

    /// Sets the split ceiling policy.
    pub fn with_split_ceiling(mut self, ceiling: SplitCeiling) -> Self {
        self.split_ceiling = ceiling;
        self
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a handle can be moved to another thread
/// and cancel a running pack. Cancellation is sticky until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears a previous cancellation.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Progress callback for long-running packs.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information reported while packing.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Sheets opened so far.
    pub sheets_opened: usize,
    /// Pieces placed so far.
    pub pieces_placed: usize,
    /// Total pieces to place.
    pub total_pieces: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Current phase description.
    pub phase: String,
    /// Whether the packer is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a running progress report.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the sheet count.
    pub fn with_sheets(mut self, sheets: usize) -> Self {
        self.sheets_opened = sheets;
        self
    }

    /// Sets the placed/total piece counts.
    pub fn with_pieces(mut self, placed: usize, total: usize) -> Self {
        self.pieces_placed = placed;
        self.total_pieces = total;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the report as final.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Fraction of pieces placed (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.total_pieces > 0 {
            self.pieces_placed as f64 / self.total_pieces as f64
        } else {
            0.0
        }
    }
}

/// A strategy that packs pieces onto as few sheets of one size as it can.
///
/// Implementations must place every piece exactly once unless cancelled,
/// and must never report two placements covering the same sheet cell.
pub trait SheetPacker {
    /// Packs `pieces` onto sheets of `sheet` size.
    fn pack(&self, pieces: &[Piece], sheet: &SheetSize) -> Result<PackResult>;

    /// Packs with a progress callback, invoked whenever a sheet is closed.
    fn pack_with_progress(
        &self,
        pieces: &[Piece],
        sheet: &SheetSize,
        callback: ProgressCallback,
    ) -> Result<PackResult>;

    /// Requests cancellation; checked between piece placements.
    fn cancel(&self);

    /// Strategy name.
    fn name(&self) -> &'static str;
}
