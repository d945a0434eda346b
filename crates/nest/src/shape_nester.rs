//! Shape-aware sheet nesting.
//!
//! Pieces are placed by their true masks, not their bounding boxes, so an
//! L-shaped piece leaves its empty corner free for other pieces. Each sheet
//! is filled in a single first-fit pass over the outstanding pieces, largest
//! first; anything left over moves on to a fresh sheet.
//!
//! After every placement the placed mask is searched for cavities, and each
//! cavity large enough may host one smaller outstanding piece.

use std::borrow::Cow;
use std::time::Instant;

use mosaic_cut_core::{
    Bounds, CancelToken, Config, Error, PackResult, Piece, ProgressCallback, ProgressInfo, Result,
    Sheet, SheetPacker, SheetSize,
};

use crate::cavity::find_cavities;

/// Fails with [`Error::PieceTooLarge`] for the first piece whose bounding
/// box cannot fit `sheet` in any allowed orientation.
///
/// A sheet-at-a-time packer only terminates when every piece fits an empty
/// sheet, so both packers run this before opening any sheet.
pub(crate) fn ensure_pieces_fit(
    pieces: &[Piece],
    sheet: &SheetSize,
    allow_rotation: bool,
) -> Result<()> {
    for piece in pieces {
        let fits = if allow_rotation {
            piece.bounds.fits_rotated(sheet.width, sheet.height)
        } else {
            piece.bounds.fits_within(sheet.width, sheet.height)
        };
        if !fits {
            return Err(Error::PieceTooLarge {
                piece_id: piece.id,
                width: piece.width(),
                height: piece.height(),
                sheet_width: sheet.width,
                sheet_height: sheet.height,
            });
        }
    }
    Ok(())
}

/// Orders pieces by area, largest first. The sort is stable, so equal areas
/// keep their input order.
fn by_area_descending(pieces: &[Piece]) -> Vec<&Piece> {
    let mut order: Vec<&Piece> = pieces.iter().collect();
    order.sort_by(|a, b| b.area().cmp(&a.area()));
    order
}

fn report(callback: Option<&ProgressCallback>, info: impl FnOnce() -> ProgressInfo) {
    if let Some(callback) = callback {
        callback(info());
    }
}

/// Outcome of filling one sheet.
enum SheetFill {
    Complete,
    Cancelled,
}

/// First-fit nester over true piece shapes.
pub struct ShapeNester {
    config: Config,
    cancelled: CancelToken,
}

impl ShapeNester {
    /// Creates a new nester with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: CancelToken::new(),
        }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Shares an existing cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancelled = token;
        self
    }

    /// Handle that can cancel this nester from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancelled.clone()
    }

    /// Finds the first free position for `piece` on `sheet`.
    ///
    /// Tries identity, then the 90° orientation when rotation is enabled.
    /// Each orientation is scanned top-to-bottom, left-to-right, and the
    /// first position where every covered cell is free wins.
    pub fn find_best_placement(
        &self,
        sheet: &Sheet,
        piece: &Piece,
    ) -> Option<(usize, usize, bool)> {
        let orientations: &[bool] = if self.config.allow_rotation {
            &[false, true]
        } else {
            &[false]
        };

        for &rotated in orientations {
            let (w, h) = piece.mask.oriented_size(rotated);
            if w > sheet.width() || h > sheet.height() {
                continue;
            }
            for y in 0..=sheet.height() - h {
                for x in 0..=sheet.width() - w {
                    if sheet.can_place(piece, x, y, rotated) {
                        return Some((x, y, rotated));
                    }
                }
            }
        }

        None
    }

    /// Fills `sheet` with one pass over `outstanding`, marking what was
    /// placed in `placed`.
    fn fill_sheet(
        &self,
        sheet: &mut Sheet,
        outstanding: &[&Piece],
        placed: &mut [bool],
    ) -> Result<SheetFill> {
        for i in 0..outstanding.len() {
            // Nested into an earlier cavity on this pass.
            if placed[i] {
                continue;
            }
            if self.cancelled.is_cancelled() {
                return Ok(SheetFill::Cancelled);
            }

            let piece = outstanding[i];
            let Some((x, y, rotated)) = self.find_best_placement(sheet, piece) else {
                continue;
            };
            sheet.place(piece, x, y, rotated)?;
            placed[i] = true;
            log::debug!(
                "Placed piece {} ({}x{}) at ({}, {}){}",
                piece.id,
                piece.width(),
                piece.height(),
                x,
                y,
                if rotated { " rotated" } else { "" }
            );

            if self.config.nest_in_cavities {
                self.nest_in_cavities(sheet, piece, (x, y, rotated), outstanding, placed)?;
            }
        }
        Ok(SheetFill::Complete)
    }

    /// Nests at most one outstanding piece into each cavity of `container`.
    fn nest_in_cavities(
        &self,
        sheet: &mut Sheet,
        container: &Piece,
        (x, y, rotated): (usize, usize, bool),
        outstanding: &[&Piece],
        placed: &mut [bool],
    ) -> Result<()> {
        let mask = if rotated {
            Cow::Owned(container.mask.rotated())
        } else {
            Cow::Borrowed(&container.mask)
        };

        for cavity in find_cavities(&mask, (x, y), self.config.min_cavity_cells) {
            for (j, piece) in outstanding.iter().enumerate() {
                if placed[j] || !piece.bounds.fits_within(cavity.bounds.width, cavity.bounds.height)
                {
                    continue;
                }
                let Some((cx, cy)) = Self::find_cavity_placement(sheet, piece, &cavity.bounds)
                else {
                    continue;
                };
                sheet.place_nested(piece, cx, cy)?;
                placed[j] = true;
                log::debug!(
                    "Nested piece {} in a {}-cell cavity of piece {} at ({}, {})",
                    piece.id,
                    cavity.area(),
                    container.id,
                    cx,
                    cy
                );
                break;
            }
        }
        Ok(())
    }

    /// Scans the cavity's bounding box for an identity placement of `piece`.
    fn find_cavity_placement(
        sheet: &Sheet,
        piece: &Piece,
        cavity: &Bounds,
    ) -> Option<(usize, usize)> {
        let last_y = cavity.max_y() + 1 - piece.height();
        let last_x = cavity.max_x() + 1 - piece.width();
        for y in cavity.min_y..=last_y {
            for x in cavity.min_x..=last_x {
                if sheet.can_place(piece, x, y, false) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn nest(
        &self,
        pieces: &[Piece],
        size: &SheetSize,
        callback: Option<&ProgressCallback>,
    ) -> Result<PackResult> {
        size.validate()?;
        ensure_pieces_fit(pieces, size, self.config.allow_rotation)?;

        let start = Instant::now();
        let mut result = PackResult::new().with_strategy(self.name());
        let total = pieces.len();
        let mut outstanding = by_area_descending(pieces);

        report(callback, || {
            ProgressInfo::new()
                .with_phase("Shape Nesting")
                .with_pieces(0, total)
        });

        while !outstanding.is_empty() {
            let mut sheet = Sheet::new(size.clone());
            let mut placed = vec![false; outstanding.len()];
            let fill = self.fill_sheet(&mut sheet, &outstanding, &mut placed)?;

            if !sheet.is_empty() {
                result.sheets.push(sheet);
            }
            outstanding = outstanding
                .into_iter()
                .zip(placed)
                .filter_map(|(piece, done)| (!done).then_some(piece))
                .collect();

            if let SheetFill::Cancelled = fill {
                log::warn!(
                    "Shape nesting cancelled with {} of {} pieces unplaced",
                    outstanding.len(),
                    total
                );
                result.cancelled = true;
                result.unplaced = outstanding.iter().map(|p| p.id).collect();
                break;
            }

            let done = total - outstanding.len();
            let sheets = result.sheet_count();
            let elapsed = start.elapsed().as_millis() as u64;
            report(callback, || {
                ProgressInfo::new()
                    .with_phase("Shape Nesting")
                    .with_sheets(sheets)
                    .with_pieces(done, total)
                    .with_elapsed(elapsed)
            });
        }

        result.recompute_efficiency();
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Shape nesting placed {} pieces on {} {} sheets ({:.1}% efficiency)",
            result.placed_count(),
            result.sheet_count(),
            size.label,
            result.efficiency
        );
        report(callback, || {
            ProgressInfo::new()
                .with_phase(if result.cancelled { "Cancelled" } else { "Complete" })
                .with_sheets(result.sheet_count())
                .with_pieces(result.placed_count(), total)
                .with_elapsed(result.computation_time_ms)
                .finished()
        });

        Ok(result)
    }
}

impl SheetPacker for ShapeNester {
    fn pack(&self, pieces: &[Piece], sheet: &SheetSize) -> Result<PackResult> {
        self.nest(pieces, sheet, None)
    }

    fn pack_with_progress(
        &self,
        pieces: &[Piece],
        sheet: &SheetSize,
        callback: ProgressCallback,
    ) -> Result<PackResult> {
        self.nest(pieces, sheet, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.cancel();
    }

    fn name(&self) -> &'static str {
        "shape-nesting"
    }
}
