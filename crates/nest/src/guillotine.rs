//! Bounding-box guillotine bin packing.
//!
//! Each bin holds a binary tree of free rectangles. Placing an item in a
//! free leaf splits the leftover space into a `right` rectangle (beside the
//! item, as tall as the item) and a `down` rectangle (below the item, full
//! leaf width). Shape masks are ignored when choosing positions; the masks
//! are only written to the sheets afterwards, inside their boxes.

use std::time::Instant;

use mosaic_cut_core::{
    CancelToken, Config, Error, PackResult, Piece, ProgressCallback, ProgressInfo, Result, Sheet,
    SheetPacker, SheetSize,
};

use crate::shape_nester::ensure_pieces_fit;

#[derive(Debug, Clone)]
struct Node {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Node {
    fn free(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// One bin's free-space tree, stored as an arena.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    width: usize,
    height: usize,
    nodes: Vec<Node>,
}

impl GuillotineBin {
    /// Creates an empty bin.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            nodes: vec![Node::free(0, 0, width, height)],
        }
    }

    /// Bin width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bin height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Inserts a `width x height` box, trying the swapped orientation when
    /// `allow_rotation` is set and the box is not square.
    ///
    /// Returns the top-left corner and whether the box was rotated.
    pub fn insert(
        &mut self,
        width: usize,
        height: usize,
        allow_rotation: bool,
    ) -> Option<(usize, usize, bool)> {
        if let Some((x, y)) = self.insert_node(width, height) {
            return Some((x, y, false));
        }
        if allow_rotation && width != height {
            if let Some((x, y)) = self.insert_node(height, width) {
                return Some((x, y, true));
            }
        }
        None
    }

    /// Depth-first search for the first free leaf that fits, right subtree
    /// before down subtree.
    fn insert_node(&mut self, width: usize, height: usize) -> Option<(usize, usize)> {
        let mut stack = vec![0];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.used {
                stack.extend(node.down);
                stack.extend(node.right);
                continue;
            }
            if width > node.width || height > node.height {
                continue;
            }

            let (x, y, node_w, node_h) = (node.x, node.y, node.width, node.height);
            let down = self.nodes.len();
            self.nodes.push(Node::free(x, y + height, node_w, node_h - height));
            self.nodes.push(Node::free(x + width, y, node_w - width, height));

            let node = &mut self.nodes[idx];
            node.used = true;
            node.down = Some(down);
            node.right = Some(down + 1);
            return Some((x, y));
        }

        None
    }
}

/// Guillotine packer over piece bounding boxes.
pub struct RectanglePacker {
    config: Config,
    cancelled: CancelToken,
}

impl RectanglePacker {
    /// Creates a new packer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: CancelToken::new(),
        }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Shares an existing cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancelled = token;
        self
    }

    fn pack_boxes(
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
        let rotate = self.config.allow_rotation;

        let mut order: Vec<&Piece> = pieces.iter().collect();
        order.sort_by(|a, b| b.bounds.area().cmp(&a.bounds.area()));

        let mut bins: Vec<GuillotineBin> = Vec::new();

        for (placed, piece) in order.iter().enumerate() {
            if self.cancelled.is_cancelled() {
                log::warn!(
                    "Rectangle packing cancelled with {} of {} pieces unplaced",
                    total - placed,
                    total
                );
                result.cancelled = true;
                result.unplaced = order[placed..].iter().map(|p| p.id).collect();
                break;
            }

            let (w, h) = (piece.width(), piece.height());
            let existing = bins
                .iter_mut()
                .enumerate()
                .find_map(|(i, bin)| bin.insert(w, h, rotate).map(|spot| (i, spot)));

            let (index, (x, y, rotated)) = match existing {
                Some(found) => found,
                None => {
                    let mut bin = GuillotineBin::new(size.width, size.height);
                    let spot = bin.insert(w, h, rotate).ok_or(Error::PieceTooLarge {
                        piece_id: piece.id,
                        width: w,
                        height: h,
                        sheet_width: size.width,
                        sheet_height: size.height,
                    })?;
                    bins.push(bin);
                    result.sheets.push(Sheet::new(size.clone()));

                    let opened = bins.len();
                    let elapsed = start.elapsed().as_millis() as u64;
                    if let Some(callback) = callback {
                        callback(
                            ProgressInfo::new()
                                .with_phase("Rectangle Packing")
                                .with_sheets(opened)
                                .with_pieces(placed, total)
                                .with_elapsed(elapsed),
                        );
                    }
                    (opened - 1, spot)
                }
            };

            // Boxes never overlap, so the masks inside them cannot either.
            result.sheets[index].place(piece, x, y, rotated)?;
            log::debug!(
                "Packed piece {} ({}x{}) into bin {} at ({}, {})",
                piece.id,
                w,
                h,
                index,
                x,
                y
            );
        }

        result.recompute_efficiency();
        result.computation_time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Rectangle packing used {} {} sheets ({:.1}% efficiency)",
            result.sheet_count(),
            size.label,
            result.efficiency
        );
        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_phase(if result.cancelled { "Cancelled" } else { "Complete" })
                    .with_sheets(result.sheet_count())
                    .with_pieces(result.placed_count(), total)
                    .with_elapsed(result.computation_time_ms)
                    .finished(),
            );
        }

        Ok(result)
    }
}

impl SheetPacker for RectanglePacker {
    fn pack(&self, pieces: &[Piece], sheet: &SheetSize) -> Result<PackResult> {
        self.pack_boxes(pieces, sheet, None)
    }

    fn pack_with_progress(
        &self,
        pieces: &[Piece],
        sheet: &SheetSize,
        callback: ProgressCallback,
    ) -> Result<PackResult> {
        self.pack_boxes(pieces, sheet, Some(&callback))
    }

    fn cancel(&self) {
        self.cancelled.cancel();
    }

    fn name(&self) -> &'static str {
        "rectangle-packing"
    }
}
