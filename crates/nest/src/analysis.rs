//! Summary statistics of a mosaic and its extracted pieces.

use mosaic_cut_core::{ColorGrid, ColorId, Piece};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Count for one color.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColorCount {
    /// Color token.
    pub color: ColorId,
    /// Number of tiles or pieces.
    pub count: usize,
}

/// Tile and piece breakdown of a mosaic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MosaicAnalysis {
    /// Grid width in tiles.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    /// Number of tiles.
    pub total_tiles: usize,
    /// Tiles per color, first appearance order.
    pub tile_counts: Vec<ColorCount>,
    /// Pieces per color, first appearance order.
    pub piece_counts: Vec<ColorCount>,
    /// Number of pieces.
    pub total_pieces: usize,
    /// Pieces produced by splitting.
    pub cut_pieces: usize,
    /// Sum of piece areas.
    pub total_piece_area: usize,
}

impl MosaicAnalysis {
    /// Number of distinct colors in the grid.
    pub fn colors_used(&self) -> usize {
        self.tile_counts.len()
    }
}

/// Analyzes `grid` together with the pieces extracted from it.
pub fn analyze(grid: &ColorGrid, pieces: &[Piece]) -> MosaicAnalysis {
    let tile_counts = grid
        .tile_counts()
        .into_iter()
        .map(|(color, count)| ColorCount { color, count })
        .collect();

    let mut piece_counts: Vec<ColorCount> = Vec::new();
    for piece in pieces {
        match piece_counts.iter_mut().find(|c| c.color == piece.color) {
            Some(entry) => entry.count += 1,
            None => piece_counts.push(ColorCount {
                color: piece.color.clone(),
                count: 1,
            }),
        }
    }

    MosaicAnalysis {
        width: grid.width(),
        height: grid.height(),
        total_tiles: grid.cell_count(),
        tile_counts,
        piece_counts,
        total_pieces: pieces.len(),
        cut_pieces: pieces.iter().filter(|p| p.is_cut).count(),
        total_piece_area: pieces.iter().map(Piece::area).sum(),
    }
}
