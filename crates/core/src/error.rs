//! Error types shared by every mosaic-cut crate.

use thiserror::Error as ThisError;

/// Errors produced by grid validation, piece extraction and sheet packing.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The color grid is missing, empty or not rectangular.
    ///
    /// Raised before segmentation begins, so no partial component list exists.
    #[error("invalid color grid: {0}")]
    InvalidGrid(String),

    /// A sheet size or the sheet catalog is unusable.
    #[error("invalid sheet: {0}")]
    InvalidSheet(String),

    /// A piece cannot fit the selected sheet in any allowed orientation.
    #[error(
        "piece {piece_id} ({width}x{height}) does not fit a {sheet_width}x{sheet_height} sheet"
    )]
    PieceTooLarge {
        /// Offending piece.
        piece_id: usize,
        /// Bounding box width of the piece.
        width: usize,
        /// Bounding box height of the piece.
        height: usize,
        /// Width of the sheet the piece was packed against.
        sheet_width: usize,
        /// Height of the sheet the piece was packed against.
        sheet_height: usize,
    },

    /// A placement would overlap an occupied cell or leave the sheet.
    #[error("piece {piece_id} cannot be placed at ({x}, {y}): cell occupied or out of bounds")]
    Occupied {
        /// Piece being placed.
        piece_id: usize,
        /// Requested x offset on the sheet.
        x: usize,
        /// Requested y offset on the sheet.
        y: usize,
    },

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout mosaic-cut.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_too_large_message() {
        let err = Error::PieceTooLarge {
            piece_id: 7,
            width: 31,
            height: 12,
            sheet_width: 20,
            sheet_height: 20,
        };
        assert_eq!(
            err.to_string(),
            "piece 7 (31x12) does not fit a 20x20 sheet"
        );
    }

    #[test]
    fn test_invalid_grid_message() {
        let err = Error::InvalidGrid("row 2 has 3 cells, expected 4".into());
        assert!(err.to_string().starts_with("invalid color grid"));
    }
}
