//! Splitting of components that exceed the usable sheet size.
//!
//! A component whose bounding box is larger than the ceiling on either axis
//! is partitioned by cell membership into evenly spaced strips. Strips are
//! re-examined until every fragment fits, so a component too wide *and* too
//! tall is first cut into columns, then each column into rows.
//!
//! Fragments are membership splits, not geometric cuts: a fragment's cells
//! need not stay 4-connected.

use mosaic_cut_core::{Bounds, Cell, Component, Piece, PieceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Evenly spaced cut coordinates for a span of `dim` cells.
///
/// With `k = ceil(dim / ceiling) - 1` cuts, cut `i` (1-based) lands at local
/// coordinate `floor(dim * i / (k + 1))`. Returns no cuts when `dim` already
/// fits.
pub fn cut_positions(dim: usize, ceiling: usize) -> Vec<usize> {
    let ceiling = ceiling.max(1);
    if dim <= ceiling {
        return Vec::new();
    }
    let k = dim.div_ceil(ceiling) - 1;
    (1..=k).map(|i| dim * i / (k + 1)).collect()
}

/// Partitions `cells` into strips along `axis` at local `cuts`.
///
/// Strip `j` holds cells with local coordinate in `[cuts[j-1], cuts[j])`.
/// Empty strips are dropped.
fn partition_strips(
    cells: Vec<Cell>,
    bounds: &Bounds,
    axis: Axis,
    cuts: &[usize],
) -> Vec<Vec<Cell>> {
    let mut strips: Vec<Vec<Cell>> = vec![Vec::new(); cuts.len() + 1];
    for cell in cells {
        let local = match axis {
            Axis::X => cell.0 - bounds.min_x,
            Axis::Y => cell.1 - bounds.min_y,
        };
        let strip = cuts.partition_point(|&c| c <= local);
        strips[strip].push(cell);
    }
    strips.retain(|s| !s.is_empty());
    strips
}

/// Splits one component into pieces that each fit `ceiling x ceiling`.
///
/// A component that already fits is passed through with `is_cut = false`.
/// Otherwise every fragment is marked `is_cut = true` with the component as
/// parent. Ids are drawn from `next_id` in output order.
pub fn split_component(component: Component, ceiling: usize, next_id: &mut PieceId) -> Vec<Piece> {
    let ceiling = ceiling.max(1);

    if component.area() == 0 {
        return Vec::new();
    }
    if component.bounds.fits_square(ceiling) {
        let piece = Piece::from_component(*next_id, component);
        *next_id += 1;
        return vec![piece];
    }

    let Component {
        index,
        color,
        cells,
        bounds,
        ..
    } = component;

    log::debug!(
        "Splitting component {} ({}x{}, {} cells) against ceiling {}",
        index,
        bounds.width,
        bounds.height,
        cells.len(),
        ceiling
    );

    // Work stack; strips are pushed in reverse so output runs left-to-right,
    // top-to-bottom.
    let mut pending: Vec<Vec<Cell>> = vec![cells];
    let mut pieces = Vec::new();

    while let Some(cells) = pending.pop() {
        let Some(bounds) = Bounds::from_cells(&cells) else {
            continue;
        };

        let (axis, dim) = if bounds.width > ceiling {
            (Axis::X, bounds.width)
        } else if bounds.height > ceiling {
            (Axis::Y, bounds.height)
        } else {
            if let Some(piece) = Piece::fragment(*next_id, color.clone(), index, cells) {
                *next_id += 1;
                pieces.push(piece);
            }
            continue;
        };

        let cuts = cut_positions(dim, ceiling);
        let strips = partition_strips(cells, &bounds, axis, &cuts);
        pending.extend(strips.into_iter().rev());
    }

    pieces
}

/// Converts components into pieces, splitting those larger than `ceiling`.
///
/// Piece ids are assigned sequentially across all components in discovery
/// order. Zero-area components are dropped.
pub fn extract_pieces(components: Vec<Component>, ceiling: usize) -> Vec<Piece> {
    let mut next_id = 0;
    let mut pieces = Vec::with_capacity(components.len());

    for component in components {
        pieces.extend(split_component(component, ceiling, &mut next_id));
    }

    let cut = pieces.iter().filter(|p| p.is_cut).count();
    log::debug!(
        "Extracted {} pieces ({} cut fragments) with ceiling {}",
        pieces.len(),
        cut,
        ceiling
    );
    pieces
}
