//! Stack-based 4-connected flood fill over a rectangular cell domain.

use mosaic_cut_core::Cell;

/// Collects the 4-connected region containing `start`.
///
/// `visited` is a row-major `width * height` buffer shared across calls so a
/// scan can skip cells already claimed by earlier regions. `include` decides
/// whether a cell belongs to the region. Uses an explicit stack, so region
/// size is not limited by call-stack depth.
///
/// Returns an empty region if `start` is visited or excluded.
pub(crate) fn fill_region<F>(
    width: usize,
    height: usize,
    start: Cell,
    visited: &mut [bool],
    include: F,
) -> Vec<Cell>
where
    F: Fn(usize, usize) -> bool,
{
    let (sx, sy) = start;
    if sx >= width || sy >= height || visited[sy * width + sx] || !include(sx, sy) {
        return Vec::new();
    }

    let mut region = Vec::new();
    let mut stack = vec![start];
    visited[sy * width + sx] = true;

    while let Some((x, y)) = stack.pop() {
        region.push((x, y));

        let neighbors = [
            (x + 1 < width).then(|| (x + 1, y)),
            x.checked_sub(1).map(|nx| (nx, y)),
            (y + 1 < height).then(|| (x, y + 1)),
            y.checked_sub(1).map(|ny| (x, ny)),
        ];

        for (nx, ny) in neighbors.into_iter().flatten() {
            let idx = ny * width + nx;
            if !visited[idx] && include(nx, ny) {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        }
    }

    region
}
