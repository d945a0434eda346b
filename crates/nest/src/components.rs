//! Connected-component segmentation of a color grid.

use mosaic_cut_core::{ColorGrid, Component};

use crate::fill::fill_region;

/// Segments `grid` into maximal 4-connected same-color components.
///
/// Cells are scanned row-major; each unvisited cell seeds a flood fill over
/// its color. Components are returned in discovery order and carry that
/// order as their [`Component::index`].
///
/// A [`ColorGrid`] is validated on construction, so this never sees an
/// empty or ragged grid.
pub fn extract_components(grid: &ColorGrid) -> Vec<Component> {
    let (width, height) = (grid.width(), grid.height());
    let mut visited = vec![false; width * height];
    let mut components = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if visited[y * width + x] {
                continue;
            }
            let Some(color) = grid.get(x, y) else {
                continue;
            };

            let cells = fill_region(width, height, (x, y), &mut visited, |cx, cy| {
                grid.get(cx, cy) == Some(color)
            });

            if let Some(component) = Component::from_cells(components.len(), color, cells) {
                components.push(component);
            }
        }
    }

    log::debug!(
        "Extracted {} components from {}x{} grid",
        components.len(),
        width,
        height
    );
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_cut_core::Bounds;

    fn grid(rows: &[&str]) -> ColorGrid {
        ColorGrid::from_rows(
            rows.iter()
                .map(|r| r.chars().map(|c| c.to_string()).collect::<Vec<_>>()),
        )
        .unwrap()
    }

    #[test]
    fn test_single_color_grid_is_one_component() {
        let components = extract_components(&grid(&["aaa", "aaa"]));
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].area(), 6);
        assert_eq!(components[0].bounds, Bounds::new(0, 0, 3, 2));
        assert_eq!(components[0].mask.count(), 6);
    }

    #[test]
    fn test_isolated_corner_cell() {
        // The corner `a` touches the other `a` cells only diagonally.
        let components = extract_components(&grid(&["aaa", "aba", "aab"]));
        let a: Vec<_> = components.iter().filter(|c| c.color == "a").collect();
        let b: Vec<_> = components.iter().filter(|c| c.color == "b").collect();

        assert_eq!(a.len(), 1);
        assert_eq!(a[0].area(), 7);
        assert_eq!(b.len(), 2);
        assert!(b.iter().all(|c| c.area() == 1));
    }

    #[test]
    fn test_separated_corner_yields_two_components() {
        // `a` in the bottom-right corner is cut off by `b` cells.
        let components = extract_components(&grid(&["aaa", "aab", "aba"]));
        let mut a_areas: Vec<usize> = components
            .iter()
            .filter(|c| c.color == "a")
            .map(Component::area)
            .collect();
        a_areas.sort();
        assert_eq!(a_areas, vec![1, 6]);
    }

    #[test]
    fn test_discovery_order_and_indices() {
        let components = extract_components(&grid(&["abb", "cbb"]));
        let colors: Vec<&str> = components.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["a", "b", "c"]);
        for (i, c) in components.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn test_mask_matches_cells() {
        let components = extract_components(&grid(&["ab.", "bb.", "..."]));
        let b = components.iter().find(|c| c.color == "b").unwrap();
        assert_eq!(b.bounds, Bounds::new(0, 0, 2, 2));
        assert!(!b.mask.get(0, 0));
        assert!(b.mask.get(1, 0));
        assert!(b.mask.get(0, 1));
        assert_eq!(b.mask.count(), b.area());
    }

    #[test]
    fn test_cells_partition_grid() {
        let g = grid(&["abca", "abba", "ccca"]);
        let components = extract_components(&g);
        let total: usize = components.iter().map(Component::area).sum();
        assert_eq!(total, g.cell_count());
    }
}
