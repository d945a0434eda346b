//! Integration tests for mosaic-cut-nest.

use std::collections::{HashMap, HashSet};

use mosaic_cut_nest::{
    extract_components, extract_pieces, Cell, ColorGrid, Config, MosaicLayout, Piece, PieceId,
    Planner, RectanglePacker, ShapeMask, ShapeNester, SheetCatalog, SheetPacker, SheetSize,
    SplitCeiling, Strategy,
};

fn grid(rows: &[&str]) -> ColorGrid {
    ColorGrid::from_rows(
        rows.iter()
            .map(|r| r.chars().map(|c| c.to_string()).collect::<Vec<_>>()),
    )
    .unwrap()
}

/// A mosaic-like design: a sky background, a sun disc, a band of hills
/// and scattered single-tile stars.
fn landscape(width: usize, height: usize) -> ColorGrid {
    let (cx, cy, r) = (width as i64 * 2 / 3, height as i64 / 4, height as i64 / 6 + 1);
    let rows: Vec<Vec<&str>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let (xi, yi) = (x as i64, y as i64);
                    let hill = height as i64 * 2 / 3 - ((xi % 16) - 8).abs() / 2;
                    if (xi - cx).pow(2) + (yi - cy).pow(2) <= r * r {
                        "#f5c542"
                    } else if yi >= hill {
                        if (x / 7 + y / 3) % 2 == 0 {
                            "#2e7d32"
                        } else {
                            "#66bb6a"
                        }
                    } else if (x * 31 + y * 17) % 23 == 0 {
                        "#ffffff"
                    } else {
                        "#1a237e"
                    }
                })
                .collect()
        })
        .collect();
    ColorGrid::from_rows(rows).unwrap()
}

fn by_id(pieces: &[Piece]) -> HashMap<PieceId, &Piece> {
    pieces.iter().map(|p| (p.id, p)).collect()
}

/// Checks no-overlap, bounds containment, rotation correctness and that
/// the occupancy bitmap matches the placements.
fn assert_sheets_valid(layout: &MosaicLayout, pieces: &[Piece]) {
    let pieces = by_id(pieces);
    for sheet in &layout.sheets {
        let mut covered: HashSet<Cell> = HashSet::new();
        for placement in sheet.placements() {
            let piece = pieces[&placement.piece_id];
            assert_eq!(placement.color, piece.color);
            assert_eq!(Some(piece.color.as_str()), sheet.color());

            if placement.rotated {
                assert_eq!(placement.width, piece.height());
                assert_eq!(placement.height, piece.width());
            } else {
                assert_eq!(placement.width, piece.width());
                assert_eq!(placement.height, piece.height());
            }

            for (x, y) in placement.covered_cells(&piece.mask) {
                assert!(x < sheet.width() && y < sheet.height(), "({}, {}) off sheet", x, y);
                assert!(covered.insert((x, y)), "({}, {}) covered twice", x, y);
                assert!(sheet.occupancy().is_occupied(x, y));
            }
        }
        assert_eq!(covered.len(), sheet.occupancy().occupied_count());
        assert_eq!(covered.len(), sheet.used_area());
    }
}

/// Checks every input piece is placed exactly once, within its color group.
fn assert_complete(layout: &MosaicLayout, pieces: &[Piece]) {
    let mut placed: Vec<PieceId> = layout
        .sheets
        .iter()
        .flat_map(|s| s.placements().iter().map(|p| p.piece_id))
        .collect();
    placed.sort();
    let mut expected: Vec<PieceId> = pieces.iter().map(|p| p.id).collect();
    expected.sort();
    assert_eq!(placed, expected);

    for color in &layout.colors {
        let in_group = pieces.iter().filter(|p| p.color == color.color).count();
        assert_eq!(color.piece_count, in_group);
        let range = color.first_sheet..color.first_sheet + color.sheet_count;
        let on_sheets: usize = layout.sheets[range]
            .iter()
            .map(|s| s.placements().len())
            .sum();
        assert_eq!(on_sheets, in_group);
    }
}

mod extraction_tests {
    use super::*;

    #[test]
    fn test_isolated_corner_example() {
        // The bottom-right `a` only touches other `a` cells diagonally.
        let components = extract_components(&grid(&["aaa", "aab", "aba"]));
        let mut a: Vec<usize> = components
            .iter()
            .filter(|c| c.color == "a")
            .map(|c| c.area())
            .collect();
        a.sort();
        assert_eq!(a, vec![1, 6]);
    }

    #[test]
    fn test_components_partition_grid() {
        let g = landscape(60, 40);
        let components = extract_components(&g);
        let mut seen = HashSet::new();
        for component in &components {
            assert_eq!(component.mask.count(), component.area());
            assert_eq!(component.mask.width(), component.bounds.width);
            assert_eq!(component.mask.height(), component.bounds.height);
            for &(x, y) in &component.cells {
                assert_eq!(g.get(x, y), Some(component.color.as_str()));
                assert!(seen.insert((x, y)));
            }
        }
        assert_eq!(seen.len(), g.cell_count());
    }

    #[test]
    fn test_split_area_conservation() {
        let g = landscape(90, 70);
        let components = extract_components(&g);
        let pieces = extract_pieces(components.clone(), 25);

        for component in &components {
            let fragments: Vec<&Piece> = pieces
                .iter()
                .filter(|p| p.component_index == component.index)
                .collect();
            let total: usize = fragments.iter().map(|p| p.area()).sum();
            assert_eq!(total, component.area());

            let mut cells: Vec<Cell> = fragments.iter().flat_map(|p| p.cells.clone()).collect();
            cells.sort();
            let mut original = component.cells.clone();
            original.sort();
            assert_eq!(cells, original);

            if component.bounds.fits_square(25) {
                assert_eq!(fragments.len(), 1);
                assert!(!fragments[0].is_cut);
            } else {
                assert!(fragments.iter().all(|p| p.is_cut));
            }
        }
        assert!(pieces.iter().all(|p| p.bounds.fits_square(25)));
    }

    #[test]
    fn test_45_wide_split_example() {
        let rows: Vec<String> = (0..10).map(|_| "a".repeat(45)).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let pieces = extract_pieces(extract_components(&grid(&refs)), 30);

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[1].bounds.min_x, 22);
        assert!(pieces.iter().all(|p| p.width() <= 30 && p.is_cut));
    }
}

mod nesting_tests {
    use super::*;

    fn square(id: usize) -> Piece {
        Piece::from_mask(id, "c", ShapeMask::solid(2, 2))
    }

    #[test]
    fn test_two_squares_one_sheet() {
        let pieces = vec![square(0), square(1)];
        let nester = ShapeNester::default_config();

        let square_sheet = nester.pack(&pieces, &SheetSize::sized(4, 4)).unwrap();
        assert_eq!(square_sheet.sheet_count(), 1);

        let tight = nester.pack(&pieces, &SheetSize::sized(4, 2)).unwrap();
        assert_eq!(tight.sheet_count(), 1);
        assert_eq!(tight.efficiency, 100.0);
    }

    #[test]
    fn test_donut_example() {
        let donut = Piece::from_mask(
            0,
            "c",
            ShapeMask::from_pattern(&["####", "#.##", "####", "####"]),
        );
        let dot = Piece::from_mask(1, "c", ShapeMask::solid(1, 1));
        let result = ShapeNester::default_config()
            .pack(&[donut, dot], &SheetSize::sized(4, 4))
            .unwrap();

        assert_eq!(result.sheet_count(), 1);
        let dot = &result.sheets[0].placements()[1];
        assert_eq!((dot.x, dot.y), (1, 1));
    }

    #[test]
    fn test_frame_with_plugs() {
        // A frame hosts one plug per cavity; the second plug goes beside it.
        let frame = Piece::from_mask(
            0,
            "c",
            ShapeMask::from_pattern(&["#######", "#.....#", "#.....#", "#######"]),
        );
        let plugs: Vec<Piece> = (1..=2)
            .map(|id| Piece::from_mask(id, "c", ShapeMask::solid(2, 2)))
            .collect();
        let mut pieces = vec![frame];
        pieces.extend(plugs);

        let result = ShapeNester::default_config()
            .pack(&pieces, &SheetSize::sized(10, 4))
            .unwrap();
        let placements = result.sheets[0].placements();
        assert_eq!(result.sheet_count(), 1);
        assert_eq!(placements.iter().filter(|p| p.nested).count(), 1);
        assert_eq!(placements.len(), 3);
    }

    #[test]
    fn test_rectangle_and_shape_strategies_agree_on_completeness() {
        let pieces = extract_pieces(extract_components(&landscape(40, 30)), 20);
        let sheet = SheetSize::sized(20, 20);

        let packers: [Box<dyn SheetPacker>; 2] = [
            Box::new(ShapeNester::default_config()),
            Box::new(RectanglePacker::default_config()),
        ];
        for packer in packers {
            let result = packer.pack(&pieces, &sheet).unwrap();
            assert_eq!(result.placed_count(), pieces.len(), "{}", packer.name());
            assert!(result.all_placed());
            assert!(!result.cancelled);
        }
    }

    #[test]
    fn test_shape_nesting_never_worse_on_l_shapes() {
        let l = ShapeMask::from_pattern(&["#..", "#..", "###"]);
        let pieces: Vec<Piece> = (0..8).map(|i| Piece::from_mask(i, "c", l.clone())).collect();
        let sheet = SheetSize::sized(6, 6);

        let shape = ShapeNester::default_config().pack(&pieces, &sheet).unwrap();
        let rect = RectanglePacker::default_config().pack(&pieces, &sheet).unwrap();
        assert!(shape.sheet_count() <= rect.sheet_count());
    }
}

mod pipeline_tests {
    use super::*;

    /// Splits against the sheet being planned, so every fragment fits it.
    fn sheet_aware(strategy: Strategy) -> Planner {
        let config = Config::default()
            .with_strategy(strategy)
            .with_split_ceiling(SplitCeiling::SelectedSheet);
        Planner::new(config, SheetCatalog::default())
    }

    #[test]
    fn test_landscape_plan_properties() {
        let g = landscape(64, 48);
        let planner = sheet_aware(Strategy::ShapeNesting);
        let sheet = SheetSize::new(30, 30, "30x30 Standard");

        let pieces = planner.extract_pieces(&g, &sheet);
        let layout = planner.plan(&g, &sheet).unwrap();

        assert!(!layout.cancelled);
        assert!(layout.unplaced.is_empty());
        assert_sheets_valid(&layout, &pieces);
        assert_complete(&layout, &pieces);

        let area: usize = pieces.iter().map(Piece::area).sum();
        assert_eq!(area, g.cell_count());
        assert_eq!(layout.used_area(), area);
        assert!(layout.efficiency > 0.0 && layout.efficiency <= 100.0);
    }

    #[test]
    fn test_rectangle_strategy_plan_properties() {
        let g = landscape(50, 40);
        let planner = sheet_aware(Strategy::RectanglePacking);
        let sheet = SheetSize::sized(30, 30);

        let pieces = planner.extract_pieces(&g, &sheet);
        let layout = planner.plan(&g, &sheet).unwrap();
        assert_sheets_valid(&layout, &pieces);
        assert_complete(&layout, &pieces);
    }

    #[test]
    fn test_catalog_ceiling_gap_is_reported() {
        // The background spans 64 columns; fragments 32 wide exceed 30x30.
        let g = landscape(64, 48);
        let err = Planner::default()
            .plan(&g, &SheetSize::sized(30, 30))
            .unwrap_err();
        assert!(matches!(err, mosaic_cut_nest::Error::PieceTooLarge { .. }));
    }

    #[test]
    fn test_selected_sheet_ceiling_on_small_sheet() {
        let g = landscape(64, 48);
        let planner = sheet_aware(Strategy::ShapeNesting);
        let sheet = SheetSize::sized(12, 12);

        let pieces = planner.extract_pieces(&g, &sheet);
        let layout = planner.plan(&g, &sheet).unwrap();
        assert_sheets_valid(&layout, &pieces);
        assert_complete(&layout, &pieces);
    }

    #[test]
    fn test_deterministic_layouts() {
        let g = landscape(48, 36);
        let planner = sheet_aware(Strategy::ShapeNesting);
        let a = planner.plan_with_index(&g, 0).unwrap();
        let b = planner.plan_with_index(&g, 0).unwrap();
        assert_eq!(a.sheets, b.sheets);
        assert_eq!(a.colors, b.colors);
    }

    #[test]
    fn test_best_sheet_size_is_max_efficiency() {
        let g = landscape(40, 30);
        let planner = sheet_aware(Strategy::ShapeNesting);
        let best = planner.best_sheet_size(&g).unwrap();

        for (i, size) in planner.catalog().iter().enumerate() {
            if let Ok(layout) = planner.plan_with_index(&g, i) {
                assert!(layout.efficiency <= best.efficiency, "{}", size.label);
            }
        }
    }

    #[test]
    fn test_efficiency_matches_sheet_weighted_average() {
        let g = landscape(40, 30);
        let layout = sheet_aware(Strategy::ShapeNesting)
            .plan_with_index(&g, 0)
            .unwrap();
        let weighted: f64 = layout
            .colors
            .iter()
            .map(|c| c.efficiency * c.sheet_count as f64)
            .sum::<f64>()
            / layout.total_sheets() as f64;
        assert!((weighted - layout.efficiency).abs() < 1e-9);
    }
}
