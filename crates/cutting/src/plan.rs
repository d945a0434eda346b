//! Projection of nested sheets into a cutting plan.

use mosaic_cut_core::{efficiency_percent, Sheet};

use crate::result::{CutEntry, CuttingPlan, Dimensions, PlanStatistics, Position, SheetPlan};

/// Flattens `sheets` into per-sheet cutting instructions.
///
/// Sheets are numbered from 1 in input order. Entries keep placement order
/// and report the footprint after rotation.
pub fn generate_cutting_plan(sheets: &[Sheet]) -> CuttingPlan {
    let sheets = sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| SheetPlan {
            sheet_number: i + 1,
            color: sheet.color().map(str::to_string),
            pieces: sheet
                .placements()
                .iter()
                .map(|p| CutEntry {
                    piece_id: p.piece_id,
                    color: p.color.clone(),
                    position: Position { x: p.x, y: p.y },
                    dimensions: Dimensions {
                        width: p.width,
                        height: p.height,
                    },
                    rotated: p.rotated,
                    area: p.area,
                    nested: p.nested,
                })
                .collect(),
        })
        .collect();

    let plan = CuttingPlan { sheets };
    log::debug!(
        "Cutting plan: {} pieces on {} sheets",
        plan.piece_count(),
        plan.sheet_count()
    );
    plan
}

impl PlanStatistics {
    /// Aggregates statistics over `sheets`.
    pub fn from_sheets(sheets: &[Sheet]) -> Self {
        let total_sheet_area: usize = sheets.iter().map(|s| s.size().area()).sum();
        let used_area: usize = sheets.iter().map(Sheet::used_area).sum();
        let efficiency = efficiency_percent(used_area, total_sheet_area);

        Self {
            total_sheets: sheets.len(),
            total_sheet_area,
            used_area,
            wasted_area: total_sheet_area.saturating_sub(used_area),
            efficiency,
            waste_percentage: if sheets.is_empty() {
                0.0
            } else {
                100.0 - efficiency
            },
        }
    }
}

/// Material cost of a plan at a flat price per sheet.
pub fn material_cost(plan: &CuttingPlan, cost_per_sheet: f64) -> f64 {
    plan.sheet_count() as f64 * cost_per_sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_cut_core::{Piece, ShapeMask, SheetSize};

    fn sheets() -> Vec<Sheet> {
        let size = SheetSize::sized(4, 4);
        let bar = Piece::from_mask(0, "red", ShapeMask::solid(3, 1));
        let l = Piece::from_mask(1, "red", ShapeMask::from_pattern(&["#.", "##"]));
        let dot = Piece::from_mask(2, "blue", ShapeMask::solid(1, 1));

        let mut first = Sheet::new(size.clone());
        first.set_color("red");
        first.place(&bar, 0, 0, true).unwrap();
        first.place(&l, 1, 0, false).unwrap();

        let mut second = Sheet::new(size);
        second.set_color("blue");
        second.place(&dot, 2, 3, false).unwrap();

        vec![first, second]
    }

    #[test]
    fn test_plan_numbering_and_entries() {
        let plan = generate_cutting_plan(&sheets());

        assert_eq!(plan.sheet_count(), 2);
        assert_eq!(plan.sheets[0].sheet_number, 1);
        assert_eq!(plan.sheets[1].sheet_number, 2);
        assert_eq!(plan.sheets[0].color.as_deref(), Some("red"));

        let bar = &plan.sheets[0].pieces[0];
        assert!(bar.rotated);
        assert_eq!(bar.dimensions, Dimensions { width: 1, height: 3 });
        assert_eq!(bar.area, 3);

        let dot = &plan.sheets[1].pieces[0];
        assert_eq!(dot.position, Position { x: 2, y: 3 });
        assert_eq!(dot.color, "blue");
    }

    #[test]
    fn test_plan_is_pure() {
        let input = sheets();
        assert_eq!(generate_cutting_plan(&input), generate_cutting_plan(&input));
        assert!(generate_cutting_plan(&[]).sheets.is_empty());
    }

    #[test]
    fn test_statistics() {
        let stats = PlanStatistics::from_sheets(&sheets());
        assert_eq!(stats.total_sheets, 2);
        assert_eq!(stats.total_sheet_area, 32);
        assert_eq!(stats.used_area, 7);
        assert_eq!(stats.wasted_area, 25);
        assert!((stats.efficiency - 21.875).abs() < 1e-9);
        assert!((stats.waste_percentage - 78.125).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_empty() {
        assert_eq!(PlanStatistics::from_sheets(&[]), PlanStatistics::default());
    }

    #[test]
    fn test_material_cost() {
        let plan = generate_cutting_plan(&sheets());
        assert_eq!(material_cost(&plan, 12.5), 25.0);
    }
}
