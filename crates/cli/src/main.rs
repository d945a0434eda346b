//! Command-line front end for mosaic-cut.
//!
//! Reads a mosaic document (`{ "tileGrid": [[color, ...], ...] }`), runs the
//! nesting pipeline and prints the cutting plan as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use mosaic_cut_nest::{
    analyze, ColorGrid, ColorLayout, Config, MosaicAnalysis, MosaicLayout, Planner, SheetCatalog,
    SheetSize, SplitCeiling, Strategy,
};
use mosaic_cut_plan::{generate_cutting_plan, material_cost, CuttingPlan, PlanStatistics};

#[derive(Parser)]
#[command(name = "mosaic-cut")]
#[command(about = "Turn a color mosaic into nested cutting sheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Nest a mosaic onto sheets and print the cutting plan
    Plan {
        /// Mosaic document
        file: PathBuf,

        /// Catalog index of the sheet size to use
        #[arg(short, long, default_value = "0", conflicts_with = "best")]
        sheet: usize,

        /// Try every catalog size and keep the most efficient
        #[arg(short, long)]
        best: bool,

        /// Packing strategy
        #[arg(long, value_enum, default_value = "shape")]
        strategy: StrategyArg,

        /// Disable 90° rotation
        #[arg(long)]
        no_rotation: bool,

        /// Disable nesting inside cavities
        #[arg(long)]
        no_cavities: bool,

        /// Minimum cavity size is strictly greater than this many cells
        #[arg(long, default_value = "4")]
        min_cavity: usize,

        /// Split oversized regions against the selected sheet instead of the largest catalog size
        #[arg(long)]
        fit_selected: bool,

        /// Add a material cost estimate at this price per sheet
        #[arg(long)]
        cost_per_sheet: Option<f64>,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print tile and piece counts for a mosaic
    Analyze {
        /// Mosaic document
        file: PathBuf,
    },

    /// List the sheet catalog
    Sizes,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// True-shape nesting with cavity filling
    Shape,
    /// Guillotine packing of bounding boxes
    Rect,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Shape => Strategy::ShapeNesting,
            StrategyArg::Rect => Strategy::RectanglePacking,
        }
    }
}

/// Input document.
#[derive(Deserialize)]
struct MosaicDocument {
    #[serde(rename = "tileGrid")]
    tile_grid: ColorGrid,
}

/// Output document of `plan`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanReport {
    sheet_size: SheetSize,
    strategy: String,
    statistics: PlanStatistics,
    colors: Vec<ColorLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    material_cost: Option<f64>,
    cancelled: bool,
    computation_time_ms: u64,
    cutting_plan: CuttingPlan,
}

impl PlanReport {
    fn new(layout: MosaicLayout, cost_per_sheet: Option<f64>) -> Self {
        let cutting_plan = generate_cutting_plan(&layout.sheets);
        let statistics = PlanStatistics::from_sheets(&layout.sheets);
        Self {
            material_cost: cost_per_sheet.map(|cost| material_cost(&cutting_plan, cost)),
            sheet_size: layout.sheet_size,
            strategy: layout.strategy,
            statistics,
            colors: layout.colors,
            cancelled: layout.cancelled,
            computation_time_ms: layout.computation_time_ms,
            cutting_plan,
        }
    }
}

fn read_grid(path: &Path) -> anyhow::Result<ColorGrid> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: MosaicDocument =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(doc.tile_grid)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Plan saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_analysis(analysis: &MosaicAnalysis) {
    println!("Mosaic: {}x{} ({} tiles)", analysis.width, analysis.height, analysis.total_tiles);
    println!("Colors used: {}", analysis.colors_used());
    println!(
        "Pieces: {} ({} from split regions), {} cells",
        analysis.total_pieces, analysis.cut_pieces, analysis.total_piece_area
    );
    println!("\n{:<12} {:>8} {:>8}", "Color", "Tiles", "Pieces");
    println!("{:-<30}", "");
    for tiles in &analysis.tile_counts {
        let pieces = analysis
            .piece_counts
            .iter()
            .find(|p| p.color == tiles.color)
            .map_or(0, |p| p.count);
        println!("{:<12} {:>8} {:>8}", tiles.color, tiles.count, pieces);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            file,
            sheet,
            best,
            strategy,
            no_rotation,
            no_cavities,
            min_cavity,
            fit_selected,
            cost_per_sheet,
            output,
        } => {
            let grid = read_grid(&file)?;
            let ceiling = if fit_selected {
                SplitCeiling::SelectedSheet
            } else {
                SplitCeiling::CatalogMaximum
            };
            let config = Config::new()
                .with_strategy(strategy.into())
                .with_rotation(!no_rotation)
                .with_cavity_nesting(!no_cavities)
                .with_min_cavity_cells(min_cavity)
                .with_split_ceiling(ceiling);
            let planner = Planner::new(config, SheetCatalog::default());

            let layout = if best {
                planner.best_sheet_size(&grid)?
            } else {
                planner.plan_with_index(&grid, sheet)?
            };
            if !layout.unplaced.is_empty() {
                anyhow::bail!("{} pieces were left unplaced", layout.unplaced.len());
            }
            log::info!(
                "{} sheets of {} at {:.1}% efficiency",
                layout.total_sheets(),
                layout.sheet_size.label,
                layout.efficiency
            );

            write_json(&PlanReport::new(layout, cost_per_sheet), output.as_deref())?;
        }

        Commands::Analyze { file } => {
            let grid = read_grid(&file)?;
            let planner = Planner::default();
            let pieces = planner.extract_pieces(&grid, planner.catalog().get(0)?);
            print_analysis(&analyze(&grid, &pieces));
        }

        Commands::Sizes => {
            println!("Sheet catalog:");
            for (i, size) in SheetCatalog::default().iter().enumerate() {
                println!("  [{}] {:<18} {}x{}", i, size.label, size.width, size.height);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_parsing() {
        let doc: MosaicDocument =
            serde_json::from_str(r##"{ "tileGrid": [["#f00", "#00f"], ["#f00", "#f00"]] }"##)
                .unwrap();
        assert_eq!(doc.tile_grid.width(), 2);
        assert_eq!(doc.tile_grid.get(1, 0), Some("#00f"));
    }

    #[test]
    fn test_ragged_document_is_rejected() {
        let ragged = r#"{ "tileGrid": [["a", "b"], ["a"]] }"#;
        let result = serde_json::from_str::<MosaicDocument>(ragged);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_shape() {
        let grid = ColorGrid::filled(4, 2, "red").unwrap();
        let planner = Planner::new(Config::default(), SheetCatalog::default());
        let layout = planner.plan(&grid, &SheetSize::sized(4, 2)).unwrap();
        let report = PlanReport::new(layout, Some(3.0));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sheetSize"]["width"], 4);
        assert_eq!(json["statistics"]["totalSheets"], 1);
        assert_eq!(json["materialCost"], 3.0);
        assert_eq!(json["cuttingPlan"][0]["sheetNumber"], 1);
        assert_eq!(json["cuttingPlan"][0]["pieces"][0]["position"]["x"], 0);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from(["mosaic-cut", "plan", "m.json", "--best", "--strategy", "rect"]);
        match cli.command {
            Commands::Plan { best, strategy, .. } => {
                assert!(best);
                assert_eq!(Strategy::from(strategy), Strategy::RectanglePacking);
            }
            _ => panic!("expected plan"),
        }
    }
}
