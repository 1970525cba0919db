//! gridstyle CLI - drive a sheet's style storage from the command line

mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridstyle::prelude::*;
use gridstyle::{DEFAULT_COLS, DEFAULT_ROWS};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::script::StyleSpec;

#[derive(Parser)]
#[command(name = "gridstyle")]
#[command(author, version, about = "Apply styles to a sheet and inspect the result")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone, Copy)]
struct SheetSize {
    /// Number of columns
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u32,

    /// Number of rows
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Style the whole sheet, italicise K101:U201 and show the regions
    Demo {
        #[command(flatten)]
        size: SheetSize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run a JSON style script and print the resulting regions
    Run {
        /// Script file
        script: PathBuf,

        #[command(flatten)]
        size: SheetSize,

        /// Only list regions inside this range (A1 notation)
        #[arg(short, long)]
        range: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run a JSON style script and print tile and pool statistics
    Stats {
        /// Script file
        script: PathBuf,

        #[command(flatten)]
        size: SheetSize,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Demo { size, json } => demo(size, json),
        Commands::Run {
            script,
            size,
            range,
            json,
        } => run(&script, size, range.as_deref(), json),
        Commands::Stats { script, size } => stats(&script, size),
    }
}

fn new_sheet(size: SheetSize) -> Result<SheetStyles> {
    SheetStyles::new(size.cols, size.rows)
        .with_context(|| format!("Cannot create a {}x{} sheet", size.cols, size.rows))
}

fn demo(size: SheetSize, json: bool) -> Result<()> {
    let mut sheet = new_sheet(size)?;
    let whole = sheet.extent();
    let base = Style::default_sheet_style()
        .with_font_name("Serif")
        .with_border_bottom(Border::thin());
    sheet.apply_style_to_range(&whole, base);

    let block = CellRange::from_indices(10, 100, 20, 200).intersect(&whole);
    if let Some(block) = block {
        sheet.apply_partial_style_to_range(&block, &Style::new().with_italic(true));
    }
    tracing::info!(cols = size.cols, rows = size.rows, "demo sheet built");

    print_regions(&sheet, None, json)?;
    if !json {
        println!();
        print_stats(&sheet);
    }
    Ok(())
}

fn run_script(path: &Path, size: SheetSize) -> Result<SheetStyles> {
    let ops = script::load(path)?;
    let mut sheet = new_sheet(size)?;
    let report = script::run(&mut sheet, &ops)?;
    tracing::info!(
        ops = ops.len(),
        changed_cells = report.changed_cells(),
        respan = report.respan,
        "script applied"
    );
    Ok(sheet)
}

fn run(path: &Path, size: SheetSize, range: Option<&str>, json: bool) -> Result<()> {
    let sheet = run_script(path, size)?;
    let clip = range
        .map(|text| script::sheet_range(&sheet, text))
        .transpose()?;
    print_regions(&sheet, clip.as_ref(), json)
}

fn stats(path: &Path, size: SheetSize) -> Result<()> {
    let sheet = run_script(path, size)?;
    print_stats(&sheet);
    Ok(())
}

#[derive(Serialize)]
struct RegionOut {
    range: String,
    cells: u64,
    style: StyleSpec,
}

fn print_regions(sheet: &SheetStyles, clip: Option<&CellRange>, json: bool) -> Result<()> {
    let regions = sheet.style_regions(clip);
    let default = sheet.default_style();
    let out: Vec<RegionOut> = regions
        .iter()
        .map(|region| RegionOut {
            range: region.range.to_string(),
            cells: region.range.cell_count(),
            style: StyleSpec::diff(&region.style, default),
        })
        .collect();

    if json {
        let text = serde_json::to_string_pretty(&out).context("Failed to encode regions")?;
        println!("{text}");
        return Ok(());
    }
    println!("{} regions", out.len());
    for region in &out {
        let style = if region.style.is_empty() {
            "default".to_string()
        } else {
            serde_json::to_string(&region.style).context("Failed to encode style")?
        };
        println!("  {:<16} {:>12} cells  {style}", region.range, region.cells);
    }
    Ok(())
}

fn print_stats(sheet: &SheetStyles) {
    let tiles = sheet.tile_stats();
    let pool = sheet.pool_stats();
    let stats = json!({
        "sheet": { "cols": sheet.cols(), "rows": sheet.rows(), "top_level": sheet.top_level() },
        "tiles": {
            "total": tiles.total(),
            "simple": tiles.simple,
            "col": tiles.col,
            "row": tiles.row,
            "matrix": tiles.matrix,
            "ptr_matrix": tiles.ptr_matrix,
            "depth": tiles.depth,
        },
        "pool": { "live": pool.live, "entries": pool.entries, "buckets": pool.buckets },
    });
    println!("{stats:#}");
}
