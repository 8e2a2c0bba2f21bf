//! inspect — load a MODFLOW-88 model and report what was decoded.
//!
//! ```text
//! inspect <script.nam> [--strict] [--csv boundaries.csv] [--xul X --yul Y] [--rotation DEG]
//! ```
//!
//! Set `RUST_LOG=debug` to follow the dispatcher slot by slot.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;
use env_logger::Env;

use mf_core::{CoordinateInfo, PackageKind};
use mf_model::{Model, ModelLoader};
use mf_packages::{BoundaryList, CellRecord};

// ── Arguments ─────────────────────────────────────────────────────────────────

/// Load a MODFLOW-88 model from its script file and summarise it.
#[derive(Parser)]
#[command(name = "inspect", version, about, long_about = None)]
struct Args {
    /// Script (name) file listing the model's packages by unit
    script: PathBuf,

    /// Abort on the first package error instead of recording a diagnostic
    #[arg(long)]
    strict: bool,

    /// Write every WEL/DRN/RIV/GHB record to this CSV file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Upper-left x coordinate of the grid
    #[arg(long, allow_hyphen_values = true)]
    xul: Option<f64>,

    /// Upper-left y coordinate of the grid
    #[arg(long, allow_hyphen_values = true)]
    yul: Option<f64>,

    /// Counter-clockwise grid rotation in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,
}

// ── Boundary export ───────────────────────────────────────────────────────────

fn write_list<R: CellRecord>(
    out:  &mut Writer<File>,
    kind: PackageKind,
    list: &BoundaryList<R>,
) -> Result<usize> {
    let mut rows = 0;
    for (period, records) in list.periods.iter().enumerate() {
        for r in records {
            let cell = r.cell();
            let mut row = vec![
                kind.keyword().to_owned(),
                (period + 1).to_string(),
                (cell.layer + 1).to_string(),
                (cell.row + 1).to_string(),
                (cell.col + 1).to_string(),
            ];
            let values = r.values();
            row.extend((0..3).map(|i| values.get(i).map(f64::to_string).unwrap_or_default()));
            out.write_record(&row)?;
            rows += 1;
        }
    }
    Ok(rows)
}

fn export_boundaries(model: &Model, path: &Path) -> Result<usize> {
    let mut out = Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    out.write_record(["package", "period", "layer", "row", "column", "value1", "value2", "value3"])?;

    let mut rows = 0;
    if let Some(p) = model.wel() {
        rows += write_list(&mut out, PackageKind::Well, p)?;
    }
    if let Some(p) = model.drn() {
        rows += write_list(&mut out, PackageKind::Drain, p)?;
    }
    if let Some(p) = model.riv() {
        rows += write_list(&mut out, PackageKind::River, p)?;
    }
    if let Some(p) = model.ghb() {
        rows += write_list(&mut out, PackageKind::GeneralHeadBoundary, p)?;
    }
    out.flush()?;
    Ok(rows)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let coord = CoordinateInfo { xul: args.xul, yul: args.yul, ..CoordinateInfo::default() }
        .with_rotation(args.rotation);
    let model = ModelLoader::new(&args.script)
        .forgiving(!args.strict)
        .coordinate_info(coord)
        .load()
        .with_context(|| format!("loading {}", args.script.display()))?;

    println!("{model}");
    for line in &model.basic().heading {
        println!("  {line}");
    }
    println!(
        "Time: {} step(s), {} {} total",
        model.time().total_steps(),
        model.time().total_time(),
        model.time().time_unit
    );
    println!("Active cells: {} of {}", model.basic().active_cells(), model.shape().ncells());

    println!("Packages:");
    for kind in model.package_kinds() {
        println!("  {}", kind.keyword());
    }
    for (kind, list_len) in [
        (PackageKind::Well, model.wel().map(BoundaryList::peak_records)),
        (PackageKind::Drain, model.drn().map(BoundaryList::peak_records)),
        (PackageKind::River, model.riv().map(BoundaryList::peak_records)),
        (PackageKind::GeneralHeadBoundary, model.ghb().map(BoundaryList::peak_records)),
    ] {
        if let Some(n) = list_len {
            println!("  {} peak records per period: {n}", kind.keyword());
        }
    }
    if let Some(hclose) = model.solver_closure() {
        println!("Solver closure: {hclose}");
    }

    let grid = model.grid();
    let (xmin, xmax, ymin, ymax) = grid.extents();
    println!("Grid lower-left: {:?}, extents x [{xmin}, {xmax}] y [{ymin}, {ymax}]", grid.lower_left());

    if !model.diagnostics().is_empty() {
        println!("Diagnostics:");
        for d in model.diagnostics() {
            println!("  {d}");
        }
    }

    if let Some(path) = &args.csv {
        let rows = export_boundaries(&model, path)?;
        println!("Wrote {rows} boundary record(s) to {}", path.display());
    }
    Ok(())
}
