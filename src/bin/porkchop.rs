use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mission_planner::config::{PlannerConfig, load_raw_config};
use mission_planner::export::{grid, series};
use mission_planner::plot::render_png;
use mission_planner::{Planner, logging, open_ephemeris};

/// Compute porkchop transfer grids between two bodies and export them.
#[derive(Parser, Debug)]
#[command(author, version, about = "Porkchop plot generator (short and long Lambert paths)")]
struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long)]
    config: PathBuf,

    /// Departure body, overriding the configuration
    #[arg(long)]
    from: Option<String>,

    /// Arrival body, overriding the configuration
    #[arg(long)]
    to: Option<String>,

    /// First departure date (YYYY-MM-DD)
    #[arg(long)]
    depart_start: Option<String>,

    /// Last departure date (YYYY-MM-DD)
    #[arg(long)]
    depart_end: Option<String>,

    /// First arrival date (YYYY-MM-DD)
    #[arg(long)]
    arrive_start: Option<String>,

    /// Last arrival date (YYYY-MM-DD)
    #[arg(long)]
    arrive_end: Option<String>,

    /// Date step in days for both windows
    #[arg(long)]
    increment: Option<i64>,

    /// Per-cell CSV output (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Contour series JSON output (use '-' for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// PNG chart output
    #[arg(long)]
    png: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut raw = load_raw_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let transfer = &mut raw.transfer;
    override_with(&mut transfer.departure_body, cli.from);
    override_with(&mut transfer.arrival_body, cli.to);
    override_with(&mut transfer.departure_window.start, cli.depart_start);
    override_with(&mut transfer.departure_window.end, cli.depart_end);
    override_with(&mut transfer.arrival_window.start, cli.arrive_start);
    override_with(&mut transfer.arrival_window.end, cli.arrive_end);
    override_with(&mut transfer.increment_days, cli.increment);
    let config = PlannerConfig::from_raw(raw)?;

    let ephemeris = open_ephemeris(&config.ephemeris)?;
    let planner = Planner::with_ephemeris(ephemeris);
    let Some(porkchop) = planner.run(&config)? else {
        return Ok(());
    };

    let (rows, cols) = porkchop.grid.shape();
    eprintln!("{}", porkchop.title);
    eprintln!("grid: {cols} departures x {rows} arrivals");
    match porkchop.assembly.best_delta_v() {
        Some(best) => eprintln!(
            "minimum short-path delta-V {:.3} km/s departing {} arriving {}",
            best.value, best.departure, best.arrival
        ),
        None => eprintln!("no short-path delta-V solution shown"),
    }
    for notice in &porkchop.assembly.notices {
        eprintln!("note: {notice}");
    }

    if let Some(path) = &cli.csv {
        grid::write_csv_to_path(&porkchop.grid, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.json {
        series::write_json_to_path(&porkchop.title, &porkchop.assembly, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.png {
        let size = config.plot_size;
        render_png(&porkchop.assembly, &porkchop.title, path, size.width, size.height)
            .with_context(|| format!("rendering {}", path.display()))?;
    }
    Ok(())
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
