use std::path::PathBuf;

use clap::Parser;
use mission_planner::ephemeris::kernels::{KERNEL_CATALOG, LOCAL_KERNEL_DIR};
use mission_planner::importer::{KernelStatus, download_kernels};
use mission_planner::logging;

/// Download the ephemeris kernels used by the SPK backend.
#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch JPL ephemeris kernels")]
struct Cli {
    /// Destination directory
    #[arg(long, default_value = LOCAL_KERNEL_DIR)]
    dir: PathBuf,

    /// List the catalog without downloading
    #[arg(long, default_value_t = false)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    if cli.list {
        for kernel in KERNEL_CATALOG {
            println!("{}: {}", kernel.filename, kernel.description);
        }
        return Ok(());
    }

    for status in download_kernels(KERNEL_CATALOG, &cli.dir)? {
        match status {
            KernelStatus::Downloaded(path) => println!("downloaded {}", path.display()),
            KernelStatus::AlreadyPresent(path) => println!("present    {}", path.display()),
        }
    }
    Ok(())
}
