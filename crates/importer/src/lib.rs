//! Ephemeris kernel import utilities.

use std::fs::{self, File};
use std::io::copy;
use std::path::{Path, PathBuf};

use planner_ephemeris::kernels::KernelDescriptor;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of attempting to download a kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelStatus {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
}

impl KernelStatus {
    pub fn path(&self) -> &Path {
        match self {
            KernelStatus::Downloaded(path) | KernelStatus::AlreadyPresent(path) => path,
        }
    }
}

/// Download every listed kernel into `dir`, skipping files that already exist.
pub fn download_kernels(
    descriptors: &[KernelDescriptor],
    dir: &Path,
) -> Result<Vec<KernelStatus>, ImportError> {
    fs::create_dir_all(dir)?;
    let client = Client::builder().build()?;
    let mut statuses = Vec::new();

    for descriptor in descriptors {
        let dest = dir.join(descriptor.filename);
        if dest.exists() {
            info!(kernel = descriptor.filename, "kernel already present");
            statuses.push(KernelStatus::AlreadyPresent(dest));
            continue;
        }
        info!(kernel = descriptor.filename, url = descriptor.url, "downloading kernel");
        download_kernel(&client, descriptor, &dest)?;
        statuses.push(KernelStatus::Downloaded(dest));
    }

    Ok(statuses)
}

/// Streams into a `.part` file and renames on success so an interrupted download
/// never looks complete.
fn download_kernel(
    client: &Client,
    descriptor: &KernelDescriptor,
    dest: &Path,
) -> Result<(), ImportError> {
    let partial = dest.with_extension("part");
    let mut response = client.get(descriptor.url).send()?.error_for_status()?;
    let mut file = File::create(&partial)?;
    copy(&mut response, &mut file)?;
    file.sync_all()?;
    fs::rename(&partial, dest)?;
    Ok(())
}
