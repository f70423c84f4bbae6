use std::path::{Path, PathBuf};

/// Location where the planner expects downloaded kernels to live.
pub const LOCAL_KERNEL_DIR: &str = "data/spice";

/// Metadata describing a kernel we know how to fetch and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelDescriptor {
    pub filename: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

impl KernelDescriptor {
    /// Returns the on-disk path where the kernel should reside.
    pub fn local_path(self) -> PathBuf {
        Path::new(LOCAL_KERNEL_DIR).join(self.filename)
    }
}

/// Planetary ephemeris read by [`crate::SpkEphemeris`].
pub const DE440S: KernelDescriptor = KernelDescriptor {
    filename: "de440s.bsp",
    url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de440s.bsp",
    description: "JPL DE440 short ephemeris: barycentric positions/velocities for Sun, planets, and Pluto (1550–2650).",
};

/// Kernels downloaded by `fetch_kernels`.
pub const KERNEL_CATALOG: &[KernelDescriptor] = &[DE440S];
