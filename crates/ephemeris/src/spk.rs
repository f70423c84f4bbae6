//! JPL SPK kernels (such as `de440s.bsp`) read through the CSPICE toolkit.
//!
//! CSPICE keeps one process-wide kernel pool and is not thread-safe, so every toolkit
//! call happens while holding [`KERNEL_POOL`].

use std::collections::BTreeSet;
use std::ffi::{CStr, CString, c_char};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, dafbfs_c, dafcls_c, daffna_c, dafgs_c, dafopr_c,
    dafus_c, erract_c, failed_c, furnsh_c, getmsg_c, reset_c, spkezr_c,
};
use planner_core::constants::J2000_JD;
use planner_core::time::seconds_to_days;
use planner_core::{Body, Epoch};
use tracing::{debug, info};

use crate::{Coverage, Ephemeris, EphemerisError, StateVector};

const SUN: i32 = 10;
const SPK_ND: SpiceInt = 2;
const SPK_NI: SpiceInt = 6;
/// Earth mean equator and equinox of J2000, the native frame of the DE kernels.
const FRAME: &CStr = c"J2000";
const NO_ABERRATION: &CStr = c"NONE";

/// Kernel files already furnished into the CSPICE pool.
static KERNEL_POOL: Mutex<BTreeSet<PathBuf>> = Mutex::new(BTreeSet::new());

/// Center that returned states are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Origin {
    /// Solar-system barycenter, as the kernels store them.
    #[default]
    SolarSystemBarycenter,
    /// Center of the Sun.
    Sun,
}

impl Origin {
    fn observer(self) -> &'static CStr {
        match self {
            Origin::SolarSystemBarycenter => c"SOLAR SYSTEM BARYCENTER",
            Origin::Sun => c"SUN",
        }
    }
}

/// Time span of one SPK segment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SegmentSpan {
    target: i32,
    start_et: f64,
    end_et: f64,
}

/// Planetary ephemeris backed by an SPK kernel.
#[derive(Debug, Clone)]
pub struct SpkEphemeris {
    origin: Origin,
    spans: Vec<SegmentSpan>,
}

impl SpkEphemeris {
    /// Index the kernel's segments and furnish it into the CSPICE pool.
    ///
    /// States are barycentric until [`SpkEphemeris::with_origin`] says otherwise.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EphemerisError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EphemerisError::MissingKernel {
                path: path.to_path_buf(),
            });
        }
        let c_path = path_to_cstring(path)?;
        let malformed = |reason: String| EphemerisError::MalformedKernel {
            path: path.to_path_buf(),
            reason,
        };

        let mut pool = kernel_pool();
        configure_error_handling();
        let spans = segment_spans(&c_path).map_err(malformed)?;
        if !pool.contains(path) {
            unsafe {
                furnsh_c(c_path.as_ptr() as *mut c_char);
            }
            check_for_spice_error().map_err(malformed)?;
            pool.insert(path.to_path_buf());
        }
        drop(pool);

        info!(path = %path.display(), segments = spans.len(), "loaded SPK kernel");
        Ok(Self {
            origin: Origin::default(),
            spans,
        })
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Span covered by the body's segments, intersected with the Sun's for heliocentric states.
    pub fn coverage(&self, body: Body) -> Result<Coverage, EphemerisError> {
        let (mut first, mut last) = extent(&self.spans, body.naif_barycenter_id())
            .ok_or(EphemerisError::MissingSegment { body })?;
        if self.origin == Origin::Sun {
            let (sun_first, sun_last) =
                extent(&self.spans, SUN).ok_or(EphemerisError::MissingSun)?;
            first = first.max(sun_first);
            last = last.min(sun_last);
        }
        Ok(Coverage {
            first: epoch_from_et(first),
            last: epoch_from_et(last),
        })
    }
}

impl Ephemeris for SpkEphemeris {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        let coverage = self.coverage(body)?;
        coverage.check(body, epochs)?;

        let target = target_name(body);
        let observer = self.origin.observer();
        let _pool = kernel_pool();
        epochs
            .iter()
            .map(|&epoch| {
                let mut state: [SpiceDouble; 6] = [0.0; 6];
                let mut light_time: SpiceDouble = 0.0;
                unsafe {
                    spkezr_c(
                        target.as_ptr() as *mut c_char,
                        epoch.seconds_since_j2000(),
                        FRAME.as_ptr() as *mut c_char,
                        NO_ABERRATION.as_ptr() as *mut c_char,
                        observer.as_ptr() as *mut c_char,
                        state.as_mut_ptr(),
                        &mut light_time,
                    );
                }
                check_for_spice_error().map_err(|message| {
                    // Gaps inside the overall span surface as insufficient data.
                    if message.contains("SPKINSUFFDATA") {
                        coverage.out_of_range(body, epoch)
                    } else {
                        EphemerisError::Spice { message }
                    }
                })?;
                Ok(StateVector {
                    position_km: [state[0], state[1], state[2]],
                    velocity_km_s: [state[3], state[4], state[5]],
                })
            })
            .collect()
    }
}

/// Barycenter targets keep Earth and the outer planets consistent with each other.
fn target_name(body: Body) -> &'static CStr {
    match body {
        Body::Mercury => c"MERCURY BARYCENTER",
        Body::Venus => c"VENUS BARYCENTER",
        Body::Earth => c"EARTH BARYCENTER",
        Body::Mars => c"MARS BARYCENTER",
        Body::Jupiter => c"JUPITER BARYCENTER",
        Body::Saturn => c"SATURN BARYCENTER",
        Body::Uranus => c"URANUS BARYCENTER",
        Body::Neptune => c"NEPTUNE BARYCENTER",
        Body::Pluto => c"PLUTO BARYCENTER",
    }
}

fn kernel_pool() -> MutexGuard<'static, BTreeSet<PathBuf>> {
    KERNEL_POOL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn path_to_cstring(path: &Path) -> Result<CString, EphemerisError> {
    path.to_str()
        .and_then(|text| CString::new(text).ok())
        .ok_or_else(|| EphemerisError::InvalidKernelPath {
            path: path.to_path_buf(),
        })
}

/// Walk the DAF summaries of an SPK file. Caller holds the pool lock.
fn segment_spans(path: &CStr) -> Result<Vec<SegmentSpan>, String> {
    let mut handle: SpiceInt = 0;
    unsafe {
        dafopr_c(path.as_ptr() as *mut c_char, &mut handle);
    }
    check_for_spice_error()?;

    let spans = read_summaries(handle);
    unsafe {
        dafcls_c(handle);
    }
    let closed = check_for_spice_error();
    let spans = spans?;
    closed?;
    Ok(spans)
}

fn read_summaries(handle: SpiceInt) -> Result<Vec<SegmentSpan>, String> {
    let mut spans = Vec::new();
    let mut found: SpiceBoolean = 0;
    unsafe {
        dafbfs_c(handle);
        daffna_c(&mut found);
    }
    check_for_spice_error()?;

    while found != 0 {
        // ND doubles followed by NI integers packed two per double.
        let mut summary: [SpiceDouble; 5] = [0.0; 5];
        let mut doubles: [SpiceDouble; 2] = [0.0; 2];
        let mut integers: [SpiceInt; 6] = [0; 6];
        unsafe {
            dafgs_c(summary.as_mut_ptr());
            dafus_c(
                summary.as_mut_ptr(),
                SPK_ND,
                SPK_NI,
                doubles.as_mut_ptr(),
                integers.as_mut_ptr(),
            );
            daffna_c(&mut found);
        }
        check_for_spice_error()?;
        debug!(
            target = integers[0],
            center = integers[1],
            data_type = integers[3],
            "indexed SPK segment"
        );
        spans.push(SegmentSpan {
            target: integers[0] as i32,
            start_et: doubles[0],
            end_et: doubles[1],
        });
    }
    Ok(spans)
}

fn configure_error_handling() {
    unsafe {
        erract_c(
            c"SET".as_ptr() as *mut c_char,
            0 as SpiceInt,
            c"RETURN".as_ptr() as *mut c_char,
        );
    }
}

fn check_for_spice_error() -> Result<(), String> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            let mut buffer = vec![0 as c_char; 1024];
            getmsg_c(
                c"LONG".as_ptr() as *mut c_char,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
            reset_c();
            let message = CStr::from_ptr(buffer.as_ptr())
                .to_string_lossy()
                .trim()
                .to_string();
            return Err(message);
        }
    }
    Ok(())
}

fn extent(spans: &[SegmentSpan], target: i32) -> Option<(f64, f64)> {
    spans
        .iter()
        .filter(|span| span.target == target)
        .fold(None, |acc, span| match acc {
            None => Some((span.start_et, span.end_et)),
            Some((first, last)) => Some((first.min(span.start_et), last.max(span.end_et))),
        })
}

fn epoch_from_et(et: f64) -> Epoch {
    Epoch::from_julian_date(J2000_JD + seconds_to_days(et))
}
