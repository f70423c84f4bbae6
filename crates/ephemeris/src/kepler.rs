//! Analytic planetary ephemeris from JPL mean Keplerian elements.
//!
//! Elements and their per-century rates are the "approximate positions of the
//! planets" set (Standish), referenced to the J2000 ecliptic and valid 1800–2050.
//! Positions are good to a few thousandths of an AU for the inner planets, which is
//! ample for porkchop surveys.

use std::f64::consts::TAU;

use planner_core::constants::{AU_KM, MU_SUN_KM3_S2};
use planner_core::vector::Vector3;
use planner_core::{Body, Epoch};

use crate::{Coverage, Ephemeris, EphemerisError, StateVector};

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 50;

/// a (AU), e, I (deg), L (deg), longitude of perihelion (deg), longitude of node (deg).
type Elements = [f64; 6];

struct MeanElements {
    body: Body,
    at_j2000: Elements,
    per_century: Elements,
}

#[rustfmt::skip]
const MEAN_ELEMENTS: [MeanElements; 9] = [
    MeanElements {
        body: Body::Mercury,
        at_j2000: [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
        per_century: [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
    },
    MeanElements {
        body: Body::Venus,
        at_j2000: [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
        per_century: [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
    },
    MeanElements {
        body: Body::Earth,
        at_j2000: [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
        per_century: [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
    },
    MeanElements {
        body: Body::Mars,
        at_j2000: [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
        per_century: [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
    },
    MeanElements {
        body: Body::Jupiter,
        at_j2000: [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
        per_century: [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
    },
    MeanElements {
        body: Body::Saturn,
        at_j2000: [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
        per_century: [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
    },
    MeanElements {
        body: Body::Uranus,
        at_j2000: [19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03],
        per_century: [-0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89],
    },
    MeanElements {
        body: Body::Neptune,
        at_j2000: [30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74],
        per_century: [0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64],
    },
    MeanElements {
        body: Body::Pluto,
        at_j2000: [39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84],
        per_century: [-0.000_315_96, 0.000_051_70, 0.000_048_18, 145.207_805_15, -0.040_629_42, -0.011_834_82],
    },
];

/// Two-body propagation of mean elements around the Sun.
#[derive(Debug, Clone, Copy)]
pub struct KeplerianEphemeris {
    mu_km3_s2: f64,
}

impl Default for KeplerianEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl KeplerianEphemeris {
    /// 1800-01-01 through 2050-12-31.
    pub const COVERAGE: Coverage = Coverage {
        first: Epoch::from_julian_date(2_378_496.5),
        last: Epoch::from_julian_date(2_470_171.5),
    };

    pub fn new() -> Self {
        Self {
            mu_km3_s2: MU_SUN_KM3_S2,
        }
    }

    /// Heliocentric ecliptic state at one epoch, without a coverage check.
    pub fn state(&self, body: Body, epoch: Epoch) -> StateVector {
        let elements = mean_elements(body);
        let t = epoch.centuries_since_j2000();
        let current: Elements =
            std::array::from_fn(|k| elements.at_j2000[k] + elements.per_century[k] * t);
        let [a_au, e, incl_deg, mean_long_deg, peri_long_deg, node_deg] = current;

        let a = a_au * AU_KM;
        let incl = incl_deg.to_radians();
        let node = node_deg.to_radians();
        let arg_peri = (peri_long_deg - node_deg).to_radians();
        let mean_anomaly = wrap_pi((mean_long_deg - peri_long_deg).to_radians());

        let ecc_anomaly = solve_kepler(mean_anomaly, e);
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let semi_minor_ratio = (1.0 - e * e).sqrt();

        let x_orb = a * (cos_e - e);
        let y_orb = a * semi_minor_ratio * sin_e;

        let mean_motion = (self.mu_km3_s2 / (a * a * a)).sqrt();
        let ecc_rate = mean_motion / (1.0 - e * cos_e);
        let vx_orb = -a * sin_e * ecc_rate;
        let vy_orb = a * semi_minor_ratio * cos_e * ecc_rate;

        let rotate = orbital_to_ecliptic(arg_peri, node, incl);
        StateVector {
            position_km: rotate(x_orb, y_orb),
            velocity_km_s: rotate(vx_orb, vy_orb),
        }
    }
}

impl Ephemeris for KeplerianEphemeris {
    fn states(&self, body: Body, epochs: &[Epoch]) -> Result<Vec<StateVector>, EphemerisError> {
        Self::COVERAGE.check(body, epochs)?;
        Ok(epochs.iter().map(|&epoch| self.state(body, epoch)).collect())
    }
}

fn mean_elements(body: Body) -> &'static MeanElements {
    // Table order follows the NAIF barycenter ids.
    &MEAN_ELEMENTS[(body.naif_barycenter_id() - 1) as usize]
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Newton iteration on `E - e sin E = M`.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ecc
}

/// Perifocal (x, y) to J2000 ecliptic via the classical 3-1-3 rotation.
fn orbital_to_ecliptic(arg_peri: f64, node: f64, incl: f64) -> impl Fn(f64, f64) -> Vector3 {
    let (sin_w, cos_w) = arg_peri.sin_cos();
    let (sin_o, cos_o) = node.sin_cos();
    let (sin_i, cos_i) = incl.sin_cos();
    move |x, y| {
        [
            (cos_w * cos_o - sin_w * sin_o * cos_i) * x + (-sin_w * cos_o - cos_w * sin_o * cos_i) * y,
            (cos_w * sin_o + sin_w * cos_o * cos_i) * x + (-sin_w * sin_o + cos_w * cos_o * cos_i) * y,
            (sin_w * sin_i) * x + (cos_w * sin_i) * y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_follows_body_order() {
        for (entry, body) in MEAN_ELEMENTS.iter().zip(Body::ALL) {
            assert_eq!(entry.body, body);
        }
    }

    #[test]
    fn kepler_solution_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.0167), (2.9, 0.2488), (-1.2, 0.0934)] {
            let ecc = solve_kepler(m, e);
            assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
        }
    }
}
