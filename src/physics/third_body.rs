use nalgebra::Vector3;

use crate::physics::gravity::R_EARTH;

// ---------------------------------------------------------------------------
// Third-body attraction (Sun/Moon) and analytic ephemerides
// ---------------------------------------------------------------------------

pub const MU_SUN: f64 = 1.327_124_28e20; // m^3/s^2
pub const MU_MOON: f64 = 4.902_799e12;   // m^3/s^2
pub const AU: f64 = 1.495_978_707e11;    // m

/// Seconds since J2000 → Julian centuries since J2000.
pub fn julian_centuries(t2000: f64) -> f64 {
    t2000 / (36_525.0 * 86_400.0)
}

/// Differential third-body acceleration on the spacecraft, inertial frame.
///
/// Uses the numerically stable Q-parameter form instead of the naive
/// difference of two nearly equal inverse-square terms.
pub fn third_body_accel(
    pos: &Vector3<f64>,
    pos_third: &Vector3<f64>,
    mu_third: f64,
) -> Vector3<f64> {
    let sat_to_third = pos_third - pos;

    let r3 = pos_third.norm();
    let d = sat_to_third.norm();
    let r = pos.norm();

    let q = ((r * r + 2.0 * pos.dot(&sat_to_third)) * (r3 * r3 + r3 * d + d * d))
        / (r3 * r3 * r3 * d * d * d * (r3 + d));

    mu_third * (q * sat_to_third - pos / (r3 * r3 * r3))
}

/// Third-body potential energy, J.
///
/// Legendre expansion of the disturbing function through degree 5 in the
/// ratio of the orbit radius to the third-body distance.
pub fn third_body_potential(pos: &Vector3<f64>, mass: f64, pos_third: &Vector3<f64>, mu_third: f64) -> f64 {
    let d = pos.norm();
    let d3 = pos_third.norm();
    let cos_t = (pos.dot(pos_third) / (d * d3)).clamp(-1.0, 1.0);
    let x = d / d3;

    let p2 = (3.0 * cos_t * cos_t - 1.0) / 2.0;
    let p3 = (5.0 * cos_t.powi(3) - 3.0 * cos_t) / 2.0;
    let p4 = (35.0 * cos_t.powi(4) - 30.0 * cos_t * cos_t + 3.0) / 8.0;
    let p5 = (63.0 * cos_t.powi(5) - 70.0 * cos_t.powi(3) + 15.0 * cos_t) / 8.0;

    let series = x * x * p2 + x.powi(3) * p3 + x.powi(4) * p4 + x.powi(5) * p5;
    -mu_third * mass * series / d3
}

/// Low-precision analytic Sun position, inertial frame of date, m.
///
/// Mean-element series good to ~0.01 AU over decades around J2000; stands in
/// for a tabulated ephemeris.
pub fn sun_position(t2000: f64) -> Vector3<f64> {
    let t = julian_centuries(t2000);

    let mean_lon = (280.460 + 36_000.771 * t).to_radians();
    let mean_anom = (357.529_109_2 + 35_999.050_34 * t).to_radians();

    let ecliptic_lon = mean_lon
        + (1.914_666_471 * mean_anom.sin() + 0.019_994_643 * (2.0 * mean_anom).sin()).to_radians();
    let r = (1.000_140_612 - 0.016_708_617 * mean_anom.cos() - 0.000_139_589 * (2.0 * mean_anom).cos()) * AU;

    let obliquity = (23.439_291 - 0.013_004_2 * t).to_radians();
    let (sl, cl) = ecliptic_lon.sin_cos();
    let (se, ce) = obliquity.sin_cos();

    Vector3::new(r * cl, r * ce * sl, r * se * sl)
}

/// Low-precision analytic Moon position, inertial frame of date, m.
///
/// Truncated lunar series (largest evection/variation terms only).
pub fn moon_position(t2000: f64) -> Vector3<f64> {
    let t = julian_centuries(t2000);
    let d = |deg: f64| deg.to_radians();

    let lon = d(218.32 + 481_267.8813 * t)
        + d(6.29) * d(134.9 + 477_198.85 * t).sin()
        - d(1.27) * d(259.2 - 413_335.38 * t).sin()
        + d(0.66) * d(235.7 + 890_534.23 * t).sin()
        + d(0.21) * d(269.9 + 954_397.70 * t).sin()
        - d(0.19) * d(357.5 + 35_999.05 * t).sin()
        - d(0.11) * d(186.6 + 966_404.05 * t).sin();

    let lat = d(5.13) * d(93.3 + 483_202.03 * t).sin()
        + d(0.28) * d(228.2 + 960_400.87 * t).sin()
        - d(0.28) * d(318.3 + 6_003.18 * t).sin()
        - d(0.17) * d(217.6 - 407_332.20 * t).sin();

    let parallax = d(0.9508)
        + d(0.0518) * d(134.9 + 477_198.85 * t).cos()
        + d(0.0095) * d(259.2 - 413_335.38 * t).cos()
        + d(0.0078) * d(235.7 + 890_534.23 * t).cos()
        + d(0.0028) * d(269.9 + 954_397.70 * t).cos();

    let r = R_EARTH / parallax.sin();
    let obliquity = d(23.439_291 - 0.013_004_2 * t);

    let (sl, cl) = lon.sin_cos();
    let (sb, cb) = lat.sin_cos();
    let (se, ce) = obliquity.sin_cos();

    Vector3::new(
        r * cb * cl,
        r * (ce * cb * sl - se * sb),
        r * (se * cb * sl + ce * sb),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_distance_is_about_one_au() {
        // Sample across a full year
        for day in (0..365).step_by(30) {
            let r = sun_position(day as f64 * 86_400.0).norm();
            assert!(
                (r / AU - 1.0).abs() < 0.02,
                "sun distance {:.4} AU on day {day}",
                r / AU
            );
        }
    }

    #[test]
    fn moon_distance_is_physical() {
        for day in (0..28).step_by(3) {
            let r = moon_position(day as f64 * 86_400.0).norm();
            assert!(
                (3.5e8..4.1e8).contains(&r),
                "moon distance {r:.3e} m on day {day}"
            );
        }
    }

    #[test]
    fn q_form_matches_naive_difference() {
        // Far enough from degeneracy the naive form is accurate too
        let pos = Vector3::new(7.0e6, 0.0, 0.0);
        let third = Vector3::new(1.0 * AU, 0.3 * AU, 0.1 * AU);
        let a = third_body_accel(&pos, &third, MU_SUN);

        let to_third = third - pos;
        let naive = MU_SUN * (to_third / to_third.norm().powi(3) - third / third.norm().powi(3));
        assert!((a - naive).norm() < 1e-6 * a.norm().max(1e-30));
    }

    #[test]
    fn third_body_accel_is_tidal() {
        // Differential acceleration at LEO is many orders below mu/d^2
        let pos = Vector3::new(7.0e6, 0.0, 0.0);
        let sun = Vector3::new(AU, 0.0, 0.0);
        let a = third_body_accel(&pos, &sun, MU_SUN);
        let direct = MU_SUN / (AU * AU);
        assert!(a.norm() < 1e-3 * direct);
    }

    #[test]
    fn potential_gradient_matches_accel() {
        let pos = Vector3::new(6.0e6, 2.0e6, 3.0e6);
        let third = Vector3::new(0.8 * AU, 0.5 * AU, 0.2 * AU);
        let m = 1.0;
        let h = 100.0;
        let mut grad = Vector3::zeros();
        for i in 0..3 {
            let mut hi = pos;
            let mut lo = pos;
            hi[i] += h;
            lo[i] -= h;
            grad[i] = (third_body_potential(&hi, m, &third, MU_SUN)
                - third_body_potential(&lo, m, &third, MU_SUN))
                / (2.0 * h);
        }
        let a = third_body_accel(&pos, &third, MU_SUN);
        // The truncated Legendre series agrees with the exact tidal
        // acceleration to the neglected-order terms
        assert!((a + grad).norm() < 1e-3 * a.norm());
    }
}
