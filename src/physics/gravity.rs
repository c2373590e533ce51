use nalgebra::{Matrix3, UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Earth gravity: Keplerian point mass, J2 aspherical terms, gradient torque
// ---------------------------------------------------------------------------

pub const MU_EARTH: f64 = 3.986_004_418e14; // m^3/s^2
pub const R_EARTH: f64 = 6_378_137.0;       // equatorial radius, m
pub const J2_EARTH: f64 = 1.082_63e-3;

/// Two-body Keplerian acceleration, inertial frame.
pub fn point_mass_accel(pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    -MU_EARTH / (r * r * r) * pos
}

/// Aspherical-field acceleration: the J2 terms *beyond* the point mass.
///
/// The Keplerian term is assembled separately by the derivative aggregator,
/// so this returns only the correction that the perturbation ledger records.
pub fn aspherical_accel(pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    let r2 = r * r;
    let z2_over_r2 = pos.z * pos.z / r2;

    let mu_over_r3 = MU_EARTH / (r2 * r);
    let j2_coeff = 1.5 * J2_EARTH * R_EARTH * R_EARTH / r2;

    let xy = mu_over_r3 * j2_coeff * (5.0 * z2_over_r2 - 1.0);
    let z = mu_over_r3 * j2_coeff * (5.0 * z2_over_r2 - 3.0);

    Vector3::new(xy * pos.x, xy * pos.y, z * pos.z)
}

/// Gravity-gradient torque, body frame.
///
/// `quat` is the body→inertial orientation; the torque is
/// `3 mu / r^5 * (p_b × I p_b)` with `p_b` the position in the body frame.
pub fn gradient_torque(
    pos: &Vector3<f64>,
    quat: &UnitQuaternion<f64>,
    inertia: &Matrix3<f64>,
) -> Vector3<f64> {
    let r = pos.norm();
    let p_body = quat.inverse() * pos;
    (3.0 * MU_EARTH / r.powi(5)) * p_body.cross(&(inertia * p_body))
}

/// Potential energy of the aspherical (J2) field terms, J.
///
/// The point-mass part `-mu m / r` is accounted separately; this matches the
/// acceleration returned by [`aspherical_accel`].
pub fn aspherical_potential(pos: &Vector3<f64>, mass: f64) -> f64 {
    let r = pos.norm();
    let sin_lat = pos.z / r;
    let re_over_r = R_EARTH / r;
    MU_EARTH * mass / r * (J2_EARTH / 2.0) * re_over_r * re_over_r
        * (3.0 * sin_lat * sin_lat - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_mass_is_central_and_inverse_square() {
        let pos = Vector3::new(R_EARTH + 400_000.0, 0.0, 0.0);
        let a = point_mass_accel(&pos);
        assert!(a.x < 0.0 && a.y == 0.0 && a.z == 0.0);
        let a2 = point_mass_accel(&(2.0 * pos));
        assert!((a2.norm() * 4.0 - a.norm()).abs() / a.norm() < 1e-12);
    }

    #[test]
    fn j2_correction_is_small_at_leo() {
        let pos = Vector3::new(R_EARTH + 400_000.0, 0.0, 0.0);
        let extra = aspherical_accel(&pos);
        let kepler = point_mass_accel(&pos);
        let ratio = extra.norm() / kepler.norm();
        assert!(ratio > 1e-4 && ratio < 1e-2, "J2/Kepler = {ratio:.2e}");
    }

    #[test]
    fn aspherical_accel_matches_potential_gradient() {
        // a = -grad(U)/m, checked by central differences off the equator
        let pos = Vector3::new(5.0e6, 2.0e6, 3.5e6);
        let m = 1.0;
        let h = 50.0;
        let mut grad = Vector3::zeros();
        for i in 0..3 {
            let mut hi = pos;
            let mut lo = pos;
            hi[i] += h;
            lo[i] -= h;
            grad[i] = (aspherical_potential(&hi, m) - aspherical_potential(&lo, m)) / (2.0 * h);
        }
        let a = aspherical_accel(&pos);
        assert!((a + grad).norm() < 1e-6 * a.norm(), "a = {a:?}, -grad = {:?}", -grad);
    }

    #[test]
    fn gradient_torque_vanishes_for_isotropic_inertia() {
        let pos = Vector3::new(6.8e6, 1.0e6, 2.0e6);
        let q = UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1);
        let torque = gradient_torque(&pos, &q, &Matrix3::identity());
        assert!(torque.norm() < 1e-12);
    }

    #[test]
    fn gradient_torque_restores_long_axis() {
        // Elongated body tilted off the local vertical feels a nonzero torque
        let pos = Vector3::new(7.0e6, 0.0, 0.0);
        let inertia = Matrix3::from_diagonal(&Vector3::new(1.0, 50.0, 50.0));
        let q = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.4);
        let torque = gradient_torque(&pos, &q, &inertia);
        assert!(torque.norm() > 0.0);
    }
}
