use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::physics::gravity::R_EARTH;

// ---------------------------------------------------------------------------
// Eddy-current torque in the geomagnetic field
// ---------------------------------------------------------------------------

/// Mean dipole field strength at the equatorial surface, T.
pub const B0_DIPOLE: f64 = 3.12e-5;

/// Geomagnetic dipole field at `pos`, inertial frame, T.
///
/// Axial dipole aligned with the rotation axis; adequate for the torque
/// magnitude, which is quadratic in B.
pub fn dipole_field(pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    let r_hat = pos / r;
    let m_hat = Vector3::z();
    B0_DIPOLE * (R_EARTH / r).powi(3) * (3.0 * m_hat.dot(&r_hat) * r_hat - m_hat)
}

/// Rate of change of the dipole field along the orbit, inertial frame, T/s.
///
/// Central difference over the motion during `dt` seconds; the convective
/// term dominates the secular field variation by many orders.
pub fn field_rate(pos: &Vector3<f64>, vel: &Vector3<f64>, dt: f64) -> Vector3<f64> {
    let ahead = dipole_field(&(pos + vel * (0.5 * dt)));
    let behind = dipole_field(&(pos - vel * (0.5 * dt)));
    (ahead - behind) / dt
}

/// Eddy-current torque, body frame.
///
/// `g = (M (ω × B_b − Ḃ_b)) × B_b` with `M` the magnetic tensor of the hull
/// and both field vectors expressed in the body frame.
pub fn torque(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    omega: &Vector3<f64>,
    quat: &UnitQuaternion<f64>,
    magnetic_tensor: &Matrix3<f64>,
    dt: f64,
) -> Vector3<f64> {
    let b_body = quat.inverse() * dipole_field(pos);
    let b_dot_body = quat.inverse() * field_rate(pos, vel, dt);

    let emf = omega.cross(&b_body) - b_dot_body;
    (magnetic_tensor * emf).cross(&b_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::MU_EARTH;

    #[test]
    fn equatorial_field_points_south() {
        let b = dipole_field(&Vector3::new(R_EARTH, 0.0, 0.0));
        assert!(b.z < 0.0 && b.x.abs() < 1e-20);
        assert!((b.norm() - B0_DIPOLE).abs() < 1e-9);
    }

    #[test]
    fn polar_field_is_twice_equatorial() {
        let eq = dipole_field(&Vector3::new(R_EARTH, 0.0, 0.0)).norm();
        let pole = dipole_field(&Vector3::new(0.0, 0.0, R_EARTH)).norm();
        assert!((pole / eq - 2.0).abs() < 1e-9);
    }

    #[test]
    fn torque_damps_spin() {
        // Conductive shell spinning fast in a static field loses spin energy
        let pos = Vector3::new(R_EARTH + 500_000.0, 0.0, 0.0);
        let vel = Vector3::new(0.0, (MU_EARTH / pos.norm()).sqrt(), 0.0);
        let omega = Vector3::new(0.0, 1.0, 0.0);
        let m = Matrix3::from_diagonal_element(5.0e3);
        let g = torque(&pos, &vel, &omega, &UnitQuaternion::identity(), &m, 1.0);
        assert!(g.dot(&omega) < 0.0, "eddy torque should damp: {g:?}");
    }

    #[test]
    fn torque_vanishes_without_relative_field_motion() {
        let pos = Vector3::new(R_EARTH + 500_000.0, 0.0, 0.0);
        let m = Matrix3::from_diagonal_element(5.0e3);
        let g = torque(
            &pos,
            &Vector3::zeros(),
            &Vector3::zeros(),
            &UnitQuaternion::identity(),
            &m,
            1.0,
        );
        assert!(g.norm() < 1e-25);
    }
}
