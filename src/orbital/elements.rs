use nalgebra::Vector3;

use crate::physics::gravity::{MU_EARTH, R_EARTH};

const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// Classical Keplerian orbital elements.
///
/// Degenerate geometry (equatorial and/or circular orbits) collapses the
/// ill-defined angles to a defined zero instead of NaN, so a round trip
/// through a state vector is always well posed.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    pub sma: f64,       // semi-major axis, m
    pub ecc: f64,       // eccentricity (0 = circular)
    pub inc: f64,       // inclination, rad
    pub raan: f64,      // right ascension of ascending node, rad
    pub argp: f64,      // argument of perigee, rad
    pub true_anom: f64, // true anomaly, rad
}

impl OrbitalElements {
    /// Circular orbit at a given altitude above the equatorial radius.
    pub fn circular(altitude: f64, inc: f64) -> Self {
        OrbitalElements {
            sma: R_EARTH + altitude,
            ecc: 0.0,
            inc,
            raan: 0.0,
            argp: 0.0,
            true_anom: 0.0,
        }
    }

    /// Convert elements to an inertial state vector (position, velocity).
    pub fn to_state_vector(&self) -> (Vector3<f64>, Vector3<f64>) {
        let p = self.sma * (1.0 - self.ecc * self.ecc); // semi-latus rectum
        let r = p / (1.0 + self.ecc * self.true_anom.cos());

        // Position and velocity in the perifocal frame.
        let r_pqw = Vector3::new(r * self.true_anom.cos(), r * self.true_anom.sin(), 0.0);
        let sqrt_mu_p = (MU_EARTH / p).sqrt();
        let v_pqw = Vector3::new(
            -sqrt_mu_p * self.true_anom.sin(),
            sqrt_mu_p * (self.ecc + self.true_anom.cos()),
            0.0,
        );

        // Perifocal → inertial rotation (3-1-3 by raan, inc, argp).
        let (sr, cr) = self.raan.sin_cos();
        let (sw, cw) = self.argp.sin_cos();
        let (si, ci) = self.inc.sin_cos();
        let rotate = |v: &Vector3<f64>| {
            Vector3::new(
                (cr * cw - sr * sw * ci) * v.x + (-cr * sw - sr * cw * ci) * v.y,
                (sr * cw + cr * sw * ci) * v.x + (-sr * sw + cr * cw * ci) * v.y,
                (sw * si) * v.x + (cw * si) * v.y,
            )
        };

        (rotate(&r_pqw), rotate(&v_pqw))
    }

    /// Convert an inertial state vector to elements.
    pub fn from_state_vector(pos: &Vector3<f64>, vel: &Vector3<f64>) -> Self {
        const EPS: f64 = 1e-10;

        let r = pos.norm();
        let v = vel.norm();
        let radial_rate = pos.dot(vel) / r;

        // Specific angular momentum and node vector.
        let h_vec = pos.cross(vel);
        let h = h_vec.norm();
        let node = Vector3::new(-h_vec.y, h_vec.x, 0.0);
        let n = node.norm();

        let inc = (h_vec.z / h).clamp(-1.0, 1.0).acos();

        // Near-zero node line (equatorial orbit): RAAN defined as zero.
        let raan = if n > EPS {
            let a = (node.x / n).clamp(-1.0, 1.0).acos();
            if node.y < 0.0 {
                TWO_PI - a
            } else {
                a
            }
        } else {
            0.0
        };

        let e_vec = ((v * v - MU_EARTH / r) * pos - (r * radial_rate) * vel) / MU_EARTH;
        let ecc = e_vec.norm();

        // Circular and/or equatorial: argument of perigee defined as zero.
        let argp = if n > EPS && ecc > EPS {
            let a = (node.dot(&e_vec) / (n * ecc)).clamp(-1.0, 1.0).acos();
            if e_vec.z < 0.0 {
                TWO_PI - a
            } else {
                a
            }
        } else {
            0.0
        };

        // Circular orbit: measure the anomaly from the node line instead.
        let true_anom = if ecc > EPS {
            let a = (e_vec.dot(pos) / (ecc * r)).clamp(-1.0, 1.0).acos();
            if radial_rate < 0.0 {
                TWO_PI - a
            } else {
                a
            }
        } else if n > EPS {
            let a = (node.dot(pos) / (n * r)).clamp(-1.0, 1.0).acos();
            if node.cross(pos).z >= 0.0 {
                a
            } else {
                TWO_PI - a
            }
        } else {
            0.0
        };

        let sma = h * h / MU_EARTH / (1.0 - ecc * ecc);

        OrbitalElements {
            sma,
            ecc,
            inc,
            raan,
            argp,
            true_anom,
        }
    }

    /// Specific angular momentum magnitude, m^2/s.
    pub fn angular_momentum(&self) -> f64 {
        (MU_EARTH * self.sma * (1.0 - self.ecc * self.ecc)).sqrt()
    }

    /// Orbital period, s.
    pub fn period(&self) -> f64 {
        TWO_PI * (self.sma.powi(3) / MU_EARTH).sqrt()
    }

    /// Mean motion, rad/s.
    pub fn mean_motion(&self) -> f64 {
        TWO_PI / self.period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_leo_roundtrip() {
        let orbit = OrbitalElements::circular(400_000.0, 51.6_f64.to_radians());
        let (pos, vel) = orbit.to_state_vector();

        let recovered = OrbitalElements::from_state_vector(&pos, &vel);
        assert!((recovered.sma - orbit.sma).abs() < 1.0, "SMA mismatch");
        assert!(recovered.ecc < 1e-6, "should be nearly circular");
        assert!((recovered.inc - orbit.inc).abs() < 1e-6, "inclination mismatch");
    }

    #[test]
    fn roundtrip_is_idempotent() {
        // elements → state → elements → state must be stable to fp tolerance
        let orbit = OrbitalElements {
            sma: 7_000_000.0,
            ecc: 0.01,
            inc: 0.9,
            raan: 1.2,
            argp: 0.7,
            true_anom: 2.3,
        };
        let (p1, v1) = orbit.to_state_vector();
        let again = OrbitalElements::from_state_vector(&p1, &v1);
        let (p2, v2) = again.to_state_vector();
        assert!((p1 - p2).norm() < 1e-4 * p1.norm());
        assert!((v1 - v2).norm() < 1e-4 * v1.norm());
    }

    #[test]
    fn equatorial_circular_collapses_to_zero_angles() {
        let orbit = OrbitalElements::circular(500_000.0, 0.0);
        let (pos, vel) = orbit.to_state_vector();
        let e = OrbitalElements::from_state_vector(&pos, &vel);
        assert_eq!(e.raan, 0.0);
        assert_eq!(e.argp, 0.0);
        assert!(e.raan.is_finite() && e.argp.is_finite() && e.true_anom.is_finite());
    }

    #[test]
    fn circular_orbit_speed() {
        let alt = 400_000.0;
        let orbit = OrbitalElements::circular(alt, 0.0);
        let (_, vel) = orbit.to_state_vector();
        let expected = (MU_EARTH / (R_EARTH + alt)).sqrt();
        assert!((vel.norm() - expected).abs() < 1.0);
    }

    #[test]
    fn leo_period() {
        let orbit = OrbitalElements::circular(400_000.0, 0.0);
        let period = orbit.period();
        // ISS period ~92 min
        assert!(period > 5400.0 && period < 5700.0);
        assert!((orbit.mean_motion() * period - TWO_PI).abs() < 1e-12);
    }
}
