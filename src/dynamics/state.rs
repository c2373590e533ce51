use nalgebra::{Quaternion, UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Coupled orbit-attitude state and its time derivative
// ---------------------------------------------------------------------------

/// Full rigid-body state: translational pair in the inertial frame, angular
/// velocity in the body frame, orientation as the body→inertial rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub vel: Vector3<f64>,
    pub pos: Vector3<f64>,
    pub omega: Vector3<f64>,
    pub quat: UnitQuaternion<f64>,
}

/// Internal damper sub-state: its own angular velocity (damper frame) and
/// orientation (damper→inertial).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamperState {
    pub omega: Vector3<f64>,
    pub quat: UnitQuaternion<f64>,
}

impl DamperState {
    /// Damper released at rest relative to the primary body.
    pub fn locked_to(state: &State) -> Self {
        Self {
            omega: state.omega,
            quat: state.quat,
        }
    }
}

/// Time derivative of [`State`]. The quaternion slot is the raw (non-unit)
/// derivative; renormalization happens when the step is applied.
#[derive(Debug, Clone, Copy)]
pub struct Deriv {
    pub dvel: Vector3<f64>,
    pub dpos: Vector3<f64>,
    pub domega: Vector3<f64>,
    pub dquat: Quaternion<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct DamperDeriv {
    pub domega: Vector3<f64>,
    pub dquat: Quaternion<f64>,
}

impl Deriv {
    pub fn zeros() -> Self {
        Self {
            dvel: Vector3::zeros(),
            dpos: Vector3::zeros(),
            domega: Vector3::zeros(),
            dquat: Quaternion::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// `self += w * other`, the building block of tableau stage sums.
    pub fn scaled_add(&mut self, w: f64, other: &Deriv) {
        self.dvel += w * other.dvel;
        self.dpos += w * other.dpos;
        self.domega += w * other.domega;
        self.dquat += w * other.dquat;
    }
}

impl DamperDeriv {
    pub fn zeros() -> Self {
        Self {
            domega: Vector3::zeros(),
            dquat: Quaternion::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn scaled_add(&mut self, w: f64, other: &DamperDeriv) {
        self.domega += w * other.domega;
        self.dquat += w * other.dquat;
    }
}

/// Quaternion kinematics: `dq = 1/2 q ⊗ ω` with ω as a pure quaternion in
/// the body frame.
pub fn quat_derivative(quat: &UnitQuaternion<f64>, omega: &Vector3<f64>) -> Quaternion<f64> {
    let omega_quat = Quaternion::new(0.0, omega.x, omega.y, omega.z);
    0.5 * (quat.quaternion() * omega_quat)
}

impl State {
    /// Advance by `dt` along a (possibly stage-combined) derivative,
    /// renormalizing the quaternion.
    pub fn step(&self, deriv: &Deriv, dt: f64) -> State {
        State {
            vel: self.vel + dt * deriv.dvel,
            pos: self.pos + dt * deriv.dpos,
            omega: self.omega + dt * deriv.domega,
            quat: UnitQuaternion::new_normalize(self.quat.quaternion() + dt * deriv.dquat),
        }
    }
}

impl DamperState {
    pub fn step(&self, deriv: &DamperDeriv, dt: f64) -> DamperState {
        DamperState {
            omega: self.omega + dt * deriv.domega,
            quat: UnitQuaternion::new_normalize(self.quat.quaternion() + dt * deriv.dquat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_keeps_quaternion_unit() {
        let s = State {
            vel: Vector3::zeros(),
            pos: Vector3::new(7.0e6, 0.0, 0.0),
            omega: Vector3::new(0.1, -0.2, 0.3),
            quat: UnitQuaternion::from_euler_angles(0.4, 0.1, -0.7),
        };
        let deriv = Deriv {
            dvel: Vector3::zeros(),
            dpos: Vector3::zeros(),
            domega: Vector3::zeros(),
            dquat: quat_derivative(&s.quat, &s.omega),
        };
        let next = s.step(&deriv, 10.0);
        assert!((next.quat.quaternion().norm() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn quat_derivative_is_orthogonal_to_quat() {
        // d/dt (q·q) = 2 q·dq = 0 for rigid-body kinematics
        let q = UnitQuaternion::from_euler_angles(0.3, -1.2, 0.8);
        let dq = quat_derivative(&q, &Vector3::new(0.05, 0.02, -0.01));
        assert!(q.quaternion().dot(&dq).abs() < 1e-16);
    }

    #[test]
    fn constant_spin_about_z_integrates_to_rotation() {
        // Small-step Euler integration of dq should track the analytic
        // rotation angle for a single-axis spin
        let omega = Vector3::new(0.0, 0.0, 0.01);
        let mut q = UnitQuaternion::identity();
        let dt = 0.001;
        let steps = 100_000;
        for _ in 0..steps {
            let dq = quat_derivative(&q, &omega);
            q = UnitQuaternion::new_normalize(q.quaternion() + dt * dq);
        }
        let expected = omega.z * dt * steps as f64;
        assert!((q.angle() - expected).abs() < 1e-6);
    }
}
