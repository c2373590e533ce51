use crate::config::Perturbations;
use crate::dynamics::ledger::Effect;
use crate::dynamics::rhs::RhsEval;
use crate::dynamics::state::State;
use crate::physics::{gravity, third_body};

// ---------------------------------------------------------------------------
// Work and potential-energy bookkeeping
// ---------------------------------------------------------------------------

/// Running work integrals, J, accumulated once per integration step from
/// the last-stage derivative evaluation, which sits on the advanced state
/// (rectangle rule, right endpoint).
///
/// The non-conservative channels track real energy exchange; the
/// conservative channels exist to close the energy balance against the
/// potentials without differencing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkAccumulators {
    /// Work of the net non-conservative force on the orbit.
    pub translational: f64,
    /// Work of the net non-conservative torque on the attitude.
    pub rotational: f64,
    /// Work of the gravity-gradient torque.
    pub gravity_gradient: f64,
    /// Work of the aspherical field terms on the orbit.
    pub earth_aspherical: f64,
    /// Work of the solar tidal attraction.
    pub sun: f64,
    /// Work of the lunar tidal attraction.
    pub moon: f64,
}

impl WorkAccumulators {
    /// Fold in one step: powers from the final stage evaluation times `dt`.
    /// `state` is the advanced state that evaluation was taken on.
    pub fn accumulate(&mut self, eval: &RhsEval, state: &State, mass: f64, dt: f64) {
        self.translational += eval.force_nc.dot(&state.vel) * dt;
        self.rotational += eval.torque_nc.dot(&state.omega) * dt;
        self.gravity_gradient += eval.ledger.get(Effect::GravityTorque).dot(&state.omega) * dt;
        self.earth_aspherical +=
            mass * eval.ledger.get(Effect::GravityAccel).dot(&state.vel) * dt;
        self.sun += mass * eval.ledger.get(Effect::SunAccel).dot(&state.vel) * dt;
        self.moon += mass * eval.ledger.get(Effect::MoonAccel).dot(&state.vel) * dt;
    }
}

/// Potential energies of the enabled conservative fields at one epoch, J.
/// The Keplerian `-mu m / r` well is implicit in the orbit itself and not
/// repeated here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotentialEnergies {
    pub earth_aspherical: f64,
    pub sun: f64,
    pub moon: f64,
}

impl PotentialEnergies {
    pub fn compute(t2000: f64, state: &State, mass: f64, perts: &Perturbations) -> Self {
        let mut out = Self::default();
        if perts.gravity_force {
            out.earth_aspherical = gravity::aspherical_potential(&state.pos, mass);
        }
        if perts.sun_gravity {
            let r_sun = third_body::sun_position(t2000);
            out.sun =
                third_body::third_body_potential(&state.pos, mass, &r_sun, third_body::MU_SUN);
        }
        if perts.moon_gravity {
            let r_moon = third_body::moon_position(t2000);
            out.moon =
                third_body::third_body_potential(&state.pos, mass, &r_moon, third_body::MU_MOON);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::ledger::Ledger;
    use crate::dynamics::state::Deriv;
    use nalgebra::{UnitQuaternion, Vector3};

    fn eval_with(force_nc: Vector3<f64>, torque_nc: Vector3<f64>, ledger: Ledger) -> RhsEval {
        RhsEval {
            deriv: Deriv::zeros(),
            damper_deriv: None,
            force_nc,
            torque_nc,
            ledger,
        }
    }

    #[test]
    fn drag_does_negative_work() {
        let state = State {
            vel: Vector3::new(7500.0, 0.0, 0.0),
            pos: Vector3::new(0.0, 7.0e6, 0.0),
            omega: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
        };
        // Force opposing the velocity
        let eval = eval_with(Vector3::new(-1.0e-3, 0.0, 0.0), Vector3::zeros(), Ledger::new());
        let mut work = WorkAccumulators::default();
        work.accumulate(&eval, &state, 100.0, 10.0);
        assert!(work.translational < 0.0);
        assert_eq!(work.rotational, 0.0);
    }

    #[test]
    fn conservative_channels_read_the_ledger() {
        let state = State {
            vel: Vector3::new(1.0, 2.0, 3.0),
            pos: Vector3::new(7.0e6, 0.0, 0.0),
            omega: Vector3::new(0.1, 0.0, 0.0),
            quat: UnitQuaternion::identity(),
        };
        let mut ledger = Ledger::new();
        ledger.set(Effect::GravityAccel, Vector3::new(1.0e-5, 0.0, 0.0));
        ledger.set(Effect::GravityTorque, Vector3::new(2.0e-6, 0.0, 0.0));
        let eval = eval_with(Vector3::zeros(), Vector3::zeros(), ledger);

        let mut work = WorkAccumulators::default();
        let mass = 100.0;
        let dt = 2.0;
        work.accumulate(&eval, &state, mass, dt);
        assert!((work.earth_aspherical - mass * 1.0e-5 * 1.0 * dt).abs() < 1e-18);
        assert!((work.gravity_gradient - 2.0e-6 * 0.1 * dt).abs() < 1e-18);
        assert_eq!(work.sun, 0.0);
        assert_eq!(work.moon, 0.0);
    }

    #[test]
    fn potentials_follow_the_switches() {
        let state = State {
            vel: Vector3::zeros(),
            pos: Vector3::new(7.0e6, 0.0, 1.0e6),
            omega: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
        };
        let off = PotentialEnergies::compute(0.0, &state, 100.0, &Perturbations::none());
        assert_eq!(off.earth_aspherical, 0.0);
        assert_eq!(off.sun, 0.0);

        let on = PotentialEnergies::compute(0.0, &state, 100.0, &Perturbations::all());
        assert!(on.earth_aspherical != 0.0);
        assert!(on.sun != 0.0);
        assert!(on.moon != 0.0);
    }
}
