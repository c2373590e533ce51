use crate::dynamics::rhs::RhsEval;
use crate::dynamics::state::{DamperDeriv, DamperState, Deriv, State};

// ---------------------------------------------------------------------------
// Fixed-step Dormand-Prince 5(4), solution weights only
// ---------------------------------------------------------------------------

/// Stage coefficients of the Dormand-Prince tableau, rows 2..=7.
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const A7: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

/// 5th-order solution weights. The step is fixed, so the embedded 4th-order
/// weights and the error estimate are not carried.
const B: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Stage nodes: each stage evaluates at `t + C[i] * dt`.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

fn combine(weights: &[f64], stages: &[Deriv]) -> Deriv {
    let mut sum = Deriv::zeros();
    for (w, k) in weights.iter().zip(stages) {
        sum.scaled_add(*w, k);
    }
    sum
}

fn combine_damper(weights: &[f64], stages: &[Option<DamperDeriv>]) -> DamperDeriv {
    let mut sum = DamperDeriv::zeros();
    for (w, k) in weights.iter().zip(stages) {
        if let Some(k) = k {
            sum.scaled_add(*w, k);
        }
    }
    sum
}

/// Advance one fixed step of size `dt` from `(t, state, damper)`.
///
/// `f` evaluates the state derivative; it runs seven times per step. Returns
/// the advanced state pair and the seventh-stage evaluation. The last stage
/// sits at `t + dt` on the advanced state itself (its tableau row equals the
/// solution weights), so that evaluation doubles as the derivative breakdown
/// at the new state for the energy accumulators and diagnostics.
pub fn dp_step<F>(
    t: f64,
    dt: f64,
    state: &State,
    damper: Option<&DamperState>,
    f: &mut F,
) -> (State, Option<DamperState>, RhsEval)
where
    F: FnMut(f64, &State, Option<&DamperState>) -> RhsEval,
{
    let rows: [&[f64]; 6] = [&A2, &A3, &A4, &A5, &A6, &A7];

    let mut ks: Vec<Deriv> = Vec::with_capacity(7);
    let mut dks: Vec<Option<DamperDeriv>> = Vec::with_capacity(7);

    let first = f(t + C[0] * dt, state, damper);
    ks.push(first.deriv);
    dks.push(first.damper_deriv);

    let mut last = first;
    for (i, row) in rows.iter().enumerate() {
        let slope = combine(row, &ks);
        let stage_state = state.step(&slope, dt);
        let stage_damper = damper.map(|d| d.step(&combine_damper(row, &dks), dt));

        last = f(t + C[i + 1] * dt, &stage_state, stage_damper.as_ref());
        ks.push(last.deriv);
        dks.push(last.damper_deriv);
    }

    let slope = combine(&B, &ks);
    let next_state = state.step(&slope, dt);
    let next_damper = damper.map(|d| d.step(&combine_damper(&B, &dks), dt));

    (next_state, next_damper, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::ledger::Ledger;
    use crate::dynamics::state::quat_derivative;
    use nalgebra::{Quaternion, UnitQuaternion, Vector3};

    fn eval_from(deriv: Deriv) -> RhsEval {
        RhsEval {
            deriv,
            damper_deriv: None,
            force_nc: Vector3::zeros(),
            torque_nc: Vector3::zeros(),
            ledger: Ledger::new(),
        }
    }

    /// Harmonic oscillator encoded in the translational slots:
    /// dpos = vel, dvel = -pos. Exact solution is a circle in phase space.
    fn sho(_t: f64, s: &State, _d: Option<&DamperState>) -> RhsEval {
        eval_from(Deriv {
            dvel: -s.pos,
            dpos: s.vel,
            domega: Vector3::zeros(),
            dquat: Quaternion::new(0.0, 0.0, 0.0, 0.0),
        })
    }

    fn sho_state() -> State {
        State {
            vel: Vector3::new(0.0, 1.0, 0.0),
            pos: Vector3::new(1.0, 0.0, 0.0),
            omega: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
        }
    }

    fn sho_error(dt: f64) -> f64 {
        // Integrate one radian and compare against cos/sin
        let steps = (1.0 / dt).round() as usize;
        let mut s = sho_state();
        let mut t = 0.0;
        let mut f = sho;
        for _ in 0..steps {
            let (next, _, _) = dp_step(t, dt, &s, None, &mut f);
            s = next;
            t += dt;
        }
        let exact_pos = Vector3::new(t.cos(), t.sin(), 0.0);
        (s.pos - exact_pos).norm()
    }

    #[test]
    fn fifth_order_convergence() {
        // Halving the step should shrink the global error by ~2^5
        let coarse = sho_error(0.1);
        let fine = sho_error(0.05);
        let ratio = coarse / fine;
        assert!(ratio > 16.0, "error ratio {ratio:.1}, want ~32");
    }

    #[test]
    fn single_step_is_very_accurate() {
        let err = sho_error(0.01);
        assert!(err < 1e-12, "error {err:.2e}");
    }

    #[test]
    fn returns_derivative_at_the_advanced_state() {
        let s = sho_state();
        let mut f = sho;
        let (next, _, last) = dp_step(0.0, 0.1, &s, None, &mut f);
        // Stage 7 evaluates on the solution itself
        assert_eq!(last.deriv.dvel, -next.pos);
        assert_eq!(last.deriv.dpos, next.vel);
    }

    #[test]
    fn stage_times_span_the_step() {
        // Record the times the derivative is sampled at
        let mut times = Vec::new();
        let mut f = |t: f64, s: &State, d: Option<&DamperState>| {
            times.push(t);
            sho(t, s, d)
        };
        let s = sho_state();
        dp_step(10.0, 2.0, &s, None, &mut f);
        assert_eq!(times.len(), 7);
        assert_eq!(times[0], 10.0);
        assert_eq!(times[6], 12.0);
        assert!(times.iter().all(|t| (10.0..=12.0).contains(t)));
    }

    #[test]
    fn damper_state_advances_alongside() {
        // Damper with constant spin about z: quaternion should rotate
        let mut f = |_t: f64, s: &State, d: Option<&DamperState>| {
            let d = d.unwrap();
            RhsEval {
                deriv: Deriv {
                    dvel: Vector3::zeros(),
                    dpos: Vector3::zeros(),
                    domega: Vector3::zeros(),
                    dquat: quat_derivative(&s.quat, &s.omega),
                },
                damper_deriv: Some(DamperDeriv {
                    domega: Vector3::zeros(),
                    dquat: quat_derivative(&d.quat, &d.omega),
                }),
                force_nc: Vector3::zeros(),
                torque_nc: Vector3::zeros(),
                ledger: Ledger::new(),
            }
        };
        let s = sho_state();
        let d = DamperState {
            omega: Vector3::new(0.0, 0.0, 0.5),
            quat: UnitQuaternion::identity(),
        };
        let mut state = s;
        let mut damper = Some(d);
        let mut t = 0.0;
        for _ in 0..100 {
            let (ns, nd, _) = dp_step(t, 0.01, &state, damper.as_ref(), &mut f);
            state = ns;
            damper = nd;
            t += 0.01;
        }
        let angle = damper.unwrap().quat.angle();
        assert!((angle - 0.5).abs() < 1e-9, "angle {angle}");
    }
}
