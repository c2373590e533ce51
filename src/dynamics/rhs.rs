use nalgebra::Vector3;

use crate::config::Perturbations;
use crate::dynamics::ledger::{Effect, Ledger};
use crate::dynamics::state::{quat_derivative, DamperDeriv, DamperState, Deriv, State};
use crate::physics::{atmosphere, drag, eddy, gravity, radiation, third_body};
use crate::spacecraft::{Spacecraft, SurfaceScratch};

// ---------------------------------------------------------------------------
// State-derivative aggregator
// ---------------------------------------------------------------------------

/// Differencing interval for the convective magnetic-field rate, s.
const FIELD_RATE_DT: f64 = 1.0;

/// One derivative evaluation: the derivative itself plus the bookkeeping the
/// energy accumulators and diagnostics read.
#[derive(Debug, Clone)]
pub struct RhsEval {
    pub deriv: Deriv,
    pub damper_deriv: Option<DamperDeriv>,
    /// Net non-conservative force, inertial frame, N.
    pub force_nc: Vector3<f64>,
    /// Net non-conservative torque, body frame, N m.
    pub torque_nc: Vector3<f64>,
    pub ledger: Ledger,
}

/// Evaluate the coupled orbit-attitude derivative at `t2000` seconds past
/// J2000.
///
/// The Keplerian point-mass term is always applied; every other effect is
/// gated by `perts`. Effects that share the panel projection run in a fixed
/// order so repeated evaluations at the same state are bit-identical.
pub fn evaluate(
    t2000: f64,
    state: &State,
    damper: Option<&DamperState>,
    sc: &Spacecraft,
    perts: &Perturbations,
    scratch: &mut SurfaceScratch,
) -> RhsEval {
    let mut ledger = Ledger::new();
    let mut accel = Vector3::zeros();
    let mut torque = Vector3::zeros();
    let mut force_nc = Vector3::zeros();
    let mut torque_nc = Vector3::zeros();

    let r_sun = if perts.needs_sun() {
        Some(third_body::sun_position(t2000))
    } else {
        None
    };

    // Earth-bound radiation, then direct solar pressure. Both bands share
    // the radial projection pass.
    if perts.albedo_force || perts.albedo_torque || perts.ir_force || perts.ir_torque {
        if let Some(r_sun) = &r_sun {
            let (a_alb, g_alb, a_ir, g_ir) = radiation::albedo_ir(
                &state.pos,
                r_sun,
                &state.quat,
                sc,
                scratch,
                perts.albedo_force,
                perts.albedo_torque,
                perts.ir_force,
                perts.ir_torque,
            );
            ledger.set(Effect::AlbedoAccel, a_alb);
            ledger.set(Effect::AlbedoTorque, g_alb);
            ledger.set(Effect::IrAccel, a_ir);
            ledger.set(Effect::IrTorque, g_ir);
            accel += a_alb + a_ir;
            torque += g_alb + g_ir;
            force_nc += sc.mass * (a_alb + a_ir);
            torque_nc += g_alb + g_ir;
        }
    }

    if perts.srp_force || perts.srp_torque {
        if let Some(r_sun) = &r_sun {
            let (a_srp, g_srp) = radiation::srp(
                &state.pos,
                r_sun,
                &state.quat,
                sc,
                scratch,
                perts.srp_force,
                perts.srp_torque,
            );
            ledger.set(Effect::SrpAccel, a_srp);
            ledger.set(Effect::SrpTorque, g_srp);
            accel += a_srp;
            torque += g_srp;
            force_nc += sc.mass * a_srp;
            torque_nc += g_srp;
        }
    }

    if perts.aero_force || perts.aero_torque {
        let altitude = state.pos.norm() - gravity::R_EARTH;
        let rho = atmosphere::density(altitude);
        let (a_aero, g_aero) = drag::aero(
            rho,
            &state.pos,
            &state.vel,
            &state.omega,
            &state.quat,
            sc,
            scratch,
            perts.aero_force,
            perts.aero_torque,
        );
        ledger.set(Effect::AeroAccel, a_aero);
        ledger.set(Effect::AeroTorque, g_aero);
        accel += a_aero;
        torque += g_aero;
        force_nc += sc.mass * a_aero;
        torque_nc += g_aero;
    }

    if perts.eddy_torque {
        let g_eddy = eddy::torque(
            &state.pos,
            &state.vel,
            &state.omega,
            &state.quat,
            &sc.magnetic_tensor,
            FIELD_RATE_DT,
        );
        ledger.set(Effect::EddyTorque, g_eddy);
        torque += g_eddy;
        torque_nc += g_eddy;
    }

    if perts.sun_gravity {
        if let Some(r_sun) = &r_sun {
            let a_sun = third_body::third_body_accel(&state.pos, r_sun, third_body::MU_SUN);
            ledger.set(Effect::SunAccel, a_sun);
            accel += a_sun;
        }
    }

    if perts.moon_gravity {
        let r_moon = third_body::moon_position(t2000);
        let a_moon = third_body::third_body_accel(&state.pos, &r_moon, third_body::MU_MOON);
        ledger.set(Effect::MoonAccel, a_moon);
        accel += a_moon;
    }

    if perts.gravity_force {
        let a_field = gravity::aspherical_accel(&state.pos);
        ledger.set(Effect::GravityAccel, a_field);
        accel += a_field;
    }

    if perts.gravity_torque {
        let g_grad = gravity::gradient_torque(&state.pos, &state.quat, &sc.inertia);
        ledger.set(Effect::GravityTorque, g_grad);
        torque += g_grad;
    }

    // Damper coupling: a viscous torque on the relative spin. The primary
    // feels -g, the damper feels +g in its own frame.
    let mut damper_deriv = None;
    if perts.damper {
        if let (Some(params), Some(dstate)) = (&sc.damper, damper) {
            let wd_inertial = dstate.quat * dstate.omega;
            let wd_body = state.quat.inverse() * wd_inertial;
            let g_body = params.coupling * (state.omega - wd_body);

            ledger.set(Effect::DamperTorque, -g_body);
            torque -= g_body;
            torque_nc -= g_body;

            let g_damper = dstate.quat.inverse() * (state.quat * g_body);
            damper_deriv = Some(DamperDeriv {
                domega: g_damper / params.inertia,
                dquat: quat_derivative(&dstate.quat, &dstate.omega),
            });
        }
    }

    // Keplerian point mass closes the translational side; Euler's equation
    // closes the rotational side.
    accel += gravity::point_mass_accel(&state.pos);

    let gyro = state.omega.cross(&(sc.inertia * state.omega));
    let deriv = Deriv {
        dvel: accel,
        dpos: state.vel,
        domega: sc.inertia_inv * (torque - gyro),
        dquat: quat_derivative(&state.quat, &state.omega),
    };

    RhsEval {
        deriv,
        damper_deriv,
        force_nc,
        torque_nc,
        ledger,
    }
}
