use nalgebra::{UnitQuaternion, Vector3};

use crate::spacecraft::{Spacecraft, SurfaceScratch};

// ---------------------------------------------------------------------------
// Aerodynamic drag on a spinning panelled body
// ---------------------------------------------------------------------------

/// Earth rotation rate, rad/s. The atmosphere co-rotates with the planet.
pub const OMEGA_EARTH: f64 = 7.292_115_146_706_98e-5;

/// Drag force on one panel, inertial frame.
///
/// Three terms: ram pressure on the projected area, plus two spin corrections
/// from the panel sweeping through the flow (centroid velocity along the wind
/// and across it).
fn panel_force(
    rho: f64,
    cd: f64,
    wind: &Vector3<f64>,
    omega_rel: &Vector3<f64>,
    centroid_i: &Vector3<f64>,
    normal_i: &Vector3<f64>,
    area: f64,
    projected: f64,
) -> Vector3<f64> {
    let speed = wind.norm();
    let sweep = centroid_i.cross(omega_rel);

    let ram = 0.5 * cd * projected * rho * speed * wind;
    let along = rho * area * normal_i.dot(&sweep) * cd / 2.0 * wind;
    let across = rho * projected * speed * cd / 2.0 * sweep;

    ram + along + across
}

/// Aerodynamic acceleration (inertial frame) and torque (body frame).
///
/// `rho` is the ambient density at the current altitude. Either output is
/// zero when its flag is off; the panel projection runs once for both.
#[allow(clippy::too_many_arguments)]
pub fn aero(
    rho: f64,
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    omega: &Vector3<f64>,
    quat: &UnitQuaternion<f64>,
    sc: &Spacecraft,
    scratch: &mut SurfaceScratch,
    want_force: bool,
    want_torque: bool,
) -> (Vector3<f64>, Vector3<f64>) {
    let omega_atmos = Vector3::new(0.0, 0.0, OMEGA_EARTH);

    // Wind seen by the spacecraft: co-rotating atmosphere minus orbital
    // velocity, inertial frame.
    let wind = omega_atmos.cross(pos) - vel;
    let wind_body = quat.inverse() * wind;

    let omega_inertial = quat * omega;
    let omega_rel_i = omega_inertial - omega_atmos;
    let omega_rel_b = omega - quat.inverse() * omega_atmos;

    let wind_hat_body = wind_body / wind_body.norm();
    scratch.project(&sc.surfaces, &wind_hat_body);

    let mut accel = Vector3::zeros();
    let mut torque = Vector3::zeros();

    for (i, surf) in sc.surfaces.iter().enumerate() {
        let projected = scratch.projected[i];
        if projected <= 0.0 {
            continue;
        }

        if want_force {
            let centroid_i = quat * surf.centroid;
            let normal_i = quat * surf.normal;
            accel += panel_force(
                rho,
                sc.drag_coeff,
                &wind,
                &omega_rel_i,
                &centroid_i,
                &normal_i,
                surf.area,
                projected,
            );
        }

        if want_torque {
            let f_body = panel_force(
                rho,
                sc.drag_coeff,
                &wind_body,
                &omega_rel_b,
                &surf.centroid,
                &surf.normal,
                surf.area,
                projected,
            );
            torque += surf.centroid.cross(&f_body);
        }
    }

    if want_force {
        accel /= sc.mass;
    }
    (accel, torque)
}
