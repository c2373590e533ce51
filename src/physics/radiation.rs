use nalgebra::{UnitQuaternion, Vector3};

use crate::physics::gravity::R_EARTH;
use crate::physics::third_body::AU;
use crate::spacecraft::{Spacecraft, Surface, SurfaceCoeffs, SurfaceScratch};

// ---------------------------------------------------------------------------
// Radiation pressure: direct solar, Earth albedo, Earth infrared
// ---------------------------------------------------------------------------

pub const SOLAR_FLUX_1AU: f64 = 1361.0;      // W/m^2
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
pub const SUN_RADIUS: f64 = 6.957e8;          // m
pub const EARTH_BOND_ALBEDO: f64 = 0.3;
pub const EARTH_IR_FLUX: f64 = 237.0;         // W/m^2 at the surface

// Umbra/penumbra half-angles of the Earth's shadow cone.
const ALPHA_UMBRA: f64 = 0.264_121_687 * std::f64::consts::PI / 180.0;
const ALPHA_PENUMBRA: f64 = 0.269_007_205 * std::f64::consts::PI / 180.0;

/// Fraction of the solar disc visible from the spacecraft: 1 in full sun,
/// 0 in umbra, partial in penumbra (overlap area of the two discs).
pub fn shadow_factor(r_sun: &Vector3<f64>, pos: &Vector3<f64>) -> f64 {
    // Shadow is only possible on the anti-sun side.
    if pos.dot(r_sun) >= 0.0 {
        return 1.0;
    }

    let r = pos.norm();
    let cos_sigma = (-pos.dot(r_sun) / (r * r_sun.norm())).clamp(-1.0, 1.0);
    let sigma = cos_sigma.acos();
    let along_axis = r * sigma.cos();
    let off_axis = r * sigma.sin();

    let pen_vertex = R_EARTH / ALPHA_PENUMBRA.sin();
    let pen_radius = ALPHA_PENUMBRA.tan() * (pen_vertex + along_axis);
    if off_axis > pen_radius {
        return 1.0;
    }

    let umb_vertex = R_EARTH / ALPHA_UMBRA.sin();
    let umb_radius = ALPHA_UMBRA.tan() * (umb_vertex - along_axis);
    if off_axis <= umb_radius {
        return 0.0;
    }

    // Penumbra: apparent-disc overlap between Sun and Earth.
    let sat_to_sun = r_sun - pos;
    let d_sun = sat_to_sun.norm();
    let a = (SUN_RADIUS / d_sun).asin();           // apparent sun radius
    let b = (R_EARTH / r).asin();                  // apparent earth radius
    let c = (-pos.dot(&sat_to_sun) / (r * d_sun)).clamp(-1.0, 1.0).acos();

    if a + b <= c {
        return 1.0;
    }
    if c < (b - a).abs() {
        return 0.0;
    }

    let x = (c * c + a * a - b * b) / (2.0 * c);
    let y = (a * a - x * x).max(0.0).sqrt();
    let overlap = a * a * (x / a).clamp(-1.0, 1.0).acos()
        + b * b * ((c - x) / b).clamp(-1.0, 1.0).acos()
        - c * y;

    1.0 - overlap / (std::f64::consts::PI * a * a)
}

/// Radiation force on one panel, body frame.
///
/// `light_body` is the unit flux direction (source → spacecraft) in the body
/// frame; `projected` is the panel area already projected onto it. Absorbed
/// and diffusely reflected photons push along the flux; the diffuse lobe and
/// specular reflection push along the inward normal.
fn panel_force(
    pressure: f64,
    surf: &Surface,
    coeffs: &SurfaceCoeffs,
    projected: f64,
    cos_alpha: f64,
    light_body: &Vector3<f64>,
) -> Vector3<f64> {
    let along_flux = (coeffs.absorption + coeffs.diffuse) * projected;
    let along_normal =
        2.0 * coeffs.diffuse / 3.0 * projected + 2.0 * coeffs.specular * projected * cos_alpha;
    pressure * (along_flux * light_body + along_normal * surf.normal)
}

/// Accumulate force (body frame) and torque over all panels lit from
/// `light_body`, reading the projected areas written by the caller.
fn sum_panels(
    pressure: f64,
    sc: &Spacecraft,
    scratch: &SurfaceScratch,
    light_body: &Vector3<f64>,
    infrared_band: bool,
) -> (Vector3<f64>, Vector3<f64>) {
    let mut force = Vector3::zeros();
    let mut torque = Vector3::zeros();
    for (i, surf) in sc.surfaces.iter().enumerate() {
        let projected = scratch.projected[i];
        if projected <= 0.0 {
            continue;
        }
        let cos_alpha = light_body.dot(&surf.normal);
        let coeffs = if infrared_band {
            &surf.infrared
        } else {
            &surf.optical
        };
        let f = panel_force(pressure, surf, coeffs, projected, cos_alpha, light_body);
        force += f;
        torque += surf.centroid.cross(&f);
    }
    (force, torque)
}

/// Direct solar radiation pressure.
///
/// Returns (acceleration in the inertial frame, torque in the body frame);
/// either is zero when its flag is off.
pub fn srp(
    pos: &Vector3<f64>,
    r_sun: &Vector3<f64>,
    quat: &UnitQuaternion<f64>,
    sc: &Spacecraft,
    scratch: &mut SurfaceScratch,
    want_force: bool,
    want_torque: bool,
) -> (Vector3<f64>, Vector3<f64>) {
    let d_sun = r_sun.norm();
    let light = -r_sun / d_sun;
    let light_body = quat.inverse() * light;
    scratch.project(&sc.surfaces, &light_body);

    let flux = SOLAR_FLUX_1AU * (AU / d_sun).powi(2) * shadow_factor(r_sun, pos);
    let pressure = flux / SPEED_OF_LIGHT;

    let (force_body, torque) = sum_panels(pressure, sc, scratch, &light_body, false);
    let accel = if want_force {
        (quat * force_body) / sc.mass
    } else {
        Vector3::zeros()
    };
    let torque = if want_torque { torque } else { Vector3::zeros() };
    (accel, torque)
}

/// Earth albedo and infrared emission, modeled as radial flux from the
/// sub-satellite region.
///
/// Returns (albedo accel, albedo torque, IR accel, IR torque); each entry is
/// zero when its flag is off. Albedo scales with the sunlit fraction of the
/// visible disc (cosine of the sun angle at the sub-satellite point).
#[allow(clippy::too_many_arguments)]
pub fn albedo_ir(
    pos: &Vector3<f64>,
    r_sun: &Vector3<f64>,
    quat: &UnitQuaternion<f64>,
    sc: &Spacecraft,
    scratch: &mut SurfaceScratch,
    want_albedo_force: bool,
    want_albedo_torque: bool,
    want_ir_force: bool,
    want_ir_torque: bool,
) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let r = pos.norm();
    // Flux travels radially outward, so the incoming direction at the
    // spacecraft is +r̂.
    let light = pos / r;
    let light_body = quat.inverse() * light;
    scratch.project(&sc.surfaces, &light_body);

    let view = (R_EARTH / r).powi(2);

    let mut a_alb = Vector3::zeros();
    let mut g_alb = Vector3::zeros();
    if want_albedo_force || want_albedo_torque {
        let sunlit = (pos.dot(r_sun) / (r * r_sun.norm())).max(0.0);
        let pressure = SOLAR_FLUX_1AU * EARTH_BOND_ALBEDO * view * sunlit / SPEED_OF_LIGHT;
        let (force_body, torque) = sum_panels(pressure, sc, scratch, &light_body, false);
        if want_albedo_force {
            a_alb = (quat * force_body) / sc.mass;
        }
        if want_albedo_torque {
            g_alb = torque;
        }
    }

    let mut a_ir = Vector3::zeros();
    let mut g_ir = Vector3::zeros();
    if want_ir_force || want_ir_torque {
        let pressure = EARTH_IR_FLUX * view / SPEED_OF_LIGHT;
        let (force_body, torque) = sum_panels(pressure, sc, scratch, &light_body, true);
        if want_ir_force {
            a_ir = (quat * force_body) / sc.mass;
        }
        if want_ir_torque {
            g_ir = torque;
        }
    }

    (a_alb, g_alb, a_ir, g_ir)
}
