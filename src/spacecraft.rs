use nalgebra::{Matrix3, Vector3};

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Spacecraft physical model: mass properties + surface panel geometry
// ---------------------------------------------------------------------------

/// Reflection/absorption coefficients of one panel in one spectral band.
/// The three coefficients sum to 1 for an opaque surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceCoeffs {
    pub specular: f64,
    pub diffuse: f64,
    pub absorption: f64,
}

impl SurfaceCoeffs {
    pub fn new(specular: f64, diffuse: f64, absorption: f64) -> Self {
        Self {
            specular,
            diffuse,
            absorption,
        }
    }
}

/// One flat panel of the spacecraft geometry model.
///
/// The normal is the *inward* unit normal (matching the geometry-file
/// convention); a panel faces an incoming flux direction `d` (unit, body
/// frame, pointing from source toward spacecraft) when `d · normal > 0`.
#[derive(Debug, Clone)]
pub struct Surface {
    pub area: f64,                 // m^2
    pub normal: Vector3<f64>,      // inward unit normal, body frame
    pub centroid: Vector3<f64>,    // pressure-center offset from CG, body frame, m
    pub optical: SurfaceCoeffs,    // visible band
    pub infrared: SurfaceCoeffs,   // IR band
}

/// Internal energy-dissipating damper body: a notionally spherical sub-body
/// with isotropic inertia, coupled to the primary through a linear viscous
/// torque proportional to the relative angular velocity.
#[derive(Debug, Clone, Copy)]
pub struct DamperParams {
    pub inertia: f64,  // kg m^2, isotropic
    pub coupling: f64, // N m s/rad, viscous coefficient
}

#[derive(Debug, Clone)]
pub struct Spacecraft {
    pub mass: f64,                    // kg
    pub inertia: Matrix3<f64>,        // body frame, kg m^2
    pub inertia_inv: Matrix3<f64>,
    pub magnetic_tensor: Matrix3<f64>, // eddy-current tensor, body frame, S m^4
    pub drag_coeff: f64,
    pub surfaces: Vec<Surface>,
    pub damper: Option<DamperParams>,
}

impl Spacecraft {
    /// Build a spacecraft, inverting the inertia tensor up front.
    pub fn new(
        mass: f64,
        inertia: Matrix3<f64>,
        magnetic_tensor: Matrix3<f64>,
        drag_coeff: f64,
        surfaces: Vec<Surface>,
    ) -> Result<Self, ConfigError> {
        let inertia_inv = inertia.try_inverse().ok_or(ConfigError::SingularInertia)?;
        Ok(Self {
            mass,
            inertia,
            inertia_inv,
            magnetic_tensor,
            drag_coeff,
            surfaces,
            damper: None,
        })
    }

    pub fn with_damper(mut self, damper: DamperParams) -> Self {
        self.damper = Some(damper);
        self
    }

    pub fn total_area(&self) -> f64 {
        self.surfaces.iter().map(|s| s.area).sum()
    }
}

/// Six-panel rectangular box geometry, centered on the CG.
///
/// `dims` are the full edge lengths along body x, y, z (m). All panels share
/// the given optical and infrared coefficient sets.
pub fn box_panels(
    dims: Vector3<f64>,
    optical: SurfaceCoeffs,
    infrared: SurfaceCoeffs,
) -> Vec<Surface> {
    let face = |normal: Vector3<f64>, area: f64, offset: f64| Surface {
        area,
        // Inward normal points from the face toward the CG.
        normal: -normal,
        centroid: normal * offset,
        optical,
        infrared,
    };

    vec![
        face(Vector3::x(), dims.y * dims.z, dims.x / 2.0),
        face(-Vector3::x(), dims.y * dims.z, dims.x / 2.0),
        face(Vector3::y(), dims.x * dims.z, dims.y / 2.0),
        face(-Vector3::y(), dims.x * dims.z, dims.y / 2.0),
        face(Vector3::z(), dims.x * dims.y, dims.z / 2.0),
        face(-Vector3::z(), dims.x * dims.y, dims.z / 2.0),
    ]
}

// ---------------------------------------------------------------------------
// Per-call projected-area scratch
// ---------------------------------------------------------------------------

/// Scratch buffer for per-panel projected areas.
///
/// Every illumination/flow pass overwrites it in place before reading it back
/// within the same derivative evaluation; it carries no state across calls.
/// Each propagation instance owns its own buffer, so concurrent runs never
/// share one.
#[derive(Debug, Clone)]
pub struct SurfaceScratch {
    pub projected: Vec<f64>,
}

impl SurfaceScratch {
    pub fn for_spacecraft(sc: &Spacecraft) -> Self {
        Self {
            projected: vec![0.0; sc.surfaces.len()],
        }
    }

    /// Project every panel onto an incoming flux direction (unit, body frame,
    /// pointing from source toward spacecraft). Writes per-panel projected
    /// areas (zero for panels facing away) and returns the total.
    pub fn project(&mut self, surfaces: &[Surface], dir_body: &Vector3<f64>) -> f64 {
        let mut total = 0.0;
        for (i, surf) in surfaces.iter().enumerate() {
            let cos_alpha = dir_body.dot(&surf.normal);
            self.projected[i] = if cos_alpha > 0.0 {
                cos_alpha * surf.area
            } else {
                0.0
            };
            total += self.projected[i];
        }
        total
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
