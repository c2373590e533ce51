use thiserror::Error;

// ---------------------------------------------------------------------------
// Run configuration: time grid and enabled physical effects
// ---------------------------------------------------------------------------

/// Time-grid configuration for a propagation run.
///
/// All values in seconds. The output cadence must be a whole multiple of the
/// integration step; records are sampled every `output_step / dt` steps.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    pub dt: f64,          // integration step, s
    pub duration: f64,    // propagation horizon, s
    pub output_step: f64, // record cadence, s
}

impl TimeGrid {
    /// Number of integration steps between output records.
    pub fn steps_per_record(&self) -> usize {
        (self.output_step / self.dt).round() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0) {
            return Err(ConfigError::NonPositiveStep { dt: self.dt });
        }
        if !(self.duration > 0.0) {
            return Err(ConfigError::NonPositiveDuration {
                duration: self.duration,
            });
        }
        let ratio = self.output_step / self.dt;
        if !(self.output_step > 0.0) || (ratio - ratio.round()).abs() > 1e-9 || ratio < 1.0 {
            return Err(ConfigError::OutputCadence {
                output_step: self.output_step,
                dt: self.dt,
            });
        }
        Ok(())
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            dt: 1.0,
            duration: 86_400.0,
            output_step: 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Perturbation switches
// ---------------------------------------------------------------------------

/// Which physical effects contribute to the state derivative.
///
/// Built once at run start and passed by reference into the derivative
/// aggregator; nothing mutates it mid-run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Perturbations {
    pub aero_force: bool,
    pub aero_torque: bool,
    pub gravity_force: bool,   // aspherical field terms beyond the Keplerian point mass
    pub gravity_torque: bool,  // gravity-gradient torque
    pub eddy_torque: bool,
    pub sun_gravity: bool,
    pub moon_gravity: bool,
    pub srp_force: bool,
    pub albedo_force: bool,
    pub ir_force: bool,
    pub srp_torque: bool,
    pub albedo_torque: bool,
    pub ir_torque: bool,
    pub damper: bool,
}

impl Perturbations {
    /// Pure two-body propagation: every effect off.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every modeled effect on (damper included).
    pub fn all() -> Self {
        Self {
            aero_force: true,
            aero_torque: true,
            gravity_force: true,
            gravity_torque: true,
            eddy_torque: true,
            sun_gravity: true,
            moon_gravity: true,
            srp_force: true,
            albedo_force: true,
            ir_force: true,
            srp_torque: true,
            albedo_torque: true,
            ir_torque: true,
            damper: true,
        }
    }

    /// True if any effect needs the surface geometry model.
    pub fn needs_geometry(&self) -> bool {
        self.aero_force
            || self.aero_torque
            || self.srp_force
            || self.srp_torque
            || self.albedo_force
            || self.albedo_torque
            || self.ir_force
            || self.ir_torque
    }

    /// True if any effect needs the sun position.
    pub fn needs_sun(&self) -> bool {
        self.sun_gravity
            || self.srp_force
            || self.srp_torque
            || self.albedo_force
            || self.albedo_torque
            || self.ir_force
            || self.ir_torque
    }
}

// ---------------------------------------------------------------------------
// Configuration errors — all fatal before the loop starts
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("integration step must be positive, got {dt}")]
    NonPositiveStep { dt: f64 },

    #[error("propagation duration must be positive, got {duration}")]
    NonPositiveDuration { duration: f64 },

    #[error("output step {output_step} must be a positive whole multiple of dt {dt}")]
    OutputCadence { output_step: f64, dt: f64 },

    #[error("inertia matrix is singular and cannot be inverted")]
    SingularInertia,

    #[error("surface-dependent perturbation enabled but spacecraft has no surface geometry")]
    MissingGeometry,

    #[error("damper coupling enabled but spacecraft has no damper parameters")]
    MissingDamper,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
