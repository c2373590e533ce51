pub mod config;
pub mod dynamics;
pub mod io;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod spacecraft;

pub use config::{ConfigError, Perturbations, TimeGrid};
pub use dynamics::{DamperState, Effect, State};
pub use sim::{propagate, PropagationOutput, Scenario};
pub use spacecraft::{DamperParams, Spacecraft, Surface, SurfaceCoeffs};
