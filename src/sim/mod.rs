pub mod energy;
pub mod integrator;
pub mod runner;

pub use energy::{PotentialEnergies, WorkAccumulators};
pub use runner::{propagate, PropagationOutput, Scenario};
