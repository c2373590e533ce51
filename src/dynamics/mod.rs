pub mod ledger;
pub mod rhs;
pub mod state;

pub use ledger::{Effect, Ledger};
pub use rhs::RhsEval;
pub use state::{DamperDeriv, DamperState, Deriv, State};
