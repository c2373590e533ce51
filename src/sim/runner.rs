use crate::config::{ConfigError, Perturbations, TimeGrid};
use crate::dynamics::ledger::Ledger;
use crate::dynamics::rhs;
use crate::dynamics::state::{DamperState, State};
use crate::sim::energy::{PotentialEnergies, WorkAccumulators};
use crate::sim::integrator::dp_step;
use crate::spacecraft::{Spacecraft, SurfaceScratch};

// ---------------------------------------------------------------------------
// Propagation driver
// ---------------------------------------------------------------------------

/// Everything one propagation run needs.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub spacecraft: Spacecraft,
    pub time: TimeGrid,
    pub perturbations: Perturbations,
    /// Run epoch, seconds past J2000; ephemerides are evaluated at
    /// `epoch + elapsed`.
    pub epoch_t2000: f64,
    pub initial_state: State,
}

/// State sample at one record epoch.
#[derive(Debug, Clone, Copy)]
pub struct StateRecord {
    pub elapsed: f64,
    pub state: State,
    pub damper: Option<DamperState>,
}

/// Energy sample at one record epoch: work integrals up to the epoch plus
/// the potentials evaluated at it.
#[derive(Debug, Clone, Copy)]
pub struct WorkRecord {
    pub elapsed: f64,
    pub work: WorkAccumulators,
    pub potentials: PotentialEnergies,
}

/// Per-effect derivative contributions at the start of one recorded step.
#[derive(Debug, Clone, Copy)]
pub struct PerturbationRecord {
    pub elapsed: f64,
    pub ledger: Ledger,
}

#[derive(Debug, Clone)]
pub struct PropagationOutput {
    pub states: Vec<StateRecord>,
    pub work: Vec<WorkRecord>,
    pub perturbations: Vec<PerturbationRecord>,
    pub steps: usize,
}

fn validate(scenario: &Scenario) -> Result<(), ConfigError> {
    scenario.time.validate()?;
    if scenario.perturbations.needs_geometry() && scenario.spacecraft.surfaces.is_empty() {
        return Err(ConfigError::MissingGeometry);
    }
    if scenario.perturbations.damper && scenario.spacecraft.damper.is_none() {
        return Err(ConfigError::MissingDamper);
    }
    Ok(())
}

/// Run the scenario across its full horizon.
///
/// Records are taken on the output grid: the state and energy rows sample
/// the trajectory *at* each record epoch, the perturbation row holds the
/// last-stage derivative breakdown of the step that starts there. The final
/// epoch gets a state and energy row plus an all-zero perturbation row,
/// since no step starts at the horizon.
pub fn propagate(scenario: &Scenario) -> Result<PropagationOutput, ConfigError> {
    validate(scenario)?;

    let sc = &scenario.spacecraft;
    let perts = &scenario.perturbations;
    let dt = scenario.time.dt;
    let n_steps = (scenario.time.duration / dt).round() as usize;
    let per_record = scenario.time.steps_per_record();

    let mut scratch = SurfaceScratch::for_spacecraft(sc);
    let mut state = scenario.initial_state;
    // The damper is released co-rotating with the primary.
    let mut damper = if perts.damper {
        Some(DamperState::locked_to(&state))
    } else {
        None
    };
    let mut work = WorkAccumulators::default();

    let n_records = n_steps / per_record + 2;
    let mut out = PropagationOutput {
        states: Vec::with_capacity(n_records),
        work: Vec::with_capacity(n_records),
        perturbations: Vec::with_capacity(n_records),
        steps: n_steps,
    };

    let mut f = |t2000: f64, s: &State, d: Option<&DamperState>| {
        rhs::evaluate(t2000, s, d, sc, perts, &mut scratch)
    };

    for i in 0..n_steps {
        let elapsed = i as f64 * dt;
        let t2000 = scenario.epoch_t2000 + elapsed;
        let on_grid = i % per_record == 0;

        if on_grid {
            out.states.push(StateRecord {
                elapsed,
                state,
                damper,
            });
            out.work.push(WorkRecord {
                elapsed,
                work,
                potentials: PotentialEnergies::compute(t2000, &state, sc.mass, perts),
            });
        }

        let (next_state, next_damper, last) = dp_step(t2000, dt, &state, damper.as_ref(), &mut f);

        if on_grid {
            out.perturbations.push(PerturbationRecord {
                elapsed,
                ledger: last.ledger,
            });
        }
        // The seventh stage evaluates on the advanced state, so its powers
        // pair with the post-step rates.
        work.accumulate(&last, &next_state, sc.mass, dt);

        state = next_state;
        damper = next_damper;
    }

    let elapsed = n_steps as f64 * dt;
    out.states.push(StateRecord {
        elapsed,
        state,
        damper,
    });
    out.work.push(WorkRecord {
        elapsed,
        work,
        potentials: PotentialEnergies::compute(
            scenario.epoch_t2000 + elapsed,
            &state,
            sc.mass,
            perts,
        ),
    });
    out.perturbations.push(PerturbationRecord {
        elapsed,
        ledger: Ledger::new(),
    });

    Ok(out)
}
