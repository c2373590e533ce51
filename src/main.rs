use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use attitude_orbit_sim::io::report;
use attitude_orbit_sim::orbital::OrbitalElements;
use attitude_orbit_sim::sim::propagate;
use attitude_orbit_sim::sim::runner::Scenario;
use attitude_orbit_sim::{
    DamperParams, Perturbations, Spacecraft, State, SurfaceCoeffs, TimeGrid,
};

fn main() {
    // -----------------------------------------------------------------------
    // Spacecraft: "Meridian-2" decommissioned upper stage
    // -----------------------------------------------------------------------
    let optical = SurfaceCoeffs::new(0.3, 0.3, 0.4);
    let infrared = SurfaceCoeffs::new(0.1, 0.3, 0.6);
    let spacecraft = Spacecraft::new(
        850.0,                                                     // kg
        Matrix3::from_diagonal(&Vector3::new(420.0, 2100.0, 2100.0)), // kg m^2
        Matrix3::from_diagonal_element(8.0e3),                     // eddy tensor
        2.2,
        attitude_orbit_sim::spacecraft::box_panels(
            Vector3::new(7.5, 2.4, 2.4), // m, long axis along body x
            optical,
            infrared,
        ),
    )
    .expect("inertia tensor is invertible")
    .with_damper(DamperParams {
        inertia: 1.5,     // kg m^2
        coupling: 5.0e-3, // N m s/rad
    });

    // -----------------------------------------------------------------------
    // Scenario: tumbling in a 500 km, 51.6 deg orbit for one day
    // -----------------------------------------------------------------------
    let elements = OrbitalElements::circular(500_000.0, 51.6_f64.to_radians());
    let (pos, vel) = elements.to_state_vector();
    let scenario = Scenario {
        spacecraft,
        time: TimeGrid {
            dt: 10.0,
            duration: 86_400.0,
            output_step: 60.0,
        },
        perturbations: Perturbations::all(),
        epoch_t2000: 0.0,
        initial_state: State {
            vel,
            pos,
            omega: Vector3::new(0.05, 0.12, -0.03), // rad/s tumble
            quat: UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1),
        },
    };

    // -----------------------------------------------------------------------
    // Run propagation
    // -----------------------------------------------------------------------
    let output = match propagate(&scenario) {
        Ok(out) => out,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = report::write_states_file("states.dat", &output.states) {
        eprintln!("failed to write states.dat: {err}");
        std::process::exit(1);
    }
    if let Err(err) = report::write_work_file("energy.dat", &output.work) {
        eprintln!("failed to write energy.dat: {err}");
        std::process::exit(1);
    }
    if let Err(err) = report::write_perturbations_file("perturbations.dat", &output.perturbations)
    {
        eprintln!("failed to write perturbations.dat: {err}");
        std::process::exit(1);
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let first = &output.states[0];
    let last = output.states.last().unwrap();
    let el0 = OrbitalElements::from_state_vector(&first.state.pos, &first.state.vel);
    let el1 = OrbitalElements::from_state_vector(&last.state.pos, &last.state.vel);
    let work = &output.work.last().unwrap().work;

    println!();
    println!("====================================================================");
    println!("  COUPLED ORBIT-ATTITUDE PROPAGATION — Meridian-2");
    println!("====================================================================");
    println!();
    println!("  Time grid");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Step:          {:>8.1} s     Horizon:      {:>8.1} h",
        scenario.time.dt,
        scenario.time.duration / 3600.0
    );
    println!(
        "  Steps:         {:>8}       Records:      {:>8}",
        output.steps,
        output.states.len()
    );
    println!();
    println!("  Orbit evolution");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  SMA:        {:>12.1} m  →  {:>12.1} m   ({:+.1} m)",
        el0.sma,
        el1.sma,
        el1.sma - el0.sma
    );
    println!(
        "  Ecc:        {:>12.6}    →  {:>12.6}",
        el0.ecc, el1.ecc
    );
    println!(
        "  Inc:        {:>12.4}°   →  {:>12.4}°",
        el0.inc.to_degrees(),
        el1.inc.to_degrees()
    );
    println!();
    println!("  Attitude evolution");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Spin rate:  {:>12.6} rad/s  →  {:>12.6} rad/s",
        first.state.omega.norm(),
        last.state.omega.norm()
    );
    if let (Some(d0), Some(d1)) = (&first.damper, &last.damper) {
        println!(
            "  Damper lag: {:>12.6} rad/s  →  {:>12.6} rad/s",
            (d0.omega - first.state.omega).norm(),
            (d1.omega - last.state.omega).norm()
        );
    }
    println!();
    println!("  Energy exchange (accumulated work)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Translational: {:>+12.4e} J   Rotational:  {:>+12.4e} J",
        work.translational, work.rotational
    );
    println!(
        "  Aspherical:    {:>+12.4e} J   Grav.grad.:  {:>+12.4e} J",
        work.earth_aspherical, work.gravity_gradient
    );
    println!(
        "  Sun:           {:>+12.4e} J   Moon:        {:>+12.4e} J",
        work.sun, work.moon
    );
    println!();
    println!("  Wrote states.dat, energy.dat, perturbations.dat");
    println!();
}
