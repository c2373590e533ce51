use std::io::{self, Write};

use crate::dynamics::ledger::Effect;
use crate::sim::runner::{PerturbationRecord, StateRecord, WorkRecord};

// ---------------------------------------------------------------------------
// Flat-text output, one row per record epoch
// ---------------------------------------------------------------------------
//
// Every file opens with a `#` legend line; rows are tab-separated with the
// elapsed time in fixed-point seconds and all physical quantities in full
// double precision.

/// Write the state history.
///
/// Columns: t, vel (3), pos (3), omega (3), quat (w x y z), then the damper
/// omega (3) and quat (4) when a damper was propagated.
pub fn write_states<W: Write>(writer: &mut W, records: &[StateRecord]) -> io::Result<()> {
    let with_damper = records.iter().any(|r| r.damper.is_some());
    write!(
        writer,
        "# t[s]\tvx\tvy\tvz\tx\ty\tz\twx\twy\twz\tqw\tqx\tqy\tqz"
    )?;
    if with_damper {
        write!(writer, "\twdx\twdy\twdz\tqdw\tqdx\tqdy\tqdz")?;
    }
    writeln!(writer)?;

    for rec in records {
        let s = &rec.state;
        let q = s.quat.quaternion();
        write!(
            writer,
            "{:.6}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t\
             {:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}",
            rec.elapsed,
            s.vel.x, s.vel.y, s.vel.z,
            s.pos.x, s.pos.y, s.pos.z,
            s.omega.x, s.omega.y, s.omega.z,
            q.w, q.i, q.j, q.k,
        )?;
        if let Some(d) = &rec.damper {
            let qd = d.quat.quaternion();
            write!(
                writer,
                "\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}",
                d.omega.x, d.omega.y, d.omega.z, qd.w, qd.i, qd.j, qd.k,
            )?;
        } else if with_damper {
            write!(writer, "\t0\t0\t0\t1\t0\t0\t0")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the energy history: accumulated work channels then the potentials.
pub fn write_work<W: Write>(writer: &mut W, records: &[WorkRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "# t[s]\tw_trans\tw_rot\tw_gg\tw_asph\tw_sun\tw_moon\tu_asph\tu_sun\tu_moon"
    )?;
    for rec in records {
        let w = &rec.work;
        let u = &rec.potentials;
        writeln!(
            writer,
            "{:.6}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t{:.16e}\t\
             {:.16e}\t{:.16e}\t{:.16e}",
            rec.elapsed,
            w.translational,
            w.rotational,
            w.gravity_gradient,
            w.earth_aspherical,
            w.sun,
            w.moon,
            u.earth_aspherical,
            u.sun,
            u.moon,
        )?;
    }
    Ok(())
}

/// Write the per-effect derivative breakdown: three columns per ledger slot
/// in the fixed effect order.
pub fn write_perturbations<W: Write>(
    writer: &mut W,
    records: &[PerturbationRecord],
) -> io::Result<()> {
    write!(writer, "# t[s]")?;
    for effect in Effect::ALL {
        let label = effect.label().replace(' ', "_");
        write!(writer, "\t{label}_x\t{label}_y\t{label}_z")?;
    }
    writeln!(writer)?;

    for rec in records {
        write!(writer, "{:.6}", rec.elapsed)?;
        for (_, v) in rec.ledger.iter() {
            write!(writer, "\t{:.16e}\t{:.16e}\t{:.16e}", v.x, v.y, v.z)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the state history to a file at the given path.
pub fn write_states_file(path: &str, records: &[StateRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_states(&mut file, records)
}

/// Write the energy history to a file at the given path.
pub fn write_work_file(path: &str, records: &[WorkRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_work(&mut file, records)
}

/// Write the perturbation breakdown to a file at the given path.
pub fn write_perturbations_file(path: &str, records: &[PerturbationRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_perturbations(&mut file, records)
}
