use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Per-effect contribution ledger
// ---------------------------------------------------------------------------

/// One physical effect contributing to the state derivative. Acceleration
/// slots hold m/s^2 in the inertial frame; torque slots hold N m in the body
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    AeroAccel,
    AeroTorque,
    GravityAccel,
    GravityTorque,
    EddyTorque,
    SunAccel,
    MoonAccel,
    SrpAccel,
    AlbedoAccel,
    IrAccel,
    SrpTorque,
    AlbedoTorque,
    IrTorque,
    DamperTorque,
}

impl Effect {
    pub const ALL: [Effect; 14] = [
        Effect::AeroAccel,
        Effect::AeroTorque,
        Effect::GravityAccel,
        Effect::GravityTorque,
        Effect::EddyTorque,
        Effect::SunAccel,
        Effect::MoonAccel,
        Effect::SrpAccel,
        Effect::AlbedoAccel,
        Effect::IrAccel,
        Effect::SrpTorque,
        Effect::AlbedoTorque,
        Effect::IrTorque,
        Effect::DamperTorque,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Effect::AeroAccel => "aero accel",
            Effect::AeroTorque => "aero torque",
            Effect::GravityAccel => "gravity accel",
            Effect::GravityTorque => "gravity torque",
            Effect::EddyTorque => "eddy torque",
            Effect::SunAccel => "sun accel",
            Effect::MoonAccel => "moon accel",
            Effect::SrpAccel => "srp accel",
            Effect::AlbedoAccel => "albedo accel",
            Effect::IrAccel => "ir accel",
            Effect::SrpTorque => "srp torque",
            Effect::AlbedoTorque => "albedo torque",
            Effect::IrTorque => "ir torque",
            Effect::DamperTorque => "damper torque",
        }
    }

    pub fn is_torque(&self) -> bool {
        matches!(
            self,
            Effect::AeroTorque
                | Effect::GravityTorque
                | Effect::EddyTorque
                | Effect::SrpTorque
                | Effect::AlbedoTorque
                | Effect::IrTorque
                | Effect::DamperTorque
        )
    }
}

/// Per-effect breakdown of one derivative evaluation, for diagnostics and
/// work accumulation. Unused slots stay zero.
#[derive(Debug, Clone, Copy)]
pub struct Ledger {
    slots: [Vector3<f64>; 14],
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            slots: [Vector3::zeros(); 14],
        }
    }

    pub fn set(&mut self, effect: Effect, value: Vector3<f64>) {
        self.slots[effect as usize] = value;
    }

    pub fn add(&mut self, effect: Effect, value: Vector3<f64>) {
        self.slots[effect as usize] += value;
    }

    pub fn get(&self, effect: Effect) -> Vector3<f64> {
        self.slots[effect as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Effect, Vector3<f64>)> + '_ {
        Effect::ALL.iter().map(|e| (*e, self.slots[*e as usize]))
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_start_zero_and_accumulate() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.get(Effect::SrpAccel), Vector3::zeros());
        ledger.add(Effect::SrpAccel, Vector3::new(1.0, 0.0, 0.0));
        ledger.add(Effect::SrpAccel, Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(ledger.get(Effect::SrpAccel), Vector3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn iteration_covers_every_effect_once() {
        let ledger = Ledger::new();
        assert_eq!(ledger.iter().count(), Effect::ALL.len());
    }

    #[test]
    fn torque_classification() {
        assert!(Effect::DamperTorque.is_torque());
        assert!(!Effect::MoonAccel.is_torque());
    }
}
