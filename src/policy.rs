//! Policy engine.
//!
//! One pure function from (profile, filtered reading) to the demanded
//! actuator set. Everything crop-specific is table data in
//! [`crate::profile`]; this module never branches on the profile.

use crate::io::Reading;
use crate::profile::CropProfile;

/// Demanded actuator set for one tick, before override/fault
/// arbitration. Recomputed whole every tick; carries no memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorIntent {
    pub pump: bool,
    pub heater: bool,
    pub cooler: bool,
    pub light: bool,
    pub dehumidifier: bool,
}

impl ActuatorIntent {
    pub const OFF: Self = Self {
        pump: false,
        heater: false,
        cooler: false,
        light: false,
        dehumidifier: false,
    };
}

/// Evaluate the trigger table against a filtered reading.
///
/// Pure and total: the same (profile, reading) pair always yields the
/// same intent, for every raw profile selector and every level.
pub fn evaluate(profile: CropProfile, reading: Reading) -> ActuatorIntent {
    let t = profile.thresholds();
    ActuatorIntent {
        pump: t.pump_on.contains(reading.soil),
        heater: t.heat_on.contains(reading.temperature),
        cooler: t.cool_on.contains(reading.temperature),
        light: t.light_on.contains(reading.light),
        dehumidifier: t.dehumidify_on.contains(reading.humidity),
    }
}
