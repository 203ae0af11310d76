//! Override & fault arbiter.
//!
//! Runs every tick between the policy engine and the output stage.
//!
//! ## Fault lifecycle
//!
//! 1. A condition triggers a cause (heater/cooler conflict, or every
//!    channel at its extreme).
//! 2. The arbiter sets the corresponding bit in its cause mask and the
//!    external fault flag asserts.
//! 3. Each tick the conditions are re-evaluated; a cleared condition
//!    unsets its bit. The flag stays asserted until *every* cause is
//!    resolved.
//! 4. Engaging the override drops all actuator outputs, the flag, and
//!    the cause mask on the same tick, with no hysteresis.

use log::{error, info};

use crate::config::SystemConfig;
use crate::error::FaultCode;
use crate::io::{Level, OutputFrame, Reading};
use crate::policy::ActuatorIntent;

/// Final actuator word for one tick: the policy intent masked by the
/// override, plus the derived fault flag. Recomputed whole every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub pump: bool,
    pub heater: bool,
    pub cooler: bool,
    pub light: bool,
    pub dehumidifier: bool,
    pub fault: bool,
}

impl ActuatorState {
    pub const OFF: Self = Self {
        pump: false,
        heater: false,
        cooler: false,
        light: false,
        dehumidifier: false,
        fault: false,
    };

    /// Pack into output word A, folding in the heartbeat passthrough.
    pub const fn word_a(self, heartbeat: bool) -> u8 {
        let mut w = 0;
        if self.pump {
            w |= OutputFrame::PUMP;
        }
        if self.heater {
            w |= OutputFrame::HEATER;
        }
        if self.cooler {
            w |= OutputFrame::COOLER;
        }
        if self.light {
            w |= OutputFrame::GROW_LIGHT;
        }
        if self.fault {
            w |= OutputFrame::FAULT;
        }
        if heartbeat {
            w |= OutputFrame::HEARTBEAT;
        }
        if self.dehumidifier {
            w |= OutputFrame::DEHUMIDIFIER;
        }
        w
    }
}

/// Override & fault arbiter.
pub struct FaultArbiter {
    /// Whether the all-channels-extreme cause is evaluated.
    extreme_rule: bool,
    /// Latched fault-cause bitmask.
    faults: u8,
}

impl FaultArbiter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            extreme_rule: config.extreme_fault_enabled,
            faults: 0,
        }
    }

    /// Arbitrate one tick: mask the intent with the override and update
    /// the fault causes against the filtered reading.
    pub fn evaluate(
        &mut self,
        intent: ActuatorIntent,
        filtered: Reading,
        override_on: bool,
    ) -> ActuatorState {
        if override_on {
            // Operator holds the enclosure off; causes drop with the outputs.
            self.clear_all();
            return ActuatorState::OFF;
        }

        self.eval_fault(
            FaultCode::ActuatorConflict,
            intent.heater && intent.cooler,
        );
        self.eval_fault(
            FaultCode::SensorsExtreme,
            self.extreme_rule && filtered == Reading::uniform(Level::Low),
        );

        ActuatorState {
            pump: intent.pump,
            heater: intent.heater,
            cooler: intent.cooler,
            light: intent.light,
            dehumidifier: intent.dehumidifier,
            fault: self.faults != 0,
        }
    }

    /// Current fault-cause bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** cause is active.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    /// Check if a specific cause is active.
    pub fn has_fault(&self, cause: FaultCode) -> bool {
        self.faults & cause.mask() != 0
    }

    /// Synchronous reset: drop every latched cause without logging.
    pub fn reset(&mut self) {
        self.faults = 0;
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Set or clear a cause bit based on a boolean condition.
    fn eval_fault(&mut self, cause: FaultCode, condition: bool) {
        if condition {
            if self.faults & cause.mask() == 0 {
                error!("FAULT SET: {cause}");
            }
            self.faults |= cause.mask();
        } else {
            if self.faults & cause.mask() != 0 {
                info!("FAULT CLEARED: {cause}");
            }
            self.faults &= !cause.mask();
        }
    }

    fn clear_all(&mut self) {
        if self.faults != 0 {
            info!("FAULT CLEARED: all causes (override engaged)");
        }
        self.faults = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> Reading {
        Reading::uniform(Level::High)
    }

    fn conflict_intent() -> ActuatorIntent {
        ActuatorIntent {
            heater: true,
            cooler: true,
            ..ActuatorIntent::OFF
        }
    }

    #[test]
    fn no_faults_passes_intent_through() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        let intent = ActuatorIntent {
            pump: true,
            light: true,
            ..ActuatorIntent::OFF
        };
        let state = arb.evaluate(intent, calm(), false);
        assert!(state.pump && state.light);
        assert!(!state.heater && !state.cooler && !state.dehumidifier);
        assert!(!state.fault);
        assert!(!arb.has_faults());
    }

    #[test]
    fn conflicting_demand_raises_fault() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        let state = arb.evaluate(conflict_intent(), calm(), false);
        assert!(state.fault);
        assert!(arb.has_fault(FaultCode::ActuatorConflict));
        assert!(!arb.has_fault(FaultCode::SensorsExtreme));
        // The conflicting intents still pass through; the flag reports them.
        assert!(state.heater && state.cooler);
    }

    #[test]
    fn fault_clears_when_condition_does() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        assert!(arb.evaluate(conflict_intent(), calm(), false).fault);
        let state = arb.evaluate(ActuatorIntent::OFF, calm(), false);
        assert!(!state.fault);
        assert!(!arb.has_faults());
    }

    #[test]
    fn extreme_reading_faults_only_when_rule_enabled() {
        let extreme = Reading::uniform(Level::Low);

        let mut arb = FaultArbiter::new(&SystemConfig::default());
        let state = arb.evaluate(ActuatorIntent::OFF, extreme, false);
        assert!(state.fault);
        assert!(arb.has_fault(FaultCode::SensorsExtreme));

        let config = SystemConfig {
            extreme_fault_enabled: false,
            ..Default::default()
        };
        let mut arb = FaultArbiter::new(&config);
        let state = arb.evaluate(ActuatorIntent::OFF, extreme, false);
        assert!(!state.fault);
        assert!(!arb.has_faults());
    }

    #[test]
    fn extreme_needs_all_four_channels() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        let mut nearly = Reading::uniform(Level::Low);
        nearly.temperature = Level::Mid;
        let state = arb.evaluate(ActuatorIntent::OFF, nearly, false);
        assert!(!state.fault);
    }

    #[test]
    fn override_zeroes_outputs_fault_and_causes_same_tick() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        arb.evaluate(conflict_intent(), Reading::uniform(Level::Low), false);
        assert!(arb.has_faults());

        let state = arb.evaluate(conflict_intent(), Reading::uniform(Level::Low), true);
        assert_eq!(state, ActuatorState::OFF);
        assert!(!arb.has_faults(), "override drops latched causes");
    }

    #[test]
    fn causes_return_after_override_releases() {
        let mut arb = FaultArbiter::new(&SystemConfig::default());
        arb.evaluate(conflict_intent(), calm(), true);
        let state = arb.evaluate(conflict_intent(), calm(), false);
        assert!(state.fault);
        assert!(arb.has_fault(FaultCode::ActuatorConflict));
    }

    #[test]
    fn word_a_bit_assignments() {
        let state = ActuatorState {
            pump: true,
            cooler: true,
            fault: true,
            ..ActuatorState::OFF
        };
        assert_eq!(state.word_a(false), 0b0001_0101);
        assert_eq!(state.word_a(true), 0b0011_0101);
        assert_eq!(ActuatorState::OFF.word_a(true), OutputFrame::HEARTBEAT);
    }
}
