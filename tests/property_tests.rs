//! Property and fuzz-style tests for robustness of the pipeline stages.
//!
//! These hammer the stages with arbitrary inputs: the filter must never
//! pass sub-window glitches, the policy table must stay pure, the
//! override must always win, and the transmitter must never wedge.

use growbox::app::events::ControllerEvent;
use growbox::app::ports::{EventSink, InputPort, OutputPort};
use growbox::app::service::EnclosureService;
use growbox::arbiter::{ActuatorState, FaultArbiter};
use growbox::config::SystemConfig;
use growbox::filter::SensorFilter;
use growbox::io::{ControlWord, InputFrame, Level, OutputFrame, Reading, SensorWord};
use growbox::policy::{self, ActuatorIntent};
use growbox::profile::CropProfile;
use growbox::telemetry::SerialTransmitter;
use proptest::prelude::*;

const WINDOW: u32 = 4;

fn arb_level() -> impl Strategy<Value = Level> {
    (0u8..=2).prop_map(Level::from_bits)
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (arb_level(), arb_level(), arb_level(), arb_level()).prop_map(
        |(soil, light, humidity, temperature)| Reading {
            soil,
            light,
            humidity,
            temperature,
        },
    )
}

// ── Filter: glitch rejection ──────────────────────────────────

/// Bursts shorter than the window, each at a different level than its
/// predecessor so runs never merge.
fn arb_glitch_bursts() -> impl Strategy<Value = Vec<(u8, u32)>> {
    proptest::collection::vec((0u8..=1, 1..WINDOW), 1..=60)
}

proptest! {
    /// No sequence of sub-window bursts may ever change the filtered
    /// reading away from its boot value.
    #[test]
    fn glitches_shorter_than_the_window_never_qualify(bursts in arb_glitch_bursts()) {
        let mut filter = SensorFilter::new(WINDOW);
        let mut code = Level::High.bits();
        for (step, len) in bursts {
            // Step by 1 or 2 mod 3: always a different level than the
            // previous burst (and than the boot candidate).
            code = (code + 1 + step) % 3;
            let level = Level::from_bits(code);
            for _ in 0..len {
                let changed = filter.tick(Reading::uniform(level));
                prop_assert!(changed.is_empty(), "qualified on a {len}-tick burst");
            }
        }
        prop_assert_eq!(filter.reading(), Reading::uniform(Level::High));
    }

    /// Any level held for a full window qualifies, whatever came before.
    #[test]
    fn a_full_window_of_agreement_always_qualifies(
        bursts in arb_glitch_bursts(),
        target in 0u8..=2,
    ) {
        let mut filter = SensorFilter::new(WINDOW);
        for (step, len) in bursts {
            for _ in 0..len {
                let _ = filter.tick(Reading::uniform(Level::from_bits(step)));
            }
        }
        let level = Level::from_bits(target);
        for _ in 0..2 * WINDOW {
            let _ = filter.tick(Reading::uniform(level));
        }
        prop_assert_eq!(filter.reading(), Reading::uniform(level));
    }
}

// ── Policy: purity and table shape ────────────────────────────

proptest! {
    #[test]
    fn policy_is_a_pure_table_lookup(bits in any::<u8>(), reading in arb_reading()) {
        let profile = CropProfile::from_bits(bits);
        prop_assert_eq!(
            policy::evaluate(profile, reading),
            policy::evaluate(profile, reading)
        );
    }

    /// Watering and lighting are shared plumbing: no profile may alter
    /// them.
    #[test]
    fn watering_and_lighting_ignore_the_profile(reading in arb_reading()) {
        let base = policy::evaluate(CropProfile::Radish, reading);
        for profile in CropProfile::ALL {
            let intent = policy::evaluate(profile, reading);
            prop_assert_eq!(intent.pump, base.pump, "{}", profile);
            prop_assert_eq!(intent.light, base.light, "{}", profile);
        }
    }

    /// The shipped table never demands heating and cooling together;
    /// the arbiter's conflict fault guards future table edits.
    #[test]
    fn no_profile_heats_and_cools_together(bits in any::<u8>(), reading in arb_reading()) {
        let intent = policy::evaluate(CropProfile::from_bits(bits), reading);
        prop_assert!(!(intent.heater && intent.cooler));
    }
}

// ── Arbiter: the override always wins ─────────────────────────

proptest! {
    #[test]
    fn override_always_zeroes_the_outputs(
        intent_bits in 0u8..32,
        reading in arb_reading(),
        extreme_enabled in any::<bool>(),
    ) {
        let config = SystemConfig {
            extreme_fault_enabled: extreme_enabled,
            ..Default::default()
        };
        let mut arbiter = FaultArbiter::new(&config);
        let intent = ActuatorIntent {
            pump: intent_bits & 1 != 0,
            heater: intent_bits & 2 != 0,
            cooler: intent_bits & 4 != 0,
            light: intent_bits & 8 != 0,
            dehumidifier: intent_bits & 16 != 0,
        };

        // Let any fault latch first, then engage the override.
        let _ = arbiter.evaluate(intent, reading, false);
        let state = arbiter.evaluate(intent, reading, true);

        prop_assert_eq!(state, ActuatorState::OFF);
        prop_assert_eq!(arbiter.faults(), 0, "override must drop latched causes");
    }
}

// ── Transmitter: wire fidelity and liveness ───────────────────

proptest! {
    /// Every status byte crosses the wire intact at every bit period.
    #[test]
    fn any_status_byte_survives_the_wire(status in any::<u8>(), ticks_per_bit in 1u32..=6) {
        let mut tx = SerialTransmitter::new(ticks_per_bit);
        let _ = tx.tick(false, 0);
        let first = tx.tick(true, status);
        prop_assert!(first.started);

        let n = ticks_per_bit as usize;
        let mut line = vec![first.line];
        for _ in 1..10 * n {
            line.push(tx.tick(true, status).line);
        }

        for period in 0..10 {
            let window = &line[period * n..(period + 1) * n];
            prop_assert!(
                window.iter().all(|&l| l == window[0]),
                "line moved inside bit period {}", period
            );
        }
        prop_assert!(!line[0], "start bit must be low");
        let mut decoded = 0u8;
        for b in 0..8 {
            if line[(1 + b) * n] {
                decoded |= 1 << b;
            }
        }
        prop_assert_eq!(decoded, status);
        prop_assert!(line[9 * n], "stop bit must be high");

        // Held flag, no new edge: the line goes back to idle.
        let after = tx.tick(true, status);
        prop_assert!(after.line);
        prop_assert!(tx.is_idle());
    }

    /// Arbitrary fault waveforms must never wedge the transmitter: once
    /// the flag settles low, at most one in-flight frame remains.
    #[test]
    fn transmitter_always_returns_to_idle(
        faults in proptest::collection::vec(any::<bool>(), 1..=120),
        ticks_per_bit in 1u32..=5,
    ) {
        let mut tx = SerialTransmitter::new(ticks_per_bit);
        for fault in &faults {
            let _ = tx.tick(*fault, 0xA5);
        }

        let mut line = false;
        for _ in 0..10 * ticks_per_bit + 1 {
            line = tx.tick(false, 0xA5).line;
        }
        prop_assert!(tx.is_idle(), "transmitter wedged after the flag dropped");
        prop_assert!(line);
    }
}

// ── Whole pipeline: reset is always a clean slate ─────────────

struct PlaybackHw {
    frame: InputFrame,
    last: OutputFrame,
}

impl InputPort for PlaybackHw {
    fn sample(&mut self) -> InputFrame {
        self.frame
    }
}

impl OutputPort for PlaybackHw {
    fn apply(&mut self, frame: OutputFrame) {
        self.last = frame;
    }
}

struct NullSink;
impl EventSink for NullSink {
    fn emit(&mut self, _event: &ControllerEvent) {}
}

proptest! {
    /// Whatever garbage was on the bus before, reset restores the
    /// boot-neutral pipeline and the next tick drives a quiet bus.
    #[test]
    fn reset_restores_a_neutral_pipeline(
        words in proptest::collection::vec((any::<u8>(), any::<u8>(), any::<bool>()), 1..=150),
    ) {
        let config = SystemConfig {
            qualify_window_ticks: 2,
            ticks_per_bit: 2,
            snapshot_interval_ticks: 0,
            ..Default::default()
        };
        let mut svc = EnclosureService::new(config).unwrap();
        let mut sink = NullSink;
        let mut hw = PlaybackHw {
            frame: InputFrame::default(),
            last: OutputFrame::default(),
        };
        svc.start(&mut sink);

        for (sensors, control, heartbeat) in words {
            hw.frame = InputFrame {
                sensors: SensorWord(sensors),
                control: ControlWord(control),
                heartbeat,
            };
            svc.tick(&mut hw, &mut sink);
        }

        svc.reset(&mut sink);
        let snap = svc.build_snapshot();
        prop_assert_eq!(snap.filtered, Reading::uniform(Level::High));
        prop_assert_eq!(snap.actuators, ActuatorState::OFF);
        prop_assert_eq!(snap.fault_causes, 0);
        prop_assert!(!snap.tx_busy);

        hw.frame = InputFrame {
            sensors: SensorWord::pack(Reading::uniform(Level::High)),
            control: ControlWord::default(),
            heartbeat: false,
        };
        svc.tick(&mut hw, &mut sink);
        prop_assert_eq!(hw.last.word_a, 0);
        prop_assert!(hw.last.serial_high());
    }
}
