//! Application service — the hexagonal core.
//!
//! [`EnclosureService`] owns every pipeline stage and advances them in
//! strict order once per tick. All I/O flows through port traits
//! injected at call sites, making the whole pipeline testable with mock
//! adapters.
//!
//! ```text
//!  InputPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                │       EnclosureService         │
//! OutputPort ◀── │ Filter · Policy · Arbiter · TX │
//!                └───────────────────────────────┘
//! ```
//!
//! The transmitter is fed the fault flag computed on the *previous*
//! tick, so its launch decision never races the arbitration happening
//! on the current one.

use log::{info, warn};

use crate::arbiter::{ActuatorState, FaultArbiter};
use crate::config::SystemConfig;
use crate::diagnostics::{FaultHistory, FaultRecord, RuntimeMetrics};
use crate::error::ConfigError;
use crate::filter::SensorFilter;
use crate::io::{OutputFrame, Reading};
use crate::policy;
use crate::profile::CropProfile;
use crate::telemetry::{SerialTransmitter, status_byte};

use super::events::{ControllerEvent, StatusSnapshot};
use super::ports::{EventSink, InputPort, OutputPort};

// ───────────────────────────────────────────────────────────────
// EnclosureService
// ───────────────────────────────────────────────────────────────

/// The controller core. One instance owns the filter, the arbiter and
/// the serial transmitter.
pub struct EnclosureService {
    config: SystemConfig,
    filter: SensorFilter,
    arbiter: FaultArbiter,
    tx: SerialTransmitter,
    /// Fault flag computed on the previous tick — what the transmitter
    /// observes this tick.
    fault_seen: bool,
    /// Previous tick's override level, for edge events.
    prev_override: bool,
    /// Previous tick's cause mask, for raise/clear events.
    prev_causes: u8,
    /// Most recent final actuator word, for snapshots.
    last_state: ActuatorState,
    last_profile: CropProfile,
    tick_count: u64,
    metrics: RuntimeMetrics,
    history: FaultHistory,
}

impl EnclosureService {
    /// Construct the service from a configuration. Rejects invalid
    /// configs before any stage is built.
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            filter: SensorFilter::new(config.qualify_window_ticks),
            arbiter: FaultArbiter::new(&config),
            tx: SerialTransmitter::new(config.ticks_per_bit),
            fault_seen: false,
            prev_override: false,
            prev_causes: 0,
            last_state: ActuatorState::OFF,
            last_profile: CropProfile::Radish,
            tick_count: 0,
            metrics: RuntimeMetrics::default(),
            history: FaultHistory::new(),
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the controller. Call once before ticking.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&ControllerEvent::Started);
        info!(
            "EnclosureService started (window={} ticks, bit period={} ticks)",
            self.config.qualify_window_ticks, self.config.ticks_per_bit
        );
    }

    /// Synchronous reset line: every pipeline stage returns to its
    /// initial state and any in-flight serial frame is abandoned.
    ///
    /// The tick counter, metrics and fault history survive — they
    /// describe the device's lifetime, not the pipeline's.
    pub fn reset(&mut self, sink: &mut impl EventSink) {
        self.filter.reset();
        self.arbiter.reset();
        self.tx.reset();
        self.fault_seen = false;
        self.prev_override = false;
        self.prev_causes = 0;
        self.last_state = ActuatorState::OFF;
        self.last_profile = CropProfile::Radish;
        self.metrics.resets += 1;
        warn!("pipeline reset");
        sink.emit(&ControllerEvent::Started);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control tick: sample → filter → policy → arbitrate
    /// → transmit → drive outputs.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`OutputPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(&mut self, hw: &mut (impl InputPort + OutputPort), sink: &mut impl EventSink) {
        self.tick_count += 1;
        self.metrics.total_ticks += 1;

        // 1. Sample both input words and the heartbeat.
        let input = hw.sample();
        let override_on = input.control.override_flag();
        let profile = CropProfile::from_bits(input.control.profile_bits());

        // 2. Qualify raw sensor codes.
        let qualified = self.filter.tick(input.sensors.decode());
        for (channel, level) in &qualified {
            self.metrics.readings_qualified += 1;
            sink.emit(&ControllerEvent::ReadingQualified {
                channel: *channel,
                level: *level,
            });
        }
        let filtered = self.filter.reading();

        // 3. Policy table lookup (pure).
        let intent = policy::evaluate(profile, filtered);

        // 4. Override masking and fault arbitration.
        let state = self.arbiter.evaluate(intent, filtered, override_on);
        self.note_override_edges(override_on, sink);
        self.note_fault_edges(sink);

        // 5. Serial transmitter, one tick behind the fault flag.
        let status = status_byte(state, self.arbiter.faults());
        let step = self.tx.tick(self.fault_seen, status);
        if step.started {
            self.metrics.frames_started += 1;
            sink.emit(&ControllerEvent::FrameStarted { status });
        }
        if step.completed {
            self.metrics.frames_completed += 1;
            sink.emit(&ControllerEvent::FrameCompleted);
        }
        self.fault_seen = state.fault;

        // 6. Drive both output words.
        hw.apply(OutputFrame::new(state.word_a(input.heartbeat), step.line));
        self.last_state = state;
        self.last_profile = profile;

        // 7. Periodic snapshot.
        if self.config.snapshot_interval_ticks != 0
            && self.tick_count % self.config.snapshot_interval_ticks == 0
        {
            sink.emit(&ControllerEvent::Snapshot(self.build_snapshot()));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current qualified reading.
    pub fn filtered(&self) -> Reading {
        self.filter.reading()
    }

    /// Current fault-cause bitmask (0 = no faults).
    pub fn fault_causes(&self) -> u8 {
        self.arbiter.faults()
    }

    /// Total control ticks executed. Monotonic across resets.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Lifetime counters.
    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// Recent fault raises.
    pub fn fault_history(&self) -> &FaultHistory {
        &self.history
    }

    /// Build a status snapshot from the most recent tick.
    pub fn build_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            tick: self.tick_count,
            profile: self.last_profile,
            filtered: self.filter.reading(),
            actuators: self.last_state,
            fault_causes: self.arbiter.faults(),
            override_on: self.prev_override,
            tx_busy: !self.tx.is_idle(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn note_override_edges(&mut self, override_on: bool, sink: &mut impl EventSink) {
        if override_on && !self.prev_override {
            self.metrics.override_engagements += 1;
            info!("override engaged: all actuators forced off");
            sink.emit(&ControllerEvent::OverrideEngaged);
        } else if !override_on && self.prev_override {
            info!("override released");
            sink.emit(&ControllerEvent::OverrideReleased);
        }
        self.prev_override = override_on;
    }

    fn note_fault_edges(&mut self, sink: &mut impl EventSink) {
        let causes = self.arbiter.faults();
        if causes != 0 && self.prev_causes == 0 {
            warn!("fault flag asserted, causes=0b{causes:08b}");
            self.metrics.faults_raised += 1;
            self.history.record(FaultRecord {
                tick: self.tick_count,
                causes,
            });
            sink.emit(&ControllerEvent::FaultRaised { causes });
        } else if causes == 0 && self.prev_causes != 0 {
            sink.emit(&ControllerEvent::FaultCleared);
        }
        self.prev_causes = causes;
    }
}
