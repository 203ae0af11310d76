//! Scenario-driven enclosure simulator for local development.
//!
//! Models the quantized sensor interface the controller sees in situ:
//! - Temporal coherence via per-channel random walks with drift
//! - Occasional single-tick spikes, including the reserved code 3,
//!   which the filter and decode clamp must absorb
//! - An optional operator-override window
//! - The collaborator heartbeat toggle

use core::fmt;

use crate::app::ports::{InputPort, OutputPort};
use crate::io::{ControlWord, InputFrame, OutputFrame, SensorWord};
use crate::profile::CropProfile;

/// Heartbeat half-period in ticks (~10 ms at the reference tick rate).
const HEARTBEAT_HALF_PERIOD: u64 = 250_000;

// ───────────────────────────────────────────────────────────────
// Scenario presets
// ───────────────────────────────────────────────────────────────

/// Pre-configured simulation profiles selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Everything hovers at healthy levels, rare spikes. A quiet loop.
    Calm,
    /// Heavy quantizer chatter: frequent single-tick spikes the filter
    /// must reject.
    Noisy,
    /// Soil dries and the bench darkens over the run; exercises the
    /// pump and grow-light paths.
    Drought,
    /// Every channel sags toward its extreme; exercises the heater,
    /// the dehumidifier and the all-extreme fault report.
    ColdSnap,
}

impl Scenario {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "noisy" => Self::Noisy,
            "drought" => Self::Drought,
            "coldsnap" | "cold-snap" | "cold_snap" => Self::ColdSnap,
            _ => Self::Calm,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Calm => write!(f, "calm"),
            Self::Noisy => write!(f, "noisy"),
            Self::Drought => write!(f, "drought"),
            Self::ColdSnap => write!(f, "coldsnap"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Per-channel state
// ───────────────────────────────────────────────────────────────

/// Hidden continuous state behind one quantized channel.
struct ChannelSim {
    /// "True" value in [0, 3); the emitted code is its integer part.
    value: f64,
    /// Per-tick pull applied before the walk (negative = decay).
    drift: f64,
    /// Uniform walk amplitude per tick.
    walk_sigma: f64,
    /// Probability of replacing this tick's code with a random one.
    spike_prob: f64,
}

impl ChannelSim {
    fn tick(&mut self, rng: &mut fastrand::Rng) -> u8 {
        let noise = (rng.f64() - 0.5) * self.walk_sigma;
        self.value = (self.value + self.drift + noise).clamp(0.0, 2.99);

        if rng.f64() < self.spike_prob {
            // Single-tick glitch; may emit the reserved code.
            return rng.u8(0..4);
        }
        self.value as u8
    }
}

/// Channel parameter sets per scenario, in word A packing order
/// (soil, light, humidity, temperature).
fn channels_for(scenario: Scenario) -> [ChannelSim; 4] {
    let steady = |value: f64| ChannelSim {
        value,
        drift: 0.0,
        walk_sigma: 0.02,
        spike_prob: 0.0005,
    };
    let decaying = |value: f64, drift: f64| ChannelSim {
        value,
        drift,
        walk_sigma: 0.02,
        spike_prob: 0.0005,
    };
    let chattering = |value: f64| ChannelSim {
        value,
        drift: 0.0,
        walk_sigma: 0.12,
        spike_prob: 0.05,
    };

    match scenario {
        Scenario::Calm => [steady(2.5), steady(2.5), steady(2.5), steady(2.5)],
        Scenario::Noisy => [
            chattering(1.5),
            chattering(1.5),
            chattering(1.5),
            chattering(1.5),
        ],
        Scenario::Drought => [
            decaying(2.5, -3.0e-6),
            decaying(2.5, -2.0e-6),
            steady(2.5),
            steady(2.5),
        ],
        Scenario::ColdSnap => [
            decaying(2.5, -3.5e-6),
            decaying(2.5, -3.5e-6),
            decaying(2.5, -4.0e-6),
            decaying(2.5, -5.0e-6),
        ],
    }
}

// ───────────────────────────────────────────────────────────────
// Harness
// ───────────────────────────────────────────────────────────────

/// Implements both ports against the scenario model, and captures what
/// the controller drives back.
pub struct SimHarness {
    channels: [ChannelSim; 4],
    rng: fastrand::Rng,
    profile: CropProfile,
    /// Override asserted for ticks in `[start, end)`.
    override_window: Option<(u64, u64)>,
    tick: u64,
    /// Most recent output frame driven by the controller.
    pub last_output: OutputFrame,
    /// Falling edges seen on the serial line (start bits).
    pub line_falls: u32,
}

impl SimHarness {
    pub fn new(scenario: Scenario, profile: CropProfile, seed: u64) -> Self {
        Self {
            channels: channels_for(scenario),
            rng: fastrand::Rng::with_seed(seed),
            profile,
            override_window: None,
            tick: 0,
            last_output: OutputFrame::default(),
            line_falls: 0,
        }
    }

    /// Assert the operator override for ticks in `[start, end)`.
    pub fn set_override_window(&mut self, start: u64, end: u64) {
        self.override_window = Some((start, end));
    }

    fn override_active(&self) -> bool {
        match self.override_window {
            Some((start, end)) => self.tick >= start && self.tick < end,
            None => false,
        }
    }
}

impl InputPort for SimHarness {
    fn sample(&mut self) -> InputFrame {
        let codes: [u8; 4] = [
            self.channels[0].tick(&mut self.rng),
            self.channels[1].tick(&mut self.rng),
            self.channels[2].tick(&mut self.rng),
            self.channels[3].tick(&mut self.rng),
        ];
        let word = codes[0] << 6 | codes[1] << 4 | codes[2] << 2 | codes[3];
        let heartbeat = (self.tick / HEARTBEAT_HALF_PERIOD) % 2 == 0;
        let frame = InputFrame {
            sensors: SensorWord(word),
            control: ControlWord::compose(self.profile.bits(), self.override_active()),
            heartbeat,
        };
        self.tick += 1;
        frame
    }
}

impl OutputPort for SimHarness {
    fn apply(&mut self, frame: OutputFrame) {
        if self.last_output.serial_high() && !frame.serial_high() {
            self.line_falls += 1;
        }
        self.last_output = frame;
    }
}
