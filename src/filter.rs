//! Sensor qualification filter.
//!
//! Raw sensor codes bounce — quantizer chatter at level boundaries and
//! single-tick glitches are expected. Each channel keeps a candidate
//! level and a run-length counter of consecutive ticks the raw code has
//! matched it. Only after a full qualification window does the candidate
//! become the stable value; any change of raw code restarts the count at
//! one, with no partial credit.
//!
//! At boot (and after reset) every channel reads `High`, the neutral
//! code that demands no actuator, until the first real value qualifies.
//! This stage cannot fail — it only delays propagation.

use crate::io::{Channel, Level, Reading};

/// Qualification state for a single channel.
#[derive(Debug, Clone, Copy)]
struct ChannelFilter {
    stable: Level,
    candidate: Level,
    run: u32,
}

impl ChannelFilter {
    const fn new() -> Self {
        Self {
            stable: Level::High,
            candidate: Level::High,
            run: 0,
        }
    }

    /// Advance one tick. Returns `true` when the stable value changed.
    fn tick(&mut self, raw: Level, window: u32) -> bool {
        if raw == self.candidate {
            self.run += 1;
        } else {
            self.candidate = raw;
            self.run = 1;
        }

        if self.run >= window {
            self.run = 0;
            if self.candidate != self.stable {
                self.stable = self.candidate;
                return true;
            }
        }
        false
    }
}

/// Four independent channel filters advancing in lockstep.
///
/// Channel order matches [`Channel::ALL`].
#[derive(Debug, Clone)]
pub struct SensorFilter {
    channels: [ChannelFilter; 4],
    window: u32,
}

impl SensorFilter {
    pub fn new(window: u32) -> Self {
        Self {
            channels: [ChannelFilter::new(); 4],
            window,
        }
    }

    /// Advance all channels one tick against the raw decode of input
    /// word A. Returns the channels whose stable value changed, with
    /// their newly qualified levels.
    pub fn tick(&mut self, raw: Reading) -> heapless::Vec<(Channel, Level), 4> {
        let mut changed = heapless::Vec::new();
        for (slot, channel) in self.channels.iter_mut().zip(Channel::ALL) {
            if slot.tick(raw.get(channel), self.window) {
                let _ = changed.push((channel, slot.stable));
            }
        }
        changed
    }

    /// Current qualified reading.
    pub fn reading(&self) -> Reading {
        Reading {
            soil: self.channels[0].stable,
            light: self.channels[1].stable,
            humidity: self.channels[2].stable,
            temperature: self.channels[3].stable,
        }
    }

    /// Synchronous reset back to the boot-safe all-`High` state.
    pub fn reset(&mut self) {
        self.channels = [ChannelFilter::new(); 4];
    }
}
