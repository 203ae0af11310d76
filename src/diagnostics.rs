//! Fault history and runtime metrics.
//!
//! Keeps the last 8 fault raises in a fixed ring so an operator can read
//! back what tripped the flag, plus plain counters the simulator dumps
//! at the end of a run. Both live outside the tick pipeline and survive
//! a pipeline reset.

use serde::{Deserialize, Serialize};

const FAULT_RING_SLOTS: usize = 8;

/// One fault raise: when and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Tick count at the moment the cause mask became non-zero.
    pub tick: u64,
    /// Cause bitmask captured at the raise.
    pub causes: u8,
}

/// Fixed-capacity ring of the most recent fault raises.
#[derive(Debug, Default)]
pub struct FaultHistory {
    slots: heapless::Vec<FaultRecord, FAULT_RING_SLOTS>,
    write_index: usize,
}

impl FaultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raise, overwriting the oldest entry once the ring is full.
    pub fn record(&mut self, record: FaultRecord) {
        if self.slots.is_full() {
            self.slots[self.write_index] = record;
        } else {
            let _ = self.slots.push(record);
        }
        self.write_index = (self.write_index + 1) % FAULT_RING_SLOTS;
    }

    /// Stored records in slot order (wraps once full).
    pub fn entries(&self) -> &[FaultRecord] {
        &self.slots
    }

    /// The most recently recorded raise.
    pub fn latest(&self) -> Option<&FaultRecord> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.write_index + FAULT_RING_SLOTS - 1) % FAULT_RING_SLOTS;
        self.slots.get(idx)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.write_index = 0;
    }
}

/// Counters accumulated by the service across its whole lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeMetrics {
    pub total_ticks: u64,
    pub readings_qualified: u32,
    pub faults_raised: u32,
    pub override_engagements: u32,
    pub frames_started: u32,
    pub frames_completed: u32,
    pub resets: u32,
}
