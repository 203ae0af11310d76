//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to               |
//! |------------|--------------------|---------------------------|
//! | `log_sink` | EventSink          | Structured log output     |
//! | `sim`      | InputPort          | Scenario-driven model     |
//! |            | OutputPort         | Output capture + counters |

pub mod log_sink;
pub mod sim;
