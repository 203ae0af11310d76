//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the enclosure
//! controller: sensor qualification, policy evaluation, override/fault
//! arbitration and telemetry orchestration. All interaction with the
//! outside world happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real hardware.

pub mod events;
pub mod ports;
pub mod service;
