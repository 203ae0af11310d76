//! GrowBox enclosure controller library.
//!
//! Exposes the pure-logic pipeline stages for integration testing and
//! external inspection. Everything here is host-runnable; hardware
//! specifics live behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod arbiter;
pub mod config;
pub mod diagnostics;
pub mod filter;
pub mod io;
pub mod policy;
pub mod profile;
pub mod telemetry;

pub mod error;

pub mod adapters;
