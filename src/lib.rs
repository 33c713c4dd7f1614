//! `wacc-calc` library crate.
//!
//! The binary (`wacc`) is a thin wrapper around this library so that:
//!
//! - the lookup and formula pipeline is testable without spawning processes
//! - other hosts (an HTTP layer, notebooks) can call [`compute_wacc`] directly
//! - logging stays injected: the library reports through [`events::EventSink`]

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod events;
pub mod formula;
pub mod io;
pub mod math;
pub mod report;
pub mod resolve;

pub use app::pipeline::{compute_wacc, list_activities};
pub use domain::{WaccRequest, WaccResult};
pub use error::WaccError;
