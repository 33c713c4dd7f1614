//! WACC formula engine.
//!
//! Implemented as small, pure functions so the resolver and the CLI stay
//! free of finance math.

pub mod wacc;

pub use wacc::*;
