//! Input/output helpers.
//!
//! - reference-table loading and lookups (`table`)
//! - result exports (JSON) (`export`)

pub mod export;
pub mod table;

pub use export::*;
pub use table::*;
