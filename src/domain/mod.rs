//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - table and field identifiers (`TableId`, `MacroField`, `IPCA_INDICES`)
//! - normalized reference rows (`ActivityRecord`, `SizePremiumBand`)
//! - the request, the resolved parameter set and the result (`WaccRequest`,
//!   `ResolvedParameters`, `WaccResult`)

pub mod types;

pub use types::*;
