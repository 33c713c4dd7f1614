//! Numeric helpers.
//!
//! - locale-aware parsing of table values (`locale`)

pub mod locale;

pub use locale::*;
