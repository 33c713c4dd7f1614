//! Structured events emitted while resolving and computing a WACC.
//!
//! The library never installs a global logger. Callers pass an optional
//! [`EventSink`]; the binary uses [`TracingSink`], which forwards to `tracing`.

use tracing::{debug, info, warn};

use crate::domain::TableId;

/// Something worth reporting during one computation.
#[derive(Debug, Clone, PartialEq)]
pub enum WaccEvent<'a> {
    TableLoaded { table: TableId, rows: usize },
    ActivityResolved { activity: &'a str },
    /// `IR` was forced to zero because the company is not under real profit.
    IncomeTaxZeroed { table_value: f64 },
    /// No size band contains the company value; the premium falls back to zero.
    SizePremiumOutOfRange { company_value: f64 },
    SizePremiumResolved { company_value: f64, premium: f64 },
    Computed { activity: &'a str, wacc_nominal: f64, wacc_real: f64 },
    Failed { activity: &'a str, reason: String },
}

/// Receiver for [`WaccEvent`]s.
pub trait EventSink {
    fn record(&self, event: &WaccEvent<'_>);
}

/// Forwards events to `tracing` at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &WaccEvent<'_>) {
        match event {
            WaccEvent::TableLoaded { table, rows } => {
                debug!(table = %table, rows, "table loaded");
            }
            WaccEvent::ActivityResolved { activity } => {
                debug!(activity, "activity resolved");
            }
            WaccEvent::IncomeTaxZeroed { table_value } => {
                debug!(table_value, "IR forced to 0 (not under real profit)");
            }
            WaccEvent::SizePremiumOutOfRange { company_value } => {
                warn!(company_value, "company value outside every size band, premium set to 0");
            }
            WaccEvent::SizePremiumResolved { company_value, premium } => {
                debug!(company_value, premium, "size premium resolved");
            }
            WaccEvent::Computed {
                activity,
                wacc_nominal,
                wacc_real,
            } => {
                info!(activity, wacc_nominal, wacc_real, "WACC computed");
            }
            WaccEvent::Failed { activity, reason } => {
                warn!(activity, reason = reason.as_str(), "WACC computation failed");
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &WaccEvent<'_>) {}
}

pub(crate) fn emit(sink: Option<&dyn EventSink>, event: WaccEvent<'_>) {
    if let Some(sink) = sink {
        sink.record(&event);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps a debug rendering of every event, for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub fn names(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.split([' ', '{']).next().unwrap_or_default().to_string())
                .collect()
        }

        pub fn contains(&self, name: &str) -> bool {
            self.names().iter().any(|n| n == name)
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: &WaccEvent<'_>) {
            self.events.lock().unwrap().push(format!("{event:?}"));
        }
    }
}
