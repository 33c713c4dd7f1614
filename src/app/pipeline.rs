//! Shared WACC pipeline used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve parameters -> evaluate formula chain -> check figures -> package result
//!
//! Front-ends (the CLI here, an HTTP layer elsewhere) only parse input and
//! present the output.

use crate::domain::{TableId, WaccBreakdown, WaccRequest, WaccResult};
use crate::error::WaccError;
use crate::events::{EventSink, WaccEvent, emit};
use crate::formula::{evaluate, to_result};
use crate::io::table::{TableSource, distinct_values};
use crate::resolve::{ACTIVITY_COLUMN, resolve_parameters};

/// Compute the WACC for one request.
///
/// Tables are read afresh from `source` on every call.
pub fn compute_wacc(
    source: &dyn TableSource,
    request: &WaccRequest,
    sink: Option<&dyn EventSink>,
) -> Result<WaccResult, WaccError> {
    match run(source, request, sink) {
        Ok(result) => {
            emit(sink, WaccEvent::Computed {
                activity: &request.activity,
                wacc_nominal: result.wacc_nominal,
                wacc_real: result.wacc_real,
            });
            Ok(result)
        }
        Err(err) => {
            emit(sink, WaccEvent::Failed {
                activity: &request.activity,
                reason: err.to_string(),
            });
            Err(err)
        }
    }
}

/// Distinct activity names, in table order.
pub fn list_activities(source: &dyn TableSource) -> Result<Vec<String>, WaccError> {
    let table = source
        .load_table(TableId::Activities)
        .map_err(|e| WaccError::source_read(TableId::Activities, e.to_string()))?;
    Ok(distinct_values(&table, ACTIVITY_COLUMN))
}

fn run(
    source: &dyn TableSource,
    request: &WaccRequest,
    sink: Option<&dyn EventSink>,
) -> Result<WaccResult, WaccError> {
    let params = resolve_parameters(source, request, sink)?;

    let breakdown = evaluate(&params);
    ensure_finite_figures(&breakdown)?;

    Ok(to_result(&params, &breakdown))
}

fn ensure_finite_figures(breakdown: &WaccBreakdown) -> Result<(), WaccError> {
    match breakdown.figures().into_iter().find(|(_, v)| !v.is_finite()) {
        Some((name, value)) => Err(WaccError::InternalComputationError(format!("{name} evaluated to {value}"))),
        None => Ok(()),
    }
}
