//! Parameter resolution: joins the four reference tables into one
//! [`ResolvedParameters`] for a request.
//!
//! Every lookup failure is fatal and typed, with one exception: a company
//! value outside every size band resolves to a zero premium (and a warning
//! event).

use serde_json::Value;

use crate::domain::{
    ActivityRecord, IPCA_INDICES, MacroField, MacroParameters, ResolvedParameters, SizePremiumBand, TableId,
    WaccRequest,
};
use crate::error::WaccError;
use crate::events::{EventSink, WaccEvent, emit};
use crate::io::table::{Row, Table, TableSource, find_by_equality, range_bounds};
use crate::math::{parse_decimal_comma, percent_to_decimal, to_decimal};

pub const ACTIVITY_COLUMN: &str = "atividade";
pub const BETA_COLUMN: &str = "Beta";
pub const DE_COLUMN: &str = "DE";
pub const EV_SALES_COLUMN: &str = "EV/Sales";
pub const FIELD_COLUMN: &str = "Campo";
pub const INDEX_COLUMN: &str = "indice";
pub const VALUE_COLUMN: &str = "Valor";
pub const LOWER_BOUND_COLUMN: &str = "De";
pub const UPPER_BOUND_COLUMN: &str = "até";
pub const PREMIUM_COLUMN: &str = "Premio";

/// Resolve every input of the formula chain for `request`.
pub fn resolve_parameters(
    source: &dyn TableSource,
    request: &WaccRequest,
    sink: Option<&dyn EventSink>,
) -> Result<ResolvedParameters, WaccError> {
    let activities = load(source, TableId::Activities, sink)?;
    let activity = resolve_activity(&activities, &request.activity)?;
    emit(sink, WaccEvent::ActivityResolved {
        activity: &activity.activity_name,
    });

    let parameters = load(source, TableId::Parameters, sink)?;
    let mut macros = resolve_macros(&parameters)?;
    if !request.real_profit {
        emit(sink, WaccEvent::IncomeTaxZeroed { table_value: macros.ir });
        macros.ir = 0.0;
    }

    let ipca = load(source, TableId::Ipca, sink)?;
    let ipca_longo = resolve_ipca_longo(&ipca)?;

    let company_value = request.declared_revenue * activity.ev_to_sales;
    if !company_value.is_finite() {
        return Err(WaccError::InvalidInput(format!(
            "company value overflows (revenue {} x EV/Sales {})",
            request.declared_revenue, activity.ev_to_sales
        )));
    }
    let sizes = load(source, TableId::SizePremium, sink)?;
    let premium = match resolve_size_band(&sizes, company_value)? {
        Some(band) => {
            emit(sink, WaccEvent::SizePremiumResolved {
                company_value,
                premium: band.premium,
            });
            band.premium
        }
        None => {
            emit(sink, WaccEvent::SizePremiumOutOfRange { company_value });
            0.0
        }
    };

    Ok(ResolvedParameters {
        activity,
        macros,
        ipca_longo,
        premium,
        declared_revenue: request.declared_revenue,
        company_value,
        real_profit: request.real_profit,
    })
}

/// Look up `activity` in the activity table.
pub fn resolve_activity(table: &Table, activity: &str) -> Result<ActivityRecord, WaccError> {
    let row = find_by_equality(table, ACTIVITY_COLUMN, activity)
        .ok_or_else(|| WaccError::ActivityNotFound(activity.to_string()))?;

    Ok(ActivityRecord {
        activity_name: activity.trim().to_string(),
        beta: decimal_cell(table.id, row, BETA_COLUMN)?,
        debt_to_equity: decimal_cell(table.id, row, DE_COLUMN)?,
        ev_to_sales: decimal_cell(table.id, row, EV_SALES_COLUMN)?,
    })
}

/// Look up the seven macro fields (values in percent, `IR` as in the table).
pub fn resolve_macros(table: &Table) -> Result<MacroParameters, WaccError> {
    let mut macros = MacroParameters::default();
    for field in MacroField::ALL {
        let row = find_by_equality(table, FIELD_COLUMN, field.code()).ok_or(WaccError::ParameterMissing(field))?;
        // A row without a `Valor` cell is as good as a missing row.
        if row.get(VALUE_COLUMN).is_none_or(Value::is_null) {
            return Err(WaccError::ParameterMissing(field));
        }
        macros.set(field, decimal_cell(table.id, row, VALUE_COLUMN)?);
    }
    Ok(macros)
}

/// Average of the five IPCA points, as a decimal fraction.
///
/// A point written with `%` is a percentage (`"4,5%"` → `0.045`); otherwise
/// the value is taken as-is with `,` as decimal separator (`"0,045"`).
pub fn resolve_ipca_longo(table: &Table) -> Result<f64, WaccError> {
    let mut missing = Vec::new();
    let mut values = Vec::with_capacity(IPCA_INDICES.len());

    for index in IPCA_INDICES {
        match find_by_equality(table, INDEX_COLUMN, index).and_then(|row| row.get(VALUE_COLUMN)) {
            Some(cell) if !cell.is_null() => values.push(ipca_point(table.id, index, cell)?),
            _ => missing.push(index.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(WaccError::IpcaIncomplete { missing });
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// The size band containing `company_value`, if any.
///
/// The whole table is parsed first; a malformed row fails the lookup even
/// when an earlier band matches.
pub fn resolve_size_band(table: &Table, company_value: f64) -> Result<Option<SizePremiumBand>, WaccError> {
    Ok(size_bands(table)?.into_iter().find(|band| band.contains(company_value)))
}

/// Every band of the size-premium table, in table order.
pub fn size_bands(table: &Table) -> Result<Vec<SizePremiumBand>, WaccError> {
    let bounds = range_bounds(table, LOWER_BOUND_COLUMN, UPPER_BOUND_COLUMN)
        .map_err(|e| WaccError::source_read(table.id, e.to_string()))?;

    table
        .rows()
        .iter()
        .zip(bounds)
        .map(|(row, (lower_bound, upper_bound))| -> Result<_, WaccError> {
            Ok(SizePremiumBand {
                lower_bound,
                upper_bound,
                premium: decimal_cell(table.id, row, PREMIUM_COLUMN)?,
            })
        })
        .collect()
}

fn load(source: &dyn TableSource, id: TableId, sink: Option<&dyn EventSink>) -> Result<Table, WaccError> {
    let table = source
        .load_table(id)
        .map_err(|e| WaccError::source_read(id, e.to_string()))?;
    emit(sink, WaccEvent::TableLoaded {
        table: id,
        rows: table.len(),
    });
    Ok(table)
}

fn decimal_cell(table: TableId, row: &Row, column: &str) -> Result<f64, WaccError> {
    let cell = row
        .get(column)
        .ok_or_else(|| WaccError::source_read(table, format!("missing column `{column}`")))?;
    to_decimal(cell).map_err(|e| WaccError::source_read(table, format!("`{column}`: {e}")))
}

fn ipca_point(table: TableId, index: &str, cell: &Value) -> Result<f64, WaccError> {
    let parsed = match cell {
        Value::String(s) if s.contains('%') => percent_to_decimal(cell),
        Value::String(s) => parse_decimal_comma(s),
        _ => to_decimal(cell),
    };
    parsed.map_err(|e| WaccError::source_read(table, format!("`{index}`: {e}")))
}
