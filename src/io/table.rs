//! Reference-table loading and lookups.
//!
//! A table is loaded fully into memory on every call and returned as a fresh,
//! normalized snapshot:
//!
//! - column names are trimmed, stripped of a UTF-8 BOM and matched
//!   case-insensitively (the size table ships headers like `" De "`)
//! - rows keep the order of the backing source
//!
//! Nothing is cached between loads. Lookups are linear scans; the tables are
//! small reference data.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{TableConfig, TableId};
use crate::math::to_decimal;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("failed to open '{path}': {message}")]
    Open { path: String, message: String },

    #[error("invalid JSON: {0}")]
    Parse(String),

    #[error("expected an array of records, found {0}")]
    Layout(String),

    #[error("no data registered for the {0} table")]
    Unavailable(TableId),

    #[error("column `{column}` is not a valid bound: {message}")]
    InvalidBound { column: String, message: String },
}

/// One record of a table, keyed by normalized column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: HashMap<String, Value>,
}

impl Row {
    fn from_object(object: Map<String, Value>) -> Self {
        let cells = object
            .into_iter()
            .map(|(name, value)| (normalize_column_name(&name), value))
            .collect();
        Self { cells }
    }

    /// Cell under `column` (matched after normalization).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(&normalize_column_name(column))
    }
}

/// An in-memory snapshot of one reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: TableId,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from a JSON array of objects.
    pub fn from_json(id: TableId, value: Value) -> Result<Self, TableError> {
        let Value::Array(items) = value else {
            return Err(TableError::Layout(json_kind(&value).to_string()));
        };

        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(Row::from_object(object)),
                other => Err(TableError::Layout(format!("{} inside the array", json_kind(&other)))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { id, rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Anything that can hand out reference tables.
pub trait TableSource {
    fn load_table(&self, id: TableId) -> Result<Table, TableError>;
}

/// Reads `<data_dir>/<file>.json` on every load.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    config: TableConfig,
}

impl JsonDirSource {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn path_for(&self, id: TableId) -> PathBuf {
        self.config.path_for(id)
    }
}

impl TableSource for JsonDirSource {
    fn load_table(&self, id: TableId) -> Result<Table, TableError> {
        let path = self.path_for(id);
        let file = File::open(&path).map_err(|e| TableError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| TableError::Parse(e.to_string()))?;
        Table::from_json(id, value)
    }
}

/// Tables held as JSON values; each load builds a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<TableId, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, id: TableId, records: Value) -> Self {
        self.tables.insert(id, records);
        self
    }
}

impl TableSource for MemorySource {
    fn load_table(&self, id: TableId) -> Result<Table, TableError> {
        let value = self.tables.get(&id).cloned().ok_or(TableError::Unavailable(id))?;
        Table::from_json(id, value)
    }
}

/// First row (in table order) whose `key_column` equals `key_value`.
///
/// String cells are compared after trimming; numeric cells by their JSON text.
pub fn find_by_equality<'t>(table: &'t Table, key_column: &str, key_value: &str) -> Option<&'t Row> {
    let key_value = key_value.trim();
    table
        .rows
        .iter()
        .find(|row| row.get(key_column).is_some_and(|cell| cell_matches(cell, key_value)))
}

/// First row (in table order) with `lower <= value <= upper`.
///
/// Bounds are read with the thousands-separator convention and truncated to
/// integers. Every row is parsed before the scan, so a row whose bound cannot
/// be read fails the lookup whatever `value` is.
pub fn find_by_range<'t>(
    table: &'t Table,
    lower_column: &str,
    upper_column: &str,
    value: f64,
) -> Result<Option<&'t Row>, TableError> {
    let bounds = range_bounds(table, lower_column, upper_column)?;
    Ok(table
        .rows
        .iter()
        .zip(bounds)
        .find(|(_, (lower, upper))| *lower as f64 <= value && value <= *upper as f64)
        .map(|(row, _)| row))
}

/// `(lower, upper)` bounds of every row, in table order.
pub fn range_bounds(table: &Table, lower_column: &str, upper_column: &str) -> Result<Vec<(i64, i64)>, TableError> {
    table
        .rows
        .iter()
        .map(|row| -> Result<_, TableError> {
            let lower = read_bound(row, lower_column)?;
            let upper = read_bound(row, upper_column)?;
            Ok((lower, upper))
        })
        .collect()
}

/// Integer bound stored in `column` of `row`.
pub fn read_bound(row: &Row, column: &str) -> Result<i64, TableError> {
    let invalid = |message: String| TableError::InvalidBound {
        column: column.to_string(),
        message,
    };
    let cell = row.get(column).ok_or_else(|| invalid("missing".to_string()))?;
    let value = to_decimal(cell).map_err(|e| invalid(e.to_string()))?;
    Ok(value.trunc() as i64)
}

/// Unique string values of `column`, in first-seen order.
pub fn distinct_values(table: &Table, column: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in &table.rows {
        let Some(text) = row.get(column).and_then(cell_text) else {
            continue;
        };
        if !out.iter().any(|seen| seen == &text) {
            out.push(text);
        }
    }
    out
}

fn cell_matches(cell: &Value, key: &str) -> bool {
    cell_text(cell).is_some_and(|text| text == key)
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_column_name(name: &str) -> String {
    // Spreadsheet exports pad headers with spaces and sometimes prefix a BOM.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn size_table() -> Table {
        Table::from_json(
            TableId::SizePremium,
            json!([
                { " De ": "0", " até ": "1.000.000", "Premio": "5,0" },
                { " De ": "1.000.001", " até ": "10.000.000", "Premio": "4,0" },
                { " De ": "10.000.001", " até ": "50.000.000,00", "Premio": "3,0" },
            ]),
        )
        .unwrap()
    }

    #[test]
    fn column_names_are_normalized() {
        let table = size_table();
        let row = &table.rows()[0];
        assert_eq!(row.get("De"), Some(&json!("0")));
        assert_eq!(row.get(" até "), Some(&json!("1.000.000")));
        assert_eq!(row.get("premio"), Some(&json!("5,0")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn bom_prefixed_header_is_found() {
        let table = Table::from_json(TableId::Ipca, json!([{ "\u{feff}indice": "IPCAano1", "Valor": "4,0" }])).unwrap();
        assert!(find_by_equality(&table, "indice", "IPCAano1").is_some());
    }

    #[test]
    fn equality_returns_first_match_in_table_order() {
        let table = Table::from_json(
            TableId::Parameters,
            json!([
                { "Campo": "RF", "Valor": "4,5" },
                { "Campo": " RF ", "Valor": "9,9" },
                { "Campo": "RM", "Valor": 6 },
            ]),
        )
        .unwrap();

        let row = find_by_equality(&table, "Campo", "RF").unwrap();
        assert_eq!(row.get("Valor"), Some(&json!("4,5")));
        assert!(find_by_equality(&table, "Campo", "IR").is_none());
        assert!(find_by_equality(&table, "Nope", "RF").is_none());
    }

    #[test]
    fn equality_matches_numeric_cells_by_text() {
        let table = Table::from_json(TableId::Parameters, json!([{ "Campo": 7, "Valor": "1" }])).unwrap();
        assert!(find_by_equality(&table, "Campo", "7").is_some());
    }

    #[test]
    fn range_lookup_is_inclusive() {
        let table = size_table();
        let premium = |v: f64| {
            find_by_range(&table, " De ", " até ", v)
                .unwrap()
                .and_then(|row| row.get("Premio").cloned())
        };
        assert_eq!(premium(0.0), Some(json!("5,0")));
        assert_eq!(premium(1_000_000.0), Some(json!("5,0")));
        assert_eq!(premium(1_000_001.0), Some(json!("4,0")));
        assert_eq!(premium(12_000_000.0), Some(json!("3,0")));
        assert_eq!(premium(50_000_000.0), Some(json!("3,0")));
        assert_eq!(premium(50_000_000.5), None);
        // Gap between truncated bounds.
        assert_eq!(premium(1_000_000.5), None);
    }

    #[test]
    fn malformed_bound_is_an_error() {
        let table = Table::from_json(
            TableId::SizePremium,
            json!([{ " De ": "abc", " até ": "10", "Premio": "1" }]),
        )
        .unwrap();
        assert_matches!(
            find_by_range(&table, "De", "até", 5.0),
            Err(TableError::InvalidBound { column, .. }) if column == "De"
        );
    }

    #[test]
    fn malformed_trailing_row_fails_every_lookup() {
        let table = Table::from_json(
            TableId::SizePremium,
            json!([
                { " De ": "0", " até ": "10.000.000", "Premio": "4,0" },
                { " De ": "", " até ": "", "Premio": "" },
            ]),
        )
        .unwrap();
        for value in [5_000_000.0, 20_000_000.0] {
            assert_matches!(
                find_by_range(&table, "De", "até", value),
                Err(TableError::InvalidBound { column, .. }) if column == "De"
            );
        }
    }

    #[test]
    fn range_bounds_in_table_order() {
        assert_eq!(
            range_bounds(&size_table(), "De", "até").unwrap(),
            vec![(0, 1_000_000), (1_000_001, 10_000_000), (10_000_001, 50_000_000)]
        );
    }

    #[test]
    fn layout_errors() {
        assert_matches!(Table::from_json(TableId::Ipca, json!({ "a": 1 })), Err(TableError::Layout(_)));
        assert_matches!(Table::from_json(TableId::Ipca, json!([1, 2])), Err(TableError::Layout(_)));
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let table = Table::from_json(
            TableId::Activities,
            json!([
                { "atividade": "Varejo" },
                { "atividade": "Comércio" },
                { "atividade": "Varejo" },
                { "outra": "x" },
            ]),
        )
        .unwrap();
        assert_eq!(distinct_values(&table, "atividade"), vec!["Varejo", "Comércio"]);
    }

    #[test]
    fn memory_source_reports_missing_tables() {
        let source = MemorySource::new().with_table(TableId::Ipca, json!([]));
        assert!(source.load_table(TableId::Ipca).unwrap().is_empty());
        assert_matches!(
            source.load_table(TableId::Activities),
            Err(TableError::Unavailable(TableId::Activities))
        );
    }

    #[test]
    fn json_dir_source_reads_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let config = TableConfig {
            data_dir: dir.path().to_path_buf(),
            ..TableConfig::default()
        };
        let source = JsonDirSource::new(config);
        let path = source.path_for(TableId::Parameters);

        std::fs::write(&path, r#"[{"Campo": "RF", "Valor": "4,5"}]"#).unwrap();
        assert_eq!(source.load_table(TableId::Parameters).unwrap().len(), 1);

        let mut file = File::create(&path).unwrap();
        write!(file, r#"[{{"Campo": "RF", "Valor": "4,5"}}, {{"Campo": "RM", "Valor": "6,0"}}]"#).unwrap();
        drop(file);
        assert_eq!(source.load_table(TableId::Parameters).unwrap().len(), 2);
    }

    #[test]
    fn json_dir_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirSource::new(TableConfig {
            data_dir: dir.path().to_path_buf(),
            ..TableConfig::default()
        });
        assert_matches!(source.load_table(TableId::Activities), Err(TableError::Open { .. }));

        std::fs::write(source.path_for(TableId::Activities), "not json").unwrap();
        assert_matches!(source.load_table(TableId::Activities), Err(TableError::Parse(_)));
    }
}
