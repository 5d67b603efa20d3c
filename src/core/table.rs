use crate::domain::model::{Record, ResultTable};
use serde_json::Value;
use std::collections::HashSet;

/// Builds the table: columns in order of first appearance, one row per record.
/// Fields a record lacks render as empty cells.
pub fn tabulate(records: &[Record]) -> ResultTable {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records {
        for key in record.data.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.data.get(column).map(render_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    ResultTable { columns, rows }
}

/// Scalars render bare, null as empty, nested values as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}
