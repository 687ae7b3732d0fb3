//! Print documents handed to the rendering layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved key holding the tabular sub-structure.
pub const TABLE_KEY: &str = "table";

/// One row of the `table` sub-structure, keyed by field id.
pub type TableRow = BTreeMap<String, Value>;

/// Field-id keyed values plus an optional `table` of rows.
///
/// Serializes as a single flat object, with `table` as one more key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintDocument {
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableRow>>,
}

impl PrintDocument {
    /// Builds a document from field-id keyed values. A `table` key among the
    /// values is reserved and dropped.
    pub fn from_values(mut values: BTreeMap<String, Value>) -> Self {
        values.remove(TABLE_KEY);
        Self {
            values,
            table: None,
        }
    }

    pub fn with_table(mut self, rows: Vec<TableRow>) -> Self {
        self.table = Some(rows);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// True when the document has neither values nor a table.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.table.is_none()
    }

    /// Number of top-level keys, `table` included.
    pub fn key_count(&self) -> usize {
        self.values.len() + usize::from(self.table.is_some())
    }

    pub fn to_json(&self) -> Value {
        let mut map: serde_json::Map<String, Value> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if let Some(rows) = &self.table {
            let rows = rows
                .iter()
                .map(|row| {
                    Value::Object(
                        row.iter()
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect(),
                    )
                })
                .collect();
            map.insert(TABLE_KEY.to_string(), Value::Array(rows));
        }
        Value::Object(map)
    }
}
