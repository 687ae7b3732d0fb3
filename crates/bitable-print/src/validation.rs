//! Structural checks on assembled print data.
//!
//! Validation never fails: every defect is reported in the returned
//! [`ValidationReport`].

use bitable_model::{PrintDocument, TABLE_KEY};
use serde::Serialize;
use serde_json::Value;

/// One structural defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Position of the offending document in a document array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

impl ValidationError {
    fn whole(message: impl Into<String>) -> Self {
        Self {
            index: None,
            message: message.into(),
        }
    }

    fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            message: message.into(),
        }
    }
}

/// Top-level shape of validated print data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataShape {
    Array,
    Object,
}

/// Shape summary of validated print data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub shape: Option<DataShape>,
    /// Documents in an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Keys of a single document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub data_info: DataInfo,
}

impl ValidationReport {
    fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }
}

/// Validates a single document or an array of documents.
///
/// An object is valid even when empty (a warning is recorded). An array is
/// valid when every element is a non-null object or array; each other
/// element yields one error carrying its index. An empty array is valid with
/// a warning. A `table` key that does not hold an array of rows is reported
/// as a warning only.
pub fn validate_print_data(data: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    match data {
        Value::Null => {
            report.errors.push(ValidationError::whole("print data is empty"));
            return report;
        }
        Value::Array(items) => {
            report.data_info.shape = Some(DataShape::Array);
            report.data_info.count = Some(items.len());
            if items.is_empty() {
                report.warnings.push("print data array is empty".to_string());
            }
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Object(map) => {
                        if let Some(message) = table_defect(map.get(TABLE_KEY)) {
                            report
                                .warnings
                                .push(format!("document {}: {message}", index + 1));
                        }
                    }
                    Value::Array(_) => {}
                    _ => report.errors.push(ValidationError::at(
                        index,
                        format!("document {} is not an object", index + 1),
                    )),
                }
            }
        }
        Value::Object(map) => {
            report.data_info.shape = Some(DataShape::Object);
            report.data_info.field_count = Some(map.len());
            if map.is_empty() {
                report.warnings.push("print data object is empty".to_string());
            }
            if let Some(message) = table_defect(map.get(TABLE_KEY)) {
                report.warnings.push(message.to_string());
            }
        }
        _ => {
            report.errors.push(ValidationError::whole(
                "print data must be an object or an array",
            ));
            return report;
        }
    }
    let report = report.finish();
    tracing::debug!(
        is_valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated print data"
    );
    report
}

/// Validates typed documents as an array.
pub fn validate_documents(documents: &[PrintDocument]) -> ValidationReport {
    let data = Value::Array(documents.iter().map(PrintDocument::to_json).collect());
    validate_print_data(&data)
}

fn table_defect(table: Option<&Value>) -> Option<&'static str> {
    match table? {
        Value::Array(rows) if rows.iter().all(Value::is_object) => None,
        _ => Some("table must be an array of rows"),
    }
}
