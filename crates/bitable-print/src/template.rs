//! Candidate data handed to the assembler.

use std::collections::BTreeMap;

use bitable_model::{FieldDescriptor, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Explicit test values keyed by field id.
pub type TestData = BTreeMap<String, Value>;

/// Everything a template may draw its print data from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    /// Values typed in by the template author.
    #[serde(default)]
    pub test_data: TestData,
    /// Records fetched for the template's table, usually normalized.
    #[serde(default, rename = "recordsData")]
    pub records: Vec<Record>,
    /// Field catalog of the template's table.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_data(mut self, test_data: TestData) -> Self {
        self.test_data = test_data;
        self
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }
}

/// Exposes a record as field-id keyed values.
///
/// The record id and the entry bookkeeping (names, type codes) are left
/// behind; only each entry's value survives, under its field id.
pub fn record_values(record: &Record) -> BTreeMap<String, Value> {
    record
        .fields
        .iter()
        .map(|entry| (entry.field_id.clone(), entry.value.to_json()))
        .collect()
}
