//! Records assembled by a fetch session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldDescriptor;
use crate::semantic_type::SemanticType;
use crate::value::{DisplayValue, RawValue};

/// Value attached to a record entry: raw when the session runs without
/// normalization, display otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Raw(RawValue),
    Display(DisplayValue),
}

impl FieldValue {
    /// The value recorded for a field that could not be resolved.
    pub fn null() -> Self {
        FieldValue::Raw(RawValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Raw(RawValue::Null))
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Raw(raw) => raw.to_json(),
            FieldValue::Display(display) => display.to_json(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawValue::deserialize(deserializer).map(FieldValue::Raw)
    }
}

/// One resolved value of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValueEntry {
    pub name: String,
    #[serde(rename = "field")]
    pub field_id: String,
    #[serde(rename = "type")]
    pub kind: SemanticType,
    pub value: FieldValue,
}

impl FieldValueEntry {
    pub fn new(field: &FieldDescriptor, value: FieldValue) -> Self {
        Self {
            name: field.name.clone(),
            field_id: field.id.clone(),
            kind: field.kind,
            value,
        }
    }

    /// Entry for a field whose value could not be resolved.
    pub fn null(field: &FieldDescriptor) -> Self {
        Self::new(field, FieldValue::null())
    }
}

/// A record with its entries in field catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "recordId")]
    pub record_id: String,
    #[serde(rename = "field")]
    pub fields: Vec<FieldValueEntry>,
}

impl Record {
    pub fn new(record_id: impl Into<String>, fields: Vec<FieldValueEntry>) -> Self {
        Self {
            record_id: record_id.into(),
            fields,
        }
    }

    /// Looks up the entry for a field id.
    pub fn entry(&self, field_id: &str) -> Option<&FieldValueEntry> {
        self.fields.iter().find(|entry| entry.field_id == field_id)
    }

    /// Number of entries whose value is null.
    pub fn null_count(&self) -> usize {
        self.fields.iter().filter(|entry| entry.value.is_null()).count()
    }
}
