//! Placeholder values for templates that have fields but no data.

use std::collections::BTreeMap;

use bitable_model::{FieldDescriptor, SemanticType, TableRow};
use serde_json::{Value, json};

/// Rows in a synthesized sample table.
pub const SAMPLE_TABLE_ROWS: usize = 3;

/// A placeholder for one field.
#[derive(Debug, Clone, PartialEq)]
enum Sample {
    /// Text that takes a row suffix.
    Text(String),
    /// A value repeated as-is on every row.
    Fixed(Value),
}

impl Sample {
    fn value(&self) -> Value {
        match self {
            Sample::Text(text) => Value::String(text.clone()),
            Sample::Fixed(value) => value.clone(),
        }
    }

    fn row_value(&self, index: usize) -> Value {
        match self {
            Sample::Text(text) => Value::String(format!("{text}-{index}")),
            Sample::Fixed(value) => value.clone(),
        }
    }
}

fn sample(field: &FieldDescriptor) -> Sample {
    let name = field.name.as_str();
    match field.kind {
        SemanticType::Number => Sample::Fixed(json!(123)),
        SemanticType::Currency => Sample::Fixed(json!(99.99)),
        SemanticType::Progress => Sample::Fixed(json!(0.5)),
        SemanticType::Rating => Sample::Fixed(json!(4)),
        SemanticType::Checkbox => Sample::Fixed(json!(true)),
        SemanticType::DateTime | SemanticType::CreatedTime | SemanticType::ModifiedTime => {
            Sample::Fixed(json!("2024/1/1 12:00:00"))
        }
        SemanticType::Phone => Sample::Fixed(json!("13800000000")),
        SemanticType::Url => Sample::Fixed(json!("https://example.com")),
        SemanticType::Email => Sample::Fixed(json!("user@example.com")),
        SemanticType::AutoNumber => Sample::Fixed(json!("001")),
        SemanticType::SingleSelect => Sample::Text(format!("{name}选项")),
        SemanticType::MultiSelect => Sample::Text(format!("{name}选项A,{name}选项B")),
        SemanticType::User | SemanticType::CreatedUser | SemanticType::ModifiedUser => {
            Sample::Text("张三".to_string())
        }
        SemanticType::Attachment => Sample::Text(format!("{name}附件")),
        SemanticType::SingleLink | SemanticType::DuplexLink => {
            Sample::Text(format!("{name}关联记录"))
        }
        SemanticType::Location => Sample::Text("北京市".to_string()),
        SemanticType::GroupChat => Sample::Text(format!("{name}群组")),
        _ => Sample::Text(format!("{name}示例")),
    }
}

/// One placeholder per field, keyed by field id.
pub fn sample_values(fields: &[FieldDescriptor]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|field| (field.id.clone(), sample(field).value()))
        .collect()
}

/// `rows` sample rows; text placeholders carry a 1-based `-{index}` suffix.
pub fn sample_rows(fields: &[FieldDescriptor], rows: usize) -> Vec<TableRow> {
    let samples: Vec<(&str, Sample)> = fields
        .iter()
        .map(|field| (field.id.as_str(), sample(field)))
        .collect();
    (1..=rows)
        .map(|index| {
            samples
                .iter()
                .map(|(id, sample)| ((*id).to_string(), sample.row_value(index)))
                .collect()
        })
        .collect()
}
