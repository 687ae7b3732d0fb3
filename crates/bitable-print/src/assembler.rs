//! Single and multiple print document assembly.

use std::fmt;

use bitable_model::{PrintDocument, Record, TableRow};
use serde::Serialize;

use crate::options::{MultiplePrintOptions, SinglePrintOptions};
use crate::samples::{SAMPLE_TABLE_ROWS, sample_rows, sample_values};
use crate::template::{TemplateData, record_values};

/// Which candidate a single document was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSourceKind {
    TestData,
    RecordData,
    FieldSample,
    Empty,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::TestData => "testData",
            DataSourceKind::RecordData => "recordData",
            DataSourceKind::FieldSample => "fieldSample",
            DataSourceKind::Empty => "empty",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the document for a single print.
///
/// See [`prepare_single_with_source`] for the selection order.
pub fn prepare_single(template: &TemplateData, options: &SinglePrintOptions) -> PrintDocument {
    prepare_single_with_source(template, options).0
}

/// Builds the document for a single print and reports its source.
///
/// The first matching candidate wins:
/// 1. test data, when non-empty and preferred;
/// 2. the first fetched record;
/// 3. field placeholders, when requested and the catalog is non-empty;
/// 4. an empty document.
///
/// With table data enabled the document always carries a `table`, empty
/// for the last case.
pub fn prepare_single_with_source(
    template: &TemplateData,
    options: &SinglePrintOptions,
) -> (PrintDocument, DataSourceKind) {
    let (document, kind) = if options.prefer_test_data && !template.test_data.is_empty() {
        (
            PrintDocument::from_values(template.test_data.clone()),
            DataSourceKind::TestData,
        )
    } else if let Some(first) = template.records.first() {
        (
            PrintDocument::from_values(record_values(first)),
            DataSourceKind::RecordData,
        )
    } else if options.generate_samples && !template.fields.is_empty() {
        (
            PrintDocument::from_values(sample_values(&template.fields)),
            DataSourceKind::FieldSample,
        )
    } else {
        (PrintDocument::default(), DataSourceKind::Empty)
    };
    tracing::debug!(
        source = %kind,
        keys = document.values.len(),
        "selected single print data"
    );

    if !options.include_table_data {
        return (document, kind);
    }
    let rows = match kind {
        DataSourceKind::TestData => vec![document.values.clone()],
        DataSourceKind::RecordData => template
            .records
            .iter()
            .take(options.table_mode.row_limit())
            .map(record_values)
            .collect(),
        DataSourceKind::FieldSample => sample_rows(&template.fields, SAMPLE_TABLE_ROWS),
        DataSourceKind::Empty => Vec::new(),
    };
    (document.with_table(rows), kind)
}

/// Builds one document per selected record, up to `max_records`.
///
/// Records past the cap are dropped with a warning. With table data enabled
/// each document carries a one-row `table` holding its own values.
pub fn prepare_multiple(
    template: &TemplateData,
    selected: &[Record],
    options: &MultiplePrintOptions,
) -> Vec<PrintDocument> {
    if selected.len() > options.max_records {
        tracing::warn!(
            selected = selected.len(),
            max_records = options.max_records,
            "too many records selected, printing only the first {}",
            options.max_records
        );
    }
    let documents: Vec<PrintDocument> = selected
        .iter()
        .take(options.max_records)
        .map(|record| {
            let values = record_values(record);
            let row: TableRow = values.clone();
            let document = PrintDocument::from_values(values);
            if options.include_table_data {
                document.with_table(vec![row])
            } else {
                document
            }
        })
        .collect();
    tracing::debug!(
        documents = documents.len(),
        catalog_fields = template.fields.len(),
        "prepared multiple print data"
    );
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitable_model::{DisplayValue, FieldDescriptor, FieldValue, FieldValueEntry, SemanticType};
    use serde_json::json;

    fn record(id: &str, title: &str) -> Record {
        let field = FieldDescriptor::new("fldTitle", "Title", SemanticType::Text);
        Record::new(
            id,
            vec![FieldValueEntry::new(
                &field,
                FieldValue::Display(DisplayValue::Text(title.into())),
            )],
        )
    }

    fn test_data() -> TemplateData {
        TemplateData::new()
            .with_test_data([("fldTitle".to_string(), json!("Sample"))].into_iter().collect())
            .with_records(vec![record("rec1", "First")])
    }

    #[test]
    fn test_data_wins_when_preferred() {
        let (doc, kind) = prepare_single_with_source(&test_data(), &SinglePrintOptions::default());
        assert_eq!(kind, DataSourceKind::TestData);
        assert_eq!(doc.get("fldTitle"), Some(&json!("Sample")));
        assert_eq!(doc.table.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn records_win_when_test_data_is_not_preferred() {
        let options = SinglePrintOptions::default().with_prefer_test_data(false);
        let (doc, kind) = prepare_single_with_source(&test_data(), &options);
        assert_eq!(kind, DataSourceKind::RecordData);
        assert_eq!(doc.get("fldTitle"), Some(&json!("First")));
    }

    #[test]
    fn empty_template_gives_empty_table() {
        let (doc, kind) =
            prepare_single_with_source(&TemplateData::new(), &SinglePrintOptions::default());
        assert_eq!(kind, DataSourceKind::Empty);
        assert!(doc.values.is_empty());
        assert_eq!(doc.table, Some(Vec::new()));
    }

    #[test]
    fn table_can_be_left_out() {
        let options = SinglePrintOptions::default().with_table_data(false);
        assert_eq!(prepare_single(&test_data(), &options).table, None);
        let multiple = prepare_multiple(
            &TemplateData::new(),
            &[record("rec1", "A")],
            &MultiplePrintOptions::default().with_table_data(false),
        );
        assert_eq!(multiple[0].table, None);
    }

    #[test]
    fn data_source_kind_serializes_camel_case() {
        assert_eq!(
            serde_json::to_value(DataSourceKind::FieldSample).unwrap(),
            json!("fieldSample")
        );
        assert_eq!(DataSourceKind::RecordData.to_string(), "recordData");
    }
}
