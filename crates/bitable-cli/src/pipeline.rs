//! Fetch and print stages shared by the subcommands.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bitable_fetch::{
    Batch, Delay, FetchError, FetchRequest, FetchSession, FetchState, RecordSource,
};
use bitable_model::{FieldDescriptor, PrintDocument, Record};
use bitable_print::{
    DataSourceKind, TemplateData, TestData, ValidationReport, prepare_multiple,
    prepare_single_with_source, validate_print_data,
};

use crate::config::Config;
use crate::logging::redact_value;

/// Result of one fetch stage.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Catalog the records were resolved against.
    pub fields: Vec<FieldDescriptor>,
    pub records: Vec<Record>,
    pub pages: usize,
    pub state: FetchState,
    pub elapsed: Duration,
}

impl FetchOutcome {
    /// Entries that resolved to null across all records.
    pub fn null_values(&self) -> usize {
        self.records.iter().map(Record::null_count).sum()
    }
}

/// Runs a fetch, forwarding every batch to `on_batch`.
pub async fn fetch_records<S, D>(
    session: &mut FetchSession<S, D>,
    request: &FetchRequest,
    mut on_batch: impl FnMut(Batch<'_>),
) -> Result<FetchOutcome, FetchError>
where
    S: RecordSource,
    D: Delay,
{
    let started = Instant::now();
    let mut pages = 0usize;
    let records = session
        .fetch(request, &mut |batch: Batch<'_>| {
            pages = batch.page;
            on_batch(batch);
        })
        .await?;
    if tracing::enabled!(tracing::Level::TRACE) {
        for record in &records {
            for entry in &record.fields {
                let value = entry.value.to_json().to_string();
                tracing::trace!(
                    record_id = %record.record_id,
                    field_id = %entry.field_id,
                    value = redact_value(&value),
                    "cell"
                );
            }
        }
    }
    Ok(FetchOutcome {
        fields: session.fields().to_vec(),
        records,
        pages,
        state: session.state(),
        elapsed: started.elapsed(),
    })
}

/// Builds a fetch request from the configuration.
pub fn fetch_request(
    config: &Config,
    table_id: &str,
    view_id: Option<&str>,
    record_id: Option<&str>,
) -> FetchRequest {
    let mut request = FetchRequest::new(table_id).normalized(config.fetch.normalize);
    if let Some(view_id) = view_id {
        request = request.with_view(view_id);
    }
    if let Some(record_id) = record_id {
        request = request.with_record(record_id);
    }
    if let Some(max_records) = config.fetch.max_records {
        request = request.with_max_records(max_records);
    }
    request
}

/// Which print documents to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// One document chosen from test data, the first record or samples.
    Single,
    /// One document per fetched record.
    Multiple,
}

/// Result of the print stage.
#[derive(Debug)]
pub struct PrintOutcome {
    pub documents: Vec<PrintDocument>,
    /// Set in single mode.
    pub source: Option<DataSourceKind>,
    pub report: ValidationReport,
}

/// Assembles and validates print documents.
pub fn assemble(mode: PrintMode, template: &TemplateData, config: &Config) -> PrintOutcome {
    let (documents, source) = match mode {
        PrintMode::Single => {
            let (document, kind) =
                prepare_single_with_source(template, &config.single_print_options());
            (vec![document], Some(kind))
        }
        PrintMode::Multiple => (
            prepare_multiple(template, &template.records, &config.multiple_print_options()),
            None,
        ),
    };
    let report = validate_print_data(&documents_json(mode, &documents));
    for warning in &report.warnings {
        tracing::warn!(%warning, "print data");
    }
    for error in &report.errors {
        tracing::error!(index = ?error.index, message = %error.message, "invalid print data");
    }
    PrintOutcome {
        documents,
        source,
        report,
    }
}

/// Reads test values from a JSON object file.
pub fn load_test_data(path: &Path) -> Result<TestData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read test data {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parse test data {} as a JSON object", path.display()))
}

/// Serializes documents for the rendering layer: an object in single mode,
/// an array otherwise.
pub fn documents_json(mode: PrintMode, documents: &[PrintDocument]) -> serde_json::Value {
    match (mode, documents) {
        (PrintMode::Single, [document]) => document.to_json(),
        _ => serde_json::Value::Array(documents.iter().map(PrintDocument::to_json).collect()),
    }
}
