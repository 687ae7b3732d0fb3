//! Print data assembly.
//!
//! Turns a template's candidate data (test values, fetched records, the
//! field catalog) into [`PrintDocument`](bitable_model::PrintDocument)s for
//! the rendering layer:
//!
//! - [`prepare_single`] picks one data source by priority and builds one
//!   document;
//! - [`prepare_multiple`] builds one document per selected record, capped;
//! - [`validate_print_data`] reports structural defects without failing.

mod assembler;
mod options;
mod samples;
mod template;
mod validation;

pub use assembler::{DataSourceKind, prepare_multiple, prepare_single, prepare_single_with_source};
pub use options::{
    DEFAULT_MAX_DOCUMENTS, DEFAULT_TABLE_ROWS, MultiplePrintOptions, SinglePrintOptions, TableMode,
};
pub use samples::{SAMPLE_TABLE_ROWS, sample_rows, sample_values};
pub use template::{TemplateData, TestData, record_values};
pub use validation::{
    DataInfo, DataShape, ValidationError, ValidationReport, validate_documents,
    validate_print_data,
};
