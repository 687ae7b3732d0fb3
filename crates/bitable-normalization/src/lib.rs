//! Display normalization for bitable cell values.
//!
//! Every field carries a semantic type code, and each code has exactly one
//! rule turning its raw value into something a print template can show:
//!
//! - **Array-shaped types** (text, attachment, lookup, formula, barcode)
//!   go through [`unwrap_array`].
//! - **Select and one-way link** values render their `text`.
//! - **Timestamps** render as a locale-style date-time string.
//! - **Created-by / modified-by** render as comma-joined names.
//! - **Auto numbers** unwrap once the host reports them completed.
//! - Everything else, including unknown codes, passes through.
//!
//! Null always renders as [`bitable_model::EMPTY_MARKER`].
//!
//! Normalization is pure: no I/O and no state beyond the options passed in.

mod date;
mod error;
mod normalizer;
mod options;
mod unwrap;

pub use date::format_timestamp;
pub use error::{NormalizeError, Result};
pub use normalizer::{normalize, normalize_with};
pub use options::{
    DEFAULT_DATE_PATTERN, DateStyle, DateZone, NormalizationOptions, OptionListMode,
};
pub use unwrap::unwrap_array;
