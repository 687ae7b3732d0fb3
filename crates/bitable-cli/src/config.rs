//! TOML configuration for the command line tool.
//!
//! ```toml
//! [fetch]
//! page_size = 200
//! max_records = 500
//! max_retries = 3
//! retry_delay_ms = 1000
//! normalize = true
//!
//! [format]
//! utc_offset_minutes = 480
//! date_pattern = "%Y/%-m/%-d %H:%M:%S"
//! option_lists = "join"
//!
//! [print]
//! include_table_data = true
//! prefer_test_data = true
//! generate_samples = false
//! table_rows = 10
//! max_documents = 100
//! ```
//!
//! Every key is optional. Command line flags override the file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use bitable_fetch::{DEFAULT_PAGE_SIZE, FetchOptions, RetryPolicy};
use bitable_normalization::{DateStyle, DateZone, NormalizationOptions, OptionListMode};
use bitable_print::{DEFAULT_MAX_DOCUMENTS, MultiplePrintOptions, SinglePrintOptions, TableMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchSection,
    pub format: FormatSection,
    pub print: PrintSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    pub page_size: usize,
    /// No cap when absent or 0.
    pub max_records: Option<usize>,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub normalize: bool,
}

impl Default for FetchSection {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_records: None,
            max_retries: retry.max_retries,
            retry_delay_ms: u64::try_from(retry.delay.as_millis()).unwrap_or(u64::MAX),
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatSection {
    /// Fixed offset for rendered dates; the local zone when absent.
    pub utc_offset_minutes: Option<i32>,
    /// strftime pattern for rendered dates.
    pub date_pattern: Option<String>,
    /// `join` or `first` for multi-option select values.
    pub option_lists: OptionListMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintSection {
    pub include_table_data: bool,
    pub prefer_test_data: bool,
    pub generate_samples: bool,
    /// Fill the single-document table with this many leading records
    /// instead of only the first.
    pub table_rows: Option<usize>,
    pub max_documents: usize,
}

impl Default for PrintSection {
    fn default() -> Self {
        let single = SinglePrintOptions::default();
        Self {
            include_table_data: single.include_table_data,
            prefer_test_data: single.prefer_test_data,
            generate_samples: single.generate_samples,
            table_rows: None,
            max_documents: DEFAULT_MAX_DOCUMENTS,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse configuration")
    }

    /// Loads the configuration file, or defaults when there is none.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)
                    .with_context(|| format!("load {}", path.display()))?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
        }
    }

    pub fn normalization_options(&self) -> Result<NormalizationOptions> {
        let zone = match self.format.utc_offset_minutes {
            Some(minutes) => DateZone::from_offset_minutes(minutes)
                .ok_or_else(|| anyhow!("utc_offset_minutes out of range: {minutes}"))?,
            None => DateZone::Local,
        };
        let mut style = DateStyle::default().with_zone(zone);
        if let Some(pattern) = &self.format.date_pattern {
            style = style.with_pattern(pattern.clone());
        }
        Ok(NormalizationOptions::new()
            .with_date_style(style)
            .with_option_lists(self.format.option_lists))
    }

    pub fn fetch_options(&self) -> Result<FetchOptions> {
        let retry = RetryPolicy::default()
            .with_max_retries(self.fetch.max_retries)
            .with_delay(Duration::from_millis(self.fetch.retry_delay_ms));
        Ok(FetchOptions::default()
            .with_page_size(self.fetch.page_size)
            .with_retry(retry)
            .with_normalization(self.normalization_options()?))
    }

    pub fn single_print_options(&self) -> SinglePrintOptions {
        let table_mode = match self.print.table_rows {
            Some(rows) if rows > 1 => TableMode::FirstRecords(rows),
            _ => TableMode::FirstRecord,
        };
        SinglePrintOptions::default()
            .with_table_data(self.print.include_table_data)
            .with_prefer_test_data(self.print.prefer_test_data)
            .with_samples(self.print.generate_samples)
            .with_table_mode(table_mode)
    }

    pub fn multiple_print_options(&self) -> MultiplePrintOptions {
        MultiplePrintOptions::default()
            .with_table_data(self.print.include_table_data)
            .with_max_records(self.print.max_documents)
    }
}
