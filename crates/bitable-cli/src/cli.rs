//! Command line definitions for `bitable-print`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bitable-print",
    version,
    about = "Fetch bitable records and assemble print documents",
    long_about = "Fetch records from a bitable snapshot, normalize their values for display,\n\
                  and assemble the print documents a template renders."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log cell values at trace level.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the fields of a table or view.
    Fields(FieldsArgs),

    /// Fetch records and write them as JSON.
    Fetch(FetchArgs),

    /// Fetch records and write assembled print documents as JSON.
    Print(PrintArgs),

    /// Show the effective configuration.
    Config,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Snapshot file holding the tables.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    #[arg(long = "table", value_name = "TABLE_ID")]
    pub table: String,

    /// Restrict fields and record order to a view.
    #[arg(long = "view", value_name = "VIEW_ID")]
    pub view: Option<String>,
}

#[derive(Args)]
pub struct FetchControlArgs {
    /// Fetch a single record.
    #[arg(long = "record", value_name = "RECORD_ID")]
    pub record: Option<String>,

    /// Stop after this many records.
    #[arg(long = "max-records", value_name = "N")]
    pub max_records: Option<usize>,

    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Keep raw cell values instead of display values.
    #[arg(long = "raw")]
    pub raw: bool,

    /// Write JSON here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub control: FetchControlArgs,
}

#[derive(Args)]
pub struct PrintArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub control: FetchControlArgs,

    #[arg(long = "mode", value_enum, default_value = "single")]
    pub mode: PrintModeArg,

    /// JSON object of test values keyed by field id.
    #[arg(long = "test-data", value_name = "PATH")]
    pub test_data: Option<PathBuf>,

    /// Use placeholder values when there is no other data.
    #[arg(long = "samples")]
    pub samples: bool,

    /// Leave the `table` key out of the documents.
    #[arg(long = "no-table")]
    pub no_table: bool,

    /// Rows of the single-document table (first records mode).
    #[arg(long = "table-rows", value_name = "N")]
    pub table_rows: Option<usize>,

    /// Cap on documents in multiple mode.
    #[arg(long = "max-documents", value_name = "N")]
    pub max_documents: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PrintModeArg {
    Single,
    Multiple,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
