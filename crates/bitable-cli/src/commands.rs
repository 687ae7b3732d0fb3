use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use bitable_fetch::{
    Batch, FetchRequest, FetchSession, SnapshotSource, SnapshotTable, resolve_fields,
};
use bitable_model::FieldDescriptor;
use bitable_print::TemplateData;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info_span;

use bitable_cli::config::Config;
use bitable_cli::pipeline::{
    FetchOutcome, PrintMode, PrintOutcome, assemble, documents_json, fetch_records, fetch_request,
    load_test_data,
};

use crate::cli::{FetchArgs, FetchControlArgs, FieldsArgs, PrintArgs, PrintModeArg, SourceArgs};

pub struct FieldsResult {
    pub table_name: String,
    pub view: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

pub struct FetchResult {
    pub table_name: String,
    pub view: Option<String>,
    pub outcome: FetchOutcome,
}

pub struct PrintResult {
    pub fetch: FetchResult,
    pub mode: PrintMode,
    pub print: PrintOutcome,
}

pub async fn run_fields(args: &FieldsArgs) -> Result<FieldsResult> {
    let source = load_snapshot(&args.source.snapshot)?;
    let table = source.table(&args.source.table)?;
    let fields = resolve_fields(&source, &table.id, args.source.view.as_deref())
        .await
        .context("resolve field catalog")?;
    Ok(FieldsResult {
        table_name: table.name.clone(),
        view: args.source.view.clone(),
        fields,
    })
}

pub async fn run_fetch(args: &FetchArgs, mut config: Config) -> Result<FetchResult> {
    apply_fetch_overrides(&mut config, &args.control);
    let fetch = fetch(&args.source, &args.control, &config).await?;
    let json = serde_json::to_string_pretty(&fetch.outcome.records).context("serialize records")?;
    write_output(&json, args.control.output.as_deref())?;
    Ok(fetch)
}

pub async fn run_print(args: &PrintArgs, mut config: Config) -> Result<PrintResult> {
    apply_fetch_overrides(&mut config, &args.control);
    apply_print_overrides(&mut config, args);
    let test_data = args
        .test_data
        .as_deref()
        .map(load_test_data)
        .transpose()?
        .unwrap_or_default();

    let fetch = fetch(&args.source, &args.control, &config).await?;
    let template = TemplateData::new()
        .with_test_data(test_data)
        .with_records(fetch.outcome.records.clone())
        .with_fields(fetch.outcome.fields.clone());

    let mode = match args.mode {
        PrintModeArg::Single => PrintMode::Single,
        PrintModeArg::Multiple => PrintMode::Multiple,
    };
    let print = {
        let _span = info_span!("assemble", mode = ?mode).entered();
        assemble(mode, &template, &config)
    };
    let json = serde_json::to_string_pretty(&documents_json(mode, &print.documents))
        .context("serialize print documents")?;
    write_output(&json, args.control.output.as_deref())?;
    Ok(PrintResult { fetch, mode, print })
}

pub fn run_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("serialize configuration")?;
    print!("{content}");
    Ok(())
}

async fn fetch(
    source_args: &SourceArgs,
    control: &FetchControlArgs,
    config: &Config,
) -> Result<FetchResult> {
    let source = load_snapshot(&source_args.snapshot)?;
    let table = source.table(&source_args.table)?.clone();
    let request = fetch_request(
        config,
        &source_args.table,
        source_args.view.as_deref(),
        control.record.as_deref(),
    );
    let mut session = FetchSession::new(source).with_options(config.fetch_options()?);

    let progress = progress_bar(expected_records(&table, &request))?;
    let outcome = fetch_records(&mut session, &request, |batch: Batch<'_>| {
        progress.set_position(batch.records.len() as u64);
        progress.set_message(format!("page {}", batch.page));
    })
    .await;
    progress.finish_and_clear();
    let outcome = outcome.with_context(|| format!("fetch table {}", source_args.table))?;

    Ok(FetchResult {
        table_name: table.name,
        view: source_args.view.clone(),
        outcome,
    })
}

fn load_snapshot(path: &Path) -> Result<SnapshotSource> {
    SnapshotSource::from_path(path).with_context(|| format!("load snapshot {}", path.display()))
}

fn apply_fetch_overrides(config: &mut Config, control: &FetchControlArgs) {
    if let Some(max_records) = control.max_records {
        config.fetch.max_records = Some(max_records);
    }
    if let Some(page_size) = control.page_size {
        config.fetch.page_size = page_size;
    }
    if control.raw {
        config.fetch.normalize = false;
    }
}

fn apply_print_overrides(config: &mut Config, args: &PrintArgs) {
    if args.samples {
        config.print.generate_samples = true;
    }
    if args.no_table {
        config.print.include_table_data = false;
    }
    if let Some(rows) = args.table_rows {
        config.print.table_rows = Some(rows);
    }
    if let Some(max_documents) = args.max_documents {
        config.print.max_documents = max_documents;
    }
}

fn expected_records(table: &SnapshotTable, request: &FetchRequest) -> u64 {
    if request.record_id.is_some() {
        return 1;
    }
    let total = match request.max_records {
        Some(cap) if cap > 0 => table.record_count().min(cap),
        _ => table.record_count(),
    };
    total as u64
}

fn progress_bar(total: u64) -> Result<ProgressBar> {
    if !io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} records {msg}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}
