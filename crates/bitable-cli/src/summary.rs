use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bitable_fetch::{DoneReason, FetchState};
use bitable_print::DataSourceKind;

use bitable_cli::pipeline::PrintMode;

use crate::commands::{FetchResult, FieldsResult, PrintResult};

// Fetch and print summaries go to stderr; stdout carries the JSON.

pub fn print_fields(result: &FieldsResult) {
    println!("Table: {}", result.table_name);
    if let Some(view) = &result.view {
        println!("View: {view}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Code"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (index, field) in result.fields.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&field.id).fg(Color::Blue),
            Cell::new(&field.name),
            Cell::new(field.kind.as_str()),
            dim_cell(field.kind.code()),
        ]);
    }
    println!("{table}");
}

pub fn print_fetch_summary(result: &FetchResult) {
    eprintln!("{}", fetch_table(result));
}

pub fn print_print_summary(result: &PrintResult) {
    eprintln!("{}", fetch_table(&result.fetch));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Mode"),
        header_cell("Source"),
        header_cell("Documents"),
        header_cell("Table rows"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 2..6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    let rows: usize = result
        .print
        .documents
        .iter()
        .filter_map(|document| document.table.as_ref().map(Vec::len))
        .sum();
    let report = &result.print.report;
    table.add_row(vec![
        Cell::new(match result.mode {
            PrintMode::Single => "single",
            PrintMode::Multiple => "multiple",
        })
        .add_attribute(Attribute::Bold),
        source_cell(result.print.source),
        Cell::new(result.print.documents.len()),
        Cell::new(rows),
        count_cell(report.errors.len(), Color::Red),
        count_cell(report.warnings.len(), Color::Yellow),
    ]);
    eprintln!("{table}");
    for error in &report.errors {
        match error.index {
            Some(index) => eprintln!("- [{index}] {}", error.message),
            None => eprintln!("- {}", error.message),
        }
    }
}

fn fetch_table(result: &FetchResult) -> Table {
    let outcome = &result.outcome;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("View"),
        header_cell("Fields"),
        header_cell("Records"),
        header_cell("Pages"),
        header_cell("Null values"),
        header_cell("Finished"),
        header_cell("Elapsed"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 2..6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(&result.table_name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        match &result.view {
            Some(view) => Cell::new(view),
            None => dim_cell("-"),
        },
        Cell::new(outcome.fields.len()),
        Cell::new(outcome.records.len()).add_attribute(Attribute::Bold),
        Cell::new(outcome.pages),
        count_cell(outcome.null_values(), Color::Yellow),
        Cell::new(state_label(outcome.state)),
        dim_cell(format!("{:.2?}", outcome.elapsed)),
    ]);
    table
}

fn state_label(state: FetchState) -> &'static str {
    match state {
        FetchState::Done(DoneReason::CursorExhausted) => "all pages",
        FetchState::Done(DoneReason::CapReached) => "record cap",
        FetchState::Done(DoneReason::SingleRecord) => "single record",
        FetchState::Failed => "failed",
        FetchState::Idle | FetchState::FetchingPage { .. } | FetchState::ResolvingFields { .. } => {
            "-"
        }
    }
}

fn source_cell(source: Option<DataSourceKind>) -> Cell {
    match source {
        Some(DataSourceKind::Empty) => Cell::new("empty").fg(Color::Yellow),
        Some(kind) => Cell::new(kind.as_str()).fg(Color::Green),
        None => dim_cell("records"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
