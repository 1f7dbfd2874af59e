use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use melt_ingest::ManifestCheck;
use melt_output::PublishStatus;

use melt_cli::types::{DatasetSummary, RunResult};

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Input rows"),
        header_cell("Dates"),
        header_cell("Output rows"),
        header_cell("Duplicates"),
        header_cell("Dropped"),
        header_cell("Date range"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Right);
    align_column(&mut table, 8, CellAlignment::Center);

    let mut total_input = 0usize;
    let mut total_output = 0usize;
    for summary in &result.datasets {
        total_input += summary.input_rows;
        total_output += summary.output_rows;
        table.add_row(vec![
            Cell::new(&summary.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.input_rows),
            Cell::new(summary.measure_columns),
            Cell::new(summary.output_rows),
            count_cell(Some(summary.duplicates_removed), Color::Yellow),
            count_cell(Some(summary.rows_out_of_range_dropped), Color::Yellow),
            date_range_cell(summary),
            count_cell(Some(summary.warnings.len()), Color::Yellow),
            status_cell(summary, result.dry_run),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_input).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_output).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    print_warnings(result);
    print_published(result);
    let failed: Vec<&DatasetSummary> = result.failed_datasets().collect();
    if !failed.is_empty() {
        eprintln!("Errors:");
        for summary in failed {
            if let Some(error) = &summary.error {
                eprintln!("- {}: {error}", summary.name);
            }
        }
    }
}

pub fn print_check(check: &ManifestCheck, dir: &Path) {
    println!("Data directory: {}", dir.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Status")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for file in &check.present {
        table.add_row(vec![
            Cell::new(file),
            Cell::new("present").fg(Color::Green),
        ]);
    }
    for file in &check.missing {
        table.add_row(vec![
            Cell::new(file),
            Cell::new("missing")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
}

fn print_warnings(result: &RunResult) {
    let rows: Vec<(&str, &str)> = result
        .datasets
        .iter()
        .flat_map(|summary| {
            summary
                .warnings
                .iter()
                .map(move |warning| (summary.name.as_str(), warning.as_str()))
        })
        .collect();
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Dataset"), header_cell("Warning")]);
    apply_table_style(&mut table);
    for (name, warning) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(warning).fg(Color::Yellow)]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
}

fn print_published(result: &RunResult) {
    if result.published.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Published to")]);
    apply_table_style(&mut table);
    for outcome in &result.published {
        let file = outcome
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.file.display().to_string());
        let status = match &outcome.status {
            PublishStatus::Published { location } => Cell::new(location),
            PublishStatus::Failed { error } => Cell::new(error).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(file), status]);
    }
    println!();
    println!("Published:");
    println!("{table}");
}

fn date_range_cell(summary: &DatasetSummary) -> Cell {
    match (summary.min_date, summary.max_date) {
        (Some(min), Some(max)) => Cell::new(format!("{min} .. {max}")),
        _ => dim_cell("-"),
    }
}

fn status_cell(summary: &DatasetSummary, dry_run: bool) -> Cell {
    if summary.error.is_some() {
        return Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold);
    }
    if summary.output.is_some() || dry_run {
        return Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold);
    }
    dim_cell("-")
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
