use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use reweigh_cli::pipeline::EvaluationRun;
use reweigh_model::{AttributeOutcome, AttributeResult};

pub fn print_summary(run: &EvaluationRun) {
    let result = &run.result;
    println!("Dataset: {}", run.dataset.display());
    println!("Reference: {}", result.source);
    println!("Rows: {}", result.row_count);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Attribute"),
        header_cell("Column"),
        header_cell("Status"),
        header_cell("Categories"),
        header_cell("Flagged"),
        header_cell("Max deviation (pp)"),
        header_cell("Weight range"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    for entry in &result.attributes {
        table.add_row(attribute_row(entry));
    }
    println!("{table}");

    if !result.anomalies.is_empty() {
        eprintln!("Weight anomalies (reset to 1.0):");
        for anomaly in &result.anomalies {
            eprintln!("- {}: {}", anomaly.attribute, anomaly.reason);
        }
    }

    match result.summary() {
        Some(summary) if result.rebalanced() => println!(
            "Weights: min {:.3}, max {:.3}, mean {:.3}, effective sample size {:.1}",
            summary.min, summary.max, summary.mean, summary.effective_sample_size
        ),
        _ => println!("No rebalancing performed; all weights are 1.0."),
    }

    println!("Report: {}", run.report.display());
    if let Some(path) = &run.report_json {
        println!("Report JSON: {}", path.display());
    }
    if let Some(path) = &run.weights_json {
        println!("Weights JSON: {}", path.display());
    }
    if let Some(path) = &run.weighted_output {
        println!("Weighted dataset: {}", path.display());
    }
}

fn attribute_row(entry: &AttributeResult) -> Vec<Cell> {
    let attribute = Cell::new(&entry.label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold);
    match &entry.outcome {
        AttributeOutcome::Corrected {
            comparison,
            weights,
        } => {
            let (low, high) = weights
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), (_, w)| {
                    (low.min(w), high.max(w))
                });
            vec![
                attribute,
                Cell::new(comparison.column()),
                Cell::new("corrected").fg(Color::Green),
                Cell::new(comparison.categories.len()),
                flag_cell(entry.is_imbalanced()),
                Cell::new(format!("{:.2}", comparison.max_deviation_pct())),
                Cell::new(format!("{low:.3} - {high:.3}")),
            ]
        }
        AttributeOutcome::NoReference { column } => {
            uncorrected_row(attribute, column, Cell::new("no reference").fg(Color::Yellow))
        }
        AttributeOutcome::NoValues { column } => {
            uncorrected_row(attribute, column, Cell::new("no values").fg(Color::Yellow))
        }
        AttributeOutcome::NotDetected => vec![
            attribute,
            dim_cell("-"),
            dim_cell("not detected"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ],
    }
}

fn uncorrected_row(attribute: Cell, column: &str, status: Cell) -> Vec<Cell> {
    vec![
        attribute,
        Cell::new(column),
        status,
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]
}

fn flag_cell(flagged: bool) -> Cell {
    if flagged {
        Cell::new("yes").fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell("no")
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
