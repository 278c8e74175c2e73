//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use curvewatch_analytics::panel::SeriesPanel;

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{table}");
    Ok(())
}

/// Prints data as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints a metric list under a header; JSON output is a flat object.
pub fn print_key_values(results: &[KeyValue], title: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            print_header(title);
            print_table(results)
        }
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = results
                .iter()
                .map(|r| (r.key.clone(), serde_json::Value::String(r.value.clone())))
                .collect();
            print_json(&output)
        }
        OutputFormat::Csv => print_csv(results),
    }
}

/// Prints a date-by-series panel. Missing cells are blank in tables and
/// CSV and `null` in JSON.
pub fn print_panel(panel: &SeriesPanel, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = panel
                .rows()
                .map(|(date, cells)| {
                    let mut row = serde_json::Map::new();
                    row.insert("date".into(), serde_json::Value::String(date.to_string()));
                    for (name, cell) in panel.names().iter().zip(cells) {
                        row.insert(name.clone(), serde_json::json!(cell));
                    }
                    serde_json::Value::Object(row)
                })
                .collect();
            print_json(&rows)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(std::iter::once("date").chain(panel.names().iter().map(String::as_str)))?;
            for (date, cells) in panel.rows() {
                wtr.write_record(
                    std::iter::once(date.to_string()).chain(cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default())),
                )?;
            }
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Table => {
            if panel.is_empty() {
                println!("No results.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(std::iter::once("Date".to_string()).chain(panel.names().iter().cloned()));
            for (date, cells) in panel.rows() {
                builder.push_record(std::iter::once(date.to_string()).chain(cells.iter().map(fmt_opt)));
            }
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

/// Four-decimal rendering used in tables.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn fmt_number(value: &f64) -> String {
    format!("{value:.4}")
}

/// Four decimals, or blank when missing.
pub fn fmt_opt(value: &Option<f64>) -> String {
    value.as_ref().map(fmt_number).unwrap_or_default()
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }

    /// Creates a key-value pair from a number with four decimals.
    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, fmt_number(&value))
    }

    /// Like [`KeyValue::number`], with `n/a` for a missing value.
    pub fn optional(key: impl Into<String>, value: Option<f64>) -> Self {
        match value {
            Some(v) => Self::number(key, v),
            None => Self::new(key, "n/a"),
        }
    }
}
