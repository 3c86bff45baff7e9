//! CSV export of the displayed result table.

use crate::error::ExportError;
use crate::pipeline::{PromptData, Row};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes `rows` as CSV with a header line taken from the first row's keys.
///
/// `null` and missing cells are written empty; strings are written raw and
/// every other value as its JSON text.
pub fn to_csv(rows: &[Row]) -> Result<String, ExportError> {
    let first = rows.first().ok_or(ExportError::EmptyTable)?;
    let headers: Vec<&String> = first.keys().collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|h| cell(row.get(h.as_str()))))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `query_results_YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("query_results_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the table of `data` into `dir` under today's export file name.
pub fn export_to_dir(data: &PromptData, dir: &Path) -> Result<PathBuf, ExportError> {
    let csv = to_csv(&data.table)?;
    let path = dir.join(export_file_name(Local::now().date_naive()));
    fs::write(&path, csv)?;
    tracing::info!(path = %path.display(), rows = data.table.len(), "exported results");
    Ok(path)
}
