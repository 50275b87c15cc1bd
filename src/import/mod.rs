use anyhow::{ensure, Context as _, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead as _, BufReader, Read};
use std::path::Path;

mod parser;
mod record;

#[cfg(test)]
pub use record::testutils;
pub use record::{normalize, MalformedRecordError, RawRecord, Side};

use crate::ir::CategoryPath;

const DELIMITER: u8 = b';';

/// Columns every ZenMoney export has. Exports may have more, e.g. `createdDate` or `qrCode`.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "date",
    "categoryName",
    "payee",
    "comment",
    "outcomeAccountName",
    "outcome",
    "outcomeCurrencyShortTitle",
    "incomeAccountName",
    "income",
    "incomeCurrencyShortTitle",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Line number in the CSV file, for error messages
    pub line: u64,
    pub record: RawRecord,
}

pub fn load_file(path: &Path) -> Result<Vec<Row>> {
    log::info!("Loading {}...", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = load(file).with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!("Loading {}...done ({} rows)", path.display(), rows.len());
    Ok(rows)
}

pub fn load(mut input_stream: impl Read) -> Result<Vec<Row>> {
    let mut content = String::new();
    input_stream.read_to_string(&mut content)?;
    let content = maybe_remove_byte_order_mark(content);

    let mut reader = csv_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let missing = missing_columns(&headers);
    ensure!(
        missing.is_empty(),
        "Not a ZenMoney export, missing columns: {}",
        missing.join(", "),
    );

    reader
        .records()
        .map(|record| -> Result<Row> {
            let record = record?;
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            let record = record
                .deserialize(Some(&headers))
                .with_context(|| format!("Failed to read line {line}"))?;
            Ok(Row { line, record })
        })
        .collect()
}

/// Whether the file at `path` looks like a ZenMoney CSV export.
pub fn identify(path: &Path) -> bool {
    let has_csv_extension = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
    if !has_csv_extension {
        return false;
    }
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut header_line = String::new();
    if BufReader::new(file).read_line(&mut header_line).is_err() {
        return false;
    }
    identify_header(&header_line)
}

pub fn identify_header(header_line: &str) -> bool {
    let header_line = header_line
        .strip_prefix('\u{FEFF}')
        .unwrap_or(header_line);
    match csv_reader(header_line.as_bytes()).headers() {
        Ok(headers) => !headers.is_empty() && missing_columns(headers).is_empty(),
        Err(_) => false,
    }
}

/// All account names used in the export, sorted
pub fn account_names(rows: &[Row]) -> BTreeSet<String> {
    rows.iter()
        .flat_map(|row| {
            [
                row.record.outcome_account_name.trim(),
                row.record.income_account_name.trim(),
            ]
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// All categories used in the export, including their parent categories, sorted
pub fn category_names(rows: &[Row]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|row| CategoryPath::parse(&row.record.category_name))
        .flat_map(|category| category.prefixes().collect::<Vec<_>>())
        .collect()
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(DELIMITER)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input)
}

fn missing_columns(headers: &csv::StringRecord) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect()
}

fn maybe_remove_byte_order_mark(mut content: String) -> String {
    if content.starts_with('\u{FEFF}') {
        content.remove(0);
    }
    content
}
