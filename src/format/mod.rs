//! Output formatting for records (CSV, JSON, table).

use crate::amazon::Record;
use crate::config::OutputFormat;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes records as CSV with a fixed header row.
///
/// The destination is created or truncated. An empty slice still produces a
/// file holding the header.
pub fn write_csv(records: &[Record], destination: impl AsRef<Path>) -> Result<()> {
    let path = destination.as_ref();
    debug!("Writing {} records as CSV to {}", records.len(), path.display());

    let file = File::create(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;

    write_csv_to(records, file).map_err(|source| Error::Write { path: path.to_path_buf(), source })
}

/// Writes records as a pretty-printed JSON array.
pub fn write_json(records: &[Record], destination: impl AsRef<Path>) -> Result<()> {
    let path = destination.as_ref();
    debug!("Writing {} records as JSON to {}", records.len(), path.display());

    let file = File::create(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|source| Error::Serialize { path: path.to_path_buf(), source })?;

    writeln!(writer)
        .and_then(|_| writer.flush())
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

fn write_csv_to<W: Write>(records: &[Record], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(Record::COLUMNS)?;
    for record in records {
        wtr.write_record(record.fields())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Formats records for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats records as a string.
    pub fn format_records(&self, records: &[Record]) -> String {
        match self.format {
            OutputFormat::Csv => self.csv_records(records),
            OutputFormat::Json => self.json_records(records),
            OutputFormat::Table => self.table_records(records),
        }
    }

    /// Writes records to a file in this formatter's format.
    pub fn write(&self, records: &[Record], destination: impl AsRef<Path>) -> Result<()> {
        let path = destination.as_ref();
        match self.format {
            OutputFormat::Csv => write_csv(records, path),
            OutputFormat::Json => write_json(records, path),
            OutputFormat::Table => {
                let mut text = self.table_records(records);
                text.push('\n');
                std::fs::write(path, text)
                    .map_err(|source| Error::Io { path: path.to_path_buf(), source })
            }
        }
    }

    // CSV formatting

    fn csv_records(&self, records: &[Record]) -> String {
        let mut buf = Vec::new();
        match write_csv_to(records, &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => Record::COLUMNS.join(","),
        }
    }

    // JSON formatting

    fn json_records(&self, records: &[Record]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_records(&self, records: &[Record]) -> String {
        if records.is_empty() {
            return "No records found.".to_string();
        }

        let price_width = 10;
        let rating_width = 20;
        let sold_width = 28;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<price_width$}  {:<rating_width$}  {:<sold_width$}  {}",
            "Price", "Rating", "Sold", "Title"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<rating_width$}  {:-<sold_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:>price_width$}  {:<rating_width$}  {:<sold_width$}  {}",
                or_na(&record.price),
                or_na(&record.rating),
                or_na(&record.last_month_sold),
                truncate(or_na(&record.title), title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} records", records.len()));

        lines.join("\n")
    }
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_record() -> Record {
        Record {
            link: "https://m.media-amazon.com/images/I/41abc.jpg".to_string(),
            title: "Widget Pro".to_string(),
            rating: "4.5 out of 5 stars".to_string(),
            price: "19".to_string(),
            last_month_sold: "200+ bought in past month".to_string(),
        }
    }

    fn make_tricky_record() -> Record {
        Record {
            link: String::new(),
            title: "Cable, 6ft \"braided\"\nblack".to_string(),
            rating: String::new(),
            price: "1,299".to_string(),
            last_month_sold: String::new(),
        }
    }

    fn read_back(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    // CSV file tests

    #[test]
    fn test_write_csv_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_csv(&[make_record(), Record::default()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "link,title,rating,price,last_month_sold");
        assert_eq!(
            lines[1],
            "https://m.media-amazon.com/images/I/41abc.jpg,Widget Pro,4.5 out of 5 stars,19,200+ bought in past month"
        );
        assert_eq!(lines[2], ",,,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_csv_empty_is_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "link,title,rating,price,last_month_sold\n");
    }

    #[test]
    fn test_write_csv_round_trips_special_characters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tricky.csv");
        let records = vec![make_record(), make_tricky_record()];

        write_csv(&records, &path).unwrap();

        let (headers, rows) = read_back(&path);
        assert_eq!(headers, Record::COLUMNS);
        assert_eq!(rows.len(), 2);
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(row, &record.fields());
        }
    }

    #[test]
    fn test_write_csv_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old content that is much longer than the new table\n".repeat(10))
            .unwrap();

        write_csv(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "link,title,rating,price,last_month_sold\n");
    }

    #[test]
    fn test_write_csv_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_csv(&[make_record()], &path).unwrap_err();
        assert!(err.is_write_error());
        assert!(err.to_string().contains("out.csv"));
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_json(&[make_record()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, vec![make_record()]);
    }

    #[test]
    fn test_write_json_unwritable_destination() {
        let dir = TempDir::new().unwrap();
        let err = write_json(&[], dir.path().join("nope").join("out.json")).unwrap_err();
        assert!(err.is_write_error());
    }

    // Formatter tests

    #[test]
    fn test_format_csv_string() {
        let output = Formatter::new(OutputFormat::Csv).format_records(&[make_tricky_record()]);
        assert!(output.starts_with("link,title,rating,price,last_month_sold\n"));
        assert!(output.contains("\"Cable, 6ft \"\"braided\"\"\nblack\""));
        assert!(output.contains("\"1,299\""));
    }

    #[test]
    fn test_format_csv_empty() {
        let output = Formatter::new(OutputFormat::Csv).format_records(&[]);
        assert_eq!(output, "link,title,rating,price,last_month_sold\n");
    }

    #[test]
    fn test_format_json() {
        let output = Formatter::new(OutputFormat::Json).format_records(&[make_record()]);
        assert!(output.starts_with('['));
        assert!(output.contains("\"last_month_sold\": \"200+ bought in past month\""));

        let empty = Formatter::new(OutputFormat::Json).format_records(&[]);
        assert_eq!(empty, "[]");
    }

    #[test]
    fn test_format_table() {
        let output =
            Formatter::new(OutputFormat::Table).format_records(&[make_record(), Record::default()]);

        assert!(output.contains("Price"));
        assert!(output.contains("Rating"));
        assert!(output.contains("Sold"));
        assert!(output.contains("Title"));
        assert!(output.contains("----------"));
        assert!(output.contains("Widget Pro"));
        assert!(output.contains("4.5 out of 5 stars"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total: 2 records"));
    }

    #[test]
    fn test_format_table_empty() {
        let output = Formatter::new(OutputFormat::Table).format_records(&[]);
        assert_eq!(output, "No records found.");
    }

    #[test]
    fn test_format_table_truncates_long_titles() {
        let record = Record {
            title: "This is a very long product title that exceeds fifty characters and keeps going"
                .to_string(),
            ..Default::default()
        };
        let output = Formatter::new(OutputFormat::Table).format_records(&[record]);
        assert!(output.contains("This is a very long product title that exceeds ..."));
        assert!(!output.contains("keeps going"));
    }

    #[test]
    fn test_truncate_multibyte() {
        let title = "é".repeat(60);
        let truncated = truncate(&title, 50);
        assert_eq!(truncated.chars().count(), 50);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_formatter_write_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        Formatter::new(OutputFormat::Table).write(&[make_record()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Widget Pro"));
        assert!(content.ends_with("Total: 1 records\n"));
    }
}
