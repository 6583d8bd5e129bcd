//! Tabular source loaders.
//!
//! Reads the first sheet of a question spreadsheet, exported either as CSV
//! or as a JSON array of row objects, into parser [`Record`]s. Blank cells
//! are dropped so a record only carries the columns the row actually fills.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::QuestionBank;
use crate::parser::{parse_records, Record};

/// Load records from a `.csv` or `.json` file, chosen by extension.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("csv") => records_from_csv_str(&content)
            .with_context(|| format!("failed to parse CSV: {}", path.display())),
        Some("json") => records_from_json_str(&content)
            .with_context(|| format!("failed to parse JSON rows: {}", path.display())),
        _ => anyhow::bail!(
            "unsupported question file type: {} (expected .csv or .json)",
            path.display()
        ),
    }
}

/// Load and parse a question file into a bank named after the file.
pub fn parse_bank_file(path: &Path) -> Result<QuestionBank> {
    let records = load_records(path)?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bank = parse_records(&records, &source_name)?;
    Ok(bank)
}

/// Parse CSV text with a header row into records.
pub fn records_from_csv_str(content: &str) -> Result<Vec<Record>> {
    // Spreadsheet exports commonly prefix a UTF-8 byte order mark.
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("malformed CSV row {}", line + 2))?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, value)| !header.is_empty() && !value.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        if record.is_empty() {
            continue;
        }
        records.push(record);
    }

    Ok(records)
}

/// Parse a JSON array of row objects into records.
///
/// Numbers and booleans are stringified; `null` and empty cells are dropped.
pub fn records_from_json_str(content: &str) -> Result<Vec<Record>> {
    let content = content.trim_start_matches('\u{feff}');
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(content).context("expected a JSON array of row objects")?;

    let records = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .filter_map(|(column, value)| {
                    let text = match value {
                        Value::Null => return None,
                        Value::String(s) => s,
                        Value::Bool(b) => b.to_string(),
                        Value::Number(n) => n.to_string(),
                        other => other.to_string(),
                    };
                    (!text.is_empty()).then_some((column, text))
                })
                .collect::<Record>()
        })
        .filter(|record| !record.is_empty())
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFormat;

    const CSV_BANK: &str = "\u{feff}問題,選項A,選項B,選項C,正確答案\n\
        台灣最高的山？,玉山,雪山,,A\n\
        ,空白題,,,\n\
        \"1,000 的一半？\",500,250,100,a\n";

    #[test]
    fn csv_records_drop_blank_cells() {
        let records = records_from_csv_str(CSV_BANK).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get("問題").map(String::as_str), Some("台灣最高的山？"));
        assert!(!records[0].contains_key("選項C"));
        assert!(!records[1].contains_key("問題"));
    }

    #[test]
    fn csv_file_round_trip_into_bank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.csv");
        std::fs::write(&path, CSV_BANK).unwrap();

        let bank = parse_bank_file(&path).unwrap();
        assert_eq!(bank.source_name, "bank.csv");
        assert_eq!(bank.format, SourceFormat::MultipleChoice);
        let ids: Vec<u32> = bank.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(bank.questions[1].text, "1,000 的一半？");
        assert_eq!(bank.questions[1].answer, "A");
    }

    #[test]
    fn json_rows_stringify_cells() {
        let json = r#"[
            {"試題": "2+2=4", "答案": "O"},
            {"試題": "第 3 題", "答案": false, "備註": null},
            {}
        ]"#;
        let records = records_from_json_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("答案").map(String::as_str), Some("false"));
        assert!(!records[1].contains_key("備註"));
    }

    #[test]
    fn json_file_into_true_false_bank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tf.json");
        std::fs::write(
            &path,
            r#"[{"試題": "天空是藍的", "答案": "是"}, {"試題": "1 > 2", "答案": "非"}]"#,
        )
        .unwrap();

        let bank = parse_bank_file(&path).unwrap();
        assert_eq!(bank.format, SourceFormat::TrueFalse);
        assert_eq!(bank.questions[0].answer, "O");
        assert_eq!(bank.questions[1].answer, "X");
    }

    #[test]
    fn json_file_with_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tf.json");
        std::fs::write(&path, "\u{feff}[{\"試題\": \"水是濕的\", \"答案\": \"O\"}]").unwrap();

        let bank = parse_bank_file(&path).unwrap();
        assert_eq!(bank.format, SourceFormat::TrueFalse);
        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.questions[0].text, "水是濕的");
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.xlsx");
        std::fs::write(&path, "binary").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn unknown_layout_surfaces_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "name,score\nalice,3\n").unwrap();
        let err = parse_bank_file(&path).unwrap_err();
        assert!(err.to_string().contains("format error"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_records(Path::new("does-not-exist.csv")).is_err());
    }
}
