// ============================================================
// Layer 4 — Dataset Loaders
// ============================================================
// Reads the raw text column the corpus is built from.
//
// Two on-disk formats are supported:
//
//   .parquet        → ParquetLoader   (columnar, the usual
//                                       format for Q&A dumps)
//   .jsonl/.ndjson  → JsonLinesLoader (one JSON object per line)
//
// Both implement the DatasetSource trait from Layer 3, so the
// application layer never sees file formats.
//
// Column handling is the same for both:
//   - the column must exist, otherwise Error::Schema is
//     returned before any record is produced
//   - string cells become text records
//   - nulls and non-string values become "not text" records
//     (they tokenize to an empty sequence later)
//
// Reference: parquet crate documentation (record API)
//            Rust Book §9 (Error Handling)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use parquet::schema::types::Type;

use crate::domain::error::{Error, Result};
use crate::domain::record::RawRecord;
use crate::domain::traits::DatasetSource;

/// Column read when none is configured
pub const DEFAULT_TEXT_COLUMN: &str = "answer";

/// Pick a loader from the file extension.
pub fn open_dataset(path: impl Into<PathBuf>) -> Result<Box<dyn DatasetSource>> {
    let path = path.into();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("parquet") => Ok(Box::new(ParquetLoader::new(path))),
        Some("jsonl") | Some("ndjson") => Ok(Box::new(JsonLinesLoader::new(path))),
        _ => Err(Error::dataset(
            &path,
            "unsupported file type (expected .parquet, .jsonl or .ndjson)",
        )),
    }
}

// ─── ParquetLoader ───────────────────────────────────────────────────────────

pub struct ParquetLoader {
    path: PathBuf,
}

impl ParquetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for ParquetLoader {
    fn load_column(&self, column: &str) -> Result<Vec<RawRecord>> {
        let file = File::open(&self.path).map_err(|e| Error::dataset(&self.path, e))?;
        let reader = SerializedFileReader::new(file).map_err(|e| Error::dataset(&self.path, e))?;

        // Schema check first: no row is decoded if the column is missing
        let field = reader
            .metadata()
            .file_metadata()
            .schema()
            .get_fields()
            .iter()
            .find(|f| f.name() == column)
            .cloned()
            .ok_or_else(|| Error::Schema {
                path:   self.path.clone(),
                column: column.to_string(),
            })?;

        // Project onto the one column so wide files stay cheap to read
        let projection = Type::group_type_builder("schema")
            .with_fields(vec![Arc::clone(&field)])
            .build()
            .map_err(|e| Error::dataset(&self.path, e))?;

        let rows = reader
            .get_row_iter(Some(projection))
            .map_err(|e| Error::dataset(&self.path, e))?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| Error::dataset(&self.path, e))?;
            let text = row
                .get_column_iter()
                .find(|(name, _)| name.as_str() == column)
                .and_then(|(_, value)| match value {
                    Field::Str(s) => Some(s.clone()),
                    _ => None,
                });
            records.push(RawRecord::from(text));
        }

        tracing::debug!("Read {} rows from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

// ─── JsonLinesLoader ─────────────────────────────────────────────────────────

pub struct JsonLinesLoader {
    path: PathBuf,
}

impl JsonLinesLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for JsonLinesLoader {
    fn load_column(&self, column: &str) -> Result<Vec<RawRecord>> {
        let file = File::open(&self.path).map_err(|e| Error::dataset(&self.path, e))?;
        let reader = BufReader::new(file);

        let mut records    = Vec::new();
        let mut column_seen = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::dataset(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let value: serde_json::Value = serde_json::from_str(&line).map_err(|e| {
                Error::dataset(&self.path, format!("line {}: {e}", line_no + 1))
            })?;

            let cell = value.get(column);
            column_seen |= cell.is_some();
            let text = cell.and_then(|v| v.as_str()).map(str::to_string);
            records.push(RawRecord::from(text));
        }

        // A JSONL file has no header: the column exists if any row has it
        if !column_seen {
            return Err(Error::Schema {
                path:   self.path.clone(),
                column: column.to_string(),
            });
        }

        tracing::debug!("Read {} lines from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_jsonl(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        for l in lines {
            writeln!(f, "{l}").unwrap();
        }
        f
    }

    #[test]
    fn test_jsonl_reads_column_in_order() {
        let f = write_jsonl(&[
            r#"{"question": "q1", "answer": "use np.array"}"#,
            "",
            r#"{"question": "q2", "answer": null}"#,
            r#"{"question": "q3", "answer": 42}"#,
            r#"{"question": "q4"}"#,
            r#"{"answer": "call main()"}"#,
        ]);
        let records = JsonLinesLoader::new(f.path()).load_column("answer").unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::text("use np.array"),
                RawRecord::not_text(),
                RawRecord::not_text(),
                RawRecord::not_text(),
                RawRecord::text("call main()"),
            ]
        );
    }

    #[test]
    fn test_jsonl_missing_column_is_schema_error() {
        let f = write_jsonl(&[r#"{"question": "q1"}"#, r#"{"question": "q2"}"#]);
        let err = JsonLinesLoader::new(f.path()).load_column("answer").unwrap_err();
        assert!(matches!(err, Error::Schema { ref column, .. } if column == "answer"));
    }

    #[test]
    fn test_jsonl_malformed_line_reports_line_number() {
        let f = write_jsonl(&[r#"{"answer": "ok"}"#, "{not json"]);
        let err = JsonLinesLoader::new(f.path()).load_column("answer").unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    fn write_parquet(path: &Path, answers: &[Option<&str>]) {
        use parquet::data_type::{ByteArray, ByteArrayType, Int32Type};
        use parquet::file::properties::WriterProperties;
        use parquet::file::writer::SerializedFileWriter;
        use parquet::schema::parser::parse_message_type;

        let schema = Arc::new(
            parse_message_type(
                "message schema { REQUIRED INT32 id; OPTIONAL BYTE_ARRAY answer (UTF8); }",
            )
            .unwrap(),
        );
        let props  = Arc::new(WriterProperties::builder().build());
        let file   = File::create(path).unwrap();
        let mut writer    = SerializedFileWriter::new(file, schema, props).unwrap();
        let mut row_group = writer.next_row_group().unwrap();

        let ids: Vec<i32> = (0..answers.len() as i32).collect();
        let mut col = row_group.next_column().unwrap().unwrap();
        col.typed::<Int32Type>().write_batch(&ids, None, None).unwrap();
        col.close().unwrap();

        // Definition level 0 marks a null cell
        let values: Vec<ByteArray> = answers.iter().flatten().map(|s| ByteArray::from(*s)).collect();
        let def_levels: Vec<i16>   = answers.iter().map(|a| i16::from(a.is_some())).collect();
        let mut col = row_group.next_column().unwrap().unwrap();
        col.typed::<ByteArrayType>()
            .write_batch(&values, Some(&def_levels), None)
            .unwrap();
        col.close().unwrap();

        row_group.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_parquet_reads_column_with_nulls() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.parquet");
        write_parquet(&path, &[Some("The user_id was 42"), None, Some("np.array(h2o)")]);

        let records = ParquetLoader::new(&path).load_column("answer").unwrap();
        assert_eq!(
            records,
            vec![
                RawRecord::text("The user_id was 42"),
                RawRecord::not_text(),
                RawRecord::text("np.array(h2o)"),
            ]
        );
    }

    #[test]
    fn test_parquet_missing_column_is_schema_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.parquet");
        write_parquet(&path, &[Some("hello world")]);

        let err = ParquetLoader::new(&path).load_column("body").unwrap_err();
        assert!(matches!(err, Error::Schema { ref column, .. } if column == "body"));
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let err = ParquetLoader::new("/definitely/not/here.parquet")
            .load_column("answer")
            .unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
    }

    #[test]
    fn test_open_dataset_by_extension() {
        assert!(open_dataset("data.parquet").is_ok());
        assert!(open_dataset("data.JSONL").is_ok());
        assert!(matches!(open_dataset("data.csv"), Err(Error::Dataset { .. })));
    }
}
