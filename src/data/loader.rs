// ============================================================
// Layer 4 - CSV Loader
// ============================================================
// Reads a delimited text file into a raw Dataset using the csv
// crate. The header is matched against the Schema once; after
// that each row is decoded by column position.
//
// Decoding rules per column kind:
//   numeric → f64 (must be finite)
//   code    → f64 holding an integer
//   binary  → "Yes"/"No" (case-insensitive) → true/false
//   text    → the trimmed string
// An empty field is Cell::Missing for every kind.
//
// Header columns the schema does not mention are skipped. The
// schema itself is validated by PipelineConfig, not here, so a
// feature-only schema can be used to load data for prediction.
//
// Reference: csv crate documentation (ReaderBuilder, StringRecord)

use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::PathBuf;

use crate::domain::error::{PipelineError, Result};
use crate::domain::record::{Cell, Dataset, Record};
use crate::domain::schema::{ColumnKind, Schema};
use crate::domain::traits::DatasetSource;

/// Loads a delimited file that must contain every schema column.
/// Implements the DatasetSource trait from Layer 3.
pub struct CsvLoader {
    path:      PathBuf,
    schema:    Schema,
    delimiter: u8,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self { path: path.into(), schema, delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<Dataset> {
        if !self.path.is_file() {
            return Err(PipelineError::FileNotFound(self.path.clone()));
        }

        // flexible(true) so ragged rows reach our own check and
        // get reported with their line number as a parse error
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(&self.path)?;

        let header = reader.headers()?.clone();
        if header.is_empty() || header.iter().all(str::is_empty) {
            return Err(PipelineError::parse(1, "missing header row"));
        }
        let positions = resolve_columns(&self.schema, &header)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if row.len() != header.len() {
                return Err(PipelineError::parse(
                    line,
                    format!("expected {} fields, found {}", header.len(), row.len()),
                ));
            }

            let mut cells = Vec::with_capacity(self.schema.len());
            for (col, &pos) in self.schema.columns.iter().zip(&positions) {
                let raw = row.get(pos).unwrap_or("");
                let cell = decode_cell(raw, col.kind).map_err(|msg| {
                    PipelineError::parse(line, format!("column '{}': {msg}", col.name))
                })?;
                cells.push(cell);
            }
            records.push(Record::new(cells));
        }

        tracing::info!(
            "Loaded {} rows × {} schema columns from '{}'",
            records.len(),
            self.schema.len(),
            self.path.display()
        );
        Ok(Dataset::new(self.schema.clone(), records))
    }
}

/// Map every schema column to its position in the file header.
fn resolve_columns(schema: &Schema, header: &StringRecord) -> Result<Vec<usize>> {
    schema
        .columns
        .iter()
        .map(|col| {
            header
                .iter()
                .position(|h| h == col.name)
                .ok_or_else(|| {
                    PipelineError::parse(1, format!("header is missing column '{}'", col.name))
                })
        })
        .collect()
}

/// Decode one trimmed field into a Cell for the given column kind.
fn decode_cell(raw: &str, kind: ColumnKind) -> std::result::Result<Cell, String> {
    if raw.is_empty() {
        return Ok(Cell::Missing);
    }
    match kind {
        ColumnKind::Numeric => parse_number(raw).map(Cell::Number),
        ColumnKind::Code => {
            let v = parse_number(raw)?;
            if v.fract() != 0.0 {
                return Err(format!("'{raw}' is not an integer code"));
            }
            Ok(Cell::Number(v))
        }
        ColumnKind::Binary => {
            if raw.eq_ignore_ascii_case("yes") {
                Ok(Cell::Flag(true))
            } else if raw.eq_ignore_ascii_case("no") {
                Ok(Cell::Flag(false))
            } else {
                Err(format!("'{raw}' is not Yes/No"))
            }
        }
        ColumnKind::Text => Ok(Cell::Text(raw.to_string())),
    }
}

fn parse_number(raw: &str) -> std::result::Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("'{raw}' is not a finite number")),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::Column;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn small_schema() -> Schema {
        Schema {
            columns: vec![
                Column::feature("x", ColumnKind::Numeric),
                Column::feature("online", ColumnKind::Binary),
                Column::passthrough("name", ColumnKind::Text),
                Column::target("y"),
            ],
        }
    }

    #[test]
    fn test_loads_rows_in_schema_order() {
        let f = write_csv("name,y,x,online,extra\nA,4.5,10,Yes,zzz\nB,3.0,,No,zzz\n");
        let ds = CsvLoader::new(f.path(), small_schema()).load().unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.records[0].cells,
            vec![
                Cell::Number(10.0),
                Cell::Flag(true),
                Cell::Text("A".into()),
                Cell::Number(4.5),
            ]
        );
        assert_eq!(ds.records[1].cells[0], Cell::Missing);
    }

    #[test]
    fn test_quoted_fields_with_delimiters() {
        let f = write_csv("name,x,online,y\n\"Cafe, Bar\",1,no,2\n");
        let ds = CsvLoader::new(f.path(), small_schema()).load().unwrap();
        assert_eq!(ds.records[0].cells[2], Cell::Text("Cafe, Bar".into()));
    }

    #[test]
    fn test_custom_delimiter() {
        let f = write_csv("name;x;online;y\nA;1;Yes;2\n");
        let ds = CsvLoader::new(f.path(), small_schema())
            .with_delimiter(b';')
            .load()
            .unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let err = CsvLoader::new("/definitely/not/here.csv", small_schema())
            .load()
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_schema_column_is_parse_error() {
        let f = write_csv("name,x,y\nA,1,2\n");
        let err = CsvLoader::new(f.path(), small_schema()).load().unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 1, .. }));
        assert!(err.to_string().contains("online"));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let f = write_csv("name,x,online,y\nA,1,Yes,2\nB,1,Yes\n");
        let err = CsvLoader::new(f.path(), small_schema()).load().unwrap_err();
        assert!(matches!(err, PipelineError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let f = write_csv("name,x,online,y\nA,ten,Yes,2\n");
        let err = CsvLoader::new(f.path(), small_schema()).load().unwrap_err();
        assert!(err.to_string().contains("'ten'"));
    }

    #[test]
    fn test_bad_flag_is_parse_error() {
        let f = write_csv("name,x,online,y\nA,1,Maybe,2\n");
        let err = CsvLoader::new(f.path(), small_schema()).load().unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }

    #[test]
    fn test_code_must_be_integral() {
        assert_eq!(decode_cell("216", ColumnKind::Code), Ok(Cell::Number(216.0)));
        assert!(decode_cell("1.5", ColumnKind::Code).is_err());
        assert!(decode_cell("NaN", ColumnKind::Numeric).is_err());
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let f = write_csv("");
        let err = CsvLoader::new(f.path(), small_schema()).load().unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }
}
