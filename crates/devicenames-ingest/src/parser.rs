//! CSV record reading and header resolution
//!
//! The catalog is comma separated with a header row. Quoting is lenient and
//! rows may carry more or fewer fields than the header; deciding whether a
//! row is usable is left to the normalizer.

use crate::error::{IngestError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

pub const RETAIL_BRANDING_COLUMN: &str = "retail branding";
pub const MARKETING_NAME_COLUMN: &str = "marketing name";
pub const MODEL_COLUMN: &str = "model";

/// Positions of the required columns, resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub retail_branding: usize,
    pub marketing_name: usize,
    pub model: usize,
}

impl ColumnIndices {
    /// Match header cells case-insensitively after trimming.
    ///
    /// Fails with every missing column named. When a name occurs twice the
    /// last occurrence wins.
    pub fn resolve(header: &StringRecord) -> Result<Self> {
        let positions: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim().to_lowercase(), index))
            .collect();

        let lookup = |name: &str| positions.get(name).copied();

        match (
            lookup(RETAIL_BRANDING_COLUMN),
            lookup(MARKETING_NAME_COLUMN),
            lookup(MODEL_COLUMN),
        ) {
            (Some(retail_branding), Some(marketing_name), Some(model)) => Ok(Self {
                retail_branding,
                marketing_name,
                model,
            }),
            _ => {
                let missing = [RETAIL_BRANDING_COLUMN, MARKETING_NAME_COLUMN, MODEL_COLUMN]
                    .into_iter()
                    .filter(|name| !positions.contains_key(*name))
                    .map(str::to_string)
                    .collect();
                Err(IngestError::MissingColumns {
                    missing,
                    available: header.iter().map(|h| h.trim().to_string()).collect(),
                })
            },
        }
    }

    /// Fewest fields a row needs to contain every required column
    pub fn min_field_count(&self) -> usize {
        self.retail_branding.max(self.marketing_name).max(self.model) + 1
    }
}

/// One data row as read from the source
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    Record { line: u64, record: StringRecord },
    Malformed { line: u64, reason: String },
}

impl ParsedRow {
    pub fn line(&self) -> u64 {
        match self {
            ParsedRow::Record { line, .. } | ParsedRow::Malformed { line, .. } => *line,
        }
    }
}

/// Reads the header once, then hands out data rows with their line numbers.
///
/// Line numbers count records, header included as line 1.
pub struct RecordReader<R> {
    inner: csv::Reader<R>,
    line: u64,
}

impl<R: Read> RecordReader<R> {
    pub fn new(rdr: R) -> Self {
        let inner = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(true)
            .double_quote(true)
            .from_reader(rdr);

        Self { inner, line: 1 }
    }

    /// Read the header row and resolve the required columns
    pub fn resolve_columns(&mut self) -> Result<ColumnIndices> {
        let header = self.inner.headers().map_err(IngestError::Header)?;
        debug!(header = ?header, "CSV header");
        ColumnIndices::resolve(header)
    }

    /// Next data row, `None` at end of input.
    ///
    /// A row that cannot be read is returned as [`ParsedRow::Malformed`];
    /// only an I/O failure of the underlying reader is an error.
    pub fn next_row(&mut self) -> Result<Option<ParsedRow>> {
        let mut record = StringRecord::new();
        let result = self.inner.read_record(&mut record);
        let line = self.line + 1;

        match result {
            Ok(false) => Ok(None),
            Ok(true) => {
                self.line = line;
                Ok(Some(ParsedRow::Record { line, record }))
            },
            Err(e) if e.is_io_error() => Err(IngestError::Read { line, source: e }),
            Err(e) => {
                self.line = line;
                Ok(Some(ParsedRow::Malformed {
                    line,
                    reason: e.to_string(),
                }))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn header(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_resolve_canonical_header() {
        let columns = ColumnIndices::resolve(&header(&[
            "Retail Branding",
            "Marketing Name",
            "Device",
            "Model",
        ]))
        .unwrap();
        assert_eq!(
            columns,
            ColumnIndices {
                retail_branding: 0,
                marketing_name: 1,
                model: 3
            }
        );
        assert_eq!(columns.min_field_count(), 4);
    }

    #[test]
    fn test_resolve_reordered_and_cased_header() {
        let columns =
            ColumnIndices::resolve(&header(&["Model", " RETAIL BRANDING ", "Marketing Name"]))
                .unwrap();
        assert_eq!(columns.model, 0);
        assert_eq!(columns.retail_branding, 1);
        assert_eq!(columns.marketing_name, 2);
    }

    #[test]
    fn test_resolve_reports_all_missing_columns() {
        let err = ColumnIndices::resolve(&header(&["Retail Branding", "Device"])).unwrap_err();
        match err {
            IngestError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["marketing name", "model"]);
                assert_eq!(available, vec!["Retail Branding", "Device"]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reader_numbers_lines_from_header() {
        let data = "Retail Branding,Marketing Name,Model\nGoogle,Pixel 8,shiba\nSamsung,Galaxy S21,SM-G991B\n";
        let mut reader = RecordReader::new(data.as_bytes());
        reader.resolve_columns().unwrap();

        let first = reader.next_row().unwrap().unwrap();
        assert_eq!(first.line(), 2);
        let second = reader.next_row().unwrap().unwrap();
        assert_eq!(second.line(), 3);
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn test_reader_accepts_variable_field_counts() {
        let data = "Retail Branding,Marketing Name,Model\nGoogle\nSamsung,Galaxy,SM-1,extra,fields\n";
        let mut reader = RecordReader::new(data.as_bytes());
        reader.resolve_columns().unwrap();

        match reader.next_row().unwrap().unwrap() {
            ParsedRow::Record { record, .. } => assert_eq!(record.len(), 1),
            other => panic!("unexpected row: {other:?}"),
        }
        match reader.next_row().unwrap().unwrap() {
            ParsedRow::Record { record, .. } => assert_eq!(record.len(), 5),
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn test_reader_tolerates_stray_quotes() {
        let data = "Retail Branding,Marketing Name,Model\nAcme,5\" Tablet,T5\nAcme,\"Quoted, name\",Q1\n";
        let mut reader = RecordReader::new(data.as_bytes());
        reader.resolve_columns().unwrap();

        match reader.next_row().unwrap().unwrap() {
            ParsedRow::Record { record, .. } => assert_eq!(&record[1], "5\" Tablet"),
            other => panic!("unexpected row: {other:?}"),
        }
        match reader.next_row().unwrap().unwrap() {
            ParsedRow::Record { record, .. } => assert_eq!(&record[1], "Quoted, name"),
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_row_is_malformed_not_fatal() {
        let mut data = b"Retail Branding,Marketing Name,Model\n".to_vec();
        data.extend_from_slice(b"Acme,\xFF\xFE,X1\n");
        data.extend_from_slice(b"Acme,Fine,X2\n");

        let mut reader = RecordReader::new(data.as_slice());
        reader.resolve_columns().unwrap();

        let bad = reader.next_row().unwrap().unwrap();
        assert!(matches!(bad, ParsedRow::Malformed { line: 2, .. }));
        let good = reader.next_row().unwrap().unwrap();
        assert!(matches!(good, ParsedRow::Record { line: 3, .. }));
    }
}
