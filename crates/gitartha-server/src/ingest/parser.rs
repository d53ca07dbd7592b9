//! CSV verse parser
//!
//! The header row is required and columns are resolved by name, so their order
//! in the source does not matter and unknown columns are ignored. Leading
//! whitespace is dropped from every field; trailing whitespace is kept in the
//! text fields. Rows are yielded lazily; the parser stops for good after the first
//! error or at end of input.
//!
//! # Format
//! ```text
//! chapter,verse,sanskrit,transliteration,english,hindi
//! 2,47,कर्मण्येवाधिकारस्ते...,karmaṇy-evādhikāras te...,You have a right...,तेरा कर्म करने में...
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use gitartha_common::types::parse_positive;
use gitartha_common::VerseKey;

use super::IngestError;

/// Columns every source must provide
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "chapter",
    "verse",
    "sanskrit",
    "transliteration",
    "english",
    "hindi",
];

/// One parsed verse record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRow {
    /// Physical line the record started on (header is line 1)
    pub line: u64,
    pub chapter: i32,
    pub verse: i32,
    pub sanskrit: String,
    pub transliteration: String,
    pub english: String,
    pub hindi: String,
}

impl VerseRow {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

/// Resolved positions of the required columns
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    chapter: usize,
    verse: usize,
    sanskrit: usize,
    transliteration: usize,
    english: usize,
    hindi: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();

        if names.iter().all(|n| n.is_empty()) {
            return Err(IngestError::malformed(1, "missing header row"));
        }

        let find = |column: &str| {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| IngestError::malformed(1, format!("missing required column '{}'", column)))
        };

        Ok(Self {
            chapter: find("chapter")?,
            verse: find("verse")?,
            sanskrit: find("sanskrit")?,
            transliteration: find("transliteration")?,
            english: find("english")?,
            hindi: find("hindi")?,
        })
    }
}

/// Single-pass iterator of [`VerseRow`]s over a CSV source
pub struct VerseCsvParser<R: Read> {
    reader: csv::Reader<R>,
    columns: ColumnIndex,
    header_len: usize,
    record: StringRecord,
    finished: bool,
}

impl VerseCsvParser<File> {
    /// Open a source file and resolve its header
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file)
    }
}

impl<R: Read> VerseCsvParser<R> {
    /// Read the header from `source` and resolve the required columns.
    ///
    /// Fails with `MalformedInput` at line 1 when the header is absent or a
    /// required column is missing.
    pub fn new(source: R) -> Result<Self, IngestError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers().map_err(|e| map_csv_error(e, 1))?.clone();
        let columns = ColumnIndex::resolve(&headers)?;

        Ok(Self {
            reader,
            columns,
            header_len: headers.len(),
            record: StringRecord::new(),
            finished: false,
        })
    }

    fn parse_record(&self) -> Result<VerseRow, IngestError> {
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);

        if self.record.len() < self.header_len {
            return Err(IngestError::malformed(
                line,
                format!(
                    "expected {} fields, found {}",
                    self.header_len,
                    self.record.len()
                ),
            ));
        }

        let field = |index: usize| self.record.get(index).unwrap_or_default().trim_start();
        let number = |name: &'static str, index: usize| {
            parse_positive(name, field(index)).map_err(|e| IngestError::malformed(line, e.to_string()))
        };

        Ok(VerseRow {
            line,
            chapter: number("chapter", self.columns.chapter)?,
            verse: number("verse", self.columns.verse)?,
            sanskrit: field(self.columns.sanskrit).to_string(),
            transliteration: field(self.columns.transliteration).to_string(),
            english: field(self.columns.english).to_string(),
            hindi: field(self.columns.hindi).to_string(),
        })
    }
}

impl<R: Read> Iterator for VerseCsvParser<R> {
    type Item = Result<VerseRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = match self.reader.read_record(&mut self.record) {
            Ok(false) => {
                self.finished = true;
                return None;
            },
            Ok(true) => self.parse_record(),
            Err(e) => Err(map_csv_error(e, 0)),
        };

        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

fn map_csv_error(error: csv::Error, fallback_line: u64) -> IngestError {
    if error.is_io_error() {
        return IngestError::Read(error);
    }
    let line = error.position().map(|p| p.line()).unwrap_or(fallback_line);
    IngestError::malformed(line, error.to_string())
}
