//! Source table reading with encoding handling.
//!
//! Agency exports are header-delimited CSV. The whole file is decoded up
//! front (UTF-8 by default, Latin-1/Windows-1252 on request or detected),
//! a leading byte-order mark is dropped, then rows are read one at a time
//! in strict mode: every row must have exactly as many fields as the header.

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::{CsvError, CsvResult, MappingError, MappingResult};

// =============================================================================
// Encodings
// =============================================================================

/// Character encoding of a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    /// Guess from the bytes.
    Auto,
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
    /// ISO-8859-15, the euro-sign revision of Latin-1.
    Latin9,
    Windows1252,
}

impl SourceEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Auto => "auto",
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Latin1 => "iso-8859-1",
            SourceEncoding::Latin9 => "iso-8859-15",
            SourceEncoding::Windows1252 => "windows-1252",
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SourceEncoding::Auto),
            "utf-8" | "utf8" | "ascii" => Ok(SourceEncoding::Utf8),
            "iso-8859-1" | "latin-1" | "latin1" => Ok(SourceEncoding::Latin1),
            "iso-8859-15" | "latin-9" | "latin9" => Ok(SourceEncoding::Latin9),
            "windows-1252" | "cp1252" => Ok(SourceEncoding::Windows1252),
            other => Err(format!("unsupported encoding '{}'", other)),
        }
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always read as UTF-8. Otherwise chardet picks among the
/// Latin encodings; any other verdict falls back to Windows-1252, which
/// decodes every byte.
pub fn detect_encoding(bytes: &[u8]) -> SourceEncoding {
    if std::str::from_utf8(bytes).is_ok() {
        return SourceEncoding::Utf8;
    }

    let charset = chardet::detect(bytes).0;
    let detected = match charset.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => SourceEncoding::Latin1,
        "iso-8859-15" => SourceEncoding::Latin9,
        _ => SourceEncoding::Windows1252,
    };
    debug!(%charset, %detected, "Detected source encoding");
    detected
}

/// Decode bytes to a string, dropping a leading byte-order mark.
///
/// UTF-8 is strict: invalid bytes are an error rather than replaced, so a
/// mislabeled Latin-1 export fails loudly instead of writing mojibake.
pub fn decode_content(bytes: &[u8], encoding: SourceEncoding) -> CsvResult<String> {
    let encoding = match encoding {
        SourceEncoding::Auto => detect_encoding(bytes),
        other => other,
    };

    let decoded = match encoding {
        SourceEncoding::Utf8 | SourceEncoding::Auto => String::from_utf8(bytes.to_vec())
            .map_err(|e| {
                CsvError::EncodingError(format!(
                    "invalid UTF-8 at byte {} (try another --encoding)",
                    e.utf8_error().valid_up_to()
                ))
            })?,
        SourceEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        SourceEncoding::Latin9 => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        SourceEncoding::Windows1252 => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    };

    Ok(match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    })
}

// =============================================================================
// Source Rows
// =============================================================================

/// One data line of a source table, keyed by the header's column names.
#[derive(Debug, Clone)]
pub struct SourceRow<'h> {
    headers: &'h StringRecord,
    record: StringRecord,
    line: u64,
}

impl<'h> SourceRow<'h> {
    pub fn new(headers: &'h StringRecord, record: StringRecord, line: u64) -> Self {
        Self {
            headers,
            record,
            line,
        }
    }

    /// 1-based line number in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of a column, if the header names it.
    ///
    /// When a header repeats a name the last occurrence wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| *h == column)
            .map(|(i, _)| i)
            .last()
            .and_then(|i| self.record.get(i))
    }

    /// Raw value of a column the mapping cannot do without.
    pub fn field(&self, column: &str) -> MappingResult<&str> {
        self.get(column).ok_or_else(|| MappingError::MissingSourceColumn {
            column: column.to_string(),
            line: self.line,
        })
    }
}

// =============================================================================
// Source Tables
// =============================================================================

/// An opened and decoded source table.
pub struct SourceTable {
    headers: StringRecord,
    reader: csv::Reader<Cursor<Vec<u8>>>,
    record: StringRecord,
}

impl SourceTable {
    /// Read and decode `path`, then parse its header line.
    pub fn open(path: &Path, encoding: SourceEncoding) -> CsvResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CsvError::SourceFileNotFound {
                path: path.to_path_buf(),
            },
            _ => CsvError::IoError(e),
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), %encoding, "Read source file");

        let content = decode_content(&bytes, encoding)?;
        Self::from_content(path, content)
    }

    /// Parse already decoded text. `path` is only used for diagnostics.
    pub fn from_content(path: &Path, content: String) -> CsvResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(Cursor::new(content.into_bytes()));
        let headers = reader.headers().map_err(classify)?.clone();
        debug!(path = %path.display(), columns = headers.len(), "Parsed source header");

        Ok(Self {
            headers,
            reader,
            record: StringRecord::new(),
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Next data row, or `None` at end of file.
    pub fn next_row(&mut self) -> CsvResult<Option<SourceRow<'_>>> {
        if !self.reader.read_record(&mut self.record).map_err(classify)? {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line()).unwrap_or(0);
        Ok(Some(SourceRow::new(&self.headers, self.record.clone(), line)))
    }
}

/// Map a field-count mismatch to [`CsvError::MalformedRow`].
fn classify(err: csv::Error) -> CsvError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return CsvError::MalformedRow {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    CsvError::ParseError(err)
}
