//! Record tokenizer shared by the station, order and topology parsers.
//!
//! A record is one line of a data file, split into fields by a single
//! delimiter character. Fields are trimmed of surrounding whitespace. Two
//! adjacent delimiters (an empty field in the middle of a record) are a
//! [`ParseError`], never an empty value.
//!
//! The tokenizer also remembers the widest field it has produced, which the
//! display code uses to align columns. The width belongs to the tokenizer
//! instance; call [`Tokenizer::reset_field_width`] between unrelated data sets.

use crate::error::ParseError;

/// Delimiter used by order and topology files.
pub const DEFAULT_DELIMITER: char = '|';

/// Splits delimited records into trimmed fields.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    delimiter: char,
    field_width: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

/// Read position within a single record.
///
/// Created per record with [`RecordCursor::new`] and advanced by
/// [`Tokenizer::next_field`].
#[derive(Debug, Clone)]
pub struct RecordCursor<'r> {
    record: &'r str,
    next_pos: usize,
    more: bool,
}

impl<'r> RecordCursor<'r> {
    pub fn new(record: &'r str) -> Self {
        Self {
            record,
            next_pos: 0,
            more: true,
        }
    }

    /// Whether another field can be extracted.
    pub fn has_more(&self) -> bool {
        self.more
    }

    /// Byte offset of the next field within the record.
    pub fn position(&self) -> usize {
        self.next_pos
    }

    /// The full record being read.
    pub fn record(&self) -> &'r str {
        self.record
    }
}

impl Tokenizer {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            field_width: 0,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: char) {
        self.delimiter = delimiter;
    }

    /// Length of the longest field produced since creation or the last reset.
    pub fn field_width(&self) -> usize {
        self.field_width
    }

    pub fn reset_field_width(&mut self) {
        self.field_width = 0;
    }

    /// Extract the next field from `cursor` and advance past its delimiter.
    ///
    /// Returns an empty string once the record is exhausted (including the
    /// empty field that follows a trailing delimiter). Fails with
    /// [`ParseError::EmptyField`] when a delimiter immediately follows the
    /// cursor position.
    ///
    /// # Examples
    ///
    /// ```
    /// use linesim_core::tokenizer::{RecordCursor, Tokenizer};
    ///
    /// let mut tokenizer = Tokenizer::new(',');
    /// let mut cursor = RecordCursor::new(" Desk , 100 ");
    /// assert_eq!(tokenizer.next_field(&mut cursor).unwrap(), "Desk");
    /// assert!(cursor.has_more());
    /// assert_eq!(tokenizer.next_field(&mut cursor).unwrap(), "100");
    /// assert!(!cursor.has_more());
    /// ```
    pub fn next_field(&mut self, cursor: &mut RecordCursor<'_>) -> Result<String, ParseError> {
        let record = cursor.record;

        if cursor.next_pos >= record.len() {
            cursor.more = false;
            return Ok(String::new());
        }

        let rest = &record[cursor.next_pos..];
        let raw = match rest.find(self.delimiter) {
            None => {
                cursor.next_pos = record.len();
                cursor.more = false;
                rest
            }
            Some(0) => {
                cursor.more = false;
                return Err(ParseError::EmptyField {
                    record: record.to_string(),
                    position: cursor.next_pos,
                });
            }
            Some(offset) => {
                cursor.next_pos += offset + self.delimiter.len_utf8();
                cursor.more = true;
                &rest[..offset]
            }
        };

        let field = raw.trim();
        let width = field.chars().count();
        if width > self.field_width {
            self.field_width = width;
        }
        Ok(field.to_string())
    }

    /// Split a whole record into fields.
    pub fn split(&mut self, record: &str) -> Result<Vec<String>, ParseError> {
        let mut cursor = RecordCursor::new(record);
        let mut fields = Vec::new();
        while cursor.has_more() {
            fields.push(self.next_field(&mut cursor)?);
        }
        Ok(fields)
    }
}
