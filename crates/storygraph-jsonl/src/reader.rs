//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL files
//! line-by-line with efficient buffering and line number tracking for error
//! reporting.

use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::{Error, Result};

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and provides buffered reading of JSONL
/// formatted data. It tracks line numbers to provide useful context in error
/// messages when parsing fails, and skips blank lines so hand-edited files
/// with trailing newlines read cleanly.
///
/// # Type Parameters
///
/// * `R` - The underlying async reader type. Must implement [`AsyncRead`] and [`Unpin`].
///
/// # Examples
///
/// ```no_run
/// use storygraph_jsonl::reader::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("stories.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(record) = reader.next_record::<serde_json::Value>().await? {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    ///
    /// The reader is wrapped in a [`BufReader`] for efficient buffered I/O.
    /// Line numbering uses 1-based indexing: the counter starts at 0 and
    /// increments for each physical line consumed, so the first line read is
    /// numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    ///
    /// This is useful when you know the typical line length of your JSONL
    /// data and want to optimize buffer allocation.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based number of the last physical line consumed.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line, without parsing it.
    ///
    /// Whitespace-only lines are consumed (and counted) but not returned.
    /// Returns `None` at end of input. The trailing newline is stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let bytes = self.reader.read_line(&mut buf).await?;
            if bytes == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let line = buf.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }

    /// Reads and deserializes the next record.
    ///
    /// Returns `None` at end of input. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the offending line number when a line is
    /// not valid JSON for `T`. The reader remains usable afterwards, so
    /// callers may skip the bad line and continue.
    pub async fn next_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_line().await? {
            None => Ok(None),
            Some(line) => match serde_json::from_str(&line) {
                Ok(record) => Ok(Some(record)),
                Err(source) => Err(Error::Parse {
                    line: self.line_number,
                    source,
                }),
            },
        }
    }

    /// Reads and deserializes all remaining records.
    ///
    /// # Errors
    ///
    /// Stops at the first I/O or parse failure. Use [`next_record`] in a
    /// loop to skip malformed lines instead.
    ///
    /// [`next_record`]: Self::next_record
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Returns a reference to the underlying buffered reader.
    #[must_use]
    pub fn get_ref(&self) -> &BufReader<R> {
        &self.reader
    }

    /// Returns a mutable reference to the underlying buffered reader.
    ///
    /// Use with caution: reading directly from the buffer may cause
    /// line number tracking to become inaccurate.
    pub fn get_mut(&mut self) -> &mut BufReader<R> {
        &mut self.reader
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

impl<R: AsyncRead + Unpin + Default> Default for JsonlReader<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

/// Reads every record from a JSONL file.
///
/// Convenience wrapper opening `path` and collecting all records.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, an I/O error occurs, or
/// any line fails to parse as `T`.
///
/// # Examples
///
/// ```no_run
/// use storygraph_jsonl::read_jsonl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let records: Vec<serde_json::Value> = read_jsonl("stories.jsonl").await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = tokio::fs::File::open(path).await?;
    JsonlReader::new(file).read_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestRecord {
        id: u32,
        name: String,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let data = Cursor::new(b"");
        let reader = JsonlReader::new(data);
        assert_eq!(reader.line_number(), 0);
    }

    #[test]
    fn with_capacity_creates_reader() {
        let data = Cursor::new(b"test data");
        let reader = JsonlReader::with_capacity(data, 8192);
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn next_line_returns_lines_in_order() {
        let data = Cursor::new(b"first\nsecond\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("first"));
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(reader.line_number(), 2);
        assert!(reader.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn next_line_skips_blank_lines_but_counts_them() {
        let data = Cursor::new(b"one\n\n   \ntwo\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("one"));
        assert_eq!(reader.next_line().await.unwrap().as_deref(), Some("two"));
        assert_eq!(reader.line_number(), 4);
    }

    #[tokio::test]
    async fn next_record_parses_json() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"Alice\"}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let record: TestRecord = reader.next_record().await.unwrap().unwrap();
        assert_eq!(
            record,
            TestRecord {
                id: 1,
                name: "Alice".to_string()
            }
        );
        assert!(reader.next_record::<TestRecord>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn next_record_reports_line_number_on_parse_failure() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"ok\"}\nnot json\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let _first: TestRecord = reader.next_record().await.unwrap().unwrap();
        let err = reader.next_record::<TestRecord>().await.unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[tokio::test]
    async fn reader_remains_usable_after_parse_failure() {
        let data = Cursor::new(b"garbage\n{\"id\":2,\"name\":\"Bob\"}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert!(reader.next_record::<TestRecord>().await.is_err());
        let record: TestRecord = reader.next_record().await.unwrap().unwrap();
        assert_eq!(record.id, 2);
    }

    #[tokio::test]
    async fn read_all_collects_every_record() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let records: Vec<TestRecord> = reader.read_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "b");
    }

    #[tokio::test]
    async fn read_all_on_empty_input_is_empty() {
        let data = Cursor::new(b"".to_vec());
        let mut reader = JsonlReader::new(data);

        let records: Vec<TestRecord> = reader.read_all().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn handles_crlf_line_endings() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"win\"}\r\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let record: TestRecord = reader.next_record().await.unwrap().unwrap();
        assert_eq!(record.name, "win");
    }

    #[test]
    fn into_inner_returns_buffer() {
        let data = Cursor::new(b"test".to_vec());
        let reader = JsonlReader::new(data);
        let _inner = reader.into_inner();
    }
}
