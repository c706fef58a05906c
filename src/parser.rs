//! Streaming CSV parser: record assembly over the field tokenizer

use crate::error::{CsvError, Result};
use crate::record::{Header, Record};
use crate::source::CodepointSource;
use crate::tokenizer::{self, RECORD_SEP, RECORD_SEP2};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

/// Streaming parser for semicolon-delimited CSV
///
/// Reads records one at a time from any byte stream, decoded as UTF-8.
/// Memory usage is constant: one record is held at a time. The field
/// separator is fixed to `;`, the quote character to `"`, and row boundaries
/// are CR, LF or CRLF; runs of terminators collapse into a single boundary.
///
/// The parser owns its input exclusively. It is single-threaded and
/// synchronous: each read blocks until a codepoint is available or the
/// stream is exhausted.
///
/// # Examples
///
/// ```
/// use csvstream::CsvParser;
///
/// let mut parser = CsvParser::new("a;b\r\n1;2".as_bytes());
/// parser.read_header().unwrap();
///
/// let record = parser.read_record().unwrap().unwrap();
/// assert_eq!(record.field("b"), Some("2"));
/// ```
///
/// # Iterating
///
/// ```
/// use csvstream::CsvParser;
///
/// let mut parser = CsvParser::new("1;2\r\n3;4".as_bytes());
/// for record in parser.records() {
///     println!("{:?}", record.fields());
/// }
/// ```
pub struct CsvParser<R: Read> {
    source: CodepointSource<R>,
    header: Option<Rc<Header>>,
    current_line: u64,
}

impl CsvParser<File> {
    /// Open a CSV file for reading.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvstream::CsvParser;
    ///
    /// let mut parser = CsvParser::open("data.csv").unwrap();
    /// while let Some(record) = parser.read_record().unwrap() {
    ///     println!("{:?}", record.fields());
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| CsvError::ReadError(format!("failed to open CSV file: {}", e)))?;
        Ok(CsvParser::new(file))
    }
}

impl<R: Read> CsvParser<R> {
    /// Create a parser over any byte stream.
    pub fn new(reader: R) -> Self {
        CsvParser {
            source: CodepointSource::new(reader),
            header: None,
            current_line: 0,
        }
    }

    /// Read one record.
    ///
    /// Returns `Ok(None)` when the stream is exhausted. The row counter
    /// increments on every call, including the terminal end-of-stream one.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut fields = Vec::new();
        loop {
            let c = match self.source.peek()? {
                Some(c) => c,
                None => break,
            };
            if c == RECORD_SEP || c == RECORD_SEP2 {
                self.consume_row_boundary()?;
                break;
            }
            fields.push(tokenizer::read_field(&mut self.source)?);
        }
        self.current_line += 1;
        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Record::new(fields, self.header.clone())))
        }
    }

    /// Read the header row and build the name-to-index mapping.
    ///
    /// Must precede any `read_record` calls that want name-based lookup.
    /// Duplicate names map to the later column. Fails with
    /// [`CsvError::MissingHeader`] if the stream holds no rows.
    pub fn read_header(&mut self) -> Result<()> {
        let record = self.read_record()?.ok_or(CsvError::MissingHeader)?;
        let mut header = Header::new();
        for (index, name) in record.fields().iter().enumerate() {
            header.insert(name.clone(), index);
        }
        self.header = Some(Rc::new(header));
        Ok(())
    }

    /// Skip `count` records, discarding them.
    ///
    /// Always performs `count` reads: once the stream is exhausted the
    /// remaining reads consume nothing but still advance the row counter.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        for _ in 0..count {
            self.read_record()?;
        }
        Ok(())
    }

    /// Number of rows read so far, including skipped rows and the terminal
    /// end-of-stream read.
    pub fn current_line(&self) -> u64 {
        self.current_line
    }

    /// Iterate over the remaining records.
    ///
    /// The iterator is lazy, single-pass and non-restartable; the first
    /// record is fetched eagerly when it is created. A read failure during
    /// iteration ends the sequence; use [`read_record`](Self::read_record)
    /// in a loop when failures must be observed.
    pub fn records(&mut self) -> Records<'_, R> {
        Records::new(self)
    }

    /// Consume a contiguous run of row-terminator codepoints.
    fn consume_row_boundary(&mut self) -> Result<()> {
        while let Some(c) = self.source.next_codepoint()? {
            if c != RECORD_SEP && c != RECORD_SEP2 {
                self.source.push_back(c);
                break;
            }
        }
        Ok(())
    }
}

/// Lazy, single-pass iterator over records
///
/// Created by [`CsvParser::records`]. Holds one pre-fetched record so that
/// reaching the end of the sequence is known without a side effect on the
/// caller.
pub struct Records<'a, R: Read> {
    parser: &'a mut CsvParser<R>,
    next_record: Option<Record>,
}

impl<'a, R: Read> Records<'a, R> {
    fn new(parser: &'a mut CsvParser<R>) -> Self {
        // TODO: yield Result<Record> items so read failures are not
        // silently turned into end-of-sequence.
        let next_record = parser.read_record().ok().flatten();
        Records {
            parser,
            next_record,
        }
    }
}

impl<'a, R: Read> Iterator for Records<'a, R> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let record = self.next_record.take()?;
        self.next_record = self.parser.read_record().ok().flatten();
        Some(record)
    }
}
