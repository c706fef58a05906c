//! Streaming parser for semicolon-delimited CSV
//!
//! Converts a byte stream into a sequence of records, each an ordered list
//! of fields, with constant memory usage. The grammar is fixed:
//!
//! - fields are separated by `;`
//! - rows are terminated by CR, LF or CRLF; runs of terminators collapse
//!   into a single row boundary
//! - fields may be enclosed in `"` quotes; separators and terminators are
//!   literal inside quotes and a doubled `""` encodes one quote character
//! - byte order marks are dropped wherever they appear outside quotes
//! - an unterminated quote at end of stream is tolerated, not an error
//!
//! Reading is pull-based: [`CsvParser::read_record`] returns one record at a
//! time, or use [`CsvParser::records`] for an iterator. An optional header
//! row enables name-based field lookup via [`CsvParser::read_header`].
//!
//! # Examples
//!
//! ```
//! use csvstream::CsvParser;
//!
//! let input = "name;age\r\nAlice;30\r\nBob;25";
//! let mut parser = CsvParser::new(input.as_bytes());
//! parser.read_header().unwrap();
//!
//! for record in parser.records() {
//!     println!("{} is {}", record.field("name").unwrap(), record.field("age").unwrap());
//! }
//! ```

mod error;
mod parser;
mod record;
mod source;
mod tokenizer;

pub use error::{CsvError, Result};
pub use parser::{CsvParser, Records};
pub use record::Record;
