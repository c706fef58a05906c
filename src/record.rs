//! CSV record type

use crate::error::{CsvError, Result};
use indexmap::IndexMap;
use std::rc::Rc;

/// Name-to-column-index mapping built from the header row
pub(crate) type Header = IndexMap<String, usize>;

/// One row of a CSV stream
///
/// An ordered list of field texts, plus a reference to the stream's header
/// when one was read. The header is built once per stream and shared across
/// all records, not copied. Records are immutable after construction.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<String>,
    header: Option<Rc<Header>>,
}

impl Record {
    pub(crate) fn new(fields: Vec<String>, header: Option<Rc<Header>>) -> Self {
        Record { fields, header }
    }

    /// Get a field by zero-based column index.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvstream::CsvParser;
    ///
    /// let mut parser = CsvParser::new("str1;str2".as_bytes());
    /// let record = parser.read_record().unwrap().unwrap();
    /// assert_eq!(record.get(1).unwrap(), "str2");
    /// assert!(record.get(2).is_err());
    /// ```
    pub fn get(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(CsvError::FieldOutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    /// Get a field by its name in the header.
    ///
    /// Returns `None` if no header was read for this stream or the name is
    /// unknown.
    pub fn field(&self, name: &str) -> Option<&str> {
        let header = self.header.as_deref()?;
        let index = *header.get(name)?;
        self.fields.get(index).map(String::as_str)
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    ///
    /// The parser never hands out such a record; it reports end of stream
    /// instead.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> Record {
        Record::new(fields.iter().map(|s| s.to_string()).collect(), None)
    }

    fn record_with_header(fields: &[&str], names: &[&str]) -> Record {
        let header: Header = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        Record::new(
            fields.iter().map(|s| s.to_string()).collect(),
            Some(Rc::new(header)),
        )
    }

    #[test]
    fn test_empty_record() {
        let rec = record(&[]);
        assert_eq!(rec.len(), 0);
        assert!(rec.is_empty());
    }

    #[test]
    fn test_get_by_index() {
        let rec = record(&["string1", "string2"]);
        assert_eq!(rec.get(1).unwrap(), "string2");
    }

    #[test]
    fn test_get_out_of_range() {
        let rec = record(&["string1", "string2"]);
        match rec.get(2) {
            Err(CsvError::FieldOutOfRange { index: 2, len: 2 }) => {}
            other => panic!("expected FieldOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_get_by_name() {
        let rec = record_with_header(&["string1", "string2"], &["a", "b"]);
        assert_eq!(rec.field("a"), Some("string1"));
        assert_eq!(rec.field("b"), Some("string2"));
    }

    #[test]
    fn test_get_unknown_name() {
        let rec = record_with_header(&["string1", "string2"], &["a", "b"]);
        assert_eq!(rec.field("c"), None);
    }

    #[test]
    fn test_get_by_name_without_header() {
        let rec = record(&["string1", "string2"]);
        assert_eq!(rec.field("a"), None);
    }
}
