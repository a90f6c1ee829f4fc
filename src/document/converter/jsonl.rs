//! JSONL format document converter.
//!
//! Each non-blank line is one JSON object:
//! ```jsonl
//! {"id": "1", "title": "Happy Days", "author": "Cesar", "content": null}
//! {"id": "2", "title": "Sad Days", "author": "Ana", "content": "public comment"}
//! ```
//!
//! The id field (default `"id"`) becomes the [`DocId`]; a line without one
//! gets a generated id. Every other key becomes a field.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use serde_json::Value;

use crate::document::converter::DocumentConverter;
use crate::document::document::{DocId, Document};
use crate::document::field_value::FieldValue;
use crate::error::{KopisError, Result};

/// A document converter for JSONL format.
#[derive(Clone, Debug)]
pub struct JsonlDocumentConverter {
    id_field: String,
}

impl Default for JsonlDocumentConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonlDocumentConverter {
    /// Create a converter reading ids from the `"id"` key.
    pub fn new() -> Self {
        Self::with_id_field("id")
    }

    /// Create a converter reading ids from a custom key.
    pub fn with_id_field<S: Into<String>>(id_field: S) -> Self {
        JsonlDocumentConverter {
            id_field: id_field.into(),
        }
    }

    /// Iterate over the documents of any buffered reader.
    pub fn convert_reader<R: BufRead>(&self, reader: R) -> JsonlDocumentIterator<R> {
        JsonlDocumentIterator {
            lines: reader.lines(),
            line_num: 0,
            converter: self.clone(),
        }
    }

    /// Parse a single JSON line into a Document.
    pub fn parse_line(&self, line: &str) -> Result<Document> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| KopisError::parse(format!("Failed to parse JSON: {e}")))?;

        let Value::Object(map) = value else {
            return Err(KopisError::parse("JSONL line must be a JSON object"));
        };

        let id = match map.get(&self.id_field) {
            Some(Value::String(s)) => DocId::new(s.as_str()),
            Some(Value::Number(n)) => DocId::new(n.to_string()),
            None | Some(Value::Null) => DocId::generate(),
            Some(other) => {
                return Err(KopisError::parse(format!(
                    "id field '{}' must be a string or number, got {other}",
                    self.id_field
                )));
            }
        };

        let mut doc = Document::new(id);
        for (key, val) in map {
            if key == self.id_field {
                continue;
            }
            let field_value = match val {
                Value::String(s) => FieldValue::Text(s),
                Value::Null => FieldValue::Null,
                Value::Bool(b) => FieldValue::Boolean(b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => FieldValue::Integer(i),
                    None => n
                        .as_f64()
                        .map_or_else(|| FieldValue::Text(n.to_string()), FieldValue::Float),
                },
                other => FieldValue::Text(other.to_string()),
            };
            doc.add_field(key, field_value);
        }

        Ok(doc)
    }
}

impl DocumentConverter for JsonlDocumentConverter {
    type Iter = JsonlDocumentIterator<BufReader<File>>;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let file = File::open(path)?;
        Ok(self.convert_reader(BufReader::new(file)))
    }
}

/// Iterator over the documents of a JSONL source.
pub struct JsonlDocumentIterator<R> {
    lines: Lines<R>,
    line_num: usize,
    converter: JsonlDocumentConverter,
}

impl<R: BufRead> Iterator for JsonlDocumentIterator<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_num += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }

            let line_num = self.line_num;
            return Some(self.converter.parse_line(&line).map_err(|e| {
                KopisError::parse(format!("line {line_num}: {e}"))
            }));
        }
    }
}
