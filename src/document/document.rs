//! Document structure.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::field_value::FieldValue;

/// Opaque document identifier.
///
/// Ids order lexicographically, which is the order search results come back in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Create an id from any string-like value.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocId(id.into())
    }

    /// Generate a random (v4 UUID) id.
    pub fn generate() -> Self {
        DocId(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId::new(id)
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

impl From<u64> for DocId {
    fn from(id: u64) -> Self {
        DocId(id.to_string())
    }
}

/// A record to index: an id plus named field values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: DocId,
    fields: HashMap<String, FieldValue>,
}

impl Document {
    /// Create a new document with no fields.
    pub fn new<I: Into<DocId>>(id: I) -> Self {
        Document {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Create a builder for constructing documents.
    pub fn builder<I: Into<DocId>>(id: I) -> DocumentBuilder {
        DocumentBuilder::new(id)
    }

    /// The document id.
    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// Add a field value to the document, replacing any previous value.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a field's text, if the field is present and holds text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field values.
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new<I: Into<DocId>>(id: I) -> Self {
        DocumentBuilder {
            document: Document::new(id),
        }
    }

    /// Add a text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, FieldValue::Text(value.into()));
        self
    }

    /// Add an explicit null field.
    pub fn add_null<S: Into<String>>(mut self, name: S) -> Self {
        self.document.add_field(name, FieldValue::Null);
        self
    }

    /// Add a field of any type.
    pub fn add_field<S: Into<String>, V: Into<FieldValue>>(mut self, name: S, value: V) -> Self {
        self.document.add_field(name, value.into());
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
