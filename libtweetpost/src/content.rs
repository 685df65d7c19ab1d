//! Tweet content model
//!
//! Content is a free-form JSON object: the request body is whatever the
//! caller puts here, with no schema beyond "must encode as JSON". Values are
//! held as a tagged [`ContentValue`] so arbitrary nesting survives without a
//! fixed struct.
//!
//! JSON cannot represent NaN or infinities. Such floats may be stored, but
//! serializing them fails instead of being silently rewritten.

use std::collections::BTreeMap;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single JSON-compatible value
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Array(Vec<ContentValue>),
    Object(BTreeMap<String, ContentValue>),
}

impl Serialize for ContentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContentValue::Null => serializer.serialize_unit(),
            ContentValue::Bool(b) => serializer.serialize_bool(*b),
            ContentValue::Integer(n) => serializer.serialize_i64(*n),
            ContentValue::Unsigned(n) => serializer.serialize_u64(*n),
            ContentValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            ContentValue::Float(f) => Err(S::Error::custom(format!(
                "{f} cannot be represented in JSON"
            ))),
            ContentValue::String(s) => serializer.serialize_str(s),
            ContentValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContentValue::Object(fields) => serialize_object(fields, serializer),
        }
    }
}

fn serialize_object<S: Serializer>(
    fields: &BTreeMap<String, ContentValue>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (key, value) in fields {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

impl From<serde_json::Value> for ContentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContentValue::Null,
            serde_json::Value::Bool(b) => ContentValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ContentValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    ContentValue::Unsigned(u)
                } else {
                    ContentValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => ContentValue::String(s),
            serde_json::Value::Array(items) => {
                ContentValue::Array(items.into_iter().map(ContentValue::from).collect())
            }
            serde_json::Value::Object(fields) => ContentValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, ContentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl From<i64> for ContentValue {
    fn from(n: i64) -> Self {
        ContentValue::Integer(n)
    }
}

impl From<i32> for ContentValue {
    fn from(n: i32) -> Self {
        ContentValue::Integer(n.into())
    }
}

impl From<u64> for ContentValue {
    fn from(n: u64) -> Self {
        ContentValue::Unsigned(n)
    }
}

impl From<f64> for ContentValue {
    fn from(f: f64) -> Self {
        ContentValue::Float(f)
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::String(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::String(s)
    }
}

impl<T: Into<ContentValue>> From<Vec<T>> for ContentValue {
    fn from(items: Vec<T>) -> Self {
        ContentValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ContentValue>> From<Option<T>> for ContentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ContentValue::Null, Into::into)
    }
}

/// The top-level JSON object sent as the request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweetContent {
    fields: BTreeMap<String, ContentValue>,
}

impl TweetContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content holding only a `text` field, the common case.
    pub fn text(text: impl Into<String>) -> Self {
        let mut content = Self::new();
        content.insert("text", text.into());
        content
    }

    /// Set `key`, returning the previous value if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContentValue>,
    ) -> Option<ContentValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContentValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as a JSON request body.
    ///
    /// # Errors
    ///
    /// Fails when a float anywhere in the content is NaN or infinite.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Serialize for TweetContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_object(&self.fields, serializer)
    }
}

impl From<BTreeMap<String, ContentValue>> for TweetContent {
    fn from(fields: BTreeMap<String, ContentValue>) -> Self {
        Self { fields }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for TweetContent {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, ContentValue::from(v)))
                .collect(),
        }
    }
}

impl TryFrom<serde_json::Value> for TweetContent {
    type Error = serde_json::Value;

    /// Accepts only JSON objects; anything else is handed back unchanged.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into()),
            other => Err(other),
        }
    }
}
