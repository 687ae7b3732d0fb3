//! Raw cell values and display values.
//!
//! The host returns untyped JSON whose shape depends on the field type:
//! scalars, arrays, or small tagged objects. [`RawValue`] decodes that JSON
//! once into a closed set of shapes so the normalizer can match on variants
//! instead of probing properties.
//!
//! Decoding is lossless: every shape keeps the keys it did not consume, and
//! [`RawValue::to_json`] reproduces the input document.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Display marker for a cell with no value.
pub const EMPTY_MARKER: &str = "空";

/// Attachment-like media object: `{type: "image/png", token, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    /// MIME type; always contains `image`.
    pub mime: String,
    /// Kept as sent; hosts occasionally deliver non-string tokens.
    pub token: Option<Value>,
    pub extra: Map<String, Value>,
}

/// Any object carrying an `id`: select options, link targets, persons.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub id: Value,
    pub text: Option<Value>,
    pub name: Option<String>,
    pub extra: Map<String, Value>,
}

/// A typed text segment such as `{type: "text", text}` or `{type: "url", text, link}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: String,
    pub text: Option<Value>,
    pub extra: Map<String, Value>,
}

/// A value computed asynchronously by the host: `{status, value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    pub status: String,
    pub value: Option<Box<RawValue>>,
    pub extra: Map<String, Value>,
}

impl Computed {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// A raw cell value as returned by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Array(Vec<RawValue>),
    Media(Media),
    Reference(Reference),
    Segment(Segment),
    Computed(Computed),
    /// Object matching none of the tagged shapes (e.g. one-way link payloads).
    Object(Map<String, Value>),
}

impl RawValue {
    /// Decodes host JSON into a raw value.
    ///
    /// Object shapes are recognised in a fixed order: media (`type`
    /// containing `image`), reference (`id` present), segment (string
    /// `type`), computed (string `status`), plain object.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(flag) => RawValue::Bool(flag),
            Value::Number(number) => RawValue::Number(number),
            Value::String(text) => RawValue::Text(text),
            Value::Array(items) => {
                RawValue::Array(items.into_iter().map(RawValue::from_json).collect())
            }
            Value::Object(map) => decode_object(map),
        }
    }

    /// Encodes back into host JSON.
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Null => Value::Null,
            RawValue::Bool(flag) => Value::Bool(*flag),
            RawValue::Number(number) => Value::Number(number.clone()),
            RawValue::Text(text) => Value::String(text.clone()),
            RawValue::Array(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
            RawValue::Media(media) => {
                let mut map = media.extra.clone();
                map.insert("type".to_string(), Value::String(media.mime.clone()));
                insert_value(&mut map, "token", media.token.as_ref());
                Value::Object(map)
            }
            RawValue::Reference(reference) => {
                let mut map = reference.extra.clone();
                map.insert("id".to_string(), reference.id.clone());
                insert_value(&mut map, "text", reference.text.as_ref());
                insert_opt(&mut map, "name", reference.name.as_ref());
                Value::Object(map)
            }
            RawValue::Segment(segment) => {
                let mut map = segment.extra.clone();
                map.insert("type".to_string(), Value::String(segment.kind.clone()));
                insert_value(&mut map, "text", segment.text.as_ref());
                Value::Object(map)
            }
            RawValue::Computed(computed) => {
                let mut map = computed.extra.clone();
                map.insert("status".to_string(), Value::String(computed.status.clone()));
                if let Some(value) = &computed.value {
                    map.insert("value".to_string(), value.to_json());
                }
                Value::Object(map)
            }
            RawValue::Object(map) => Value::Object(map.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns true for scalars (and null), the shapes the array-unwrap rule
    /// returns as-is.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            RawValue::Null | RawValue::Bool(_) | RawValue::Number(_) | RawValue::Text(_)
        )
    }

    /// The `text` property of an object-shaped value, if it has one.
    pub fn text(&self) -> Option<&str> {
        match self {
            RawValue::Reference(reference) => reference.text.as_ref().and_then(Value::as_str),
            RawValue::Segment(segment) => segment.text.as_ref().and_then(Value::as_str),
            RawValue::Object(map) => map.get("text").and_then(Value::as_str),
            RawValue::Media(media) => media.extra.get("text").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The `name` property of an object-shaped value, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            RawValue::Reference(reference) => reference.name.as_deref(),
            RawValue::Media(media) => media.extra.get("name").and_then(Value::as_str),
            RawValue::Segment(segment) => segment.extra.get("name").and_then(Value::as_str),
            RawValue::Computed(computed) => computed.extra.get("name").and_then(Value::as_str),
            RawValue::Object(map) => map.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The millisecond timestamp carried by a numeric value.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            RawValue::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float as i64)),
            _ => None,
        }
    }
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn insert_value(map: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.clone());
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

fn decode_object(mut map: Map<String, Value>) -> RawValue {
    let type_tag = map.get("type").and_then(Value::as_str).map(str::to_owned);

    if let Some(mime) = type_tag.as_deref().filter(|tag| tag.contains("image")) {
        let mime = mime.to_string();
        map.remove("type");
        let token = map.remove("token");
        return RawValue::Media(Media {
            mime,
            token,
            extra: map,
        });
    }

    if let Some(id) = map.remove("id") {
        let text = map.remove("text");
        let name = take_string(&mut map, "name");
        return RawValue::Reference(Reference {
            id,
            text,
            name,
            extra: map,
        });
    }

    if let Some(kind) = type_tag {
        map.remove("type");
        let text = map.remove("text");
        return RawValue::Segment(Segment {
            kind,
            text,
            extra: map,
        });
    }

    if let Some(status) = take_string(&mut map, "status") {
        let value = map
            .remove("value")
            .map(|value| Box::new(RawValue::from_json(value)));
        return RawValue::Computed(Computed {
            status,
            value,
            extra: map,
        });
    }

    RawValue::Object(map)
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        RawValue::from_json(value)
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawValue::from_json)
    }
}

/// Result of normalizing a raw value for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// A rendered string (dates, joined names, select text, ...).
    Text(String),
    /// A raw value passed through, or the scalar picked out of an array.
    Value(RawValue),
}

impl DisplayValue {
    /// The empty-cell marker.
    pub fn empty() -> Self {
        DisplayValue::Text(EMPTY_MARKER.to_string())
    }

    pub fn to_json(&self) -> Value {
        match self {
            DisplayValue::Text(text) => Value::String(text.clone()),
            DisplayValue::Value(raw) => raw.to_json(),
        }
    }
}

impl From<RawValue> for DisplayValue {
    fn from(raw: RawValue) -> Self {
        DisplayValue::Value(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_media_before_reference() {
        let raw = RawValue::from_json(json!({"type": "image/png", "id": "a1", "token": "tok"}));
        match raw {
            RawValue::Media(media) => {
                assert_eq!(media.mime, "image/png");
                assert_eq!(media.token, Some(json!("tok")));
                assert!(media.extra.contains_key("id"));
            }
            other => panic!("expected media, got {other:?}"),
        }
    }

    #[test]
    fn decodes_person_as_reference_with_name() {
        let raw = RawValue::from_json(json!({"id": "ou_1", "name": "Lin", "email": "l@x.cn"}));
        assert_eq!(raw.name(), Some("Lin"));
        assert_eq!(raw.text(), None);
    }

    #[test]
    fn decodes_link_payload_as_plain_object() {
        let raw = RawValue::from_json(json!({"recordIds": ["r1"], "text": "Order 1", "tableId": "t"}));
        assert!(matches!(raw, RawValue::Object(_)));
        assert_eq!(raw.text(), Some("Order 1"));
    }

    #[test]
    fn decodes_auto_number() {
        let raw = RawValue::from_json(json!({"status": "completed", "value": "NO-001"}));
        match &raw {
            RawValue::Computed(computed) => {
                assert!(computed.is_completed());
                assert_eq!(
                    computed.value.as_deref(),
                    Some(&RawValue::Text("NO-001".into()))
                );
            }
            other => panic!("expected computed, got {other:?}"),
        }
    }

    #[test]
    fn json_is_preserved() {
        let doc = json!([
            {"type": "text", "text": "hello", "bold": true},
            {"type": "image/jpeg", "token": "abc", "size": 10},
            {"id": 7, "text": "opt"},
            {"status": "pending"},
            {"anything": [1, 2]},
            "plain",
            3.5,
            null
        ]);
        let raw = RawValue::from_json(doc.clone());
        assert_eq!(raw.to_json(), doc);
    }
}
