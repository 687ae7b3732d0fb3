//! The array-unwrap rule shared by array-shaped field types.

use bitable_model::{DisplayValue, RawValue};
use serde_json::Value;

/// Reduces an array-shaped value to its first element's most relevant
/// scalar.
///
/// For a non-empty array the first element decides:
/// - a primitive is returned as-is;
/// - media returns its `token`;
/// - a reference (anything with an `id`) returns its `text`;
/// - a segment of kind `text` returns its `text`.
///
/// Anything else, including empty arrays and non-arrays, comes back
/// unchanged. A property the element lacks becomes null.
pub fn unwrap_array(value: &RawValue) -> DisplayValue {
    let RawValue::Array(items) = value else {
        return DisplayValue::Value(value.clone());
    };
    let Some(first) = items.first() else {
        return DisplayValue::Value(value.clone());
    };
    match first {
        primitive if primitive.is_primitive() => DisplayValue::Value(primitive.clone()),
        RawValue::Media(media) => property(media.token.as_ref()),
        RawValue::Reference(reference) => property(reference.text.as_ref()),
        RawValue::Segment(segment) if segment.kind == "text" => property(segment.text.as_ref()),
        _ => DisplayValue::Value(value.clone()),
    }
}

/// The property's value as sent; strings become display text.
fn property(value: Option<&Value>) -> DisplayValue {
    match value {
        Some(Value::String(text)) => DisplayValue::Text(text.clone()),
        Some(other) => DisplayValue::Value(RawValue::from_json(other.clone())),
        None => DisplayValue::Value(RawValue::Null),
    }
}

pub(crate) fn text_or_null(text: Option<&str>) -> DisplayValue {
    match text {
        Some(text) => DisplayValue::Text(text.to_string()),
        None => DisplayValue::Value(RawValue::Null),
    }
}
