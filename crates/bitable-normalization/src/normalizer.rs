//! Type-dispatched display normalization.

use bitable_model::{DisplayValue, RawValue, SemanticType};

use crate::date::format_timestamp;
use crate::error::{NormalizeError, Result};
use crate::options::{NormalizationOptions, OptionListMode};
use crate::unwrap::{text_or_null, unwrap_array};

/// Normalizes a raw value with default options.
///
/// See [`normalize_with`].
pub fn normalize(raw: &RawValue, kind: SemanticType) -> Result<DisplayValue> {
    normalize_with(raw, kind, &NormalizationOptions::default())
}

/// Maps a raw value of the given type to its display value.
///
/// Null is always the empty marker. Unknown types pass through unchanged.
/// The only failure is a person-list type whose value is not a list of
/// named persons.
pub fn normalize_with(
    raw: &RawValue,
    kind: SemanticType,
    options: &NormalizationOptions,
) -> Result<DisplayValue> {
    if raw.is_null() {
        return Ok(DisplayValue::empty());
    }

    let value = match kind {
        SemanticType::Text
        | SemanticType::Attachment
        | SemanticType::Lookup
        | SemanticType::Formula
        | SemanticType::Barcode => unwrap_array(raw),

        SemanticType::SingleSelect | SemanticType::MultiSelect | SemanticType::SingleLink => {
            option_text(raw, options.option_lists)
        }

        SemanticType::DateTime | SemanticType::CreatedTime | SemanticType::ModifiedTime => {
            timestamp(raw, options)
        }

        SemanticType::CreatedUser | SemanticType::ModifiedUser => join_names(raw)?,

        SemanticType::AutoNumber => match raw {
            RawValue::Computed(computed) if computed.is_completed() => computed
                .value
                .as_deref()
                .cloned()
                .unwrap_or_default()
                .into(),
            other => DisplayValue::Value(other.clone()),
        },

        SemanticType::Number
        | SemanticType::Checkbox
        | SemanticType::User
        | SemanticType::Phone
        | SemanticType::Url
        | SemanticType::DuplexLink
        | SemanticType::Location
        | SemanticType::GroupChat
        | SemanticType::Progress
        | SemanticType::Currency
        | SemanticType::Rating
        | SemanticType::Email
        | SemanticType::Unknown(_) => DisplayValue::Value(raw.clone()),
    };
    Ok(value)
}

/// `.text` of a select option or link payload.
///
/// Lists of options are joined or cut to the first option; plain strings
/// pass through.
fn option_text(raw: &RawValue, mode: OptionListMode) -> DisplayValue {
    match raw {
        RawValue::Text(_) => DisplayValue::Value(raw.clone()),
        RawValue::Array(items) => {
            let texts: Vec<&str> = items
                .iter()
                .filter_map(|item| match item {
                    RawValue::Text(text) => Some(text.as_str()),
                    other => other.text(),
                })
                .collect();
            match mode {
                OptionListMode::Join => DisplayValue::Text(texts.join(",")),
                OptionListMode::First => text_or_null(texts.first().copied()),
            }
        }
        other => text_or_null(other.text()),
    }
}

fn timestamp(raw: &RawValue, options: &NormalizationOptions) -> DisplayValue {
    let millis = match raw {
        RawValue::Text(text) => text.trim().parse::<i64>().ok(),
        other => other.as_millis(),
    };
    match millis.and_then(|millis| format_timestamp(millis, &options.date_style)) {
        Some(text) => DisplayValue::Text(text),
        None => {
            tracing::debug!("timestamp value could not be rendered, passing through");
            DisplayValue::Value(raw.clone())
        }
    }
}

fn join_names(raw: &RawValue) -> Result<DisplayValue> {
    let RawValue::Array(items) = raw else {
        return Err(NormalizeError::NotAPersonList {
            found: shape_name(raw),
        });
    };
    let names = items
        .iter()
        .enumerate()
        .map(|(index, item)| item.name().ok_or(NormalizeError::PersonWithoutName { index }))
        .collect::<Result<Vec<_>>>()?;
    Ok(DisplayValue::Text(names.join(",")))
}

fn shape_name(raw: &RawValue) -> &'static str {
    match raw {
        RawValue::Null => "null",
        RawValue::Bool(_) => "boolean",
        RawValue::Number(_) => "number",
        RawValue::Text(_) => "string",
        RawValue::Array(_) => "array",
        RawValue::Media(_)
        | RawValue::Reference(_)
        | RawValue::Segment(_)
        | RawValue::Computed(_)
        | RawValue::Object(_) => "object",
    }
}
