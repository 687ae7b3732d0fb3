//! Property tests for value normalization.

use bitable_model::{DisplayValue, EMPTY_MARKER, RawValue, SemanticType};
use bitable_normalization::{
    DateStyle, DateZone, NormalizationOptions, normalize, normalize_with, unwrap_array,
};
use proptest::prelude::*;
use serde_json::{Value, json};

fn any_type() -> impl Strategy<Value = SemanticType> {
    prop_oneof![
        (0..SemanticType::KNOWN.len()).prop_map(|idx| SemanticType::KNOWN[idx]),
        any::<i64>().prop_map(SemanticType::from_code),
    ]
}

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn null_is_always_empty(kind in any_type()) {
        let value = normalize(&RawValue::Null, kind).unwrap();
        prop_assert_eq!(value, DisplayValue::Text(EMPTY_MARKER.to_string()));
    }

    #[test]
    fn dates_are_pure(millis in -2_000_000_000_000_i64..4_000_000_000_000_i64, offset in -720_i32..840) {
        let options = NormalizationOptions::new().with_date_style(
            DateStyle::default().with_zone(DateZone::from_offset_minutes(offset).unwrap()),
        );
        let raw = RawValue::from(json!(millis));
        let first = normalize_with(&raw, SemanticType::DateTime, &options).unwrap();
        let second = normalize_with(&raw, SemanticType::DateTime, &options).unwrap();
        prop_assert!(matches!(first, DisplayValue::Text(_)));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn primitive_arrays_unwrap_to_first(items in prop::collection::vec(primitive(), 1..6)) {
        let raw = RawValue::from(Value::Array(items.clone()));
        prop_assert_eq!(unwrap_array(&raw).to_json(), items[0].clone());
        let via_lookup = normalize(&raw, SemanticType::Lookup).unwrap();
        prop_assert_eq!(via_lookup.to_json(), items[0].clone());
    }

    #[test]
    fn pass_through_types_keep_value(value in primitive()) {
        for kind in [SemanticType::Number, SemanticType::Phone, SemanticType::Rating, SemanticType::Email] {
            let normalized = normalize(&RawValue::from(value.clone()), kind).unwrap();
            prop_assert_eq!(normalized.to_json(), value.clone());
        }
    }
}

#[test]
fn empty_array_is_unchanged() {
    for kind in [
        SemanticType::Text,
        SemanticType::Attachment,
        SemanticType::Lookup,
        SemanticType::Formula,
        SemanticType::Barcode,
    ] {
        let value = normalize(&RawValue::from(json!([])), kind).unwrap();
        assert_eq!(value.to_json(), json!([]));
    }
}
