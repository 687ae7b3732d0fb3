//! Timestamp rendering.

use std::fmt::Write;

use chrono::{DateTime, Local, TimeZone};

use crate::options::{DateStyle, DateZone};

/// Renders a millisecond Unix timestamp with the given style.
///
/// Returns `None` when the timestamp is outside chrono's range or the
/// pattern contains an unsupported specifier.
pub fn format_timestamp(millis: i64, style: &DateStyle) -> Option<String> {
    match style.zone {
        DateZone::Local => render(Local.timestamp_millis_opt(millis).single()?, style),
        DateZone::Fixed(offset) => render(offset.timestamp_millis_opt(millis).single()?, style),
    }
}

fn render<Tz>(moment: DateTime<Tz>, style: &DateStyle) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", moment.format(&style.pattern)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shanghai() -> DateStyle {
        DateStyle::default().with_zone(DateZone::from_offset_minutes(8 * 60).unwrap())
    }

    #[test]
    fn renders_locale_style() {
        // 2024-01-15T02:30:05Z
        let text = format_timestamp(1_705_285_805_000, &shanghai()).unwrap();
        assert_eq!(text, "2024/1/15 10:30:05");
    }

    #[test]
    fn renders_custom_pattern() {
        let style = shanghai().with_pattern("%Y-%m-%d");
        assert_eq!(
            format_timestamp(1_705_285_805_000, &style).as_deref(),
            Some("2024-01-15")
        );
    }

    #[test]
    fn bad_pattern_is_none() {
        let style = shanghai().with_pattern("%Q");
        assert_eq!(format_timestamp(0, &style), None);
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(format_timestamp(i64::MAX, &shanghai()), None);
    }
}
