use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Default date-time pattern, matching the host's zh-CN locale rendering
/// (`2024/1/15 10:30:00`).
pub const DEFAULT_DATE_PATTERN: &str = "%Y/%-m/%-d %H:%M:%S";

/// Time zone used to render timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateZone {
    /// The process's local zone.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DateZone {
    /// Builds a fixed zone from an offset in minutes east of UTC.
    /// Returns `None` when the offset is out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(DateZone::Fixed)
    }
}

/// How date-like values are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStyle {
    pub zone: DateZone,
    /// `chrono` strftime pattern.
    pub pattern: String,
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            zone: DateZone::default(),
            pattern: DEFAULT_DATE_PATTERN.to_string(),
        }
    }
}

impl DateStyle {
    pub fn with_zone(mut self, zone: DateZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

/// How select-like fields holding a list of options are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionListMode {
    /// Join the text of every option with a comma.
    #[default]
    Join,
    /// Keep only the first option's text.
    First,
}

/// Options for value normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizationOptions {
    pub date_style: DateStyle,
    pub option_lists: OptionListMode,
}

impl NormalizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }

    pub fn with_option_lists(mut self, mode: OptionListMode) -> Self {
        self.option_lists = mode;
        self
    }
}
