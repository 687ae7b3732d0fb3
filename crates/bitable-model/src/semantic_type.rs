//! Semantic type codes for table fields.
//!
//! The host data source tags every field with an integer code. The code
//! decides how a raw cell value is shaped and how it is turned into a
//! display value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a field, keyed by the host's integer code.
///
/// Codes the host adds later decode to [`SemanticType::Unknown`] and keep
/// their integer, so they survive a serialize round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SemanticType {
    /// Multi-line text, delivered as an array of text segments.
    Text,
    Number,
    SingleSelect,
    MultiSelect,
    /// Millisecond Unix timestamp.
    DateTime,
    Checkbox,
    /// Person field.
    User,
    Phone,
    Url,
    Attachment,
    /// One-way link to another table.
    SingleLink,
    Lookup,
    Formula,
    /// Two-way link to another table.
    DuplexLink,
    Location,
    GroupChat,
    CreatedTime,
    ModifiedTime,
    CreatedUser,
    ModifiedUser,
    AutoNumber,
    Barcode,
    Progress,
    Currency,
    Rating,
    Email,
    /// A code this crate does not know about.
    Unknown(i64),
}

impl SemanticType {
    /// Every known type, in code order.
    pub const KNOWN: [SemanticType; 26] = [
        SemanticType::Text,
        SemanticType::Number,
        SemanticType::SingleSelect,
        SemanticType::MultiSelect,
        SemanticType::DateTime,
        SemanticType::Checkbox,
        SemanticType::User,
        SemanticType::Phone,
        SemanticType::Url,
        SemanticType::Attachment,
        SemanticType::SingleLink,
        SemanticType::Lookup,
        SemanticType::Formula,
        SemanticType::DuplexLink,
        SemanticType::Location,
        SemanticType::GroupChat,
        SemanticType::CreatedTime,
        SemanticType::ModifiedTime,
        SemanticType::CreatedUser,
        SemanticType::ModifiedUser,
        SemanticType::AutoNumber,
        SemanticType::Barcode,
        SemanticType::Progress,
        SemanticType::Currency,
        SemanticType::Rating,
        SemanticType::Email,
    ];

    /// Returns the host's integer code.
    pub fn code(&self) -> i64 {
        match self {
            SemanticType::Text => 1,
            SemanticType::Number => 2,
            SemanticType::SingleSelect => 3,
            SemanticType::MultiSelect => 4,
            SemanticType::DateTime => 5,
            SemanticType::Checkbox => 7,
            SemanticType::User => 11,
            SemanticType::Phone => 13,
            SemanticType::Url => 15,
            SemanticType::Attachment => 17,
            SemanticType::SingleLink => 18,
            SemanticType::Lookup => 19,
            SemanticType::Formula => 20,
            SemanticType::DuplexLink => 21,
            SemanticType::Location => 22,
            SemanticType::GroupChat => 23,
            SemanticType::CreatedTime => 1001,
            SemanticType::ModifiedTime => 1002,
            SemanticType::CreatedUser => 1003,
            SemanticType::ModifiedUser => 1004,
            SemanticType::AutoNumber => 1005,
            SemanticType::Barcode => 99001,
            SemanticType::Progress => 99002,
            SemanticType::Currency => 99003,
            SemanticType::Rating => 99004,
            SemanticType::Email => 99005,
            SemanticType::Unknown(code) => *code,
        }
    }

    /// Maps an integer code to a type. Never fails.
    pub fn from_code(code: i64) -> Self {
        Self::KNOWN
            .iter()
            .copied()
            .find(|kind| kind.code() == code)
            .unwrap_or(SemanticType::Unknown(code))
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "Text",
            SemanticType::Number => "Number",
            SemanticType::SingleSelect => "Single select",
            SemanticType::MultiSelect => "Multi select",
            SemanticType::DateTime => "Date",
            SemanticType::Checkbox => "Checkbox",
            SemanticType::User => "Person",
            SemanticType::Phone => "Phone",
            SemanticType::Url => "URL",
            SemanticType::Attachment => "Attachment",
            SemanticType::SingleLink => "One-way link",
            SemanticType::Lookup => "Lookup",
            SemanticType::Formula => "Formula",
            SemanticType::DuplexLink => "Two-way link",
            SemanticType::Location => "Location",
            SemanticType::GroupChat => "Group chat",
            SemanticType::CreatedTime => "Created time",
            SemanticType::ModifiedTime => "Modified time",
            SemanticType::CreatedUser => "Created by",
            SemanticType::ModifiedUser => "Modified by",
            SemanticType::AutoNumber => "Auto number",
            SemanticType::Barcode => "Barcode",
            SemanticType::Progress => "Progress",
            SemanticType::Currency => "Currency",
            SemanticType::Rating => "Rating",
            SemanticType::Email => "Email",
            SemanticType::Unknown(_) => "Unknown",
        }
    }

    /// Returns true for types whose raw value is a millisecond timestamp.
    pub fn is_timestamp(&self) -> bool {
        matches!(
            self,
            SemanticType::DateTime | SemanticType::CreatedTime | SemanticType::ModifiedTime
        )
    }

    /// Returns true for types whose raw value is an array of persons.
    pub fn is_person_list(&self) -> bool {
        matches!(
            self,
            SemanticType::CreatedUser | SemanticType::ModifiedUser
        )
    }
}

impl From<i64> for SemanticType {
    fn from(code: i64) -> Self {
        SemanticType::from_code(code)
    }
}

impl From<SemanticType> for i64 {
    fn from(kind: SemanticType) -> Self {
        kind.code()
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Unknown(code) => write!(f, "Unknown ({code})"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in SemanticType::KNOWN {
            assert_eq!(SemanticType::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let kind = SemanticType::from_code(4242);
        assert_eq!(kind, SemanticType::Unknown(4242));
        assert_eq!(kind.code(), 4242);
        assert_eq!(kind.to_string(), "Unknown (4242)");
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&SemanticType::CreatedTime).unwrap();
        assert_eq!(json, "1001");
        let parsed: SemanticType = serde_json::from_str("99005").unwrap();
        assert_eq!(parsed, SemanticType::Email);
    }
}
