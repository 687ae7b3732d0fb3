use serde::{Deserialize, Serialize};

use crate::semantic_type::SemanticType;

/// One column of a source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SemanticType,
}

impl FieldDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SemanticType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}
