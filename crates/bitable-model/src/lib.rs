pub mod document;
pub mod field;
pub mod record;
pub mod semantic_type;
pub mod value;

pub use document::{PrintDocument, TABLE_KEY, TableRow};
pub use field::FieldDescriptor;
pub use record::{FieldValue, FieldValueEntry, Record};
pub use semantic_type::SemanticType;
pub use value::{Computed, DisplayValue, EMPTY_MARKER, Media, RawValue, Reference, Segment};
