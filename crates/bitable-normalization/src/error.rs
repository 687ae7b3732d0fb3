use thiserror::Error;

/// Raw value that does not have the shape its field type promises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("person list element {index} has no name")]
    PersonWithoutName { index: usize },
    #[error("expected a person list, got {found}")]
    NotAPersonList { found: &'static str },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
