use crate::{Error, StorageType};
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Root cause carried inside [`crate::Error`] for every failure raised by the
/// engine itself. Recover it with `error.downcast_ref::<MappingError>()`.
///
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum MappingError {
    /// The declared metadata of a record type is invalid, or a value set names
    /// a field the record type does not declare.
    #[error("schema error: {0}")]
    Schema(String),

    /// An update or delete resolved to no predicate at all.
    #[error("refusing to run a statement on `{table}` without a condition")]
    EmptyCondition { table: String },

    /// An update resolved to no assignment at all.
    #[error("update on `{table}` has nothing to assign")]
    EmptyAssignment { table: String },

    /// A single-row lookup matched more than one row.
    #[error("expected at most one row from `{table}`, found {count} or more")]
    MultipleRows { table: String, count: usize },

    /// A stored value does not fit the declared storage type of its column.
    #[error("column `{column}` is declared {expected} but the row holds {found}")]
    TypeMismatch {
        column: String,
        expected: StorageType,
        found: &'static str,
    },

    /// Failure reported by the underlying store.
    #[error("store error {code}: {message}")]
    Store { code: i32, message: String },
}

impl MappingError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Find the `MappingError` at the root of an engine error, if any.
    pub fn of(error: &Error) -> Option<&MappingError> {
        error.downcast_ref::<MappingError>()
    }
}
