use crate::value::ValueKind;
use thiserror::Error;

/// Errors reported by the collections and strategies in this crate.
///
/// All errors are returned synchronously at the point of violation. Nothing is
/// retried or rolled back internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// `first` or `remove_first` on an empty collection
    #[error("no element in an empty collection")]
    EmptyCollection,

    /// an argument outside the domain the operation accepts
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// two values that have no natural ordering between them were compared
    #[error("values of kind {left:?} and {right:?} have no natural ordering")]
    TypeMismatch { left: ValueKind, right: ValueKind },
}

pub type Result<T> = std::result::Result<T, CollectionError>;

impl CollectionError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        CollectionError::InvalidArgument(msg.into())
    }
}
