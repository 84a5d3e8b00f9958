use thiserror::Error;

use crate::enumerate::EnumerateError;
use crate::parse::ParseError;
use crate::store::StoreError;
use crate::types::{CatalogError, EvaluationError};

/// Unified error type covering clause parsing, catalog compilation,
/// evaluation, enumeration, and persistence.
///
/// Returned by convenience methods like
/// [`CatalogBuilder::compile()`](crate::CatalogBuilder::compile) and
/// [`Catalog::enumerate_all()`](crate::Catalog::enumerate_all).
#[derive(Debug, Error)]
pub enum PermiaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
