mod compile;
mod enumerate;
mod error;
mod evaluate;
mod parse;
mod resolve;
#[cfg(feature = "binary-cache")]
mod serial;
pub mod store;
mod types;

pub use enumerate::{Budget, EnumerateError, Permutations};
pub use error::PermiaError;
pub use parse::ParseError;
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, PermutationCache, SerializeError};
pub use store::StoreError;
pub use types::{
    Assignment, AssignmentBuilder, Catalog, CatalogBuilder, CatalogError, EvaluationError, Field,
    FieldBuilder, FieldKind, Output, OutputBuilder, Permutation, Predicate, Value,
};
