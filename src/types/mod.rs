mod assignment;
mod catalog;
mod error;
mod field;
mod output;
mod permutation;
mod predicate;
mod registry;
mod value;

pub use assignment::{Assignment, AssignmentBuilder};
pub use catalog::{Catalog, CatalogBuilder, FieldBuilder, OutputBuilder};
pub use error::{CatalogError, EvaluationError};
pub use field::{Field, FieldKind};
pub use output::Output;
pub use permutation::Permutation;
pub use predicate::Predicate;
pub use registry::FieldRegistry;
pub use value::Value;

pub(crate) use assignment::Slot;
pub(crate) use catalog::{FieldSpec, OutputSpec};
pub(crate) use predicate::CompiledPredicate;
