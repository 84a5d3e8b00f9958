use super::predicate::{CompiledPredicate, Predicate};
use super::value::Value;

/// The shape of a field's candidate value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Expands to exactly `{true, false}`.
    Boolean,
    /// Expands to exactly its valid-value list.
    Choice,
    /// Same expansion as [`Choice`](FieldKind::Choice); the distinction is
    /// metadata for the downstream generator.
    MultiChoice,
    /// Contributes a single unconstrained marker and is never branched on.
    FreeForm,
}

/// One configurable field from the catalog. Immutable after compile.
///
/// Declaration order is semantically significant: a field's predicate may
/// reference only fields declared strictly earlier.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) valid_values: Vec<String>,
    pub(crate) default: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) service_scoped: bool,
    pub(crate) predicate: Predicate,
    pub(crate) compiled: CompiledPredicate,
}

impl Field {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The template-expanded valid values, in declared order. Empty for
    /// Boolean and FreeForm fields.
    #[must_use]
    pub fn valid_values(&self) -> &[String] {
        &self.valid_values
    }

    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Hidden fields are always included in enumeration but never reported
    /// visible by [`Catalog::is_field_visible`](super::Catalog::is_field_visible).
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn is_service_scoped(&self) -> bool {
        self.service_scoped
    }

    /// The visibility predicate parsed from this field's display string.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Candidate values in branching order.
    pub(crate) fn candidates(&self) -> Vec<Value> {
        match self.kind {
            FieldKind::Boolean => vec![Value::Bool(true), Value::Bool(false)],
            FieldKind::Choice | FieldKind::MultiChoice => self
                .valid_values
                .iter()
                .cloned()
                .map(Value::Text)
                .collect(),
            FieldKind::FreeForm => vec![Value::Unconstrained],
        }
    }

    /// The number of candidate values this field contributes to the
    /// permutation space: 2 for Boolean, `|valid_values|` for
    /// Choice/MultiChoice, 1 for FreeForm.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        match self.kind {
            FieldKind::Boolean => 2,
            FieldKind::Choice | FieldKind::MultiChoice => self.valid_values.len(),
            FieldKind::FreeForm => 1,
        }
    }
}
