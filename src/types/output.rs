use super::predicate::{CompiledPredicate, Predicate};

/// A declared output (e.g. a generated artifact or document section) whose
/// visibility is controlled by an optional display clause.
///
/// An output with no display string is always visible.
#[derive(Debug, Clone)]
pub struct Output {
    pub(crate) name: String,
    pub(crate) kind: Option<String>,
    pub(crate) predicate: Predicate,
    pub(crate) compiled: CompiledPredicate,
}

impl Output {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form kind label for the downstream generator.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// The visibility predicate parsed from this output's display string.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}
