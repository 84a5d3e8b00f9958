use super::registry::FieldRegistry;
use super::value::Value;

/// The state of one field position during search or resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Not yet reached in enumeration order. Referencing it is an
    /// [`EvaluationError`](super::EvaluationError).
    Unvisited,
    /// Visited but excluded from this branch: the field's predicate was
    /// false and it is not hidden. Membership tests against it are false.
    Omitted,
    /// Carries the value chosen for this branch.
    Assigned(Value),
}

/// A partial or complete mapping from field position to chosen value.
///
/// The enumerator owns one assignment per run and mutates it with strict
/// push-on-descend/pop-on-backtrack discipline. Callers build standalone
/// assignments for resolution queries via
/// [`Catalog::assignment_builder()`](super::Catalog::assignment_builder) or
/// [`Catalog::assignment_for()`](super::Catalog::assignment_for).
#[derive(Debug, Clone)]
pub struct Assignment {
    slots: Vec<Slot>,
}

impl Assignment {
    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get the value assigned at a field index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self.slots.get(index) {
            Some(Slot::Assigned(v)) => Some(v),
            _ => None,
        }
    }

    /// The number of field positions (assigned or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Builder for standalone [`Assignment`]s, resolving field names to slot
/// positions through the catalog's registry. Obtained from
/// [`Catalog::assignment_builder()`](super::Catalog::assignment_builder).
///
/// Names not present in the catalog are silently ignored; fields never set
/// stay unvisited, so predicates referencing them fail with
/// [`EvaluationError::Unassigned`](super::EvaluationError::Unassigned)
/// rather than silently defaulting.
#[derive(Debug)]
pub struct AssignmentBuilder<'a> {
    registry: &'a FieldRegistry,
    slots: Vec<Slot>,
}

impl<'a> AssignmentBuilder<'a> {
    pub(crate) fn new(registry: &'a FieldRegistry) -> Self {
        Self {
            registry,
            slots: vec![Slot::Unvisited; registry.len()],
        }
    }

    /// Set a field value by name.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(idx) = self.registry.get(name) {
            self.slots[idx] = Slot::Assigned(value.into());
        }
        self
    }

    /// Mark a field as visited-but-omitted by name.
    #[must_use]
    pub fn omit(mut self, name: &str) -> Self {
        if let Some(idx) = self.registry.get(name) {
            self.slots[idx] = Slot::Omitted;
        }
        self
    }

    /// Build the assignment.
    #[must_use]
    pub fn build(self) -> Assignment {
        Assignment { slots: self.slots }
    }
}
