use std::collections::HashMap;
use std::fmt;

use crate::enumerate::{Budget, EnumerateError, Permutations};
use crate::error::PermiaError;

use super::assignment::{Assignment, AssignmentBuilder, Slot};
use super::error::EvaluationError;
use super::field::{Field, FieldKind};
use super::output::Output;
use super::permutation::Permutation;
use super::registry::FieldRegistry;

/// Builder for constructing a [`Catalog`].
///
/// Fields and outputs are declared via closures and compiled into an
/// immutable engine structure. Declaration order is significant: a field's
/// display clause may reference only fields declared strictly earlier, plus
/// the discriminator.
///
/// # Example
///
/// ```
/// use permia::CatalogBuilder;
///
/// let catalog = CatalogBuilder::new()
///     .discriminator("Action", ["create", "update"])
///     .field("Opt", |f| f.boolean().display("Action in (create)"))
///     .output("summary", |o| o.display("Action in (create)"))
///     .compile()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    pub(crate) discriminator: Option<(String, Vec<String>)>,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) outputs: Vec<OutputSpec>,
    pub(crate) templates: HashMap<String, Vec<String>>,
}

/// Raw field declaration collected by the builder, before validation.
#[derive(Debug)]
pub(crate) struct FieldSpec {
    pub(crate) name: String,
    pub(crate) kind: Option<FieldKind>,
    pub(crate) valid_values: Vec<String>,
    pub(crate) default: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) service_scoped: bool,
    pub(crate) display: Option<String>,
}

/// Raw output declaration collected by the builder, before validation.
#[derive(Debug)]
pub(crate) struct OutputSpec {
    pub(crate) name: String,
    pub(crate) kind: Option<String>,
    pub(crate) display: Option<String>,
}

/// Intermediate builder passed to the field declaration closure.
#[derive(Debug, Default)]
pub struct FieldBuilder {
    kind: Option<FieldKind>,
    valid_values: Vec<String>,
    default: Option<String>,
    hidden: bool,
    service_scoped: bool,
    display: Option<String>,
}

/// Intermediate builder passed to the output declaration closure.
#[derive(Debug, Default)]
pub struct OutputBuilder {
    kind: Option<String>,
    display: Option<String>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the root discriminator: a Choice field that becomes the
    /// catalog's first field. Exactly one is required.
    #[must_use]
    pub fn discriminator<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.discriminator = Some((
            name.to_owned(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Register a value template. A valid value that is exactly `{{key}}`
    /// is spliced with this list at compile time.
    #[must_use]
    pub fn template<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates
            .insert(key.to_owned(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Declare a field. The closure must select a kind via one of
    /// `boolean`/`choice`/`multi_choice`/`free_form`, otherwise compilation
    /// fails with [`CatalogError::MissingKind`](super::CatalogError::MissingKind).
    #[must_use]
    pub fn field(mut self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        let builder = f(FieldBuilder::default());
        self.fields.push(FieldSpec {
            name: name.to_owned(),
            kind: builder.kind,
            valid_values: builder.valid_values,
            default: builder.default,
            hidden: builder.hidden,
            service_scoped: builder.service_scoped,
            display: builder.display,
        });
        self
    }

    /// Declare an output.
    #[must_use]
    pub fn output(mut self, name: &str, f: impl FnOnce(OutputBuilder) -> OutputBuilder) -> Self {
        let builder = f(OutputBuilder::default());
        self.outputs.push(OutputSpec {
            name: name.to_owned(),
            kind: builder.kind,
            display: builder.display,
        });
        self
    }

    /// Validate the declarations, parse every display clause, and compile
    /// into an immutable [`Catalog`].
    ///
    /// # Errors
    ///
    /// Returns [`PermiaError::Catalog`] for structural problems and
    /// [`PermiaError::Parse`] for malformed display clauses. Both are fatal:
    /// nothing degrades to always-visible.
    pub fn compile(self) -> Result<Catalog, PermiaError> {
        crate::compile::compile(self)
    }
}

impl FieldBuilder {
    /// A boolean field, expanding to exactly `{true, false}`.
    #[must_use]
    pub fn boolean(mut self) -> Self {
        self.kind = Some(FieldKind::Boolean);
        self
    }

    /// A single-select field expanding to exactly `values`.
    #[must_use]
    pub fn choice<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = Some(FieldKind::Choice);
        self.valid_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// A multi-select field; expands like [`choice`](Self::choice).
    #[must_use]
    pub fn multi_choice<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = Some(FieldKind::MultiChoice);
        self.valid_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// A free-text field: contributes a single unconstrained marker and is
    /// never branched on.
    #[must_use]
    pub fn free_form(mut self) -> Self {
        self.kind = Some(FieldKind::FreeForm);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_owned());
        self
    }

    /// Hidden fields enumerate unconditionally but are never reported
    /// visible.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn service_scoped(mut self) -> Self {
        self.service_scoped = true;
        self
    }

    /// Attach the raw display string whose embedded clause controls this
    /// field's visibility.
    #[must_use]
    pub fn display(mut self, raw: &str) -> Self {
        self.display = Some(raw.to_owned());
        self
    }
}

impl OutputBuilder {
    /// Free-form kind label passed through to the generator.
    #[must_use]
    pub fn kind(mut self, label: &str) -> Self {
        self.kind = Some(label.to_owned());
        self
    }

    /// Attach the raw display string whose embedded clause controls this
    /// output's visibility.
    #[must_use]
    pub fn display(mut self, raw: &str) -> Self {
        self.display = Some(raw.to_owned());
        self
    }
}

/// A compiled, immutable catalog. Thread-safe and designed to live behind
/// `Arc`; every query and enumeration borrows it immutably.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) fields: Vec<Field>,
    pub(crate) outputs: Vec<Output>,
    pub(crate) registry: FieldRegistry,
}

impl Catalog {
    /// Enumerate every permutation with no budget.
    ///
    /// The returned iterator is lazy, finite, and restartable: calling this
    /// again on the same catalog reproduces the same sequence in the same
    /// order.
    #[must_use]
    pub fn enumerate(&self) -> Permutations<'_> {
        Permutations::new(self, Budget::unlimited())
    }

    /// Enumerate with a caller-chosen budget, checked at every search step.
    #[must_use]
    pub fn enumerate_with(&self, budget: Budget) -> Permutations<'_> {
        Permutations::new(self, budget)
    }

    /// Collect the full permutation list with no budget.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerateError::Evaluation`] if a predicate references an
    /// unvisited field at run time; validation makes this unreachable for
    /// catalogs built through [`CatalogBuilder`].
    pub fn enumerate_all(&self) -> Result<Vec<Permutation>, EnumerateError> {
        self.enumerate().collect()
    }

    /// Worst-case permutation count: the product of every field's
    /// cardinality, saturating at `usize::MAX`. The real count is identical
    /// because false predicates omit fields without pruning branches.
    #[must_use]
    pub fn permutation_space(&self) -> usize {
        self.fields
            .iter()
            .fold(1_usize, |acc, f| acc.saturating_mul(f.cardinality()))
    }

    /// Create a builder for standalone assignments, used by the resolution
    /// queries. Fields never set stay unvisited.
    #[must_use]
    pub fn assignment_builder(&self) -> AssignmentBuilder<'_> {
        AssignmentBuilder::new(&self.registry)
    }

    /// Reconstruct the complete assignment behind an emitted permutation:
    /// every entry is assigned, every other field is visited-but-omitted.
    #[must_use]
    pub fn assignment_for(&self, permutation: &Permutation) -> Assignment {
        let mut slots = vec![Slot::Omitted; self.registry.len()];
        for (name, value) in permutation.entries() {
            if let Some(idx) = self.registry.get(name) {
                slots[idx] = Slot::Assigned(value.clone());
            }
        }
        Assignment::from_slots(slots)
    }

    /// Whether the named field is visible under the given assignment.
    /// Hidden fields are never visible.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownField`] for names not in the
    /// catalog, and [`EvaluationError::Unassigned`] if the field's predicate
    /// references an unvisited field.
    pub fn is_field_visible(
        &self,
        name: &str,
        assignment: &Assignment,
    ) -> Result<bool, EvaluationError> {
        crate::resolve::is_field_visible(self, name, assignment)
    }

    /// Resolve the outputs visible under a completed assignment.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Unassigned`] if an output predicate
    /// references an unvisited field.
    pub fn outputs_for_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<Vec<&Output>, EvaluationError> {
        crate::resolve::outputs_for_assignment(self, assignment)
    }

    /// Resolve the outputs visible for a single discriminator value.
    ///
    /// Strict partial-context mode: only predicates referencing the
    /// discriminator alone are permitted; anything referencing additional
    /// fields requires a full assignment.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::PartialContext`] if any output predicate
    /// references a non-discriminator field.
    pub fn outputs_for_discriminator(
        &self,
        value: &str,
    ) -> Result<Vec<&Output>, EvaluationError> {
        crate::resolve::outputs_for_discriminator(self, value)
    }

    /// The fields in declaration order; the discriminator is first.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The declared outputs, in declaration order.
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The root discriminator field.
    #[must_use]
    pub fn discriminator(&self) -> &Field {
        &self.fields[0]
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.registry.get(name).map(|idx| &self.fields[idx])
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog({} fields, {} outputs, space {})",
            self.fields.len(),
            self.outputs.len(),
            self.permutation_space(),
        )
    }
}
