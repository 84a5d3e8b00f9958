use std::collections::BTreeSet;
use std::fmt;

/// A compiled visibility condition. Parsed once per field/output at catalog
/// compile time from its raw display string; never mutated afterwards.
///
/// The grammar is deliberately small: membership tests conjoined with `AND`.
/// Transformed into [`CompiledPredicate`] during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Literal(bool),
    FieldIn {
        field: String,
        values: BTreeSet<String>,
    },
    And(Box<Predicate>, Box<Predicate>),
}

/// Compiled predicate with field names resolved to registry indices.
/// The name is kept alongside the index for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompiledPredicate {
    Literal(bool),
    FieldIn {
        field: String,
        index: usize,
        values: BTreeSet<String>,
    },
    And(Box<CompiledPredicate>, Box<CompiledPredicate>),
}

impl Predicate {
    /// Build a membership test: `field in (values...)`.
    #[must_use]
    pub fn field_in<I, S>(field: &str, values: I) -> Predicate
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::FieldIn {
            field: field.to_owned(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjoin two predicates, left-associatively.
    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Whether this predicate is unconditionally true.
    #[must_use]
    pub fn is_always_true(&self) -> bool {
        matches!(self, Predicate::Literal(true))
    }

    /// Collect the names of every field this predicate references, in
    /// left-to-right order. Duplicates are preserved.
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Predicate::Literal(_) => {}
            Predicate::FieldIn { field, .. } => refs.push(field),
            Predicate::And(a, b) => {
                a.collect_refs(refs);
                b.collect_refs(refs);
            }
        }
    }
}

impl CompiledPredicate {
    /// Collect `(name, index)` pairs for every field reference.
    pub(crate) fn collect_refs<'a>(&'a self, refs: &mut Vec<(&'a str, usize)>) {
        match self {
            CompiledPredicate::Literal(_) => {}
            CompiledPredicate::FieldIn { field, index, .. } => refs.push((field, *index)),
            CompiledPredicate::And(a, b) => {
                a.collect_refs(refs);
                b.collect_refs(refs);
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Literal(b) => write!(f, "{b}"),
            Predicate::FieldIn { field, values } => {
                let list: Vec<&str> = values.iter().map(String::as_str).collect();
                write!(f, "{field} in ({})", list.join(", "))
            }
            Predicate::And(a, b) => write!(f, "{a} AND {b}"),
        }
    }
}
