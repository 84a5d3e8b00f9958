use std::collections::BTreeSet;
use std::fmt;

/// A concrete value a field can take in an assignment or permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A boolean choice. Normalizes to the literal strings `"true"`/`"false"`
    /// for membership tests.
    Bool(bool),
    /// A string value from a Choice/MultiChoice valid-value list.
    Text(String),
    /// The single wildcard marker contributed by a FreeForm field. Serializes
    /// as `null` and never matches a membership test.
    Unconstrained,
}

impl Value {
    /// Test normalized membership of this value in a predicate's value set.
    /// Comparisons are exact-match, never case-folded.
    #[must_use]
    pub fn matches(&self, values: &BTreeSet<String>) -> bool {
        match self {
            Value::Bool(b) => values.contains(if *b { "true" } else { "false" }),
            Value::Text(s) => values.contains(s),
            Value::Unconstrained => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Unconstrained => write!(f, "*"),
        }
    }
}
