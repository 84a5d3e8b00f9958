use std::fmt;

use super::value::Value;

/// One completed, consistent combination of field values.
///
/// Contains only the fields that were assigned on this branch (visible or
/// hidden); fields whose predicate was false are absent. Immutable once
/// produced, and tagged with a stable zero-based index reflecting
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Permutation {
    index: usize,
    entries: Vec<(String, Value)>,
}

impl Permutation {
    pub(crate) fn new(index: usize, entries: Vec<(String, Value)>) -> Self {
        Self { index, entries }
    }

    /// Zero-based position in enumeration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The `(field, value)` pairs, in catalog declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Look up a field's value by name. `None` means the field was omitted
    /// on this branch.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The number of included fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {{", self.index)?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm() -> Permutation {
        Permutation::new(
            3,
            vec![
                ("Action".to_owned(), Value::Text("create".into())),
                ("Opt".to_owned(), Value::Bool(true)),
            ],
        )
    }

    #[test]
    fn accessors() {
        let p = perm();
        assert_eq!(p.index(), 3);
        assert_eq!(p.len(), 2);
        assert!(!p.is_empty());
        assert_eq!(p.get("Action"), Some(&Value::Text("create".into())));
        assert_eq!(p.get("Opt"), Some(&Value::Bool(true)));
        assert_eq!(p.get("Missing"), None);
    }

    #[test]
    fn display() {
        assert_eq!(perm().to_string(), "#3 {Action=create, Opt=true}");
        assert_eq!(Permutation::new(0, Vec::new()).to_string(), "#0 {}");
    }

    #[test]
    fn equality_covers_index_and_entries() {
        assert_eq!(perm(), perm());
        assert_ne!(perm(), Permutation::new(4, perm().entries().to_vec()));
    }
}
