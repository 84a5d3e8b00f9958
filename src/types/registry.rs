use std::collections::HashMap;

/// Maps field names to their position in catalog declaration order.
///
/// Built during compilation. The index doubles as the slot position in an
/// [`Assignment`](super::Assignment) and as the ordering key for the
/// strictly-earlier reference check.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    names: HashMap<String, usize>,
    len: usize,
}

impl FieldRegistry {
    pub(crate) fn new() -> Self {
        Self {
            names: HashMap::new(),
            len: 0,
        }
    }

    /// Register a field name, returning its index. Returns `None` if the
    /// name is already registered (duplicates are a catalog error).
    pub(crate) fn register(&mut self, name: &str) -> Option<usize> {
        if self.names.contains_key(name) {
            return None;
        }
        let idx = self.len;
        self.names.insert(name.to_owned(), idx);
        self.len += 1;
        Some(idx)
    }

    /// Look up the index for a field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// The number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
