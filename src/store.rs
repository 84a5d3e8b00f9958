//! Canonical serialized form of an enumerated permutation set.
//!
//! The store writes an ordered JSON array of
//! `{ "index": n, "fields": [{ "name": ..., "value": ... }] }` objects,
//! where `value` is a string, a bool, or `null` (the FreeForm marker).
//! Output is deterministic: identical permutation lists produce
//! byte-identical text across runs, so downstream generators can diff and
//! cache it. Reading back reproduces the original list exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Permutation, Value};

/// Errors from encoding or decoding the canonical JSON form.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode permutations: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode permutations: {0}")]
    Decode(#[source] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPermutation {
    index: usize,
    fields: Vec<StoredField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredField {
    name: String,
    value: StoredValue,
}

/// `Bool` must come before `Text` so untagged deserialization keeps JSON
/// booleans as booleans; the unit variant serializes as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Bool(bool),
    Text(String),
    Unconstrained,
}

impl From<&Value> for StoredValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => StoredValue::Bool(*b),
            Value::Text(s) => StoredValue::Text(s.clone()),
            Value::Unconstrained => StoredValue::Unconstrained,
        }
    }
}

impl From<StoredValue> for Value {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Bool(b) => Value::Bool(b),
            StoredValue::Text(s) => Value::Text(s),
            StoredValue::Unconstrained => Value::Unconstrained,
        }
    }
}

impl From<&Permutation> for StoredPermutation {
    fn from(permutation: &Permutation) -> Self {
        StoredPermutation {
            index: permutation.index(),
            fields: permutation
                .entries()
                .iter()
                .map(|(name, value)| StoredField {
                    name: name.clone(),
                    value: value.into(),
                })
                .collect(),
        }
    }
}

impl StoredPermutation {
    fn into_permutation(self) -> Permutation {
        Permutation::new(
            self.index,
            self.fields
                .into_iter()
                .map(|f| (f.name, f.value.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Serialize a permutation list to compact, deterministic JSON.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if encoding fails.
pub fn write(permutations: &[Permutation]) -> Result<String, StoreError> {
    let stored: Vec<StoredPermutation> = permutations.iter().map(Into::into).collect();
    serde_json::to_string(&stored).map_err(StoreError::Encode)
}

/// Read a permutation list back from its canonical JSON form.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if the text is not valid stored JSON.
pub fn read(json: &str) -> Result<Vec<Permutation>, StoreError> {
    let stored: Vec<StoredPermutation> = serde_json::from_str(json).map_err(StoreError::Decode)?;
    Ok(stored
        .into_iter()
        .map(StoredPermutation::into_permutation)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms() -> Vec<Permutation> {
        vec![
            Permutation::new(
                0,
                vec![
                    ("Action".to_owned(), Value::Text("A".into())),
                    ("Opt".to_owned(), Value::Bool(true)),
                    ("Note".to_owned(), Value::Unconstrained),
                ],
            ),
            Permutation::new(1, vec![("Action".to_owned(), Value::Text("B".into()))]),
        ]
    }

    #[test]
    fn write_shape() {
        let json = write(&perms()).unwrap();
        assert_eq!(
            json,
            r#"[{"index":0,"fields":[{"name":"Action","value":"A"},{"name":"Opt","value":true},{"name":"Note","value":null}]},{"index":1,"fields":[{"name":"Action","value":"B"}]}]"#
        );
    }

    #[test]
    fn write_is_deterministic() {
        assert_eq!(write(&perms()).unwrap(), write(&perms()).unwrap());
    }

    #[test]
    fn round_trip() {
        let original = perms();
        let restored = read(&write(&original).unwrap()).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn empty_list() {
        let json = write(&[]).unwrap();
        assert_eq!(json, "[]");
        assert!(read(&json).unwrap().is_empty());
    }

    #[test]
    fn decode_garbage_is_error() {
        assert!(matches!(read("not json"), Err(StoreError::Decode(_))));
        assert!(matches!(read(r#"{"index":0}"#), Err(StoreError::Decode(_))));
    }
}
