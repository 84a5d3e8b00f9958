//! Binary serialization and deserialization of enumerated permutation sets.
//!
//! This module provides a stable binary format for persisting a
//! [`PermutationCache`]. The format consists of a 32-byte fixed header
//! followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"PRMA"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with
//! [`DeserializeError::IncompatibleVersion`]. The engine version is
//! informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Permutation, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"PRMA";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`PermutationCache`] to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode permutation cache: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`PermutationCache`] from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a permia binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCache {
    metadata: CacheMetadata,
    permutations: Vec<SerializedPermutation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheMetadata {
    permutation_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedPermutation {
    index: usize,
    fields: Vec<SerializedField>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedField {
    name: String,
    value: SerializedValue,
}

// Variant-tagged, unlike the store's untagged JSON form: bincode is not
// self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedValue {
    Bool(bool),
    Text(String),
    Unconstrained,
}

// ---------------------------------------------------------------------------
// Value conversion
// ---------------------------------------------------------------------------

fn serialize_value(value: &Value) -> SerializedValue {
    match value {
        Value::Bool(b) => SerializedValue::Bool(*b),
        Value::Text(s) => SerializedValue::Text(s.clone()),
        Value::Unconstrained => SerializedValue::Unconstrained,
    }
}

fn deserialize_value(value: SerializedValue) -> Value {
    match value {
        SerializedValue::Bool(b) => Value::Bool(b),
        SerializedValue::Text(s) => Value::Text(s),
        SerializedValue::Unconstrained => Value::Unconstrained,
    }
}

fn serialize_permutation(permutation: &Permutation) -> SerializedPermutation {
    SerializedPermutation {
        index: permutation.index(),
        fields: permutation
            .entries()
            .iter()
            .map(|(name, value)| SerializedField {
                name: name.clone(),
                value: serialize_value(value),
            })
            .collect(),
    }
}

fn deserialize_permutation(ser: SerializedPermutation) -> Permutation {
    Permutation::new(
        ser.index,
        ser.fields
            .into_iter()
            .map(|f| (f.name, deserialize_value(f.value)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Cache wrapper
// ---------------------------------------------------------------------------

/// An enumerated permutation set together with an optional digest of the
/// catalog source it was produced from, in a form that can be persisted and
/// reloaded without re-running the search.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationCache {
    permutations: Vec<Permutation>,
    source_digest: Option<[u8; 32]>,
}

impl PermutationCache {
    /// Wrap an enumerated permutation list. The optional `source_text` is
    /// hashed (BLAKE3) and embedded so a reloaded cache can be checked for
    /// staleness against the current catalog source.
    #[must_use]
    pub fn new(permutations: Vec<Permutation>, source_text: Option<&str>) -> Self {
        Self {
            permutations,
            source_digest: source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes()),
        }
    }

    #[must_use]
    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    /// Give back the permutation list, consuming the cache.
    #[must_use]
    pub fn into_permutations(self) -> Vec<Permutation> {
        self.permutations
    }

    /// Whether `source_text` no longer matches the embedded digest. A cache
    /// built without a source digest can never be proven stale.
    #[must_use]
    pub fn is_stale(&self, source_text: &str) -> bool {
        match &self.source_digest {
            Some(digest) => blake3::hash(source_text.as_bytes()).as_bytes() != digest,
            None => false,
        }
    }

    /// Serialize this cache to a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        encode(self)
    }

    /// Deserialize a cache from a byte slice previously produced by
    /// [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] on format, integrity, or validation
    /// failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeserializeError> {
        decode(bytes)
    }

    /// Serialize this cache and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] on encoding or I/O failure.
    pub fn to_binary_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), SerializeError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the cache it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] on I/O, format, integrity, or validation
    /// failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedCache) -> Result<(), DeserializeError> {
    if ser.metadata.permutation_count != ser.permutations.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} permutations but payload has {}",
            ser.metadata.permutation_count,
            ser.permutations.len()
        )));
    }

    // Indices are assigned in emission order; a gap or reorder means the
    // payload was not produced by a single enumeration run.
    for (position, stored) in ser.permutations.iter().enumerate() {
        if stored.index != position {
            return Err(DeserializeError::Validation(format!(
                "permutation at position {position} carries index {}",
                stored.index
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version (informational, not used for checks)
    // bytes[8..12] is flags (reserved)
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Encode/decode
// ---------------------------------------------------------------------------

fn encode(cache: &PermutationCache) -> Result<Vec<u8>, SerializeError> {
    let serialized = SerializedCache {
        metadata: CacheMetadata {
            permutation_count: cache.permutations.len(),
            source_digest: cache.source_digest,
        },
        permutations: cache.permutations.iter().map(serialize_permutation).collect(),
    };
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

fn decode(bytes: &[u8]) -> Result<PermutationCache, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_start = HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[payload_start..payload_end];

    // Integrity check
    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedCache, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    validate(&serialized)?;

    Ok(PermutationCache {
        permutations: serialized
            .permutations
            .into_iter()
            .map(deserialize_permutation)
            .collect(),
        source_digest: serialized.metadata.source_digest,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

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
                ],
            ),
            Permutation::new(1, vec![("Action".to_owned(), Value::Text("B".into()))]),
        ]
    }

    // -- Header round-trip --

    #[test]
    fn header_round_trip() {
        let payload = b"test payload data";
        let mut buf = Vec::new();
        write_header(&mut buf, payload);
        assert_eq!(buf.len(), HEADER_SIZE);

        let (format_version, payload_len, hash) = read_header(&buf).unwrap();
        assert_eq!(format_version, FORMAT_VERSION);
        assert_eq!(payload_len as usize, payload.len());

        let expected_hash = blake3::hash(payload);
        assert_eq!(&hash, &expected_hash.as_bytes()[..16]);
    }

    #[test]
    fn header_bad_magic() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"BAAD");
        assert!(matches!(read_header(&buf), Err(DeserializeError::BadMagic)));
    }

    #[test]
    fn header_too_short() {
        let buf = vec![0u8; 10];
        assert!(matches!(
            read_header(&buf),
            Err(DeserializeError::LengthMismatch { .. })
        ));
    }

    // -- Cache round-trip --

    #[test]
    fn cache_round_trip() {
        let cache = PermutationCache::new(perms(), Some("catalog source"));
        let bytes = cache.to_bytes().unwrap();
        let restored = PermutationCache::from_bytes(&bytes).unwrap();
        assert_eq!(restored, cache);
    }

    #[test]
    fn empty_cache_round_trip() {
        let cache = PermutationCache::new(Vec::new(), None);
        let bytes = cache.to_bytes().unwrap();
        let restored = PermutationCache::from_bytes(&bytes).unwrap();
        assert!(restored.permutations().is_empty());
        assert!(!restored.is_stale("anything"));
    }

    #[test]
    fn staleness_tracks_source_digest() {
        let cache = PermutationCache::new(perms(), Some("v1"));
        assert!(!cache.is_stale("v1"));
        assert!(cache.is_stale("v2"));
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let cache = PermutationCache::new(perms(), None);
        let mut bytes = cache.to_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            PermutationCache::from_bytes(&bytes),
            Err(DeserializeError::ChecksumMismatch)
        ));
    }

    #[test]
    fn truncated_payload_is_length_mismatch() {
        let cache = PermutationCache::new(perms(), None);
        let bytes = cache.to_bytes().unwrap();
        assert!(matches!(
            PermutationCache::from_bytes(&bytes[..bytes.len() - 4]),
            Err(DeserializeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn future_format_version_rejected() {
        let cache = PermutationCache::new(perms(), None);
        let mut bytes = cache.to_bytes().unwrap();
        bytes[4..6].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            PermutationCache::from_bytes(&bytes),
            Err(DeserializeError::IncompatibleVersion { blob, supported })
                if blob == FORMAT_VERSION + 1 && supported == FORMAT_VERSION
        ));
    }

    // -- Validation --

    #[test]
    fn validate_count_mismatch() {
        let ser = SerializedCache {
            metadata: CacheMetadata {
                permutation_count: 3,
                source_digest: None,
            },
            permutations: Vec::new(),
        };
        assert!(matches!(
            validate(&ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn validate_non_contiguous_indices() {
        let stored = SerializedPermutation {
            index: 5,
            fields: vec![SerializedField {
                name: "Action".to_owned(),
                value: SerializedValue::Text("A".to_owned()),
            }],
        };
        let ser = SerializedCache {
            metadata: CacheMetadata {
                permutation_count: 1,
                source_digest: None,
            },
            permutations: vec![stored],
        };
        assert!(matches!(
            validate(&ser),
            Err(DeserializeError::Validation(_))
        ));
    }
}
