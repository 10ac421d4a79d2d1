//! Content-addressed resource identifiers.
//!
//! A resource id is derived from a human-readable label by digesting
//! [`ID_HASH_PREFIX`] followed by the label, taking the first eight digest
//! bytes as a little-endian `u64`, and setting bit 0. Every derived id is
//! therefore odd, which keeps it apart from the reserved tag constants in
//! [`crate::tag`] (in particular `NOOP == 0`).
//!
//! The digest itself is a [`LabelDigest`] strategy. SHA-1 is the default so
//! that ids stay compatible with catalogs produced by earlier releases;
//! BLAKE3 is available as an alternative. The byte selection and the odd bit
//! are applied by [`IdHasher`], never by the strategy.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::sync::Arc;

/// Domain-separation prefix digested ahead of every label.
pub const ID_HASH_PREFIX: &str = "mcm-luacat ID: ";

/// A 64-bit resource identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this value is in the hash-derived (odd) range.
    pub const fn is_derived(self) -> bool {
        self.0 & 1 == 1
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// An id paired with the label it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentedId {
    pub id: Id,
    pub comment: String,
}

impl CommentedId {
    pub fn new(id: Id, comment: impl Into<String>) -> Self {
        Self {
            id,
            comment: comment.into(),
        }
    }
}

impl fmt::Display for CommentedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment.is_empty() {
            write!(f, "id={}", self.id)
        } else {
            write!(f, "{} (id={})", self.comment, self.id)
        }
    }
}

/// A digest function usable for id derivation.
pub trait LabelDigest: Send + Sync + fmt::Debug {
    /// Short algorithm name, for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Digest `prefix` followed by `label` and return the first eight bytes.
    fn leading_bytes(&self, prefix: &[u8], label: &[u8]) -> [u8; 8];
}

/// SHA-1 digest strategy (the compatible default).
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha1Digest;

impl LabelDigest for Sha1Digest {
    fn name(&self) -> &'static str {
        "sha1"
    }

    fn leading_bytes(&self, prefix: &[u8], label: &[u8]) -> [u8; 8] {
        let mut hasher = Sha1::new();
        hasher.update(prefix);
        hasher.update(label);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        bytes
    }
}

/// BLAKE3 digest strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Digest;

impl LabelDigest for Blake3Digest {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn leading_bytes(&self, prefix: &[u8], label: &[u8]) -> [u8; 8] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(prefix);
        hasher.update(label);
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.as_bytes()[..8]);
        bytes
    }
}

/// Selectable digest algorithms, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Blake3,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Blake3 => "blake3",
        }
    }

    /// Build an [`IdHasher`] using this algorithm.
    pub fn hasher(self) -> IdHasher {
        match self {
            Self::Sha1 => IdHasher::new(Sha1Digest),
            Self::Blake3 => IdHasher::new(Blake3Digest),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives ids from labels with a fixed digest strategy.
#[derive(Debug, Clone)]
pub struct IdHasher {
    digest: Arc<dyn LabelDigest>,
}

impl IdHasher {
    pub fn new(digest: impl LabelDigest + 'static) -> Self {
        Self {
            digest: Arc::new(digest),
        }
    }

    /// Name of the digest strategy in use.
    pub fn algorithm(&self) -> &'static str {
        self.digest.name()
    }

    /// Derive the id for `label`.
    pub fn derive(&self, label: &str) -> Id {
        derive_with(self.digest.as_ref(), label)
    }

    /// Derive the id for `label` and keep the label as its comment.
    pub fn hash(&self, label: &str) -> CommentedId {
        CommentedId::new(self.derive(label), label)
    }
}

impl Default for IdHasher {
    fn default() -> Self {
        Self::new(Sha1Digest)
    }
}

/// Derive the id for `label` with the default (SHA-1) strategy.
pub fn derive_id(label: &str) -> Id {
    derive_with(&Sha1Digest, label)
}

fn derive_with(digest: &dyn LabelDigest, label: &str) -> Id {
    let bytes = digest.leading_bytes(ID_HASH_PREFIX.as_bytes(), label.as_bytes());
    let id = Id(u64::from_le_bytes(bytes) | 1);
    log::trace!("derived {} id {:#x} for {:?}", digest.name(), id.0, label);
    id
}
