use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural fingerprint of a gene tree.
///
/// Zero is reserved: asking the pool for `SpeciesId::ANY` means "any
/// species", and no real fingerprint ever hashes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(u32);

impl SpeciesId {
    pub const ANY: SpeciesId = SpeciesId(0);

    pub(crate) fn from_hash(hash: u32) -> Self {
        if hash == 0 {
            Self(1)
        } else {
            Self(hash)
        }
    }

    pub fn is_any(self) -> bool {
        self == Self::ANY
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for SpeciesId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
