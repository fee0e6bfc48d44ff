//! Default hashing stack for arena-backed maps.
//!
//! [`MixHasher`] folds input bytes with the golden-ratio constant and
//! finishes with a 64-bit avalanche (the murmur3 finaliser), so short
//! integer keys still spread across the whole table. Maps are generic
//! over [`std::hash::BuildHasher`]; this is only the default.

use std::hash::{BuildHasher, Hasher};

/// Golden-ratio fold constant.
const GOLDEN: u64 = 0x9e37_79b9;

/// Finalising avalanche over the folded state.
fn avalanche(mut key: u64) -> u64 {
    key ^= key >> 33;
    key = key.wrapping_mul(0xff51_afd7_ed55_8ccd);
    key ^= key >> 33;
    key = key.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    key ^= key >> 33;
    key
}

/// Byte-fold hasher with an avalanche finish.
///
/// Deterministic and unkeyed: the same input hashes to the same value in
/// every process. Cached slot hashes therefore stay comparable across
/// rehashes and across map instances.
#[derive(Clone, Debug)]
pub struct MixHasher {
    state: u64,
}

impl Default for MixHasher {
    fn default() -> Self {
        Self { state: GOLDEN }
    }
}

impl Hasher for MixHasher {
    fn finish(&self) -> u64 {
        avalanche(self.state)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= u64::from(b);
            self.state = self.state.wrapping_mul(GOLDEN);
        }
    }
}

/// [`BuildHasher`] producing [`MixHasher`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildMixHasher;

impl BuildHasher for BuildMixHasher {
    type Hasher = MixHasher;

    fn build_hasher(&self) -> MixHasher {
        MixHasher::default()
    }
}
