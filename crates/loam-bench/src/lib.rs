//! Shared fixtures for the Loam benchmarks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use loam_arena::Memory;
use loam_core::MemorySetup;

/// A memory context with `capacity` bytes per arena in every category.
pub fn bench_memory(capacity: usize) -> Memory {
    Memory::new(&MemorySetup::uniform(capacity)).expect("bench setup is valid")
}
