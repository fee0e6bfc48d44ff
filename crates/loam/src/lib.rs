//! Loam: category-partitioned arena memory with arena-backed hash maps.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Loam sub-crates. For most users, adding `loam` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use loam::prelude::*;
//!
//! // One memory context for the whole application (or one per test).
//! let mut mem = Memory::new(&MemorySetup::uniform(64 * 1024)).unwrap();
//!
//! // Plain byte allocation: bump-only, zeroed, no per-object free.
//! let block = mem.alloc(256, Category::Permanent).unwrap();
//! mem.bytes_mut(block)[0] = 7;
//!
//! // An entity lookup table living in the Permanent category.
//! let mut entities: ArenaMap<u64, u64> =
//!     ArenaMap::new(&mut mem, Category::Permanent, 16).unwrap();
//! entities.insert(&mut mem, 42, 1337);
//! assert_eq!(entities.get(&mem, &42), Some(1337));
//!
//! // Once per tick: timelines advance, Transient is hard-reset.
//! mem.post();
//! assert_eq!(mem.current_stats(Category::Transient).arena_count, 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `loam-arena` | `Memory`, `ArenaPool`, `Block`, stats, timeline |
//! | [`types`] | `loam-core` | `Category`, setup types, default hasher |
//! | [`map`] | `loam-map` | `ArenaMap` and its iterator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use loam_arena as arena;
pub use loam_core as types;
pub use loam_map as map;

/// The primary API surface in one import.
pub mod prelude {
    pub use loam_arena::{Block, Memory, PoolStats, SetupError, Timeline};
    pub use loam_core::{BuildMixHasher, Category, CategorySetup, MemorySetup};
    pub use loam_map::ArenaMap;
}
