//! Core types for the Loam memory core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the rest of the Loam
//! workspace: memory categories, allocator setup, and the default
//! hashing stack used by the arena-backed hash map.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod category;
pub mod hash;
pub mod setup;

pub use category::{Category, CATEGORY_COUNT};
pub use hash::{BuildMixHasher, MixHasher};
pub use setup::{CategorySetup, MemorySetup};
