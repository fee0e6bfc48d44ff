//! Category-partitioned bump-arena allocation for the Loam memory core.
//!
//! Every other Loam subsystem allocates through this crate. Allocation is
//! bump-only: there is no per-object free, no fragmentation within a
//! block, and reclamation happens only in bulk (category reset or
//! teardown).
//!
//! # Architecture
//!
//! ```text
//! Memory (explicit context object, one per process or per test)
//! ├── ArenaPool × 4 (Permanent / Transient / Debug / Math)
//! │   ├── Arena[] (fixed-capacity Vec<u8> bump blocks, up to ARENA_MAX)
//! │   ├── PoolStats snapshot (refreshed by post())
//! │   └── Timeline (180-sample allocation-count ring)
//! └── per-category verbose flags + global alignment
//! ```
//!
//! Allocations return a [`Block`] handle; bytes are resolved through
//! [`Memory::bytes`] / [`Memory::bytes_mut`]. Handles are epoch-scoped:
//! resetting a pool invalidates every handle allocated from it, and
//! resolving a stale handle panics rather than aliasing reused memory.
//!
//! All allocations are zero-initialised.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod block;
pub mod error;
pub mod memory;
pub mod pool;

pub use block::Block;
pub use error::SetupError;
pub use memory::Memory;
pub use pool::{ArenaPool, PoolStats, Timeline, ARENA_MAX, TIMELINE_LEN};
