//! Allocation handles.
//!
//! A [`Block`] encodes the physical location of an allocation within a
//! category's arena pool. It is epoch-scoped: the `epoch` field allows
//! O(1) staleness checks after a pool reset, without a lookup table.

use std::fmt;

use loam_core::Category;

/// Handle to one allocation inside a category's arena pool.
///
/// Blocks are plain values: `Copy`, cheap to store, and resolved to bytes
/// through `Memory::bytes` / `Memory::bytes_mut`. A block is valid until
/// its category is soft- or hard-reset; resolving it after that panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Block {
    /// Category this block was allocated from.
    pub(crate) category: Category,
    /// Pool epoch when this allocation was made.
    pub(crate) epoch: u32,
    /// Index of the owning arena within the pool.
    pub(crate) arena: u16,
    /// Byte offset within the owning arena.
    pub(crate) offset: u32,
    /// Requested length in bytes (before alignment round-up).
    pub(crate) len: u32,
}

impl Block {
    pub(crate) fn new(category: Category, epoch: u32, arena: u16, offset: u32, len: u32) -> Self {
        Self {
            category,
            epoch,
            arena,
            offset,
            len,
        }
    }

    /// Category this block was allocated from.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Pool epoch this block belongs to.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block({}, epoch={}, arena={}, off={}, len={})",
            self.category, self.epoch, self.arena, self.offset, self.len
        )
    }
}
