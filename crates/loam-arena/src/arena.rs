//! Fixed-capacity bump-allocated memory blocks.
//!
//! An [`Arena`] is one contiguous `Vec<u8>` with a cursor that only moves
//! forward. Arenas are never freed during runtime — only reset by their
//! owning pool or dropped at teardown.

/// A single contiguous memory block with bump allocation.
///
/// The arena performs no alignment logic of its own; the owning pool
/// rounds sizes up to the global alignment before calling [`Arena::alloc`],
/// which keeps every offset it hands out aligned.
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<u8>,
    /// Bump offset: next free byte.
    used: usize,
    /// High-water mark of `used` since the last reset.
    max_used: usize,
    /// Allocations served since the last reset.
    allocation_count: usize,
}

impl Arena {
    /// Create a new arena with the given capacity in bytes, zero-filled.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            used: 0,
            max_used: 0,
            allocation_count: 0,
        }
    }

    /// Bump-allocate `size` bytes, returning the offset of the granted
    /// region.
    ///
    /// Fails without mutating any state when `used + size` would exceed
    /// the capacity, or when the granted offset would not fit in `u32`
    /// (arenas larger than 4 GiB stop serving past that boundary rather
    /// than hand out an aliasing offset). The granted region is
    /// zero-filled (it may hold stale bytes from before a reset).
    pub fn alloc(&mut self, size: usize) -> Option<u32> {
        let new_used = self.used.checked_add(size)?;
        if new_used > self.data.len() {
            return None;
        }
        let offset = u32::try_from(self.used).ok()?;
        let offset_usize = self.used;
        self.data[offset_usize..new_used].fill(0);
        self.used = new_used;
        self.max_used = self.max_used.max(self.used);
        self.allocation_count += 1;
        Some(offset)
    }

    /// Shared bytes at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the arena's capacity.
    pub fn slice(&self, offset: u32, len: u32) -> &[u8] {
        let start = offset as usize;
        &self.data[start..start + len as usize]
    }

    /// Mutable bytes at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the arena's capacity.
    pub fn slice_mut(&mut self, offset: u32, len: u32) -> &mut [u8] {
        let start = offset as usize;
        &mut self.data[start..start + len as usize]
    }

    /// Reset the bump offset and allocation count without deallocating.
    ///
    /// All previous allocations become invalid. The backing memory is not
    /// zeroed here; `alloc` zero-fills on reuse.
    pub fn reset(&mut self) {
        self.used = 0;
        self.allocation_count = 0;
    }

    /// Bytes currently allocated.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Remaining free bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.used
    }

    /// High-water mark of `used` since the last reset.
    pub fn max_used(&self) -> usize {
        self.max_used
    }

    /// Allocations served since the last reset.
    pub fn allocation_count(&self) -> usize {
        self.allocation_count
    }

    /// Memory footprint of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len()
    }
}
