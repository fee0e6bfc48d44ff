//! The `Memory` facade: one arena pool per category.
//!
//! `Memory` is an explicit context object, not a process-wide global.
//! Construct one at startup (or one per test) and pass it to allocation
//! call sites. Dropping it releases every arena in every category, which
//! is the whole teardown story — there is no per-object free.

use std::panic::Location;

use loam_core::{Category, MemorySetup, CATEGORY_COUNT};
use tracing::{error, trace};

use crate::block::Block;
use crate::error::SetupError;
use crate::pool::{ArenaPool, PoolStats, Timeline};

/// Category-partitioned arena memory.
///
/// All operations are single-threaded and non-blocking; cross-thread use
/// requires external synchronisation, which the `&mut` receivers enforce
/// at compile time.
pub struct Memory {
    alignment: usize,
    pools: [ArenaPool; CATEGORY_COUNT],
    verbose: [bool; CATEGORY_COUNT],
}

impl Memory {
    /// Build a memory context from a validated setup.
    ///
    /// The first arena of every category is allocated eagerly at the
    /// configured capacity. Returns a [`SetupError`] (after logging it)
    /// when the alignment is not a nonzero power of two or any category
    /// capacity is below 1 byte; callers should treat that as fatal.
    pub fn new(setup: &MemorySetup) -> Result<Self, SetupError> {
        if setup.alignment == 0 || !setup.alignment.is_power_of_two() {
            let err = SetupError::InvalidAlignment {
                alignment: setup.alignment,
            };
            error!(%err, "memory setup rejected");
            return Err(err);
        }
        for category in Category::ALL {
            if setup.category(category).capacity < 1 {
                let err = SetupError::InvalidCapacity { category };
                error!(%err, "memory setup rejected");
                return Err(err);
            }
        }

        Ok(Self {
            alignment: setup.alignment,
            pools: Category::ALL
                .map(|c| ArenaPool::new(c, setup.category(c).capacity, setup.alignment)),
            verbose: Category::ALL.map(|c| setup.category(c).verbose),
        })
    }

    /// Allocate `size` bytes from `category`.
    ///
    /// The returned block is zero-initialised and lives until the
    /// category is reset or the `Memory` is dropped. Returns `None` (and
    /// logs) on zero size, a size no single arena can hold, or pool
    /// exhaustion.
    #[track_caller]
    pub fn alloc(&mut self, size: usize, category: Category) -> Option<Block> {
        if self.verbose[category.index()] {
            trace!(category = %category, size, caller = %Location::caller(), "alloc");
        }
        self.pools[category.index()].alloc(size)
    }

    /// Allocate `count * size` zeroed bytes from `category`.
    ///
    /// Every allocation is zero-initialised, so this differs from
    /// [`Memory::alloc`] only in the overflow-checked size computation.
    #[track_caller]
    pub fn calloc(&mut self, count: usize, size: usize, category: Category) -> Option<Block> {
        let Some(total) = count.checked_mul(size) else {
            error!(category = %category, count, size, "calloc size overflows");
            return None;
        };
        if self.verbose[category.index()] {
            trace!(category = %category, count, size, caller = %Location::caller(), "calloc");
        }
        self.pools[category.index()].alloc(total)
    }

    /// Allocate a fresh block of `new_size` bytes in `old`'s category and
    /// copy `min(old.len(), new_size)` bytes forward.
    ///
    /// Nothing ever grows or shrinks in place: the old block is abandoned
    /// and its bytes stay resident in the arena until the category is
    /// reset. On failure the old block remains valid.
    #[track_caller]
    pub fn realloc(&mut self, old: Block, new_size: usize) -> Option<Block> {
        let category = old.category();
        if self.verbose[category.index()] {
            trace!(
                category = %category,
                old_len = old.len(),
                new_size,
                caller = %Location::caller(),
                "realloc"
            );
        }
        let copy_len = (old.len() as usize).min(new_size);
        let saved = self.bytes(old)[..copy_len].to_vec();
        let new = self.pools[category.index()].alloc(new_size)?;
        self.pools[category.index()].slice_mut(new)[..copy_len].copy_from_slice(&saved);
        Some(new)
    }

    /// Shared bytes of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is stale (its category was reset after the
    /// allocation).
    pub fn bytes(&self, block: Block) -> &[u8] {
        self.pools[block.category().index()].slice(block)
    }

    /// Mutable bytes of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is stale (its category was reset after the
    /// allocation).
    pub fn bytes_mut(&mut self, block: Block) -> &mut [u8] {
        self.pools[block.category().index()].slice_mut(block)
    }

    /// Per-tick housekeeping. Call once per application tick.
    ///
    /// Snapshots every category's stats, shifts one sample into each
    /// timeline, and hard-resets the Transient category: its arenas are
    /// dropped and the next Transient allocation starts from a fresh one.
    pub fn post(&mut self) {
        for pool in &mut self.pools {
            pool.post();
        }
        self.pools[Category::Transient.index()].hard_reset();
    }

    /// Soft-reset `category`: zero every arena's counters without
    /// releasing memory. Outstanding blocks in the category become stale.
    pub fn reset(&mut self, category: Category) {
        self.pools[category.index()].reset();
    }

    /// Live statistics for `category`.
    pub fn current_stats(&self, category: Category) -> PoolStats {
        self.pools[category.index()].current_stats()
    }

    /// Statistics for `category` as of the most recent [`Memory::post`].
    pub fn last_stats(&self, category: Category) -> PoolStats {
        self.pools[category.index()].last_stats()
    }

    /// Allocation-count timeline for `category`.
    pub fn timeline(&self, category: Category) -> &Timeline {
        self.pools[category.index()].timeline()
    }

    /// Global allocation alignment in bytes.
    pub fn alignment(&self) -> usize {
        self.alignment
    }
}
