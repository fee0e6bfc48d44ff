//! Per-category arena pools.
//!
//! An [`ArenaPool`] owns an ordered list of fixed-capacity [`Arena`]s and
//! serves allocations first-fit across them, appending a new arena when
//! none has room. Pools never free individual allocations; reclamation is
//! a whole-pool soft reset (counters only) or hard reset (drop all
//! arenas).

use loam_core::Category;
use tracing::error;

use crate::arena::Arena;
use crate::block::Block;

/// Maximum number of arenas one pool may own.
pub const ARENA_MAX: usize = 128;

/// Number of samples in a pool's allocation-count timeline.
pub const TIMELINE_LEN: usize = 180;

/// Aggregated statistics over every arena in a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of arenas currently owned.
    pub arena_count: usize,
    /// Sum of per-arena allocation counts since the last reset.
    pub total_allocation_count: usize,
    /// Sum of per-arena capacities in bytes.
    pub total_capacity: usize,
    /// Sum of per-arena used bytes.
    pub total_used: usize,
    /// Largest per-arena high-water mark.
    pub max_used: usize,
}

/// Bounded ring of historical total-allocation-count samples.
///
/// One sample is shifted in per tick by the pool's `post` pass, dropping
/// the oldest. Feeds diagnostics overlays that graph allocator pressure
/// over the last [`TIMELINE_LEN`] ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    samples: [u64; TIMELINE_LEN],
}

impl Timeline {
    /// Shift `sample` in at the newest position, dropping the oldest.
    pub(crate) fn push(&mut self, sample: u64) {
        self.samples.copy_within(1.., 0);
        self.samples[TIMELINE_LEN - 1] = sample;
    }

    /// All samples, oldest first.
    pub fn samples(&self) -> &[u64; TIMELINE_LEN] {
        &self.samples
    }

    /// The most recent sample.
    pub fn latest(&self) -> u64 {
        self.samples[TIMELINE_LEN - 1]
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            samples: [0; TIMELINE_LEN],
        }
    }
}

/// Ordered pool of fixed-capacity arenas for one memory category.
///
/// Every arena has capacity `arena_capacity`; no single allocation may
/// span arenas, so a request larger than that always fails. Allocation
/// scans arenas in creation order and takes the first fit — O(arena
/// count), not globally optimal, and deliberately predictable.
pub struct ArenaPool {
    category: Category,
    arenas: Vec<Arena>,
    arena_capacity: usize,
    alignment: usize,
    /// Bumped on every reset; stale [`Block`]s are detected against this.
    epoch: u32,
    last_stats: PoolStats,
    timeline: Timeline,
}

impl ArenaPool {
    /// Create a pool with its first arena eagerly allocated.
    ///
    /// `arena_capacity` must be at least 1 and `alignment` a nonzero
    /// power of two; `Memory::new` validates both before pools are built.
    pub fn new(category: Category, arena_capacity: usize, alignment: usize) -> Self {
        debug_assert!(arena_capacity >= 1);
        debug_assert!(alignment.is_power_of_two());
        Self {
            category,
            arenas: vec![Arena::new(arena_capacity)],
            arena_capacity,
            alignment,
            epoch: 0,
            last_stats: PoolStats::default(),
            timeline: Timeline::default(),
        }
    }

    /// Allocate `size` bytes, rounded up to the pool's alignment.
    ///
    /// First-fit over existing arenas; appends a new arena when none has
    /// room and the pool is below [`ARENA_MAX`]. After a hard reset the
    /// pool is empty and this self-heals by creating a fresh arena.
    ///
    /// Fails (logging a diagnostic) on zero size, on a size that cannot
    /// fit in any single arena, and on pool exhaustion. Exhaustion is
    /// terminal by design: there is no retry or backoff path.
    pub fn alloc(&mut self, size: usize) -> Option<Block> {
        if size < 1 {
            error!(category = %self.category, "allocation size must be at least 1");
            return None;
        }
        if size > u32::MAX as usize {
            error!(category = %self.category, size, "allocation size does not fit a block handle");
            return None;
        }

        let aligned = (size + self.alignment - 1) & !(self.alignment - 1);
        if aligned > self.arena_capacity {
            error!(
                category = %self.category,
                requested = aligned,
                arena_capacity = self.arena_capacity,
                "allocation size exceeds arena capacity"
            );
            return None;
        }

        for (index, arena) in self.arenas.iter_mut().enumerate() {
            if let Some(offset) = arena.alloc(aligned) {
                return Some(Block::new(
                    self.category,
                    self.epoch,
                    index as u16,
                    offset,
                    size as u32,
                ));
            }
        }

        if self.arenas.len() >= ARENA_MAX {
            error!(
                category = %self.category,
                arena_count = self.arenas.len(),
                "arena pool is full"
            );
            return None;
        }

        let mut arena = Arena::new(self.arena_capacity);
        let offset = arena
            .alloc(aligned)
            .unwrap_or_else(|| unreachable!("aligned <= arena_capacity, fresh arena always fits"));
        self.arenas.push(arena);
        let index = (self.arenas.len() - 1) as u16;
        Some(Block::new(
            self.category,
            self.epoch,
            index,
            offset,
            size as u32,
        ))
    }

    /// Shared bytes of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` was allocated under an older epoch (the pool has
    /// been reset since) or does not point into this pool.
    pub fn slice(&self, block: Block) -> &[u8] {
        self.check_block(block);
        self.arenas[block.arena as usize].slice(block.offset, block.len)
    }

    /// Mutable bytes of `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` was allocated under an older epoch (the pool has
    /// been reset since) or does not point into this pool.
    pub fn slice_mut(&mut self, block: Block) -> &mut [u8] {
        self.check_block(block);
        self.arenas[block.arena as usize].slice_mut(block.offset, block.len)
    }

    fn check_block(&self, block: Block) {
        assert_eq!(
            block.category, self.category,
            "{block} resolved against the {} pool",
            self.category
        );
        assert_eq!(
            block.epoch, self.epoch,
            "stale {block} resolved in epoch {}",
            self.epoch
        );
    }

    /// Aggregate statistics over every owned arena.
    pub fn current_stats(&self) -> PoolStats {
        let mut stats = PoolStats::default();
        for arena in &self.arenas {
            stats.arena_count += 1;
            stats.total_allocation_count += arena.allocation_count();
            stats.total_capacity += arena.capacity();
            stats.total_used += arena.used();
            stats.max_used = stats.max_used.max(arena.max_used());
        }
        stats
    }

    /// Statistics snapshotted by the most recent `post` pass.
    pub fn last_stats(&self) -> PoolStats {
        self.last_stats
    }

    /// Historical allocation-count timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Soft reset: zero every arena's bump offset and allocation count
    /// without releasing memory. Invalidates all outstanding blocks.
    pub fn reset(&mut self) {
        for arena in &mut self.arenas {
            arena.reset();
        }
        self.epoch += 1;
    }

    /// Per-tick housekeeping: snapshot `last_stats` and shift one sample
    /// into the timeline.
    pub fn post(&mut self) {
        self.last_stats = self.current_stats();
        self.timeline.push(self.last_stats.total_allocation_count as u64);
    }

    /// Hard reset: drop every arena. The next allocation self-heals by
    /// creating a fresh arena. Invalidates all outstanding blocks.
    pub fn hard_reset(&mut self) {
        self.arenas.clear();
        self.epoch += 1;
    }

    /// Number of arenas currently owned.
    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Capacity in bytes of every arena in this pool.
    pub fn arena_capacity(&self) -> usize {
        self.arena_capacity
    }

    /// Total memory footprint of the pool in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.arenas.iter().map(Arena::memory_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> ArenaPool {
        ArenaPool::new(Category::Permanent, capacity, 16)
    }

    #[test]
    fn sizes_are_rounded_up_to_alignment() {
        let mut p = pool(1024);
        let a = p.alloc(1).unwrap();
        let b = p.alloc(1).unwrap();
        assert_eq!(a.offset, 0);
        assert_eq!(b.offset, 16);
        // The handle keeps the requested length, not the aligned one.
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn oversized_request_fails_regardless_of_arena_count() {
        let mut p = pool(64);
        assert!(p.alloc(65).is_none());
        p.alloc(64).unwrap();
        p.alloc(64).unwrap(); // second arena
        assert_eq!(p.arena_count(), 2);
        assert!(p.alloc(65).is_none());
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut p = pool(64);
        assert!(p.alloc(0).is_none());
    }

    #[test]
    fn exhaustion_appends_exactly_one_arena() {
        let mut p = pool(64);
        p.alloc(64).unwrap();
        assert_eq!(p.arena_count(), 1);
        let block = p.alloc(16).unwrap();
        assert_eq!(p.arena_count(), 2);
        assert_eq!(block.arena, 1);
        assert_eq!(block.offset, 0);
    }

    #[test]
    fn first_fit_reuses_earlier_arenas() {
        let mut p = pool(64);
        p.alloc(48).unwrap(); // arena 0: 48/64 used
        p.alloc(32).unwrap(); // does not fit arena 0 -> arena 1
        let block = p.alloc(16).unwrap(); // fits back into arena 0
        assert_eq!(block.arena, 0);
        assert_eq!(block.offset, 48);
    }

    #[test]
    fn pool_fails_at_arena_max() {
        let mut p = pool(64);
        for _ in 0..ARENA_MAX {
            p.alloc(64).unwrap();
        }
        assert_eq!(p.arena_count(), ARENA_MAX);
        assert!(p.alloc(16).is_none());
    }

    #[test]
    fn stats_aggregate_across_arenas() {
        let mut p = pool(64);
        p.alloc(64).unwrap();
        p.alloc(16).unwrap();
        let stats = p.current_stats();
        assert_eq!(stats.arena_count, 2);
        assert_eq!(stats.total_allocation_count, 2);
        assert_eq!(stats.total_capacity, 128);
        assert_eq!(stats.total_used, 80);
        assert_eq!(stats.max_used, 64);
    }

    #[test]
    fn post_snapshots_stats_and_shifts_timeline() {
        let mut p = pool(1024);
        p.alloc(16).unwrap();
        p.alloc(16).unwrap();
        assert_eq!(p.last_stats(), PoolStats::default());
        p.post();
        assert_eq!(p.last_stats().total_allocation_count, 2);
        assert_eq!(p.timeline().latest(), 2);
        p.alloc(16).unwrap();
        p.post();
        let samples = p.timeline().samples();
        assert_eq!(samples[TIMELINE_LEN - 1], 3);
        assert_eq!(samples[TIMELINE_LEN - 2], 2);
    }

    #[test]
    fn hard_reset_empties_then_self_heals() {
        let mut p = pool(64);
        p.alloc(64).unwrap();
        p.alloc(64).unwrap();
        p.hard_reset();
        assert_eq!(p.arena_count(), 0);
        let block = p.alloc(16).unwrap();
        assert_eq!(p.arena_count(), 1);
        assert_eq!(block.arena, 0);
    }

    #[test]
    fn soft_reset_keeps_arenas_but_zeroes_counters() {
        let mut p = pool(64);
        p.alloc(64).unwrap();
        p.alloc(16).unwrap();
        p.reset();
        assert_eq!(p.arena_count(), 2);
        let stats = p.current_stats();
        assert_eq!(stats.total_used, 0);
        assert_eq!(stats.total_allocation_count, 0);
        assert_eq!(stats.total_capacity, 128);
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn stale_block_panics_after_reset() {
        let mut p = pool(64);
        let block = p.alloc(16).unwrap();
        p.reset();
        let _ = p.slice(block);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Total used bytes always equals the sum of aligned request
            /// sizes for every successful allocation.
            #[test]
            fn used_matches_aligned_request_sum(sizes in proptest::collection::vec(1usize..200, 1..64)) {
                let mut p = pool(256);
                let mut expected = 0usize;
                for size in sizes {
                    if p.alloc(size).is_some() {
                        expected += (size + 15) & !15;
                    }
                }
                prop_assert_eq!(p.current_stats().total_used, expected);
            }

            /// The pool never exceeds ARENA_MAX arenas and every arena has
            /// the configured capacity.
            #[test]
            fn arena_count_is_bounded(sizes in proptest::collection::vec(1usize..64, 1..300)) {
                let mut p = pool(64);
                for size in sizes {
                    let _ = p.alloc(size);
                }
                prop_assert!(p.arena_count() <= ARENA_MAX);
                prop_assert_eq!(p.current_stats().total_capacity, p.arena_count() * 64);
            }
        }
    }
}
