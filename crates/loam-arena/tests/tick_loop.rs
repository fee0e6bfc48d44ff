//! Multi-tick lifecycle: Transient hard reset, timeline history, and
//! Permanent growth behave like one application run.

use loam_arena::{Memory, TIMELINE_LEN};
use loam_core::{Category, MemorySetup};

#[test]
fn transient_footprint_stays_bounded_across_ticks() {
    let mut mem = Memory::new(&MemorySetup::uniform(1024)).unwrap();

    for _ in 0..50 {
        // Each tick fills more than one arena of transient scratch.
        for _ in 0..5 {
            let _ = mem.alloc(512, Category::Transient).unwrap();
        }
        assert!(mem.current_stats(Category::Transient).arena_count >= 2);
        mem.post();
        assert_eq!(mem.current_stats(Category::Transient).arena_count, 0);
    }

    // Self-heals after the last hard reset.
    let _ = mem.alloc(16, Category::Transient).unwrap();
    assert_eq!(mem.current_stats(Category::Transient).arena_count, 1);
}

#[test]
fn permanent_allocations_accumulate_across_ticks() {
    let mut mem = Memory::new(&MemorySetup::uniform(1024)).unwrap();

    for tick in 1usize..=10 {
        let _ = mem.alloc(256, Category::Permanent).unwrap();
        mem.post();
        assert_eq!(
            mem.last_stats(Category::Permanent).total_allocation_count,
            tick
        );
    }
    let stats = mem.current_stats(Category::Permanent);
    assert_eq!(stats.total_used, 10 * 256);
    assert_eq!(stats.arena_count, 3); // 4 allocations of 256 per 1024-byte arena
}

#[test]
fn timeline_records_per_tick_history_oldest_first() {
    let mut mem = Memory::new(&MemorySetup::uniform(1024)).unwrap();

    for tick in 0..5u64 {
        for _ in 0..tick {
            let _ = mem.alloc(16, Category::Debug).unwrap();
        }
        mem.post();
    }

    let samples = mem.timeline(Category::Debug).samples();
    // Debug is never hard-reset, so counts accumulate: 0,1,3,6,10.
    let tail = &samples[TIMELINE_LEN - 5..];
    assert_eq!(tail, &[0, 1, 3, 6, 10][..]);
    assert!(samples[..TIMELINE_LEN - 5].iter().all(|&s| s == 0));
}
