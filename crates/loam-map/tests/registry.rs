//! Cross-crate scenarios: a name-keyed asset registry on top of
//! `ArenaMap`, and the arena-residency behaviour of repeated growth.

use std::hash::BuildHasher;

use bytemuck::{Pod, Zeroable};
use loam_arena::Memory;
use loam_core::{BuildMixHasher, Category, MemorySetup};
use loam_map::ArenaMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
struct AssetId(u64);

impl AssetId {
    /// Interned id for an asset name.
    fn from_name(name: &str) -> Self {
        Self(BuildMixHasher.hash_one(name.as_bytes()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct AssetSlot {
    offset: u32,
    len: u32,
}

#[test]
fn name_keyed_asset_registry() {
    let mut mem = Memory::new(&MemorySetup::uniform(1 << 16)).unwrap();
    let mut registry: ArenaMap<AssetId, AssetSlot> =
        ArenaMap::new(&mut mem, Category::Permanent, 16).unwrap();

    let names = ["door.png", "floor.png", "torch.ogg", "dungeon.map"];
    for (i, name) in names.iter().enumerate() {
        let slot = AssetSlot {
            offset: (i * 4096) as u32,
            len: 4096,
        };
        assert!(registry.insert(&mut mem, AssetId::from_name(name), slot));
    }

    assert_eq!(registry.len(), names.len());
    let torch = registry.get(&mem, &AssetId::from_name("torch.ogg")).unwrap();
    assert_eq!(torch.offset, 2 * 4096);
    assert!(!registry.has(&mem, &AssetId::from_name("missing.png")));
}

/// The concrete lifecycle from the diagnostics contract: three inserts,
/// one removal, then a tombstone-reusing insert.
#[test]
fn remove_then_insert_reuses_the_tombstone_budget() {
    let mut mem = Memory::new(&MemorySetup::uniform(1 << 16)).unwrap();
    let mut m: ArenaMap<u64, u64> = ArenaMap::new(&mut mem, Category::Permanent, 8).unwrap();

    m.insert(&mut mem, 10, 100);
    m.insert(&mut mem, 20, 200);
    m.insert(&mut mem, 30, 300);
    assert!(m.remove(&mut mem, &20));

    assert_eq!(m.len(), 2);
    assert_eq!(m.tombstone_count(), 1);
    assert!(!m.has(&mem, &20));
    assert_eq!(m.get(&mem, &10), Some(100));
    assert_eq!(m.get(&mem, &30), Some(300));

    m.insert(&mut mem, 40, 400);
    assert_eq!(m.len(), 3);
    assert!(m.tombstone_count() <= 1);
    assert_eq!(m.get(&mem, &40), Some(400));
}

/// Rehashing abandons old slot planes inside the backing category: a map
/// that grew through capacities 16 and 32 to 64 keeps all three
/// generations of planes resident until the category is reset.
#[test]
fn growth_keeps_historical_planes_resident() {
    let mut mem = Memory::new(&MemorySetup::uniform(1 << 16)).unwrap();
    let mut m: ArenaMap<u64, u64> = ArenaMap::new(&mut mem, Category::Debug, 16).unwrap();

    // 25 inserts: growth fires at the 13th (16 -> 32) and 25th (32 -> 64).
    for key in 0u64..25 {
        m.insert(&mut mem, key, key);
    }
    assert_eq!(m.capacity(), 64);

    // Plane bytes per capacity C: C states + 8C hashes + 8C keys +
    // 8C values = 25C (every plane is a multiple of the 16-byte
    // alignment here).
    let live = 25 * 64;
    let historical = 25 * 16 + 25 * 32;
    let stats = mem.current_stats(Category::Debug);
    assert_eq!(stats.total_used, live + historical);

    // A category reset reclaims everything at once.
    mem.reset(Category::Debug);
    assert_eq!(mem.current_stats(Category::Debug).total_used, 0);
}
