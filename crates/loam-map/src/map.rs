//! Generic open-addressing map over arena-backed slot planes.
//!
//! Linear probing with step 1, power-of-two capacity, cached hashes, and
//! tombstone deletion. The slot data lives in four parallel planes
//! (state, hash, key, value) so each plane is a plain `Pod` array inside
//! an arena block of the map's backing category.

use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;
use loam_arena::{Block, Memory};
use loam_core::{BuildMixHasher, Category};
use tracing::error;

/// Smallest slot capacity a map is created with.
pub const MIN_CAPACITY: usize = 16;

/// Slot state: never written.
const SLOT_EMPTY: u8 = 0;
/// Slot state: holds a live entry.
const SLOT_OCCUPIED: u8 = 1;
/// Slot state: entry deleted; keeps probe sequences intact.
const SLOT_TOMBSTONE: u8 = 2;

/// Read element `index` from a `Pod` plane.
///
/// Arena offsets are only guaranteed to match the configured allocation
/// alignment, so reads are unaligned by construction.
fn read_at<T: Pod>(plane: &[u8], index: usize) -> T {
    let size = size_of::<T>();
    bytemuck::pod_read_unaligned(&plane[index * size..(index + 1) * size])
}

/// Write element `index` of a `Pod` plane.
fn write_at<T: Pod>(plane: &mut [u8], index: usize, value: &T) {
    let size = size_of::<T>();
    plane[index * size..(index + 1) * size].copy_from_slice(bytemuck::bytes_of(value));
}

/// Outcome of a probe walk on behalf of an insertion.
enum Probe {
    /// The key is present at this slot.
    Found(usize),
    /// The key is absent; insert at `target`.
    Vacant {
        target: usize,
        reused_tombstone: bool,
    },
    /// Every slot is occupied; no tombstone to reuse.
    Full,
}

/// Open-addressing hash map whose slots live in a memory category.
///
/// Keys and values must be [`Pod`]: the map stores them byte-for-byte in
/// arena blocks, which is what ties the map's lifetime to its backing
/// category. `get` and iteration hand back copies (`Pod` implies `Copy`);
/// in-place mutation goes through [`ArenaMap::modify`] or
/// [`ArenaMap::for_each_mut`].
///
/// # Growth and arena residency
///
/// The table doubles when `(count + tombstone_count) * 4 >= capacity * 3`,
/// checked strictly before each insertion. Rehashing allocates fresh
/// planes and abandons the old ones — bump arenas have no free, so a map
/// that grows repeatedly keeps the bytes of *every* historical capacity
/// resident in its category until the category is reset. This is
/// intentional: surrounding code bounds it with periodic resets (the
/// Transient category is hard-reset every tick). Budget accordingly when
/// parking a long-lived map in the Permanent category.
///
/// # Staleness
///
/// Resetting the backing category invalidates the map. Any later
/// operation panics on the stale blocks (see `Memory::bytes`).
pub struct ArenaMap<K, V, S = BuildMixHasher> {
    category: Category,
    capacity: usize,
    count: usize,
    tombstone_count: usize,
    states: Block,
    hashes: Block,
    keys: Block,
    values: Block,
    build_hasher: S,
    _marker: PhantomData<(K, V)>,
}

impl<K: Pod + Hash + Eq, V: Pod> ArenaMap<K, V> {
    /// Create a map with the default hasher.
    ///
    /// Capacity is `initial_capacity` rounded up to a power of two, at
    /// least [`MIN_CAPACITY`]. All slot planes are allocated zeroed from
    /// `category`. Returns `None` (after logging) when the category
    /// cannot serve the planes, or when `K` or `V` is zero-sized.
    pub fn new(mem: &mut Memory, category: Category, initial_capacity: usize) -> Option<Self> {
        Self::with_hasher(mem, category, initial_capacity, BuildMixHasher)
    }
}

impl<K: Pod + Hash + Eq, V: Pod, S: BuildHasher> ArenaMap<K, V, S> {
    /// Create a map with an explicit [`BuildHasher`].
    pub fn with_hasher(
        mem: &mut Memory,
        category: Category,
        initial_capacity: usize,
        build_hasher: S,
    ) -> Option<Self> {
        if size_of::<K>() == 0 || size_of::<V>() == 0 {
            error!("zero-sized keys or values are not supported");
            return None;
        }
        let capacity = initial_capacity.max(MIN_CAPACITY).next_power_of_two();
        let (states, hashes, keys, values) = Self::alloc_planes(mem, category, capacity)?;
        Some(Self {
            category,
            capacity,
            count: 0,
            tombstone_count: 0,
            states,
            hashes,
            keys,
            values,
            build_hasher,
            _marker: PhantomData,
        })
    }

    /// Allocate zeroed slot planes for `capacity` slots.
    fn alloc_planes(
        mem: &mut Memory,
        category: Category,
        capacity: usize,
    ) -> Option<(Block, Block, Block, Block)> {
        let states = mem.calloc(capacity, 1, category)?;
        let hashes = mem.calloc(capacity, size_of::<u64>(), category)?;
        let keys = mem.calloc(capacity, size_of::<K>(), category)?;
        let values = mem.calloc(capacity, size_of::<V>(), category)?;
        Some((states, hashes, keys, values))
    }

    fn hash_key(&self, key: &K) -> u64 {
        self.build_hasher.hash_one(key)
    }

    /// Insert or update `key`.
    ///
    /// Updating an existing key replaces its value without changing
    /// `len`. Inserting prefers the first tombstone passed on the probe
    /// path over the terminating empty slot.
    ///
    /// Returns `false` only when the table needs a slot it cannot get:
    /// the backing category could not serve a grown table and every slot
    /// is occupied. That situation is terminal by design — callers do not
    /// retry.
    pub fn insert(&mut self, mem: &mut Memory, key: K, value: V) -> bool {
        // Growth fires strictly before the triggering insertion, even
        // when that insertion turns out to be an update.
        if (self.count + self.tombstone_count) * 4 >= self.capacity * 3 {
            // On failure the old planes stay valid; insertion continues
            // against them until the table is truly full.
            let _ = self.grow(mem);
        }

        let hash = self.hash_key(&key);
        match self.probe_for_insert(mem, hash, &key) {
            Probe::Found(index) => {
                write_at(mem.bytes_mut(self.values), index, &value);
                true
            }
            Probe::Vacant {
                target,
                reused_tombstone,
            } => {
                if reused_tombstone {
                    self.tombstone_count -= 1;
                }
                mem.bytes_mut(self.states)[target] = SLOT_OCCUPIED;
                write_at(mem.bytes_mut(self.hashes), target, &hash);
                write_at(mem.bytes_mut(self.keys), target, &key);
                write_at(mem.bytes_mut(self.values), target, &value);
                self.count += 1;
                true
            }
            Probe::Full => {
                error!(
                    category = %self.category,
                    capacity = self.capacity,
                    "map is full and its backing category cannot grow it"
                );
                false
            }
        }
    }

    /// Look up `key`, returning a copy of its value.
    pub fn get(&self, mem: &Memory, key: &K) -> Option<V> {
        let index = self.find(mem, key)?;
        Some(read_at(mem.bytes(self.values), index))
    }

    /// Whether `key` is present.
    pub fn has(&self, mem: &Memory, key: &K) -> bool {
        self.find(mem, key).is_some()
    }

    /// Remove `key`, leaving a tombstone so later probe walks still pass
    /// through the slot. Returns whether the key was present.
    pub fn remove(&mut self, mem: &mut Memory, key: &K) -> bool {
        let Some(index) = self.find(mem, key) else {
            return false;
        };
        mem.bytes_mut(self.states)[index] = SLOT_TOMBSTONE;
        self.count -= 1;
        self.tombstone_count += 1;
        true
    }

    /// Mutate the value of `key` in place. Returns whether the key was
    /// present.
    pub fn modify<F: FnOnce(&mut V)>(&self, mem: &mut Memory, key: &K, f: F) -> bool {
        let Some(index) = self.find(mem, key) else {
            return false;
        };
        let mut value: V = read_at(mem.bytes(self.values), index);
        f(&mut value);
        write_at(mem.bytes_mut(self.values), index, &value);
        true
    }

    /// Logically empty the map: every slot becomes empty (tombstones
    /// included) and the counters reset. Capacity is retained.
    pub fn clear(&mut self, mem: &mut Memory) {
        mem.bytes_mut(self.states).fill(SLOT_EMPTY);
        self.count = 0;
        self.tombstone_count = 0;
    }

    /// `(count + tombstone_count) / capacity`, or 0 for capacity 0.
    pub fn load_factor(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.count + self.tombstone_count) as f32 / self.capacity as f32
    }

    /// Iterate live entries in bucket order (not insertion order),
    /// yielding copies. Visits exactly [`ArenaMap::len`] entries.
    pub fn iter<'m>(&self, mem: &'m Memory) -> Iter<'m, K, V> {
        Iter {
            states: mem.bytes(self.states),
            keys: mem.bytes(self.keys),
            values: mem.bytes(self.values),
            index: 0,
            remaining: self.count,
            _marker: PhantomData,
        }
    }

    /// Visit every live entry in bucket order, mutating values in place.
    ///
    /// Structural mutation (insert/remove) during traversal is not
    /// possible: the map is borrowed for the whole walk.
    pub fn for_each_mut<F: FnMut(&K, &mut V)>(&self, mem: &mut Memory, mut f: F) {
        let mut seen = 0;
        for index in 0..self.capacity {
            if seen == self.count {
                break;
            }
            if mem.bytes(self.states)[index] != SLOT_OCCUPIED {
                continue;
            }
            seen += 1;
            let key: K = read_at(mem.bytes(self.keys), index);
            let mut value: V = read_at(mem.bytes(self.values), index);
            f(&key, &mut value);
            write_at(mem.bytes_mut(self.values), index, &value);
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the map holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current slot capacity (always a power of two).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tombstoned slots.
    pub fn tombstone_count(&self) -> usize {
        self.tombstone_count
    }

    /// The category backing this map's slot planes.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Walk the probe sequence for `key` on behalf of an insertion.
    ///
    /// Remembers the first tombstone passed, and keeps scanning past
    /// tombstones for an exact match before settling on it. Bounded by
    /// one full wrap of the table.
    fn probe_for_insert(&self, mem: &Memory, hash: u64, key: &K) -> Probe {
        let states = mem.bytes(self.states);
        let hashes = mem.bytes(self.hashes);
        let keys = mem.bytes(self.keys);
        let mask = self.capacity - 1;
        let mut index = (hash as usize) & mask;
        let mut first_tombstone = None;

        for _ in 0..self.capacity {
            match states[index] {
                SLOT_EMPTY => {
                    return Probe::Vacant {
                        target: first_tombstone.unwrap_or(index),
                        reused_tombstone: first_tombstone.is_some(),
                    };
                }
                SLOT_OCCUPIED => {
                    if read_at::<u64>(hashes, index) == hash && read_at::<K>(keys, index) == *key {
                        return Probe::Found(index);
                    }
                }
                _ => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
            }
            index = (index + 1) & mask;
        }

        match first_tombstone {
            Some(target) => Probe::Vacant {
                target,
                reused_tombstone: true,
            },
            None => Probe::Full,
        }
    }

    /// Walk the probe sequence for `key` on behalf of a lookup.
    ///
    /// Terminates at the first empty non-tombstone slot; bounded by one
    /// full wrap for tables without one.
    fn find(&self, mem: &Memory, key: &K) -> Option<usize> {
        let hash = self.hash_key(key);
        let states = mem.bytes(self.states);
        let hashes = mem.bytes(self.hashes);
        let keys = mem.bytes(self.keys);
        let mask = self.capacity - 1;
        let mut index = (hash as usize) & mask;

        for _ in 0..self.capacity {
            match states[index] {
                SLOT_EMPTY => return None,
                SLOT_OCCUPIED => {
                    if read_at::<u64>(hashes, index) == hash && read_at::<K>(keys, index) == *key {
                        return Some(index);
                    }
                }
                _ => {}
            }
            index = (index + 1) & mask;
        }
        None
    }

    /// Rehash into fresh planes at double capacity.
    ///
    /// Live entries are re-inserted by probing with their cached hashes;
    /// tombstones are dropped. The old planes are abandoned in the
    /// backing category. On allocation failure the map is untouched and
    /// `false` is returned.
    fn grow(&mut self, mem: &mut Memory) -> bool {
        let new_capacity = self.capacity * 2;

        let mut live: Vec<(u64, K, V)> = Vec::with_capacity(self.count);
        {
            let states = mem.bytes(self.states);
            let hashes = mem.bytes(self.hashes);
            let keys = mem.bytes(self.keys);
            let values = mem.bytes(self.values);
            for index in 0..self.capacity {
                if states[index] == SLOT_OCCUPIED {
                    live.push((
                        read_at(hashes, index),
                        read_at(keys, index),
                        read_at(values, index),
                    ));
                }
            }
        }

        // Probe into local staging planes first, so a failed allocation
        // below cannot leave the map half-rehashed.
        let mask = new_capacity - 1;
        let mut staged_states = vec![SLOT_EMPTY; new_capacity];
        let mut staged_hashes = vec![0u8; new_capacity * size_of::<u64>()];
        let mut staged_keys = vec![0u8; new_capacity * size_of::<K>()];
        let mut staged_values = vec![0u8; new_capacity * size_of::<V>()];
        for (hash, key, value) in &live {
            let mut index = (*hash as usize) & mask;
            while staged_states[index] == SLOT_OCCUPIED {
                index = (index + 1) & mask;
            }
            staged_states[index] = SLOT_OCCUPIED;
            write_at(&mut staged_hashes, index, hash);
            write_at(&mut staged_keys, index, key);
            write_at(&mut staged_values, index, value);
        }

        let Some((states, hashes, keys, values)) =
            Self::alloc_planes(mem, self.category, new_capacity)
        else {
            error!(
                category = %self.category,
                capacity = self.capacity,
                new_capacity,
                "map growth failed; backing category exhausted"
            );
            return false;
        };
        mem.bytes_mut(states).copy_from_slice(&staged_states);
        mem.bytes_mut(hashes).copy_from_slice(&staged_hashes);
        mem.bytes_mut(keys).copy_from_slice(&staged_keys);
        mem.bytes_mut(values).copy_from_slice(&staged_values);

        self.states = states;
        self.hashes = hashes;
        self.keys = keys;
        self.values = values;
        self.capacity = new_capacity;
        self.tombstone_count = 0;
        true
    }
}

/// Bucket-order iterator over live entries, yielding `(key, value)`
/// copies. Borrows the backing `Memory`, so the map cannot be mutated
/// while it is alive.
pub struct Iter<'m, K, V> {
    states: &'m [u8],
    keys: &'m [u8],
    values: &'m [u8],
    index: usize,
    remaining: usize,
    _marker: PhantomData<(K, V)>,
}

impl<K: Pod, V: Pod> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        while self.remaining > 0 && self.index < self.states.len() {
            let index = self.index;
            self.index += 1;
            if self.states[index] == SLOT_OCCUPIED {
                self.remaining -= 1;
                return Some((read_at(self.keys, index), read_at(self.values, index)));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Pod, V: Pod> ExactSizeIterator for Iter<'_, K, V> {}
