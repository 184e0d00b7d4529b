//! Computed table for ITE results.

use std::cell::Cell;

use crate::reference::Ref;

/// Keys that can pick a slot in a [`Cache`].
pub trait SlotHash {
    fn slot_hash(&self) -> u64;
}

/// [Szudzik pairing](http://szudzik.com/ElegantPairing.pdf), wrapping on overflow.
fn szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

impl SlotHash for (Ref, Ref, Ref) {
    fn slot_hash(&self) -> u64 {
        let (f, g, h) = self;
        szudzik(szudzik(f.raw() as u64, g.raw() as u64), h.raw() as u64)
    }
}

/// Direct-mapped table of `2^bits` slots. A colliding insert overwrites the
/// slot; lookups compare the full key, so a stale slot is just a miss.
pub struct Cache<K, V> {
    slots: Vec<Option<(K, V)>>,
    mask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K: SlotHash + Eq, V> Cache<K, V> {
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");
        let size = 1usize << bits;
        Self {
            slots: std::iter::repeat_with(|| None).take(size).collect(),
            mask: (size - 1) as u64,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    fn slot(&self, key: &K) -> usize {
        (key.slot_hash() & self.mask) as usize
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let found = match &self.slots[self.slot(key)] {
            Some((k, v)) if k == key => Some(v),
            _ => None,
        };
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.set(counter.get() + 1);
        found
    }

    pub fn insert(&mut self, key: K, value: V) {
        let slot = self.slot(&key);
        self.slots[slot] = Some((key, value));
    }

    pub fn clear(&mut self) {
        self.slots.fill_with(|| None);
    }
}
