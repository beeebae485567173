//! Open-addressing hash index mapping words to their [`Record`]s.
//!
//! The index owns every record in an arena and resolves words to slots with
//! double hashing. Slots are either never used, tombstoned or occupied; a
//! search only stops at a never-used slot, so removals never cut an
//! insertion chain short.
//!
//! Two kinds of handles come out of the index:
//!
//! - [`SlotKey`] is the slot a word currently occupies. Growth moves records
//!   to new slots, so slot keys must be re-resolved with
//!   [`HashIndex::search`] after any insertion.
//! - [`RecordId`] is the record's arena position. It never changes while the
//!   word is stored, which is what the ranking trees hold on to.
//!
//! # Examples
//!
//! ```
//! use sentilex::store::hash_index::HashIndex;
//!
//! let mut index = HashIndex::new(7).unwrap();
//! let (was_new, key) = index.insert("brilliant", 4.0).unwrap();
//! assert!(was_new);
//! assert_eq!(index.get(key).unwrap().word(), "brilliant");
//!
//! let (was_new, _) = index.insert("brilliant", 1.0).unwrap();
//! assert!(!was_new);
//! assert_eq!(index.len(), 1);
//! ```

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentilexError};
use crate::store::record::{Record, RecordId, is_valid_score};
use crate::util::prime::next_prime;

/// Default number of slots.
pub const DEFAULT_CAPACITY: usize = 30011;

/// Default share of slots that may be occupied before the index grows.
pub const DEFAULT_MAX_LOAD_RATIO: f64 = 0.7;

const PRIMARY_PRIME: u128 = 5;
const SECONDARY_PRIME: u128 = 13;
const SECONDARY_SEED: u128 = 7;

/// Position of a word in the slot table. Invalidated by growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey(pub(crate) usize);

impl SlotKey {
    /// Raw slot index.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Tombstone,
    Occupied(RecordId),
}

impl Slot {
    fn is_free(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }
}

/// Probe sequence of one word under one capacity.
///
/// Round 0 is the primary hash, round `r` is `home + r * step`. The capacity
/// is prime and `step` lies in `[1, capacity - 1]`, so the first `capacity`
/// rounds visit every slot exactly once.
#[derive(Debug, Clone, Copy)]
struct Probe {
    home: usize,
    step: usize,
    capacity: usize,
}

impl Probe {
    fn new(word: &str, capacity: usize) -> Self {
        let home = polynomial_hash(word, PRIMARY_PRIME, 0, capacity);
        let step = if capacity > 1 {
            1 + polynomial_hash(word, SECONDARY_PRIME, SECONDARY_SEED, capacity) % (capacity - 1)
        } else {
            1
        };

        Probe {
            home,
            step,
            capacity,
        }
    }

    fn slot(&self, round: usize) -> usize {
        let offset = round as u128 * self.step as u128;
        ((self.home as u128 + offset) % self.capacity as u128) as usize
    }

    fn rounds(self) -> impl Iterator<Item = usize> {
        (0..self.capacity).map(move |round| self.slot(round))
    }
}

/// `Σ b_i · prime^i + seed (mod modulus)` over the UTF-8 bytes of `word`.
fn polynomial_hash(word: &str, prime: u128, seed: u128, modulus: usize) -> usize {
    let modulus = modulus as u128;
    let mut hash = seed % modulus;
    let mut power = 1 % modulus;

    for byte in word.bytes() {
        hash = (hash + u128::from(byte) * power) % modulus;
        power = power * prime % modulus;
    }

    hash as usize
}

/// Work item of the relocation stack used during growth.
#[derive(Debug, Clone, Copy)]
struct Pending {
    id: RecordId,
    probe: Probe,
    round: usize,
}

/// Open-addressing word index with double hashing and automatic growth.
#[derive(Debug, Clone)]
pub struct HashIndex {
    slots: Vec<Slot>,
    /// Record arena; cleared records are free and listed in `free_ids`.
    records: Vec<Record>,
    free_ids: Vec<RecordId>,
    len: usize,
    max_load_ratio: f64,
    max_load: f64,
    collisions: usize,
    growths: usize,
}

impl HashIndex {
    /// Create an index with at least `capacity` slots and the default load ratio.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_max_load(capacity, DEFAULT_MAX_LOAD_RATIO)
    }

    /// Create an index with at least `capacity` slots that grows once
    /// `floor(capacity * ratio)` slots are occupied.
    ///
    /// The capacity is rounded up to the next prime (at least 2).
    pub fn with_max_load(capacity: usize, ratio: f64) -> Result<Self> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SentilexError::validation(format!(
                "max load ratio must be in (0, 1], got {ratio}"
            )));
        }

        let capacity = next_prime(capacity).ok_or_else(|| {
            SentilexError::capacity(format!("no prime capacity at or above {capacity}"))
        })?;

        Ok(HashIndex {
            slots: vec![Slot::Empty; capacity],
            records: Vec::new(),
            free_ids: Vec::new(),
            len: 0,
            max_load_ratio: ratio,
            max_load: max_load_for(capacity, ratio),
            collisions: 0,
            growths: 0,
        })
    }

    /// Insert `word` with its first `score`.
    ///
    /// Returns `(true, key)` for a new word. For a word that is already
    /// stored nothing changes and `(false, key)` is returned; updating the
    /// existing record is up to the caller. The returned key is valid even
    /// when this insertion made the index grow.
    pub fn insert(&mut self, word: &str, score: f64) -> Result<(bool, SlotKey)> {
        if word.is_empty() {
            return Err(SentilexError::validation("cannot index an empty word"));
        }
        if !is_valid_score(score) {
            return Err(SentilexError::validation(format!(
                "score {score} for '{word}' is outside [0, 4]"
            )));
        }

        if let Some(key) = self.search(word) {
            return Ok((false, key));
        }

        let slot = self.find_free_slot(word)?;
        let id = self.allocate(word, score);
        self.slots[slot] = Slot::Occupied(id);
        self.len += 1;

        if self.load_factor() >= self.max_load {
            self.grow()?;
            let key = self.search(word).ok_or_else(|| {
                SentilexError::other(format!("'{word}' was lost while growing the index"))
            })?;
            return Ok((true, key));
        }

        Ok((true, SlotKey(slot)))
    }

    /// Find the slot holding `word`.
    ///
    /// Tombstones are skipped; the first never-used slot ends the search.
    pub fn search(&self, word: &str) -> Option<SlotKey> {
        for slot in Probe::new(word, self.capacity()).rounds() {
            match self.slots[slot] {
                Slot::Empty => return None,
                Slot::Tombstone => continue,
                Slot::Occupied(id) => {
                    if self.records[id.0].word() == word {
                        return Some(SlotKey(slot));
                    }
                }
            }
        }

        None
    }

    /// Remove `word`, leaving a tombstone in its slot.
    ///
    /// Returns the removed record. Its id is released and any ranking tree
    /// node still pointing at it is stale.
    pub fn remove(&mut self, word: &str) -> Option<Record> {
        let key = self.search(word)?;
        let Slot::Occupied(id) = self.slots[key.0] else {
            return None;
        };

        self.slots[key.0] = Slot::Tombstone;
        self.len -= 1;
        self.free_ids.push(id);
        Some(std::mem::take(&mut self.records[id.0]))
    }

    /// Record stored at `key`, if the slot is occupied.
    pub fn get(&self, key: SlotKey) -> Option<&Record> {
        self.record_id(key).map(|id| &self.records[id.0])
    }

    /// Mutable record stored at `key`.
    ///
    /// Changing the word through this reference breaks the index; only the
    /// statistics are meant to be updated.
    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut Record> {
        let id = self.record_id(key)?;
        Some(&mut self.records[id.0])
    }

    /// Stable record id behind `key`.
    pub fn record_id(&self, key: SlotKey) -> Option<RecordId> {
        match self.slots.get(key.0) {
            Some(Slot::Occupied(id)) => Some(*id),
            _ => None,
        }
    }

    /// Live record with the given id.
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.0).filter(|record| !record.is_empty())
    }

    /// Mutable live record with the given id.
    pub fn record_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records
            .get_mut(id.0)
            .filter(|record| !record.is_empty())
    }

    /// Iterate over live records in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.is_empty())
            .map(|(index, record)| (RecordId(index), record))
    }

    /// Share of slots currently occupied.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Load factor at which the index grows: `floor(capacity * ratio) / capacity`.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied slots probed past while placing records.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Number of times the index has grown.
    pub fn growths(&self) -> usize {
        self.growths
    }

    fn find_free_slot(&mut self, word: &str) -> Result<usize> {
        for slot in Probe::new(word, self.capacity()).rounds() {
            if self.slots[slot].is_free() {
                return Ok(slot);
            }
            self.collisions += 1;
        }

        Err(SentilexError::capacity(format!(
            "no free slot for '{word}' among {} slots",
            self.capacity()
        )))
    }

    fn allocate(&mut self, word: &str, score: f64) -> RecordId {
        let mut record = Record::new();
        record.insert(word, score);

        match self.free_ids.pop() {
            Some(id) => {
                self.records[id.0] = record;
                id
            }
            None => {
                self.records.push(record);
                RecordId(self.records.len() - 1)
            }
        }
    }

    /// Grow to the smallest prime at least twice the current capacity and
    /// move every live record to its slot under the new capacity.
    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .and_then(next_prime)
            .ok_or_else(|| {
                SentilexError::capacity(format!("cannot grow beyond {old_capacity} slots"))
            })?;

        self.slots.resize(new_capacity, Slot::Empty);
        self.max_load = max_load_for(new_capacity, self.max_load_ratio);

        let mut relocated: AHashSet<RecordId> = AHashSet::with_capacity(self.len);
        for index in 0..old_capacity {
            match self.slots[index] {
                Slot::Occupied(id) if !relocated.contains(&id) => {
                    self.relocate(index, &mut relocated);
                }
                Slot::Tombstone => self.slots[index] = Slot::Empty,
                _ => {}
            }
        }

        self.growths += 1;
        debug!(
            "hash index grew from {old_capacity} to {new_capacity} slots ({} records)",
            self.len
        );
        Ok(())
    }

    /// Move the record in slot `start` to its new position.
    ///
    /// When the target slot holds a record that has not been moved yet, that
    /// record is lifted out and moved first, then the waiting record retries
    /// the same slot. Records in `relocated` are never moved again.
    fn relocate(&mut self, start: usize, relocated: &mut AHashSet<RecordId>) {
        let Slot::Occupied(first) = self.slots[start] else {
            return;
        };
        self.slots[start] = Slot::Empty;

        let mut pending = vec![self.pending(first)];
        while let Some(&Pending { id, probe, round }) = pending.last() {
            let slot = probe.slot(round);

            match self.slots[slot] {
                Slot::Empty | Slot::Tombstone => {
                    self.slots[slot] = Slot::Occupied(id);
                    relocated.insert(id);
                    pending.pop();
                }
                Slot::Occupied(other) if !relocated.contains(&other) => {
                    self.slots[slot] = Slot::Empty;
                    pending.push(self.pending(other));
                }
                Slot::Occupied(_) => {
                    self.collisions += 1;
                    if let Some(top) = pending.last_mut() {
                        top.round += 1;
                    }
                }
            }
        }
    }

    fn pending(&self, id: RecordId) -> Pending {
        Pending {
            id,
            probe: Probe::new(self.records[id.0].word(), self.capacity()),
            round: 0,
        }
    }
}

fn max_load_for(capacity: usize, ratio: f64) -> f64 {
    let slots = (capacity as f64 * ratio).floor().max(1.0);
    slots / capacity as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every occupied slot must be reachable from its word's probe sequence
    /// without crossing a never-used slot.
    fn assert_reachable(index: &HashIndex) {
        for (id, record) in index.iter() {
            let key = index
                .search(record.word())
                .unwrap_or_else(|| panic!("'{}' not reachable", record.word()));
            assert_eq!(index.record_id(key), Some(id));
        }
    }

    #[test]
    fn test_capacity_is_rounded_to_prime() {
        assert_eq!(HashIndex::new(3).unwrap().capacity(), 3);
        assert_eq!(HashIndex::new(10).unwrap().capacity(), 11);
        assert_eq!(HashIndex::new(0).unwrap().capacity(), 2);
        assert_eq!(HashIndex::new(DEFAULT_CAPACITY).unwrap().capacity(), 30011);
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(HashIndex::with_max_load(11, 0.0).is_err());
        assert!(HashIndex::with_max_load(11, 1.5).is_err());
        assert!(HashIndex::with_max_load(11, f64::NAN).is_err());
        assert!(HashIndex::with_max_load(11, 1.0).is_ok());
    }

    #[test]
    fn test_max_load_is_floored() {
        let index = HashIndex::new(3).unwrap();
        assert!((index.max_load_factor() - 2.0 / 3.0).abs() < 1e-12);

        let index = HashIndex::new(11).unwrap();
        assert!((index.max_load_factor() - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_insert_search_get() {
        let mut index = HashIndex::new(31).unwrap();
        let (was_new, key) = index.insert("apple", 3.0).unwrap();
        assert!(was_new);
        assert_eq!(index.search("apple"), Some(key));
        assert_eq!(index.get(key).unwrap().score(), 3.0);
        assert_eq!(index.search("pear"), None);
    }

    #[test]
    fn test_duplicate_insert_does_not_mutate() {
        let mut index = HashIndex::new(31).unwrap();
        let (_, first) = index.insert("apple", 3.0).unwrap();
        let (was_new, second) = index.insert("apple", 0.0).unwrap();

        assert!(!was_new);
        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
        let record = index.get(first).unwrap();
        assert_eq!(record.score(), 3.0);
        assert_eq!(record.frequency(), 1);
    }

    #[test]
    fn test_invalid_input() {
        let mut index = HashIndex::new(31).unwrap();
        assert!(matches!(
            index.insert("", 1.0),
            Err(SentilexError::Validation(_))
        ));
        assert!(matches!(
            index.insert("apple", 4.5),
            Err(SentilexError::Validation(_))
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn test_growth_scenario() {
        let mut index = HashIndex::new(3).unwrap();
        index.insert("apple", 3.0).unwrap();
        index.insert("banana", 1.0).unwrap();
        index.insert("cherry", 3.0).unwrap();

        assert!(index.growths() >= 1);
        assert!(index.capacity() > 3);
        for word in ["apple", "banana", "cherry"] {
            assert!(index.search(word).is_some(), "{word} lost after growth");
        }
        assert!(index.load_factor() < index.max_load_factor());
    }

    #[test]
    fn test_growth_uses_next_prime_of_double() {
        let mut index = HashIndex::new(3).unwrap();
        index.insert("a", 1.0).unwrap();
        index.insert("b", 1.0).unwrap();
        assert_eq!(index.capacity(), 7);
    }

    #[test]
    fn test_growth_moves_unrelocated_occupant_first() {
        let home = |word: &str, capacity: usize| Probe::new(word, capacity).slot(0);
        let candidates = || (0..10_000).map(|i| format!("w{i}"));

        // `mover` sits in slot 0 and wants slot 1 after growing to 7, which
        // still holds `occupant`. `occupant` heads elsewhere under 7.
        let mover = candidates()
            .find(|w| home(w, 3) == 0 && home(w, 7) == 1)
            .unwrap();
        let occupant = candidates()
            .find(|w| home(w, 3) == 1 && home(w, 7) != 1)
            .unwrap();

        let mut index = HashIndex::with_max_load(3, 1.0).unwrap();
        index.insert(&mover, 1.0).unwrap();
        index.insert(&occupant, 3.0).unwrap();
        assert_eq!(index.search(&mover), Some(SlotKey(0)));
        assert_eq!(index.search(&occupant), Some(SlotKey(1)));
        assert_eq!(index.growths(), 0);

        index.grow().unwrap();

        assert_eq!(index.capacity(), 7);
        assert_eq!(index.growths(), 1);
        assert_eq!(index.collisions(), 0);
        assert_eq!(index.search(&mover), Some(SlotKey(1)));
        assert_eq!(index.search(&occupant), Some(SlotKey(home(&occupant, 7))));
        assert_reachable(&index);
    }

    #[test]
    fn test_record_ids_survive_growth() {
        let mut index = HashIndex::new(3).unwrap();
        let (_, key) = index.insert("stable", 2.5).unwrap();
        let id = index.record_id(key).unwrap();

        for i in 0..50 {
            index.insert(&format!("word{i}"), 1.0).unwrap();
        }

        assert!(index.growths() > 1);
        assert_eq!(index.record(id).unwrap().word(), "stable");
        let key = index.search("stable").unwrap();
        assert_eq!(index.record_id(key), Some(id));
        assert_reachable(&index);
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut index = HashIndex::new(101).unwrap();
        for i in 0..40 {
            index.insert(&format!("w{i}"), 2.0).unwrap();
        }

        let removed = index.remove("w7").unwrap();
        assert_eq!(removed.word(), "w7");
        assert_eq!(index.len(), 39);
        assert_eq!(index.search("w7"), None);
        assert!(index.remove("w7").is_none());

        // Every other chain still resolves across the tombstone.
        for i in (0..40).filter(|&i| i != 7) {
            assert!(index.search(&format!("w{i}")).is_some());
        }
        assert_reachable(&index);
    }

    #[test]
    fn test_tombstone_is_skipped_not_terminal() {
        let mut index = HashIndex::new(101).unwrap();
        let words: Vec<String> = (0..60).map(|i| format!("x{i}")).collect();
        for word in &words {
            index.insert(word, 1.0).unwrap();
        }

        // Find a word that sits past at least one collision and remove the
        // first word on its chain.
        let capacity = index.capacity();
        let chained = words.iter().find_map(|word| {
            let key = index.search(word)?;
            let home = Probe::new(word, capacity).slot(0);
            (home != key.0).then(|| (word.clone(), home))
        });

        if let Some((word, home)) = chained {
            let blocker = match index.slots[home] {
                Slot::Occupied(id) => index.records[id.0].word().to_string(),
                _ => unreachable!("chain start must be occupied"),
            };
            index.remove(&blocker);
            assert!(index.search(&word).is_some());
        }
    }

    #[test]
    fn test_removed_id_is_reused() {
        let mut index = HashIndex::new(31).unwrap();
        let (_, key) = index.insert("old", 1.0).unwrap();
        let id = index.record_id(key).unwrap();
        index.remove("old");
        assert!(index.record(id).is_none());

        let (_, key) = index.insert("new", 2.0).unwrap();
        assert_eq!(index.record_id(key), Some(id));
        assert_eq!(index.record(id).unwrap().word(), "new");
    }

    #[test]
    fn test_collisions_are_counted() {
        let mut index = HashIndex::with_max_load(5, 1.0).unwrap();
        for word in ["a", "b", "c", "d"] {
            index.insert(word, 1.0).unwrap();
        }
        // "a".."d" hash to 97..100 mod 5 = 2, 3, 4, 0 with no collisions; "f"
        // (102 mod 5 = 2) collides with "a".
        let before = index.collisions();
        index.insert("f", 1.0).unwrap();
        assert!(index.collisions() > before);
    }

    #[test]
    fn test_get_mut_updates_statistics() {
        let mut index = HashIndex::new(31).unwrap();
        let (_, key) = index.insert("plot", 4.0).unwrap();
        assert!(index.get_mut(key).unwrap().recalculate_score(2.0));
        assert_eq!(index.get(key).unwrap().score(), 3.0);
        assert_eq!(index.get(SlotKey(30)), None);
        assert_eq!(index.get(SlotKey(1000)), None);
    }

    #[test]
    fn test_load_factor_stays_below_maximum() {
        let mut index = HashIndex::new(2).unwrap();
        for i in 0..2000 {
            index.insert(&format!("term-{i}"), (i % 5) as f64).unwrap();
            assert!(index.load_factor() < index.max_load_factor());
        }
        assert_eq!(index.len(), 2000);
        assert_reachable(&index);
    }

    #[test]
    fn test_probe_visits_every_slot() {
        for capacity in [2usize, 3, 7, 11, 101] {
            for word in ["a", "zebra", "ünïcode", "the quick brown fox"] {
                let mut seen: Vec<usize> = Probe::new(word, capacity).rounds().collect();
                seen.sort_unstable();
                seen.dedup();
                assert_eq!(seen.len(), capacity);
            }
        }
    }
}
