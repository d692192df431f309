//! Per-player craft counters.

use crate::host::ItemId;
use achievements::GamerId;
use error::PluginError;
use save::codec;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Counts how many times each player has crafted each item.
///
/// A craft counts once no matter how many items the recipe produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftTracker {
    counts: BTreeMap<GamerId, Vec<u32>>,
    /// Size of the host's item table; fresh counter tables start this big.
    item_count: usize,
}

impl CraftTracker {
    pub fn new(item_count: usize) -> Self {
        Self {
            counts: BTreeMap::new(),
            item_count,
        }
    }

    pub fn record(&mut self, gamer: GamerId, item: ItemId) {
        let counts = self
            .counts
            .entry(gamer)
            .or_insert_with(|| vec![0; self.item_count]);
        let index = item.0 as usize;
        if index >= counts.len() {
            counts.resize(index + 1, 0);
        }
        counts[index] += 1;
    }

    /// Times the player has crafted the item. Zero for players never seen.
    pub fn crafted(&self, gamer: GamerId, item: ItemId) -> u32 {
        self.counts
            .get(&gamer)
            .and_then(|counts| counts.get(item.0 as usize))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_crafted(&self, gamer: GamerId, item: ItemId) -> bool {
        self.crafted(gamer, item) > 0
    }

    pub fn write_state<W: Write>(&self, w: &mut W) -> Result<(), PluginError> {
        codec::write_u32(w, self.counts.len() as u32)?;
        for (gamer, counts) in &self.counts {
            codec::write_u64(w, gamer.0)?;
            codec::write_u32(w, counts.len() as u32)?;
            for count in counts {
                codec::write_u32(w, *count)?;
            }
        }
        Ok(())
    }

    /// Reads counters written by [`CraftTracker::write_state`]. Tables grow
    /// to the current item set when the save predates new items.
    pub fn read_state<R: Read>(&mut self, r: &mut R) -> Result<(), PluginError> {
        self.counts.clear();
        let players = codec::read_u32(r)?;
        for _ in 0..players {
            let gamer = GamerId(codec::read_u64(r)?);
            let stored = codec::read_u32(r)?;
            let mut counts = Vec::new();
            for _ in 0..stored {
                counts.push(codec::read_u32(r)?);
            }
            if counts.len() < self.item_count {
                counts.resize(self.item_count, 0);
            }
            self.counts.insert(gamer, counts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_player_and_item() {
        let mut tracker = CraftTracker::new(8);
        tracker.record(GamerId(1), ItemId(3));
        tracker.record(GamerId(1), ItemId(3));
        tracker.record(GamerId(2), ItemId(3));

        assert_eq!(tracker.crafted(GamerId(1), ItemId(3)), 2);
        assert_eq!(tracker.crafted(GamerId(2), ItemId(3)), 1);
        assert!(tracker.has_crafted(GamerId(1), ItemId(3)));
        assert!(!tracker.has_crafted(GamerId(1), ItemId(4)));
        assert_eq!(tracker.crafted(GamerId(9), ItemId(3)), 0);
    }

    #[test]
    fn records_item_ids_beyond_the_initial_table() {
        let mut tracker = CraftTracker::new(2);
        tracker.record(GamerId(1), ItemId(100));

        assert_eq!(tracker.crafted(GamerId(1), ItemId(100)), 1);
    }

    #[test]
    fn roundtrip_preserves_counts() {
        let mut tracker = CraftTracker::new(4);
        tracker.record(GamerId(1), ItemId(0));
        tracker.record(GamerId(1), ItemId(3));
        tracker.record(GamerId(7), ItemId(2));

        let mut buf = Vec::new();
        tracker.write_state(&mut buf).unwrap();

        let mut read = CraftTracker::new(4);
        read.read_state(&mut buf.as_slice()).unwrap();
        assert_eq!(read, tracker);
    }

    #[test]
    fn read_grows_tables_for_new_items() {
        let mut old = CraftTracker::new(2);
        old.record(GamerId(1), ItemId(1));

        let mut buf = Vec::new();
        old.write_state(&mut buf).unwrap();

        // The item set grew between sessions.
        let mut new = CraftTracker::new(6);
        new.read_state(&mut buf.as_slice()).unwrap();

        assert_eq!(new.crafted(GamerId(1), ItemId(1)), 1);
        assert_eq!(new.crafted(GamerId(1), ItemId(5)), 0);
        new.record(GamerId(1), ItemId(5));
        assert_eq!(new.crafted(GamerId(1), ItemId(5)), 1);
    }
}
