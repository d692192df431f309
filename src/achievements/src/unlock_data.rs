//! Per-player unlock history and its binary codec.

use crate::achievement::ModId;
use error::PluginError;
use save::codec;
use std::io::{Read, Write};

/// One persisted unlock: which achievement, from which mod, on which
/// in-game day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockRecord {
    pub mod_id: ModId,
    pub achievement_id: String,
    /// In-game day counter at unlock time. Display and analytics only.
    pub day: u32,
}

/// Append-only unlock history for one player.
///
/// No (mod, achievement) pair appears twice; re-recording an unlock keeps
/// the first entry, day included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementUnlockData {
    records: Vec<UnlockRecord>,
}

impl AchievementUnlockData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unlock unless the pair is already recorded.
    pub fn record(&mut self, mod_id: ModId, achievement_id: String, day: u32) {
        if self.contains(&mod_id, &achievement_id) {
            return;
        }
        self.records.push(UnlockRecord {
            mod_id,
            achievement_id,
            day,
        });
    }

    pub fn contains(&self, mod_id: &ModId, achievement_id: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.mod_id == *mod_id && r.achievement_id == achievement_id)
    }

    pub fn records(&self) -> &[UnlockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the history: a table of the distinct mod-ids in first-seen
    /// order, then every record as (table index, achievement id, day).
    /// Repeated mod-ids cost four bytes each instead of a full string.
    pub fn write_state<W: Write>(&self, w: &mut W) -> Result<(), PluginError> {
        let mut mods: Vec<&str> = Vec::new();
        let mut indices = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let mod_id = record.mod_id.as_str();
            let index = match mods.iter().position(|m| *m == mod_id) {
                Some(i) => i,
                None => {
                    mods.push(mod_id);
                    mods.len() - 1
                }
            };
            indices.push(index as u32);
        }

        codec::write_u32(w, mods.len() as u32)?;
        for mod_id in &mods {
            codec::write_string(w, mod_id)?;
        }

        codec::write_u32(w, self.records.len() as u32)?;
        for (record, index) in self.records.iter().zip(indices) {
            codec::write_u32(w, index)?;
            codec::write_string(w, &record.achievement_id)?;
            codec::write_u32(w, record.day)?;
        }

        Ok(())
    }

    /// Reads a history written by [`AchievementUnlockData::write_state`],
    /// rebuilding the mod-id table first.
    pub fn read_state<R: Read>(r: &mut R) -> Result<Self, PluginError> {
        let mod_count = codec::read_u32(r)?;
        let mut mods = Vec::new();
        for _ in 0..mod_count {
            mods.push(ModId::new(codec::read_string(r)?));
        }

        let record_count = codec::read_u32(r)?;
        let mut records = Vec::new();
        for _ in 0..record_count {
            let index = codec::read_u32(r)? as usize;
            let mod_id = mods.get(index).cloned().ok_or_else(|| {
                PluginError::CorruptedSave(format!(
                    "mod table index {index} out of range ({} entries)",
                    mods.len()
                ))
            })?;
            let achievement_id = codec::read_string(r)?;
            let day = codec::read_u32(r)?;
            records.push(UnlockRecord {
                mod_id,
                achievement_id,
                day,
            });
        }

        Ok(Self { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AchievementUnlockData {
        let mut data = AchievementUnlockData::new();
        data.record(ModId::new("core"), "author".to_string(), 3);
        data.record(ModId::new("extras"), "portals".to_string(), 4);
        data.record(ModId::new("core"), "retro".to_string(), 9);
        data
    }

    #[test]
    fn record_dedups_by_pair() {
        let mut data = sample();
        data.record(ModId::new("core"), "author".to_string(), 99);

        assert_eq!(data.len(), 3);
        assert_eq!(data.records()[0].day, 3);
    }

    #[test]
    fn roundtrip_preserves_records() {
        let data = sample();

        let mut buf = Vec::new();
        data.write_state(&mut buf).unwrap();
        let read = AchievementUnlockData::read_state(&mut buf.as_slice()).unwrap();

        assert_eq!(read, data);
    }

    #[test]
    fn empty_roundtrip() {
        let data = AchievementUnlockData::new();

        let mut buf = Vec::new();
        data.write_state(&mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0, 0]);

        let read = AchievementUnlockData::read_state(&mut buf.as_slice()).unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn mod_table_dedups_repeated_mods() {
        let data = sample();

        let mut buf = Vec::new();
        data.write_state(&mut buf).unwrap();

        // Exact layout: 2 table entries ("core", "extras"), then 3 records
        // referencing them by index.
        let mut expected = Vec::new();
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(b"core");
        expected.extend_from_slice(&6u32.to_le_bytes());
        expected.extend_from_slice(b"extras");
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&6u32.to_le_bytes());
        expected.extend_from_slice(b"author");
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&7u32.to_le_bytes());
        expected.extend_from_slice(b"portals");
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&5u32.to_le_bytes());
        expected.extend_from_slice(b"retro");
        expected.extend_from_slice(&9u32.to_le_bytes());

        assert_eq!(buf, expected);
    }

    #[test]
    fn out_of_range_mod_index_is_corrupt() {
        let mut buf = Vec::new();
        codec::write_u32(&mut buf, 1).unwrap();
        codec::write_string(&mut buf, "core").unwrap();
        codec::write_u32(&mut buf, 1).unwrap();
        codec::write_u32(&mut buf, 7).unwrap();
        codec::write_string(&mut buf, "author").unwrap();
        codec::write_u32(&mut buf, 1).unwrap();

        let err = AchievementUnlockData::read_state(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, PluginError::CorruptedSave(_)));
    }
}
