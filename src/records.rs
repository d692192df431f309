//! Achievement definition records shipped by content packs.

use achievements::{Achievement, AchievementManager, DEFAULT_ART, InfoPatch, ModId};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One achievement definition as packs ship it on disk.
///
/// Only `id` is required. A record carrying `mod` patches the metadata of
/// an achievement another mod registered instead of defining a new one.
#[derive(Debug, Clone, Deserialize)]
pub struct AchievementRecord {
    #[serde(default, rename = "mod")]
    pub mod_id: Option<String>,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    /// Restricts the record to one game mode. Absent means every mode.
    #[serde(default)]
    pub game_mode: Option<String>,
}

/// Reads every record file under a mod's achievements directory. Files
/// that are not JSON or fail to parse are skipped.
pub fn load_records_dir(dir: &Path) -> Vec<AchievementRecord> {
    let mut paths = Vec::new();
    collect_files(dir, &mut paths);
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("failed to read record file {}: {err}", path.display());
                continue;
            }
        };
        match serde_json::from_str::<AchievementRecord>(&content) {
            Ok(record) => records.push(record),
            Err(err) => warn!("failed to parse record file {}: {err}", path.display()),
        }
    }
    records
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

/// Registers or patches achievements from one mod's records.
///
/// Records naming another mod patch that mod's achievement when it is
/// registered. Everything else defines an achievement owned by `owner`:
/// records pinned to a different game mode are skipped, a missing name
/// falls back to the id, a missing description to the name, and missing
/// art to [`DEFAULT_ART`].
pub fn apply_records<C, P>(
    manager: &mut AchievementManager<C, P>,
    owner: &ModId,
    records: Vec<AchievementRecord>,
    active_mode: &str,
) {
    for record in records {
        match record.mod_id.as_deref() {
            Some(target) if target != owner.as_str() => {
                let target = ModId::new(target);
                let patch = InfoPatch {
                    name: record.name,
                    desc: record.desc,
                    icon: record.icon,
                    background: record.background,
                };
                if !manager.update_achievement_info(&target, &record.id, patch) {
                    debug!(
                        mod_id = %target,
                        id = %record.id,
                        "patch record targets an unregistered achievement"
                    );
                }
            }
            _ => {
                if let Some(mode) = &record.game_mode {
                    if mode != active_mode {
                        continue;
                    }
                }
                let name = record.name.unwrap_or_else(|| record.id.clone());
                let desc = record.desc.unwrap_or_else(|| name.clone());
                let icon = record.icon.unwrap_or_else(|| DEFAULT_ART.to_string());
                let background = record.background.unwrap_or_else(|| DEFAULT_ART.to_string());
                manager.add_achievement(Achievement::new(
                    owner.clone(),
                    record.id,
                    name,
                    desc,
                    icon,
                    background,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> ModId {
        ModId::new("core")
    }

    #[test]
    fn minimal_record_parses() {
        let record: AchievementRecord = serde_json::from_str(r#"{"id": "author"}"#).unwrap();

        assert_eq!(record.id, "author");
        assert!(record.mod_id.is_none());
        assert!(record.name.is_none());
        assert!(record.game_mode.is_none());
    }

    #[test]
    fn defaults_chain_from_id_to_name_to_desc() {
        let mut manager: AchievementManager<(), ()> = AchievementManager::new();
        let records = vec![AchievementRecord {
            mod_id: None,
            id: "author".to_string(),
            name: None,
            desc: None,
            icon: None,
            background: None,
            game_mode: None,
        }];

        apply_records(&mut manager, &owner(), records, "survival");

        let achievement = manager.get_achievement(&owner(), "author").unwrap();
        assert_eq!(achievement.name(), "author");
        assert_eq!(achievement.desc(), "author");
        assert_eq!(achievement.icon(), DEFAULT_ART);
        assert_eq!(achievement.background(), DEFAULT_ART);
    }

    #[test]
    fn game_mode_pins_are_honored() {
        let mut manager: AchievementManager<(), ()> = AchievementManager::new();
        let records = vec![
            AchievementRecord {
                mod_id: None,
                id: "creative_only".to_string(),
                name: None,
                desc: None,
                icon: None,
                background: None,
                game_mode: Some("creative".to_string()),
            },
            AchievementRecord {
                mod_id: None,
                id: "everywhere".to_string(),
                name: None,
                desc: None,
                icon: None,
                background: None,
                game_mode: None,
            },
        ];

        apply_records(&mut manager, &owner(), records, "survival");

        assert!(manager.get_achievement(&owner(), "creative_only").is_none());
        assert!(manager.get_achievement(&owner(), "everywhere").is_some());
    }

    #[test]
    fn foreign_record_patches_instead_of_registering() {
        let mut manager: AchievementManager<(), ()> = AchievementManager::new();
        manager.add_achievement(Achievement::new(
            owner(),
            "author",
            "Author",
            "write a book",
            DEFAULT_ART,
            DEFAULT_ART,
        ));

        let records = vec![AchievementRecord {
            mod_id: Some("core".to_string()),
            id: "author".to_string(),
            name: Some("Wordsmith".to_string()),
            desc: None,
            icon: None,
            background: None,
            game_mode: None,
        }];
        apply_records(&mut manager, &ModId::new("extras"), records, "survival");

        let achievement = manager.get_achievement(&owner(), "author").unwrap();
        assert_eq!(achievement.name(), "Wordsmith");
        assert_eq!(achievement.desc(), "write a book");
        // No new achievement appears under the patching mod.
        assert!(manager.get_achievement(&ModId::new("extras"), "author").is_none());
    }

    #[test]
    fn patch_for_unregistered_target_is_skipped() {
        let mut manager: AchievementManager<(), ()> = AchievementManager::new();
        let records = vec![AchievementRecord {
            mod_id: Some("ghost".to_string()),
            id: "author".to_string(),
            name: Some("Wordsmith".to_string()),
            desc: None,
            icon: None,
            background: None,
            game_mode: None,
        }];

        apply_records(&mut manager, &owner(), records, "survival");

        assert!(manager.is_empty());
    }

    #[test]
    fn self_referencing_mod_field_registers_normally() {
        let mut manager: AchievementManager<(), ()> = AchievementManager::new();
        let records = vec![AchievementRecord {
            mod_id: Some("core".to_string()),
            id: "author".to_string(),
            name: None,
            desc: None,
            icon: None,
            background: None,
            game_mode: None,
        }];

        apply_records(&mut manager, &owner(), records, "survival");

        assert!(manager.get_achievement(&owner(), "author").is_some());
    }

    #[test]
    fn record_files_load_sorted_and_bad_ones_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"id": "second"}"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"id": "first"}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "ignore me").unwrap();
        let nested = dir.path().join("more");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("c.json"), r#"{"id": "third"}"#).unwrap();

        let records = load_records_dir(dir.path());

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }
}
