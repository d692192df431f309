//! Achievement registry, unlock tracking, and per-player history.
//!
//! The manager owns every registered achievement and keeps each one either
//! locked or unlocked. Locked achievements are tested a few at a time from
//! [`AchievementManager::update`]; unlocks raise notifications and append to
//! the owning player's history, which replays silently when a save is loaded.

pub mod achievement;
pub mod unlock_data;


pub use achievement::{Achievement, DEFAULT_ART, InfoPatch, ModId, Progress, ProgressFn, UnlockFn};
pub use unlock_data::{AchievementUnlockData, UnlockRecord};

use error::PluginError;
use save::codec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io::{Read, Write};
use tracing::debug;

/// Locked achievements tested per [`AchievementManager::update`] call.
pub const POLL_BUDGET: usize = 3;

/// Host-side view of the running world session.
pub trait Session {
    /// Whole in-game days elapsed since the world was created.
    fn days_into_game(&self) -> u32;
}

/// Host-side view of a connected player.
pub trait Player {
    fn gamer_id(&self) -> GamerId;
}

/// Stable identity of a player across sessions and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GamerId(pub u64);

impl fmt::Display for GamerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque ticket for a registered achievement, valid for the lifetime of
/// the manager that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AchievementHandle(pub(crate) usize);

/// Presentation timing applied to every unlock notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotifyTiming {
    /// Seconds a toast stays on screen.
    pub duration: f32,
    /// Seconds of fade at each end of the toast's life.
    pub fade: f32,
    /// Minimum seconds since the previous unlock for the chime to replay.
    pub sound_cooldown: f32,
}

impl Default for NotifyTiming {
    fn default() -> Self {
        Self {
            duration: 8.0,
            fade: 1.0,
            sound_cooldown: 0.5,
        }
    }
}

/// One unlock toast, queued until the frontend drains it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockNotification {
    pub handle: AchievementHandle,
    pub duration: f32,
    pub fade: f32,
    /// Whether the unlock chime should play. Suppressed when unlocks land
    /// in a burst.
    pub sound: bool,
}

/// Registry and unlock engine for every achievement in the world.
///
/// Generic over the host's session (`C`) and player (`P`) types so unlock
/// evaluators can read live game state without the manager knowing its
/// shape.
pub struct AchievementManager<C, P> {
    /// Every registered achievement, in registration order. Handles index
    /// into this arena and are never reused.
    achievements: Vec<Achievement<C, P>>,
    /// (mod, id) lookup into the arena.
    index: HashMap<ModId, HashMap<String, AchievementHandle>>,
    /// Still-locked achievements, in registration order.
    locked: Vec<AchievementHandle>,
    locked_set: HashSet<AchievementHandle>,
    /// Unlocked achievements, in unlock order.
    unlocked: Vec<AchievementHandle>,
    /// Polling position in `locked`. Walks backward one slot per test and
    /// parks below zero until the next update wraps it to the tail.
    cursor: isize,
    /// Per-player unlock history, keyed by gamer id.
    unlocks: BTreeMap<GamerId, AchievementUnlockData>,
    /// Players whose saved history has already been replayed.
    replayed: HashSet<GamerId>,
    pending: Vec<UnlockNotification>,
    /// Seconds since the last notified unlock.
    time_since_unlock: f32,
    timing: NotifyTiming,
}

impl<C, P> AchievementManager<C, P> {
    pub fn new() -> Self {
        Self {
            achievements: Vec::new(),
            index: HashMap::new(),
            locked: Vec::new(),
            locked_set: HashSet::new(),
            unlocked: Vec::new(),
            cursor: 0,
            unlocks: BTreeMap::new(),
            replayed: HashSet::new(),
            pending: Vec::new(),
            time_since_unlock: 0.0,
            timing: NotifyTiming::default(),
        }
    }

    pub fn set_timing(&mut self, timing: NotifyTiming) {
        self.timing = timing;
    }

    /// Registers an achievement, starting locked. When the (mod, id) pair
    /// is already taken the existing handle is returned and the new
    /// definition is dropped; the first registration wins.
    pub fn add_achievement(&mut self, achievement: Achievement<C, P>) -> AchievementHandle {
        if let Some(handle) = self.handle_of(achievement.mod_id(), achievement.id()) {
            debug!(
                mod_id = %achievement.mod_id(),
                id = achievement.id(),
                "duplicate achievement registration ignored"
            );
            return handle;
        }

        let handle = AchievementHandle(self.achievements.len());
        self.index
            .entry(achievement.mod_id().clone())
            .or_default()
            .insert(achievement.id().to_string(), handle);
        self.achievements.push(achievement);
        self.locked.push(handle);
        self.locked_set.insert(handle);
        handle
    }

    pub fn handle_of(&self, mod_id: &ModId, id: &str) -> Option<AchievementHandle> {
        self.index.get(mod_id)?.get(id).copied()
    }

    pub fn get_achievement(&self, mod_id: &ModId, id: &str) -> Option<&Achievement<C, P>> {
        self.handle_of(mod_id, id).map(|h| &self.achievements[h.0])
    }

    pub fn achievement(&self, handle: AchievementHandle) -> Option<&Achievement<C, P>> {
        self.achievements.get(handle.0)
    }

    /// Every registered achievement, in registration order.
    pub fn achievements(&self) -> &[Achievement<C, P>] {
        &self.achievements
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    /// Attaches another unlock evaluator to a registered achievement.
    pub fn add_unlock_condition<F>(
        &mut self,
        mod_id: &ModId,
        id: &str,
        f: F,
    ) -> Result<(), PluginError>
    where
        F: Fn(&C, &P) -> bool + 'static,
    {
        let handle = self.require(mod_id, id)?;
        self.achievements[handle.0].add_unlock_condition(f);
        Ok(())
    }

    /// Attaches the progress evaluator. Each achievement takes exactly one;
    /// a second attachment is rejected and the first stays in place.
    pub fn add_progress_func<F>(
        &mut self,
        mod_id: &ModId,
        id: &str,
        f: F,
    ) -> Result<(), PluginError>
    where
        F: Fn(&C, &P) -> Progress + 'static,
    {
        let handle = self.require(mod_id, id)?;
        self.achievements[handle.0].add_progress_func(f)
    }

    fn require(&self, mod_id: &ModId, id: &str) -> Result<AchievementHandle, PluginError> {
        self.handle_of(mod_id, id)
            .ok_or_else(|| PluginError::UnknownAchievement {
                mod_id: mod_id.to_string(),
                id: id.to_string(),
            })
    }

    /// Progress toward an achievement, or `None` when it is unknown or has
    /// no progress evaluator. Progress never unlocks anything.
    pub fn get_progress(&self, ctx: &C, player: &P, mod_id: &ModId, id: &str) -> Option<Progress> {
        self.get_achievement(mod_id, id)?.get_progress(ctx, player)
    }

    /// True when the achievement exists and has been unlocked. Unlocks are
    /// world-wide; the player argument matches the host call shape.
    pub fn is_achievement_unlocked(&self, _player: &P, mod_id: &ModId, id: &str) -> bool {
        match self.handle_of(mod_id, id) {
            Some(handle) => !self.locked_set.contains(&handle),
            None => false,
        }
    }

    /// True when the achievement exists and is still locked.
    pub fn is_achievement_locked(&self, _player: &P, mod_id: &ModId, id: &str) -> bool {
        match self.handle_of(mod_id, id) {
            Some(handle) => self.locked_set.contains(&handle),
            None => false,
        }
    }

    /// Locked achievements in registration order.
    pub fn locked_achievements(&self, _player: &P) -> Vec<&Achievement<C, P>> {
        self.locked.iter().map(|h| &self.achievements[h.0]).collect()
    }

    /// Unlocked achievements in unlock order.
    pub fn unlocked_achievements(&self, _player: &P) -> Vec<&Achievement<C, P>> {
        self.unlocked
            .iter()
            .map(|h| &self.achievements[h.0])
            .collect()
    }

    /// Applies a metadata patch. Returns false when the achievement is
    /// unknown.
    pub fn update_achievement_info(&mut self, mod_id: &ModId, id: &str, patch: InfoPatch) -> bool {
        match self.handle_of(mod_id, id) {
            Some(handle) => {
                self.achievements[handle.0].update_info(patch);
                true
            }
            None => false,
        }
    }

    /// Unlocks immediately, outside the polling schedule. Unknown pairs and
    /// already-unlocked achievements are ignored.
    pub fn unlock_achievement(&mut self, ctx: &C, player: &P, mod_id: &ModId, id: &str)
    where
        C: Session,
        P: Player,
    {
        let Some(handle) = self.handle_of(mod_id, id) else {
            debug!(%mod_id, id, "unlock requested for unknown achievement");
            return;
        };
        self.unlock_at(player.gamer_id(), handle, ctx.days_into_game(), true);
    }

    /// Per-frame driver. Replays saved unlocks the first time a player is
    /// seen, then tests up to [`POLL_BUDGET`] locked achievements and
    /// advances the notification clock.
    pub fn update(&mut self, ctx: &C, player: &P, dt: f32)
    where
        C: Session,
        P: Player,
    {
        self.replay_history(player.gamer_id());

        if self.locked.is_empty() {
            return;
        }

        for _ in 0..POLL_BUDGET {
            if self.locked.is_empty() {
                break;
            }
            if self.cursor < 0 {
                // Park at the tail; the walk resumes next frame.
                self.cursor = self.locked.len() as isize - 1;
                break;
            }
            let handle = self.locked[self.cursor as usize];
            if self.achievements[handle.0].test_unlock(ctx, player) {
                // Removal already pulled the cursor onto the next slot.
                self.unlock_at(player.gamer_id(), handle, ctx.days_into_game(), true);
            } else {
                self.cursor -= 1;
            }
        }

        self.time_since_unlock += dt;
    }

    /// Moves an achievement to the unlocked list, records it in the
    /// player's history, and optionally queues a notification. No-op when
    /// already unlocked.
    fn unlock_at(&mut self, gamer: GamerId, handle: AchievementHandle, day: u32, notify: bool) {
        if !self.locked_set.contains(&handle) {
            return;
        }
        let Some(pos) = self.locked.iter().position(|&h| h == handle) else {
            return;
        };

        // Removal shifts the tail left; pull the cursor with it so the walk
        // stays on the element it would test next.
        if pos as isize <= self.cursor {
            self.cursor -= 1;
        }
        self.locked.remove(pos);
        self.locked_set.remove(&handle);
        self.unlocked.push(handle);

        let achievement = &self.achievements[handle.0];
        let mod_id = achievement.mod_id().clone();
        let id = achievement.id().to_string();
        debug!(%mod_id, %id, day, "achievement unlocked");

        self.unlocks
            .entry(gamer)
            .or_default()
            .record(mod_id, id, day);

        if notify {
            self.pending.push(UnlockNotification {
                handle,
                duration: self.timing.duration,
                fade: self.timing.fade,
                sound: self.time_since_unlock >= self.timing.sound_cooldown,
            });
            self.time_since_unlock = 0.0;
        }
    }

    /// Re-applies this player's saved unlocks, once per manager lifetime.
    /// Replayed unlocks are silent. Records naming achievements no mod has
    /// registered stay in the history untouched.
    fn replay_history(&mut self, gamer: GamerId) {
        if !self.replayed.insert(gamer) {
            return;
        }
        let Some(data) = self.unlocks.get(&gamer) else {
            return;
        };

        let mut hits = Vec::new();
        for record in data.records() {
            match self.handle_of(&record.mod_id, &record.achievement_id) {
                Some(handle) => hits.push((handle, record.day)),
                None => debug!(
                    mod_id = %record.mod_id,
                    id = %record.achievement_id,
                    "saved unlock references an unregistered achievement"
                ),
            }
        }
        for (handle, day) in hits {
            self.unlock_at(gamer, handle, day, false);
        }
    }

    /// Queued unlock notifications, clearing the queue.
    pub fn drain_notifications(&mut self) -> Vec<UnlockNotification> {
        std::mem::take(&mut self.pending)
    }

    /// Queued unlock notifications without clearing.
    pub fn peek_notifications(&self) -> &[UnlockNotification] {
        &self.pending
    }

    pub fn unlock_history(&self, gamer: GamerId) -> Option<&AchievementUnlockData> {
        self.unlocks.get(&gamer)
    }

    /// Writes every player's unlock history.
    pub fn write_unlock_state<W: Write>(&self, w: &mut W) -> Result<(), PluginError> {
        codec::write_u32(w, self.unlocks.len() as u32)?;
        for (gamer, data) in &self.unlocks {
            codec::write_u64(w, gamer.0)?;
            data.write_state(w)?;
        }
        Ok(())
    }

    /// Replaces the in-memory histories with saved ones. Players already
    /// replayed this session keep that status; everyone else replays on
    /// their next update.
    pub fn read_unlock_state<R: Read>(&mut self, r: &mut R) -> Result<(), PluginError> {
        let count = codec::read_u32(r)?;
        let mut unlocks = BTreeMap::new();
        for _ in 0..count {
            let gamer = GamerId(codec::read_u64(r)?);
            let data = AchievementUnlockData::read_state(r)?;
            unlocks.insert(gamer, data);
        }
        self.unlocks = unlocks;
        Ok(())
    }
}

impl<C, P> Default for AchievementManager<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, P> fmt::Debug for AchievementManager<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementManager")
            .field("achievements", &self.achievements.len())
            .field("locked", &self.locked.len())
            .field("unlocked", &self.unlocked.len())
            .field("players", &self.unlocks.len())
            .finish()
    }
}
