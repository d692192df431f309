//! Plugin shell wiring the achievement manager to a game host.

use crate::assets::{AssetCatalog, art_names};
use crate::config::PluginConfig;
use crate::craft::CraftTracker;
use crate::host::{HostEvent, ItemId};
use crate::notify::NotificationQueue;
use crate::records;
use achievements::{
    Achievement, AchievementHandle, AchievementManager, DEFAULT_ART, ModId, Player, Progress,
    ProgressFn, Session, UnlockFn,
};
use error::PluginError;
use save::{VersionPair, WorldSaves};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Version of [`AchievementsApi`] this build exposes. Callers reaching the
/// plugin across a dynamic boundary should check it before using the rest
/// of the surface.
pub const API_VERSION: u32 = 1;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// World save file holding per-player unlock histories.
pub const ACHIEVEMENTS_FILE: &str = "achievements.dat";
/// World save file holding per-player craft counters.
pub const DATA_FILE: &str = "achievementsdata.dat";

/// State a subscribed handler may touch while an event is dispatched.
pub struct EventContext<'a, C, P> {
    pub manager: &'a mut AchievementManager<C, P>,
    pub crafts: &'a CraftTracker,
}

/// Handler invoked for host events of a subscribed kind.
pub type EventHandler<C, P> = Box<dyn Fn(&mut EventContext<'_, C, P>, &C, &P, &HostEvent)>;

/// Surface other mods program against.
///
/// Object safe so a host can hand it out as `&mut dyn AchievementsApi`
/// without exposing the plugin type itself.
pub trait AchievementsApi<C, P> {
    fn api_version(&self) -> u32;

    /// Registers an achievement owned by `owner`. Returns the existing
    /// handle when the pair is already registered.
    fn add_achievement(
        &mut self,
        owner: &ModId,
        id: &str,
        name: &str,
        desc: &str,
        icon: &str,
        background: &str,
    ) -> AchievementHandle;

    fn get_achievement(&self, owner: &ModId, id: &str) -> Option<&Achievement<C, P>>;

    fn add_unlock_condition(
        &mut self,
        owner: &ModId,
        id: &str,
        f: UnlockFn<C, P>,
    ) -> Result<(), PluginError>;

    fn add_progress_func(
        &mut self,
        owner: &ModId,
        id: &str,
        f: ProgressFn<C, P>,
    ) -> Result<(), PluginError>;

    fn get_progress(&self, ctx: &C, player: &P, owner: &ModId, id: &str) -> Option<Progress>;

    fn unlock_achievement(&mut self, ctx: &C, player: &P, owner: &ModId, id: &str);

    fn is_achievement_unlocked(&self, player: &P, owner: &ModId, id: &str) -> bool;

    fn is_achievement_locked(&self, player: &P, owner: &ModId, id: &str) -> bool;

    /// Times the player has crafted the item, counting crafts rather than
    /// produced items.
    fn crafted_count(&self, player: &P, item: ItemId) -> u32;

    fn has_crafted(&self, player: &P, item: ItemId) -> bool;

    /// Subscribes a handler to every event of the given kind. Handlers
    /// cannot be removed; they live as long as the plugin.
    fn subscribe(&mut self, kind: &'static str, handler: EventHandler<C, P>);
}

/// The achievements plugin: registry, craft counters, content loading,
/// toast queue, and world save wiring.
pub struct AchievementsPlugin<C, P> {
    manager: AchievementManager<C, P>,
    tracker: CraftTracker,
    catalog: AssetCatalog,
    notifications: NotificationQueue,
    config: PluginConfig,
    handlers: HashMap<&'static str, Vec<EventHandler<C, P>>>,
}

impl<C, P> AchievementsPlugin<C, P> {
    pub fn new(config: PluginConfig, item_count: usize) -> Self {
        let mut manager = AchievementManager::new();
        manager.set_timing(config.notify_timing());

        let mut catalog = AssetCatalog::new();
        catalog.register_icon(DEFAULT_ART);
        catalog.register_background(DEFAULT_ART);

        Self {
            manager,
            tracker: CraftTracker::new(item_count),
            catalog,
            notifications: NotificationQueue::new(),
            config,
            handlers: HashMap::new(),
        }
    }

    pub fn manager(&self) -> &AchievementManager<C, P> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut AchievementManager<C, P> {
        &mut self.manager
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn crafts(&self) -> &CraftTracker {
        &self.tracker
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Loads a mod's achievement records and applies them to the registry.
    /// Call once per active mod, in load order.
    pub fn load_mod_records(&mut self, owner: &ModId, dir: &Path, active_mode: &str) {
        let records = records::load_records_dir(dir);
        records::apply_records(&mut self.manager, owner, records, active_mode);
    }

    /// Registers the art a mod ships under `Icons/` and `Backgrounds/`.
    pub fn load_mod_art(&mut self, dir: &Path) {
        for name in art_names(&dir.join("Icons")) {
            self.catalog.register_icon(name);
        }
        for name in art_names(&dir.join("Backgrounds")) {
            self.catalog.register_background(name);
        }
    }

    /// Routes one host event: craft counters first, then the subscribed
    /// handlers, so handlers observe the craft that triggered them.
    pub fn handle_event(&mut self, ctx: &C, player: &P, event: &HostEvent)
    where
        P: Player,
    {
        if let HostEvent::ItemCrafted { item } = event {
            self.tracker.record(player.gamer_id(), *item);
        }

        let Some(handlers) = self.handlers.get(event.kind()) else {
            return;
        };
        let mut view = EventContext {
            manager: &mut self.manager,
            crafts: &self.tracker,
        };
        for handler in handlers {
            handler(&mut view, ctx, player, event);
        }
    }

    /// Per-player frame driver: runs the manager's polling and moves the
    /// freshly raised notifications into the toast queue.
    pub fn update(&mut self, ctx: &C, player: &P, dt: f32)
    where
        C: Session,
        P: Player,
    {
        self.manager.update(ctx, player, dt);
        self.notifications.extend(self.manager.drain_notifications());
    }

    /// Ages the toast queue. Call once per frame, not once per player.
    pub fn tick_notifications(&mut self, dt: f32) {
        self.notifications.tick(dt);
    }

    /// Writes both world save files: unlock histories and craft counters.
    pub fn save_world(&self, saves: &WorldSaves, host_version: u32) -> Result<(), PluginError> {
        let versions = VersionPair {
            host: host_version,
            plugin: SAVE_VERSION,
        };

        let mut payload = Vec::new();
        self.manager.write_unlock_state(&mut payload)?;
        saves.store(ACHIEVEMENTS_FILE, versions, &payload)?;

        let mut payload = Vec::new();
        self.tracker.write_state(&mut payload)?;
        saves.store(DATA_FILE, versions, &payload)?;

        debug!(dir = %saves.dir().display(), "wrote achievement save files");
        Ok(())
    }

    /// Restores both world save files. Missing files leave fresh state; a
    /// save written by a newer plugin version is rejected.
    pub fn load_world(&mut self, saves: &WorldSaves) -> Result<(), PluginError> {
        if let Some((versions, payload)) = saves.load(ACHIEVEMENTS_FILE)? {
            check_version(versions)?;
            self.manager.read_unlock_state(&mut payload.as_slice())?;
        }
        if let Some((versions, payload)) = saves.load(DATA_FILE)? {
            check_version(versions)?;
            self.tracker.read_state(&mut payload.as_slice())?;
        }
        Ok(())
    }
}

fn check_version(versions: VersionPair) -> Result<(), PluginError> {
    if versions.plugin > SAVE_VERSION {
        return Err(PluginError::VersionMismatch {
            found: versions.plugin,
            supported: SAVE_VERSION,
        });
    }
    Ok(())
}

impl<C: Session + 'static, P: Player + 'static> AchievementsApi<C, P> for AchievementsPlugin<C, P> {
    fn api_version(&self) -> u32 {
        API_VERSION
    }

    fn add_achievement(
        &mut self,
        owner: &ModId,
        id: &str,
        name: &str,
        desc: &str,
        icon: &str,
        background: &str,
    ) -> AchievementHandle {
        self.manager
            .add_achievement(Achievement::new(owner.clone(), id, name, desc, icon, background))
    }

    fn get_achievement(&self, owner: &ModId, id: &str) -> Option<&Achievement<C, P>> {
        self.manager.get_achievement(owner, id)
    }

    fn add_unlock_condition(
        &mut self,
        owner: &ModId,
        id: &str,
        f: UnlockFn<C, P>,
    ) -> Result<(), PluginError> {
        self.manager.add_unlock_condition(owner, id, f)
    }

    fn add_progress_func(
        &mut self,
        owner: &ModId,
        id: &str,
        f: ProgressFn<C, P>,
    ) -> Result<(), PluginError> {
        self.manager.add_progress_func(owner, id, f)
    }

    fn get_progress(&self, ctx: &C, player: &P, owner: &ModId, id: &str) -> Option<Progress> {
        self.manager.get_progress(ctx, player, owner, id)
    }

    fn unlock_achievement(&mut self, ctx: &C, player: &P, owner: &ModId, id: &str) {
        self.manager.unlock_achievement(ctx, player, owner, id);
    }

    fn is_achievement_unlocked(&self, player: &P, owner: &ModId, id: &str) -> bool {
        self.manager.is_achievement_unlocked(player, owner, id)
    }

    fn is_achievement_locked(&self, player: &P, owner: &ModId, id: &str) -> bool {
        self.manager.is_achievement_locked(player, owner, id)
    }

    fn crafted_count(&self, player: &P, item: ItemId) -> u32 {
        self.tracker.crafted(player.gamer_id(), item)
    }

    fn has_crafted(&self, player: &P, item: ItemId) -> bool {
        self.tracker.has_crafted(player.gamer_id(), item)
    }

    fn subscribe(&mut self, kind: &'static str, handler: EventHandler<C, P>) {
        self.handlers.entry(kind).or_default().push(handler);
    }
}

impl<C, P> fmt::Debug for AchievementsPlugin<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementsPlugin")
            .field("manager", &self.manager)
            .field("toasts", &self.notifications.len())
            .field("handler_kinds", &self.handlers.len())
            .finish()
    }
}
