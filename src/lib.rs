//! Achievement plugin for a voxel-sandbox game host.
//!
//! The engine itself lives in the [`achievements`] crate; this crate wraps
//! it in everything a host integration needs: the versioned
//! [`plugin::AchievementsApi`] surface, host-event dispatch, craft
//! counters, declarative content records, the toast queue, config, and the
//! world save files.

pub mod assets;
pub mod config;
pub mod craft;
pub mod host;
pub mod notify;
pub mod plugin;
pub mod records;

pub use achievements;
pub use error;
pub use save;

pub use config::PluginConfig;
pub use host::{BlockId, HostEvent, ItemId};
pub use plugin::{API_VERSION, AchievementsApi, AchievementsPlugin, SAVE_VERSION};
