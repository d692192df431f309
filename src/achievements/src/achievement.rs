//! Achievement definitions and evaluator types.

use error::PluginError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Art key used when a definition supplies no icon or background.
pub const DEFAULT_ART: &str = "Default";

/// Identifier of the mod that owns an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModId(String);

impl ModId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unlock predicate supplied by host-integration code.
pub type UnlockFn<C, P> = Box<dyn Fn(&C, &P) -> bool>;

/// Progress evaluator supplied by host-integration code.
pub type ProgressFn<C, P> = Box<dyn Fn(&C, &P) -> Progress>;

/// Display progress toward an unlock.
///
/// Advisory only: the engine never reads the ratio to decide unlocks, and
/// a ratio of 1.0 does not mean the achievement is unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Completion in [0, 1].
    pub ratio: f32,
    /// Display text; when absent the engine formats the ratio as a
    /// percentage.
    pub text: Option<String>,
}

impl Progress {
    pub fn new(ratio: f32) -> Self {
        Self { ratio, text: None }
    }

    pub fn labeled(ratio: f32, text: impl Into<String>) -> Self {
        Self {
            ratio,
            text: Some(text.into()),
        }
    }
}

/// Partial display-field override from a later-loaded record. Only the
/// populated fields are applied; identity is never patched.
#[derive(Debug, Clone, Default)]
pub struct InfoPatch {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub icon: Option<String>,
    pub background: Option<String>,
}

/// One unlockable goal.
///
/// Identity is the (mod, id) pair and is immutable after creation.
/// Display fields may be patched by [`Achievement::update_info`]. Unlock
/// conditions are owned by the achievement, ordered by registration, and
/// any one of them firing unlocks it.
pub struct Achievement<C, P> {
    mod_id: ModId,
    id: String,
    name: String,
    desc: String,
    icon: String,
    background: String,
    unlock_conditions: Vec<UnlockFn<C, P>>,
    progress_func: Option<ProgressFn<C, P>>,
}

impl<C, P> Achievement<C, P> {
    pub fn new(
        mod_id: ModId,
        id: impl Into<String>,
        name: impl Into<String>,
        desc: impl Into<String>,
        icon: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            mod_id,
            id: id.into(),
            name: name.into(),
            desc: desc.into(),
            icon: icon.into(),
            background: background.into(),
            unlock_conditions: Vec::new(),
            progress_func: None,
        }
    }

    pub fn mod_id(&self) -> &ModId {
        &self.mod_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    /// Whether any unlock condition is registered.
    pub fn has_unlock(&self) -> bool {
        !self.unlock_conditions.is_empty()
    }

    /// Whether a progress function is registered.
    pub fn has_progress(&self) -> bool {
        self.progress_func.is_some()
    }

    /// Registers one more unlock condition. Conditions are kept in
    /// registration order.
    pub fn add_unlock_condition(&mut self, condition: impl Fn(&C, &P) -> bool + 'static) {
        self.unlock_conditions.push(Box::new(condition));
    }

    /// Registers the progress function. At most one is allowed; a second
    /// registration is rejected rather than silently replacing the first.
    pub fn add_progress_func(
        &mut self,
        func: impl Fn(&C, &P) -> Progress + 'static,
    ) -> Result<(), PluginError> {
        if self.progress_func.is_some() {
            return Err(PluginError::ProgressFuncTaken {
                mod_id: self.mod_id.to_string(),
                id: self.id.clone(),
            });
        }
        self.progress_func = Some(Box::new(func));
        Ok(())
    }

    /// True when any registered condition passes. Conditions run in
    /// registration order and evaluation stops at the first success;
    /// with no conditions this is immediately false.
    pub fn test_unlock(&self, ctx: &C, player: &P) -> bool {
        self.unlock_conditions
            .iter()
            .any(|condition| condition(ctx, player))
    }

    /// Progress toward unlocking, if a progress function is registered.
    pub fn get_progress(&self, ctx: &C, player: &P) -> Option<Progress> {
        let func = self.progress_func.as_ref()?;
        let mut progress = func(ctx, player);
        if progress.text.is_none() {
            progress.text = Some(format!("{:.0}%", progress.ratio * 100.0));
        }
        Some(progress)
    }

    /// Applies the populated fields of a cross-mod override.
    pub fn update_info(&mut self, patch: InfoPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(desc) = patch.desc {
            self.desc = desc;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(background) = patch.background {
            self.background = background;
        }
    }
}

impl<C, P> fmt::Debug for Achievement<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement")
            .field("mod_id", &self.mod_id)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("unlock_conditions", &self.unlock_conditions.len())
            .field("has_progress", &self.progress_func.is_some())
            .finish()
    }
}
