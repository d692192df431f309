//! Plugin error handling.
//!
//! Covers the save path (IO, corrupt payloads, version framing) and the
//! synchronous programming errors of the registration API.

use thiserror::Error;

/// Errors surfaced by the achievement plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Save orchestration error with path context attached.
    #[error("save system error: {0}")]
    SaveError(#[from] anyhow::Error),

    /// Raw IO failure.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// A save payload that cannot be decoded (bad UTF-8, out-of-range
    /// table index, oversized length prefix).
    #[error("corrupted save data: {0}")]
    CorruptedSave(String),

    /// The plugin-save-version in a file is newer than this build
    /// understands. Loading decisions belong to the caller, so this is
    /// raised by the loader, never by the codec.
    #[error("unsupported save version {found} (newest supported is {supported})")]
    VersionMismatch { found: u32, supported: u32 },

    /// Evaluator registration against a (mod, id) pair that was never
    /// registered. Query-path lookups return `None` instead; only the
    /// registration API treats this as a caller bug.
    #[error("unknown achievement {mod_id}:{id}")]
    UnknownAchievement { mod_id: String, id: String },

    /// A second progress function for the same achievement.
    #[error("achievement {mod_id}:{id} already has a progress function")]
    ProgressFuncTaken { mod_id: String, id: String },

    /// An icon or background key that was never registered.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// A declarative achievement record that does not parse. Loaders skip
    /// the record and keep going; this variant reports the single file.
    #[error("invalid achievement record: {0}")]
    InvalidRecord(String),
}

impl From<std::string::FromUtf8Error> for PluginError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        PluginError::CorruptedSave(format!("invalid utf-8 in string: {err}"))
    }
}
