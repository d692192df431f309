//! Save-file plumbing: wire primitives, versioned framing, and atomic
//! whole-file writes.
//!
//! Every plugin save file starts with a (host save version, plugin save
//! version) pair. The framing is written and parsed here; what the pair
//! means for compatibility is the loader's decision, not this crate's.

pub mod codec;

use anyhow::Context;
use error::PluginError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The version pair framing every save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPair {
    /// The host game's save version at write time.
    pub host: u32,
    /// The plugin's own save format version.
    pub plugin: u32,
}

/// Handle to the directory holding one world's plugin save files.
pub struct WorldSaves {
    dir: PathBuf,
}

impl WorldSaves {
    /// Opens the save directory for a world, creating it if missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, PluginError> {
        let dir = dir.as_ref();

        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create save directory")?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Writes one save file: version pair, then the payload bytes.
    ///
    /// The write goes to a temporary file first and is committed with a
    /// rename, so a crash mid-write never leaves a half-written file
    /// under the real name.
    pub fn store(
        &self,
        name: &str,
        versions: VersionPair,
        payload: &[u8],
    ) -> Result<(), PluginError> {
        let path = self.dir.join(name);
        let temp_path = path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary save file")?;
        codec::write_u32(&mut file, versions.host)?;
        codec::write_u32(&mut file, versions.plugin)?;
        file.write_all(payload).context("Failed to write save payload")?;
        file.flush().context("Failed to flush save data")?;

        fs::rename(temp_path, path).context("Failed to commit save file")?;

        Ok(())
    }

    /// Reads one save file whole, returning its version pair and payload.
    ///
    /// A missing file is `Ok(None)`: a fresh world, not an error.
    pub fn load(&self, name: &str) -> Result<Option<(VersionPair, Vec<u8>)>, PluginError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read save file: {path:?}"))?;
        let mut rest = bytes.as_slice();
        let versions = VersionPair {
            host: codec::read_u32(&mut rest)?,
            plugin: codec::read_u32(&mut rest)?,
        };

        Ok(Some((versions, rest.to_vec())))
    }

    /// The directory this handle writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a save file with this name exists.
    pub fn has_file(&self, name: &str) -> bool {
        self.dir.join(name).exists()
    }
}
