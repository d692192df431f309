//! Icon and background art registry.

use error::PluginError;
use std::collections::HashMap;
use std::path::Path;

const ART_EXTENSIONS: [&str; 6] = ["png", "jpg", "bmp", "tif", "tiff", "dds"];

/// Atlas slot for one piece of art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub u32);

/// Art registered by content packs, looked up by name at draw time.
///
/// Icons and backgrounds are separate namespaces. Re-registering a name
/// keeps its slot, so a pack loaded later can restyle art an earlier pack
/// shipped.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    icons: HashMap<String, AssetId>,
    backgrounds: HashMap<String, AssetId>,
    next_icon: u32,
    next_background: u32,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_icon(&mut self, name: impl Into<String>) -> AssetId {
        let name = name.into();
        if let Some(id) = self.icons.get(&name) {
            return *id;
        }
        let id = AssetId(self.next_icon);
        self.next_icon += 1;
        self.icons.insert(name, id);
        id
    }

    pub fn register_background(&mut self, name: impl Into<String>) -> AssetId {
        let name = name.into();
        if let Some(id) = self.backgrounds.get(&name) {
            return *id;
        }
        let id = AssetId(self.next_background);
        self.next_background += 1;
        self.backgrounds.insert(name, id);
        id
    }

    pub fn icon(&self, name: &str) -> Result<AssetId, PluginError> {
        self.icons
            .get(name)
            .copied()
            .ok_or_else(|| PluginError::MissingAsset(name.to_string()))
    }

    pub fn background(&self, name: &str) -> Result<AssetId, PluginError> {
        self.backgrounds
            .get(name)
            .copied()
            .ok_or_else(|| PluginError::MissingAsset(name.to_string()))
    }

    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    pub fn background_count(&self) -> usize {
        self.backgrounds.len()
    }
}

/// File stems of the image files in a directory, sorted for stable slot
/// assignment. A missing directory is an empty result.
pub fn art_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return names;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !ART_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    names
}
