use std::{fs, path::Path};

use cpix_engine::{DEFAULT_CPC, DEFAULT_HBLOCKS, DEFAULT_PPB, DEFAULT_RESOLUTION, DEFAULT_TEXT_WEIGHT, DEFAULT_VBLOCKS, DocumentProperties, LayerUpdate};
use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Properties given to new layers unless the operation sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDefaults {
    pub resolution: usize,
    pub cpc: usize,
    pub text_margin: u32,
    pub text_weight: u32,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            cpc: DEFAULT_CPC,
            text_margin: 0,
            text_weight: DEFAULT_TEXT_WEIGHT,
        }
    }
}

impl LayerDefaults {
    pub fn fill(&self, update: &LayerUpdate) -> LayerUpdate {
        LayerUpdate {
            resolution: update.resolution.or(Some(self.resolution)),
            cpc: update.cpc.or(Some(self.cpc)),
            text_margin: update.text_margin.or(Some(self.text_margin)),
            text_weight: update.text_weight.or(Some(self.text_weight)),
            ..update.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentDefaults {
    pub hblocks: usize,
    pub vblocks: usize,
    pub ppb: u32,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            hblocks: DEFAULT_HBLOCKS,
            vblocks: DEFAULT_VBLOCKS,
            ppb: DEFAULT_PPB,
        }
    }
}

impl DocumentDefaults {
    pub fn fill(&self, properties: &DocumentProperties) -> DocumentProperties {
        DocumentProperties {
            name: properties.name.clone(),
            hblocks: properties.hblocks.or(Some(self.hblocks)),
            vblocks: properties.vblocks.or(Some(self.vblocks)),
            ppb: properties.ppb.or(Some(self.ppb)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Number of undo steps kept; older ones are dropped.
    pub history_limit: usize,
    pub default_layer: LayerDefaults,
    pub default_document: DocumentDefaults,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_layer: LayerDefaults::default(),
            default_document: DocumentDefaults::default(),
        }
    }
}

impl EditorOptions {
    /// # Errors
    ///
    /// Fails if the file can't be read or isn't valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let options: EditorOptions = toml::from_str(&content)?;
        Ok(options)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
