//! YAML scene loader.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sim_core::presets::GrammarSource;
use sim_core::{FlockParams, PlantParams};
use std::path::Path;

/// One host scene: a plant and a flock. Any section or field may be
/// left out of the file and falls back to its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub plant: PlantScene,
    pub flock: FlockParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantScene {
    #[serde(flatten)]
    pub params: PlantParams,
    pub grammar: GrammarSource,
}

impl Scene {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing scene {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
