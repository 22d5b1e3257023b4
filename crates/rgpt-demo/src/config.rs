//! Demo page description.

use anyhow::{Context, Result};
use rgpt_core::PlacementConfig;
use rgpt_tag::TagOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Built-in page used when no file is given
const SAMPLE_PAGE: &str = include_str!("../page.toml");

/// One placement and the container it renders into
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSpec {
    /// Width the container takes on a wide window
    pub container_width: u32,
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub config: PlacementConfig,
}

/// Page layout plus the sequence of window changes to simulate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub window_width: u32,
    #[serde(default)]
    pub tag: TagOptions,
    #[serde(default)]
    pub placements: Vec<PlacementSpec>,
    /// Window widths applied one after another
    #[serde(default)]
    pub resize: Vec<u32>,
    /// Broadcast the refresh signal after the resizes
    #[serde(default)]
    pub refresh: bool,
}

impl PageSpec {
    /// Load a page description from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid page description {}", path.display()))
    }

    pub fn sample() -> Result<Self> {
        Self::parse(SAMPLE_PAGE)
    }

    fn parse(text: &str) -> Result<Self> {
        let spec: PageSpec = toml::from_str(text)?;
        for placement in &spec.placements {
            placement
                .config
                .validate()
                .with_context(|| format!("Placement {}", placement.config.path))?;
        }
        Ok(spec)
    }
}
