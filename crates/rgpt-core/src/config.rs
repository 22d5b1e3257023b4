//! Placement configuration
//!
//! Mirrors the props a page hands to an ad placement. Keys are camelCase so
//! the same JSON the page already renders can be deserialized directly.

use crate::format::{Dimension, Format};
use crate::targeting::Targeting;
use serde::{Deserialize, Serialize};

/// One breakpoint of a server-side size map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMappingEntry {
    /// Minimum viewport size for this entry to apply
    pub viewport: Dimension,
    /// Sizes allowed at this viewport; empty means no ad
    #[serde(default)]
    pub sizes: Vec<Dimension>,
}

/// Viewport breakpoints evaluated by the tag library itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeMapping(pub Vec<SizeMappingEntry>);

impl SizeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a breakpoint.
    pub fn with_entry(mut self, viewport: Dimension, sizes: Vec<Dimension>) -> Self {
        self.0.push(SizeMappingEntry { viewport, sizes });
        self
    }

    pub fn entries(&self) -> &[SizeMappingEntry] {
        &self.0
    }
}

/// Immutable per-render configuration of one ad placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Ad unit path, passed verbatim to the slot definition
    pub path: String,

    /// Default size table when no explicit dimensions are given
    #[serde(default)]
    pub format: Format,

    /// Explicit size override
    #[serde(default)]
    pub dimensions: Option<Vec<Dimension>>,

    /// Filter sizes by container width and follow window resizes
    #[serde(default = "default_true")]
    pub responsive: bool,

    /// Allow a single explicit size to expand into its fallback chain
    #[serde(default = "default_true")]
    pub can_be_lower: bool,

    /// Targeting applied once when the slot is created
    #[serde(default)]
    pub targeting: Targeting,

    /// Server-side responsive size map
    #[serde(default)]
    pub size_map: Option<SizeMapping>,

    /// Window width gate; `-1` in serialized form means unbounded
    #[serde(default, with = "window_bound")]
    pub min_window_width: Option<u32>,

    /// Window width gate; `-1` in serialized form means unbounded
    #[serde(default, with = "window_bound")]
    pub max_window_width: Option<u32>,

    /// Listen for the page-wide refresh signal
    #[serde(default)]
    pub allow_refresh: bool,
}

fn default_true() -> bool {
    true
}

impl PlacementConfig {
    /// Create a configuration with default settings for the given ad unit.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: Format::default(),
            dimensions: None,
            responsive: true,
            can_be_lower: true,
            targeting: Targeting::new(),
            size_map: None,
            min_window_width: None,
            max_window_width: None,
            allow_refresh: false,
        }
    }

    /// Set the ad format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set explicit dimensions, overriding the format table.
    pub fn with_dimensions(mut self, dimensions: impl IntoIterator<Item = [u32; 2]>) -> Self {
        self.dimensions = Some(dimensions.into_iter().map(Dimension::from).collect());
        self
    }

    /// Set whether sizes are filtered by container width.
    pub fn with_responsive(mut self, responsive: bool) -> Self {
        self.responsive = responsive;
        self
    }

    /// Set whether a single dimension may expand to its smaller aliases.
    pub fn with_can_be_lower(mut self, can_be_lower: bool) -> Self {
        self.can_be_lower = can_be_lower;
        self
    }

    /// Add a targeting key/value pair.
    pub fn with_targeting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.targeting.insert(key, value);
        self
    }

    /// Set the responsive size mapping.
    pub fn with_size_map(mut self, size_map: SizeMapping) -> Self {
        self.size_map = Some(size_map);
        self
    }

    /// Set the minimum window width bound.
    pub fn with_min_window_width(mut self, width: u32) -> Self {
        self.min_window_width = Some(width);
        self
    }

    /// Set the maximum window width bound.
    pub fn with_max_window_width(mut self, width: u32) -> Self {
        self.max_window_width = Some(width);
        self
    }

    /// Set whether the placement follows page-wide refreshes.
    pub fn with_allow_refresh(mut self, allow_refresh: bool) -> Self {
        self.allow_refresh = allow_refresh;
        self
    }

    /// Whether an existing slot is refreshed in place instead of recreated.
    pub fn has_size_map(&self) -> bool {
        self.size_map.is_some()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if let Some(dimension) = self.dimensions.iter().flatten().find(|d| d.is_empty()) {
            return Err(ConfigError::ZeroDimension(*dimension));
        }
        if self.targeting.iter().any(|(key, _)| key.is_empty()) {
            return Err(ConfigError::EmptyTargetingKey);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Ad unit path must not be empty")]
    EmptyPath,

    #[error("Dimension {0} has a zero side")]
    ZeroDimension(Dimension),

    #[error("Targeting keys must not be empty")]
    EmptyTargetingKey,
}

/// `-1` <-> `None` for the window width gates.
mod window_bound {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const UNBOUNDED: i64 = -1;

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(width) => serializer.serialize_i64(i64::from(*width)),
            None => serializer.serialize_i64(UNBOUNDED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match i64::deserialize(deserializer)? {
            UNBOUNDED => Ok(None),
            width => u32::try_from(width)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid window width {width}, expected -1 or a pixel width"))),
        }
    }
}
