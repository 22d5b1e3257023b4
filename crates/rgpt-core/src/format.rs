//! Ad dimensions and the standard format tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of an ad creative, in CSS pixels.
///
/// Serialized as a `[width, height]` pair, the shape the tag library expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    /// Create a new dimension
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Key used by the alias table, e.g. `"300x600"`.
    pub fn alias_key(&self) -> String {
        self.to_string()
    }

    /// True when either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<[u32; 2]> for Dimension {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Dimension> for [u32; 2] {
    fn from(dimension: Dimension) -> Self {
        [dimension.width, dimension.height]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Named size preset used when a placement gives no explicit dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    /// Leaderboards and banners
    #[default]
    Horizontal,
    /// Medium rectangles and squares
    Rectangle,
    /// Skyscrapers
    Vertical,
    /// Mobile banner
    Mobile,
    /// Any name this crate does not know; resolves to no sizes
    #[serde(other)]
    Unknown,
}

impl Format {
    /// Standard sizes for this format, most preferred first.
    pub fn dimensions(self) -> &'static [Dimension] {
        match self {
            Self::Horizontal => HORIZONTAL,
            Self::Rectangle => RECTANGLE,
            Self::Vertical => VERTICAL,
            Self::Mobile => MOBILE,
            Self::Unknown => &[],
        }
    }
}

const HORIZONTAL: &[Dimension] = &[
    Dimension::new(970, 90),
    Dimension::new(728, 90),
    Dimension::new(468, 60),
    Dimension::new(234, 60),
];

const RECTANGLE: &[Dimension] = &[
    Dimension::new(336, 280),
    Dimension::new(300, 250),
    Dimension::new(250, 250),
    Dimension::new(200, 200),
    Dimension::new(180, 150),
    Dimension::new(125, 125),
];

const VERTICAL: &[Dimension] = &[
    Dimension::new(300, 600),
    Dimension::new(160, 600),
    Dimension::new(120, 600),
    Dimension::new(120, 240),
];

const MOBILE: &[Dimension] = &[Dimension::new(320, 50)];

/// Fallback chains for a single requested size, keyed by `"WxH"`.
const ALIASES: &[(&str, &[Dimension])] = &[
    ("300x600", &[Dimension::new(300, 600), Dimension::new(160, 600)]),
    ("336x280", &[Dimension::new(336, 280), Dimension::new(300, 250)]),
    ("728x90", &[Dimension::new(728, 90), Dimension::new(468, 60)]),
    (
        "970x90",
        &[Dimension::new(970, 90), Dimension::new(728, 90), Dimension::new(468, 60)],
    ),
];

/// The whole alias table.
pub fn alias_table() -> &'static [(&'static str, &'static [Dimension])] {
    ALIASES
}

/// Look up the fallback chain for an alias key such as `"728x90"`.
pub fn fallback_for(key: &str) -> Option<&'static [Dimension]> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, dimensions)| *dimensions)
}
