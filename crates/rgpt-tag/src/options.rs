//! Page-wide tag library options.

use rgpt_core::Targeting;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where the tag library script is loaded from.
pub const DEFAULT_SCRIPT_URL: &str = "https://www.googletagservices.com/tag/js/gpt.js";

/// Options applied once when the tag library is bootstrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagOptions {
    /// Script injected into the page
    pub script_url: Url,

    /// Render creatives without blocking the page
    pub async_rendering: bool,

    /// Collapse slot containers that receive no creative
    pub collapse_empty_divs: bool,

    /// Only request ads on explicit refresh
    pub disable_initial_load: bool,

    /// Location of the embedding page when running inside a frame
    pub parent_page_url: Option<Url>,

    /// Targeting merged under every placement's own targeting
    pub targeting: Targeting,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            script_url: default_script_url(),
            async_rendering: true,
            collapse_empty_divs: true,
            disable_initial_load: true,
            parent_page_url: None,
            targeting: Targeting::new(),
        }
    }
}

fn default_script_url() -> Url {
    Url::parse(DEFAULT_SCRIPT_URL).expect("Hardcoded script url should be valid")
}

impl TagOptions {
    /// Options for a page embedded in a frame whose parent lives at `url`.
    pub fn framed(url: Url) -> Self {
        Self {
            parent_page_url: Some(url),
            ..Self::default()
        }
    }
}
