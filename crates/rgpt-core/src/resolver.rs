//! Dimension resolution
//!
//! Turns a [`PlacementConfig`] and the current layout into the ordered list
//! of sizes a slot may be requested with.

use crate::config::PlacementConfig;
use crate::format::{Dimension, fallback_for};
use tracing::trace;

/// Base candidate list before any layout filtering.
///
/// Without explicit dimensions the format table is used. A single explicit
/// dimension expands into its alias fallback chain when `can_be_lower` is set
/// and the alias table knows it.
pub fn candidates(config: &PlacementConfig) -> Vec<Dimension> {
    let explicit = match config.dimensions.as_deref() {
        None | Some([]) => return config.format.dimensions().to_vec(),
        Some(explicit) => explicit,
    };

    if let [single] = explicit {
        if config.can_be_lower {
            if let Some(chain) = fallback_for(&single.alias_key()) {
                return chain.to_vec();
            }
        }
    }

    explicit.to_vec()
}

/// Whether the window width gate hides the placement entirely.
///
/// The comparisons are taken literally: a configured minimum hides the ad
/// on windows wider than it, a configured maximum hides it on windows
/// narrower than it.
pub fn is_window_gated(config: &PlacementConfig, window_width: u32) -> bool {
    config.min_window_width.is_some_and(|min| min < window_width)
        || config.max_window_width.is_some_and(|max| max > window_width)
}

/// Resolve the sizes valid for the current container and window.
pub fn resolve(config: &PlacementConfig, container_width: u32, window_width: u32) -> Vec<Dimension> {
    if is_window_gated(config, window_width) {
        trace!(path = %config.path, window_width, "placement gated by window width");
        return Vec::new();
    }

    let mut dimensions = candidates(config);
    if config.responsive {
        dimensions.retain(|dimension| dimension.width <= container_width);
    }
    dimensions
}
