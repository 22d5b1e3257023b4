//! Anchor elements the tag library draws into.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global anchor ID counter
static NEXT_ANCHOR_ID: AtomicU64 = AtomicU64::new(1);

/// Page-unique id of the element a slot is drawn into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorId(u64);

impl AnchorId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_ANCHOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// DOM id, e.g. `rgpt-3`.
    pub fn element_id(&self) -> String {
        format!("rgpt-{}", self.0)
    }

    /// Markup injected into the placement holder.
    pub fn markup(&self) -> String {
        format!(r#"<div id="{}"></div>"#, self.element_id())
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgpt-{}", self.0)
    }
}
