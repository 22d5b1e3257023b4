//! Page runtime - owns the window, the tag service and every placement.

use crate::controller::Reconciled;
use crate::placement::Placement;
use crate::render::RenderTarget;
use crate::window::{Window, WindowEvent};
use rgpt_core::{ConfigError, PlacementConfig};
use rgpt_tag::TagService;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// Unique identifier for a placement on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlacementId(u64);

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placement({})", self.0)
    }
}

/// Page errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("Invalid placement config: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown placement: {0}")]
    UnknownPlacement(PlacementId),
}

/// A page hosting ad placements.
pub struct Page {
    tag: Rc<TagService>,
    window: Rc<Window>,
    placements: BTreeMap<PlacementId, Placement>,
    next_id: u64,
}

impl Page {
    pub fn new(tag: Rc<TagService>, window: Rc<Window>) -> Self {
        Self {
            tag,
            window,
            placements: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn tag(&self) -> &Rc<TagService> {
        &self.tag
    }

    pub fn window(&self) -> &Rc<Window> {
        &self.window
    }

    /// Mount a placement rendering into `target`.
    pub fn mount(
        &mut self,
        config: PlacementConfig,
        target: impl RenderTarget + 'static,
    ) -> Result<PlacementId, PageError> {
        config.validate()?;

        let id = PlacementId(self.next_id);
        self.next_id += 1;

        info!("Mounting {} for {}", id, config.path);
        let placement = Placement::new(config, self.tag.clone(), self.window.clone(), target);
        self.placements.insert(id, placement.clone());
        placement.mount();
        Ok(id)
    }

    /// Apply new props to a placement.
    pub fn update(&mut self, id: PlacementId, config: PlacementConfig) -> Result<Reconciled, PageError> {
        config.validate()?;
        let placement = self.placements.get(&id).ok_or(PageError::UnknownPlacement(id))?;
        let outcome = placement.update(config);
        debug!("Updated {}: {:?}", id, outcome);
        Ok(outcome)
    }

    /// Unmount and forget a placement.
    pub fn unmount(&mut self, id: PlacementId) -> bool {
        let Some(placement) = self.placements.remove(&id) else {
            return false;
        };
        placement.unmount();
        info!("Unmounted {}", id);
        true
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.get(&id)
    }

    pub fn placement_ids(&self) -> Vec<PlacementId> {
        self.placements.keys().copied().collect()
    }

    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Resize the window and let placements react.
    pub fn resize(&self, width: u32) -> usize {
        self.window.resize(width);
        self.process_events()
    }

    /// Broadcast the refresh signal to placements that allow it.
    pub fn refresh_ads(&self) -> usize {
        self.window.dispatch(WindowEvent::RefreshAds);
        self.process_events()
    }

    /// Deliver pending window events to every placement.
    pub fn process_events(&self) -> usize {
        self.placements
            .values()
            .map(Placement::process_events)
            .sum()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        let ids: Vec<_> = self.placements.keys().copied().collect();
        for id in ids {
            self.unmount(id);
        }
    }
}
