//! Shared placement handle.

use crate::controller::{Reconciled, SlotController, SlotState};
use crate::render::RenderTarget;
use crate::window::Window;
use rgpt_core::PlacementConfig;
use rgpt_tag::{Command, TagService};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A mounted ad placement.
///
/// Wraps the [`SlotController`] so the tag library's command queue can call
/// back into it once the library is ready.
#[derive(Clone)]
pub struct Placement {
    inner: Rc<RefCell<SlotController>>,
}

impl Placement {
    /// Create an unmounted placement.
    pub fn new(
        config: PlacementConfig,
        tag: Rc<TagService>,
        window: Rc<Window>,
        target: impl RenderTarget + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SlotController::new(
                config,
                tag,
                window,
                Box::new(target),
            ))),
        }
    }

    /// Bootstrap the library, subscribe to the window and queue the initial
    /// reconcile behind the library's readiness.
    pub fn mount(&self) {
        self.inner.borrow_mut().on_mount();

        let tag = self.inner.borrow().tag().clone();
        let weak = Rc::downgrade(&self.inner);
        tag.push(Command::callback(move || {
            let Some(controller) = weak.upgrade() else {
                debug!("Placement dropped before tag library was ready");
                return;
            };
            controller.borrow_mut().on_ready();
        }));
    }

    /// Apply new props.
    pub fn update(&self, config: PlacementConfig) -> Reconciled {
        self.inner.borrow_mut().on_config_change(config)
    }

    /// Stop listening and drop the slot.
    pub fn unmount(&self) {
        self.inner.borrow_mut().on_unmount();
    }

    /// Refresh the slot if there is one.
    pub fn refresh(&self) -> bool {
        self.inner.borrow_mut().on_external_refresh()
    }

    /// Handle pending window events.
    pub fn process_events(&self) -> usize {
        self.inner.borrow_mut().process_events()
    }

    /// Get the slot state.
    pub fn state(&self) -> SlotState {
        self.inner.borrow().state()
    }

    /// Inspect the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&SlotController) -> R) -> R {
        f(&self.inner.borrow())
    }
}
