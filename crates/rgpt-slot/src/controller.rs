//! Slot controller
//!
//! Owns at most one tag library slot for a placement and keeps it in line
//! with the currently valid dimension set.
//!
//! # State machine
//!
//! ```text
//!            reconcile: dims non-empty, anchor ok
//!   NoSlot ────────────────────────────────────────▶ SlotActive
//!     ▲                                                 │
//!     │  reconcile: dims changed, no size map           │ reconcile: dims changed,
//!     │  teardown / unmount                             │ size map set
//!     └─────────────────────────────────────────────────┤ (refresh in place)
//!                                                       ▼
//!                                                   SlotActive
//! ```

use crate::anchor::AnchorId;
use crate::render::RenderTarget;
use crate::window::{Sequenced, Subscription, Window, WindowEvent, WindowEventKind};
use rgpt_core::{Dimension, PlacementConfig, resolve};
use rgpt_tag::{SlotHandle, TagService};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Whether the controller currently holds a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    NoSlot,
    SlotActive,
}

/// What a call to [`SlotController::reconcile`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Tag library not ready for this placement yet
    NotReady,
    /// Container is not in the document
    Detached,
    /// Same dimensions as last time
    Unchanged,
    /// Nothing to show; no slot remains
    Cleared,
    /// Existing slot refreshed with its size map
    RefreshedInPlace,
    /// New slot defined and displayed
    Created(SlotHandle),
    /// Holder element missing, creation aborted
    AnchorMissing,
    /// Tag library refused the slot definition
    Rejected,
}

#[derive(Debug)]
struct ActiveSlot {
    handle: SlotHandle,
    anchor: AnchorId,
}

/// Per-placement slot lifecycle.
pub struct SlotController {
    config: PlacementConfig,
    tag: Rc<TagService>,
    window: Rc<Window>,
    target: Box<dyn RenderTarget>,
    /// Set once the tag library ran this placement's ready command
    initialized: bool,
    mounted: bool,
    slot: Option<ActiveSlot>,
    /// Last dimension set applied
    current: Option<Vec<Dimension>>,
    subscriptions: Vec<Subscription>,
}

impl SlotController {
    /// Create an unmounted controller.
    pub fn new(
        config: PlacementConfig,
        tag: Rc<TagService>,
        window: Rc<Window>,
        target: Box<dyn RenderTarget>,
    ) -> Self {
        Self {
            config,
            tag,
            window,
            target,
            initialized: false,
            mounted: false,
            slot: None,
            current: None,
            subscriptions: Vec::new(),
        }
    }

    /// Get the current placement config.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Get the shared tag service.
    pub fn tag(&self) -> &Rc<TagService> {
        &self.tag
    }

    /// Get the slot state.
    pub fn state(&self) -> SlotState {
        if self.slot.is_some() {
            SlotState::SlotActive
        } else {
            SlotState::NoSlot
        }
    }

    /// Check if the ready command has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Check if the placement is mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Get the live slot handle.
    pub fn slot(&self) -> Option<SlotHandle> {
        self.slot.as_ref().map(|active| active.handle)
    }

    /// Get the anchor the live slot renders into.
    pub fn anchor(&self) -> Option<&AnchorId> {
        self.slot.as_ref().map(|active| &active.anchor)
    }

    /// Last applied dimension set, if any.
    pub fn current_dimensions(&self) -> Option<&[Dimension]> {
        self.current.as_deref()
    }

    /// Number of window listeners held.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Bootstrap the tag library and start listening to the window.
    ///
    /// The initial reconcile is deferred until [`on_ready`](Self::on_ready).
    pub fn on_mount(&mut self) {
        self.tag.ensure_initialized();
        self.mounted = true;
        self.sync_subscriptions();
    }

    /// The tag library reached this placement's queued ready command.
    pub fn on_ready(&mut self) -> Reconciled {
        if !self.mounted {
            debug!(path = %self.config.path, "Placement unmounted before tag library was ready");
            return Reconciled::NotReady;
        }
        self.initialized = true;
        self.reconcile_current()
    }

    /// New props for the placement.
    pub fn on_config_change(&mut self, config: PlacementConfig) -> Reconciled {
        self.config = config;
        if self.mounted {
            self.sync_subscriptions();
        }
        self.reconcile_current()
    }

    /// The window was resized.
    pub fn on_resize(&mut self) -> Reconciled {
        self.reconcile_current()
    }

    /// Refresh the live slot without recomputing dimensions.
    pub fn on_external_refresh(&mut self) -> bool {
        let Some(handle) = self.slot() else {
            return false;
        };
        match self.tag.with_library(|library| library.refresh(&[handle])) {
            Ok(()) => {
                debug!(path = %self.config.path, "Refreshed {}", handle);
                true
            }
            Err(e) => {
                warn!(path = %self.config.path, "Refresh of {} skipped: {}", handle, e);
                false
            }
        }
    }

    /// Stop listening and drop the slot.
    ///
    /// A later mount starts from scratch: the placement waits for its ready
    /// command again and nothing counts as applied.
    pub fn on_unmount(&mut self) {
        self.mounted = false;
        self.initialized = false;
        for subscription in self.subscriptions.drain(..) {
            self.window.unsubscribe(subscription.id());
        }
        self.teardown();
    }

    /// Handle every window event delivered since the last call, in the
    /// order the window dispatched them.
    pub fn process_events(&mut self) -> usize {
        let mut events: Vec<Sequenced> = self
            .subscriptions
            .iter()
            .flat_map(Subscription::drain_sequenced)
            .collect();
        events.sort_by_key(|delivered| delivered.seq);

        for Sequenced { event, .. } in &events {
            match event {
                WindowEvent::Resize { .. } => {
                    self.on_resize();
                }
                WindowEvent::RefreshAds => {
                    self.on_external_refresh();
                }
            }
        }
        events.len()
    }

    fn reconcile_current(&mut self) -> Reconciled {
        let config = self.config.clone();
        self.reconcile(&config)
    }

    /// Bring the slot in line with the dimensions valid for `config`.
    pub fn reconcile(&mut self, config: &PlacementConfig) -> Reconciled {
        if !self.initialized {
            return Reconciled::NotReady;
        }
        let Some(container_width) = self.target.width() else {
            return Reconciled::Detached;
        };

        let dimensions = resolve(config, container_width, self.window.inner_width());
        if self.current.as_deref() == Some(dimensions.as_slice()) {
            return Reconciled::Unchanged;
        }
        debug!(
            path = %config.path,
            container_width,
            "Dimensions changed: {:?} -> {:?}",
            self.current,
            dimensions
        );
        self.current = Some(dimensions.clone());

        let mut refreshed = false;
        if let Some(handle) = self.slot() {
            if config.has_size_map() {
                if let Err(e) = self.tag.with_library(|library| library.refresh(&[handle])) {
                    warn!(path = %config.path, "Refresh of {} skipped: {}", handle, e);
                }
                refreshed = true;
            } else {
                self.remove_slot();
            }
        }

        if dimensions.is_empty() {
            return if refreshed {
                Reconciled::RefreshedInPlace
            } else {
                Reconciled::Cleared
            };
        }
        if self.slot.is_some() {
            return Reconciled::RefreshedInPlace;
        }

        self.create_slot(config, &dimensions)
    }

    fn create_slot(&mut self, config: &PlacementConfig, dimensions: &[Dimension]) -> Reconciled {
        let anchor = AnchorId::next();
        if let Err(e) = self.target.set_content(&anchor.markup()) {
            warn!(path = %config.path, "Slot not created: {}", e);
            self.current = None;
            return Reconciled::AnchorMissing;
        }

        let element_id = anchor.element_id();
        let targeting = self.tag.options().targeting.merged(&config.targeting);
        let created = self.tag.with_library(|library| {
            let handle = library.define_slot(&config.path, dimensions, &element_id)?;
            library.add_service(handle);
            if let Some(size_map) = &config.size_map {
                library.define_size_mapping(handle, size_map);
            }
            for (key, value) in targeting.iter() {
                library.set_targeting(handle, key, value);
            }
            library.display(&element_id);
            library.refresh(&[handle]);
            Some(handle)
        });

        match created {
            Ok(Some(handle)) => {
                info!(path = %config.path, "Created {} in #{} with {} sizes", handle, element_id, dimensions.len());
                self.slot = Some(ActiveSlot { handle, anchor });
                Reconciled::Created(handle)
            }
            Ok(None) => {
                warn!(path = %config.path, "Tag library rejected slot for #{}", element_id);
                self.target.clear();
                self.current = None;
                Reconciled::Rejected
            }
            Err(e) => {
                warn!(path = %config.path, "Slot not created: {}", e);
                self.target.clear();
                self.current = None;
                Reconciled::NotReady
            }
        }
    }

    /// Clear the slot and its anchor and forget the applied dimensions, so
    /// the next reconcile builds a fresh slot. Returns false without a slot.
    pub fn teardown(&mut self) -> bool {
        self.current = None;
        self.remove_slot()
    }

    /// Clear the slot and its anchor. No-op without a slot.
    fn remove_slot(&mut self) -> bool {
        let Some(active) = self.slot.take() else {
            return false;
        };
        if let Err(e) = self.tag.with_library(|library| library.clear(&[active.handle])) {
            warn!(path = %self.config.path, "Clear of {} skipped: {}", active.handle, e);
        }
        self.target.clear();
        debug!(path = %self.config.path, "Removed {} from #{}", active.handle, active.anchor);
        true
    }

    /// Keep window listeners in line with the `responsive` and
    /// `allow_refresh` flags.
    fn sync_subscriptions(&mut self) {
        let wanted = [
            (WindowEventKind::Resize, self.config.responsive),
            (WindowEventKind::RefreshAds, self.config.allow_refresh),
        ];

        for (kind, enabled) in wanted {
            let position = self.subscriptions.iter().position(|s| s.kind() == kind);
            match (position, enabled) {
                (None, true) => self.subscriptions.push(self.window.subscribe(kind)),
                (Some(index), false) => {
                    let subscription = self.subscriptions.remove(index);
                    self.window.unsubscribe(subscription.id());
                }
                _ => {}
            }
        }
    }
}

impl Drop for SlotController {
    fn drop(&mut self) {
        if self.mounted || self.slot.is_some() {
            self.on_unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HolderNode;
    use pretty_assertions::assert_eq;
    use rgpt_core::{Format, SizeMapping};
    use rgpt_tag::{RecordingLibrary, RecordingLoader, TagCall, TagOptions};

    struct Fixture {
        tag: Rc<TagService>,
        window: Rc<Window>,
        node: HolderNode,
        library: RecordingLibrary,
    }

    impl Fixture {
        fn new(container_width: u32, window_width: u32) -> Self {
            let library = RecordingLibrary::new();
            let tag = Rc::new(TagService::new(
                library.clone(),
                RecordingLoader::new(),
                TagOptions::default(),
            ));
            tag.ensure_initialized();
            tag.library_loaded();
            library.clear_calls();

            Self {
                tag,
                window: Rc::new(Window::new(window_width)),
                node: HolderNode::new(container_width),
                library,
            }
        }

        fn ready_controller(&self, config: PlacementConfig) -> SlotController {
            let mut controller = SlotController::new(
                config,
                self.tag.clone(),
                self.window.clone(),
                Box::new(self.node.clone()),
            );
            controller.on_mount();
            controller
        }

        fn defines(&self) -> usize {
            self.library.count(|call| matches!(call, TagCall::DefineSlot { .. }))
        }

        fn clears(&self) -> usize {
            self.library.count(|call| matches!(call, TagCall::Clear { .. }))
        }

        fn refreshes(&self) -> usize {
            self.library.count(|call| matches!(call, TagCall::Refresh { .. }))
        }

        fn targeting_calls(&self) -> usize {
            self.library.count(|call| matches!(call, TagCall::SetTargeting { .. }))
        }
    }

    fn dims(pairs: &[[u32; 2]]) -> Vec<Dimension> {
        pairs.iter().copied().map(Dimension::from).collect()
    }

    #[test]
    fn test_reconcile_before_ready_is_noop() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));

        assert_eq!(controller.reconcile(&PlacementConfig::new("/1/a")), Reconciled::NotReady);
        assert_eq!(controller.state(), SlotState::NoSlot);
        assert_eq!(fx.defines(), 0);
    }

    #[test]
    fn test_create_on_ready() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/home").with_targeting("section", "news");
        let mut controller = fx.ready_controller(config);

        let outcome = controller.on_ready();

        assert!(matches!(outcome, Reconciled::Created(_)));
        assert_eq!(controller.state(), SlotState::SlotActive);
        assert_eq!(controller.current_dimensions(), Some(Format::Horizontal.dimensions()));

        let anchor = controller.anchor().unwrap().clone();
        assert_eq!(fx.node.content(), anchor.markup());

        let slot = controller.slot().unwrap().id();
        let element_id = anchor.element_id();
        assert_eq!(
            fx.library.calls(),
            vec![
                TagCall::DefineSlot {
                    slot,
                    path: "/1/home".to_string(),
                    dimensions: Format::Horizontal.dimensions().to_vec(),
                    element_id: element_id.clone(),
                },
                TagCall::AddService { slot },
                TagCall::SetTargeting {
                    slot,
                    key: "section".to_string(),
                    value: "news".to_string(),
                },
                TagCall::Display { element_id },
                TagCall::Refresh { slots: vec![slot] },
            ]
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a");
        let mut controller = fx.ready_controller(config.clone());
        controller.on_ready();
        let calls = fx.library.calls().len();

        assert_eq!(controller.reconcile(&config), Reconciled::Unchanged);
        assert_eq!(controller.on_resize(), Reconciled::Unchanged);
        assert_eq!(fx.library.calls().len(), calls);
        assert_eq!(fx.defines(), 1);
    }

    #[test]
    fn test_empty_dimensions_render_nothing() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a").with_format(Format::Unknown);
        let mut controller = fx.ready_controller(config);

        assert_eq!(controller.on_ready(), Reconciled::Cleared);
        assert_eq!(controller.state(), SlotState::NoSlot);
        assert!(fx.node.content().is_empty());
        assert_eq!(fx.defines(), 0);
    }

    #[test]
    fn test_window_gate_tears_down() {
        let fx = Fixture::new(1000, 700);
        let config = PlacementConfig::new("/1/a").with_min_window_width(800);
        let mut controller = fx.ready_controller(config);
        assert!(matches!(controller.on_ready(), Reconciled::Created(_)));

        fx.window.resize(1000);
        assert_eq!(controller.on_resize(), Reconciled::Cleared);
        assert_eq!(controller.state(), SlotState::NoSlot);
        assert_eq!(controller.current_dimensions(), Some(&[] as &[Dimension]));
        assert!(fx.node.content().is_empty());
        assert_eq!(fx.clears(), 1);
    }

    #[test]
    fn test_dimension_change_recreates_without_size_map() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a").with_targeting("pos", "top");
        let mut controller = fx.ready_controller(config);
        controller.on_ready();
        let first = controller.slot().unwrap();
        let first_anchor = controller.anchor().unwrap().clone();

        fx.node.set_width(500);
        let outcome = controller.on_resize();

        let second = controller.slot().unwrap();
        assert_eq!(outcome, Reconciled::Created(second));
        assert_ne!(first, second);
        assert_ne!(controller.anchor(), Some(&first_anchor));
        assert_eq!(controller.current_dimensions(), Some(dims(&[[468, 60], [234, 60]]).as_slice()));
        assert_eq!(fx.library.live_slots(), vec![second]);
        assert_eq!(fx.clears(), 1);
        assert_eq!(fx.defines(), 2);
        assert_eq!(fx.targeting_calls(), 2);
        assert!(fx.library.calls().contains(&TagCall::DefineSlot {
            slot: second.id(),
            path: "/1/a".to_string(),
            dimensions: dims(&[[468, 60], [234, 60]]),
            element_id: controller.anchor().unwrap().element_id(),
        }));
    }

    #[test]
    fn test_dimension_change_refreshes_in_place_with_size_map() {
        let fx = Fixture::new(1000, 1200);
        let size_map = SizeMapping::new()
            .with_entry(Dimension::new(1024, 768), vec![Dimension::new(970, 90)])
            .with_entry(Dimension::new(0, 0), vec![Dimension::new(320, 50)]);
        let config = PlacementConfig::new("/1/a")
            .with_size_map(size_map.clone())
            .with_targeting("pos", "top");
        let mut controller = fx.ready_controller(config);
        controller.on_ready();
        let slot = controller.slot().unwrap();
        assert!(fx.library.calls().contains(&TagCall::DefineSizeMapping {
            slot: slot.id(),
            mapping: size_map,
        }));

        fx.node.set_width(500);
        assert_eq!(controller.on_resize(), Reconciled::RefreshedInPlace);

        assert_eq!(controller.slot(), Some(slot));
        assert_eq!(fx.clears(), 0);
        assert_eq!(fx.defines(), 1);
        assert_eq!(fx.targeting_calls(), 1);
        assert_eq!(fx.refreshes(), 2);
    }

    #[test]
    fn test_size_map_slot_survives_empty_dimensions() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a")
            .with_size_map(SizeMapping::new().with_entry(Dimension::new(0, 0), vec![]));
        let mut controller = fx.ready_controller(config);
        controller.on_ready();

        fx.node.set_width(100);
        assert_eq!(controller.on_resize(), Reconciled::RefreshedInPlace);
        assert_eq!(controller.state(), SlotState::SlotActive);
    }

    #[test]
    fn test_missing_anchor_aborts_and_retries() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        fx.node.set_holder_available(false);

        assert_eq!(controller.on_ready(), Reconciled::AnchorMissing);
        assert_eq!(controller.state(), SlotState::NoSlot);
        assert_eq!(fx.defines(), 0);

        fx.node.set_holder_available(true);
        assert!(matches!(controller.on_resize(), Reconciled::Created(_)));
    }

    #[test]
    fn test_detached_container_skips() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        fx.node.detach();

        assert_eq!(controller.on_ready(), Reconciled::Detached);
        assert!(controller.current_dimensions().is_none());
    }

    /// Library that refuses every slot definition.
    struct RejectingLibrary;

    impl rgpt_tag::TagLibrary for RejectingLibrary {
        fn define_slot(&mut self, _: &str, _: &[Dimension], _: &str) -> Option<SlotHandle> {
            None
        }
        fn add_service(&mut self, _: SlotHandle) {}
        fn define_size_mapping(&mut self, _: SlotHandle, _: &SizeMapping) {}
        fn set_targeting(&mut self, _: SlotHandle, _: &str, _: &str) {}
        fn display(&mut self, _: &str) {}
        fn refresh(&mut self, _: &[SlotHandle]) {}
        fn clear(&mut self, _: &[SlotHandle]) {}
        fn enable_async_rendering(&mut self) {}
        fn collapse_empty_divs(&mut self) {}
        fn disable_initial_load(&mut self) {}
        fn enable_services(&mut self) {}
        fn set_page_url(&mut self, _: &url::Url) {}
    }

    #[test]
    fn test_rejected_definition_clears_anchor() {
        let tag = Rc::new(TagService::new(
            RejectingLibrary,
            RecordingLoader::new(),
            TagOptions::default(),
        ));
        tag.ensure_initialized();
        tag.library_loaded();
        let node = HolderNode::new(1000);

        let mut controller = SlotController::new(
            PlacementConfig::new("/1/a"),
            tag,
            Rc::new(Window::new(1200)),
            Box::new(node.clone()),
        );
        controller.on_mount();

        assert_eq!(controller.on_ready(), Reconciled::Rejected);
        assert_eq!(controller.state(), SlotState::NoSlot);
        assert!(controller.current_dimensions().is_none());
        assert!(node.content().is_empty());
    }

    #[test]
    fn test_external_refresh() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a").with_allow_refresh(true));
        assert!(!controller.on_external_refresh());

        controller.on_ready();
        let before = fx.refreshes();
        assert!(controller.on_external_refresh());
        assert_eq!(fx.refreshes(), before + 1);
        assert_eq!(fx.defines(), 1);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();

        assert!(controller.teardown());
        assert!(!controller.teardown());
        assert_eq!(fx.clears(), 1);
        assert!(fx.library.live_slots().is_empty());
    }

    #[test]
    fn test_reconcile_after_teardown_recreates() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();

        assert!(controller.teardown());
        assert!(controller.current_dimensions().is_none());
        assert!(matches!(controller.on_resize(), Reconciled::Created(_)));
        assert_eq!(controller.state(), SlotState::SlotActive);
        assert_eq!(fx.defines(), 2);
    }

    #[test]
    fn test_remount_after_unmount_recreates() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();
        controller.on_unmount();

        assert!(!controller.is_initialized());
        assert!(controller.current_dimensions().is_none());

        controller.on_mount();
        assert!(matches!(controller.on_ready(), Reconciled::Created(_)));
        assert_eq!(controller.state(), SlotState::SlotActive);
        assert!(!fx.node.content().is_empty());
        assert_eq!(fx.library.live_slots().len(), 1);
    }

    #[test]
    fn test_unmount_detaches_everything() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a").with_allow_refresh(true);
        let mut controller = fx.ready_controller(config);
        controller.on_ready();
        assert_eq!(fx.window.listener_count(), 2);

        controller.on_unmount();

        assert_eq!(controller.state(), SlotState::NoSlot);
        assert_eq!(controller.subscription_count(), 0);
        assert_eq!(fx.window.listener_count(), 0);
        assert!(fx.node.content().is_empty());
    }

    #[test]
    fn test_unmount_before_ready_skips_initial_reconcile() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_unmount();

        assert_eq!(controller.on_ready(), Reconciled::NotReady);
        assert_eq!(fx.defines(), 0);
    }

    #[test]
    fn test_config_change_resyncs_subscriptions() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();
        assert_eq!(fx.window.listener_count_for(WindowEventKind::Resize), 1);
        assert_eq!(fx.window.listener_count_for(WindowEventKind::RefreshAds), 0);

        let config = PlacementConfig::new("/1/a")
            .with_responsive(false)
            .with_allow_refresh(true);
        assert_eq!(controller.on_config_change(config), Reconciled::Unchanged);

        assert_eq!(fx.window.listener_count_for(WindowEventKind::Resize), 0);
        assert_eq!(fx.window.listener_count_for(WindowEventKind::RefreshAds), 1);
    }

    #[test]
    fn test_config_change_with_new_dimensions() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();

        let config = PlacementConfig::new("/1/a").with_dimensions([[300, 600]]);
        assert!(matches!(controller.on_config_change(config), Reconciled::Created(_)));
        assert_eq!(controller.current_dimensions(), Some(dims(&[[300, 600], [160, 600]]).as_slice()));
    }

    #[test]
    fn test_process_events() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a").with_allow_refresh(true);
        let mut controller = fx.ready_controller(config);
        controller.on_ready();

        fx.node.set_width(300);
        fx.window.resize(900);
        fx.window.dispatch(WindowEvent::RefreshAds);

        assert_eq!(controller.process_events(), 2);
        assert_eq!(controller.current_dimensions(), Some(dims(&[[234, 60]]).as_slice()));
        assert_eq!(fx.defines(), 2);
    }

    #[test]
    fn test_events_handled_in_dispatch_order() {
        let fx = Fixture::new(1000, 1200);
        let config = PlacementConfig::new("/1/a").with_allow_refresh(true);
        let mut controller = fx.ready_controller(config);
        controller.on_ready();
        let old = controller.slot().unwrap().id();
        fx.library.clear_calls();

        fx.window.dispatch(WindowEvent::RefreshAds);
        fx.node.set_width(500);
        fx.window.resize(1100);

        assert_eq!(controller.process_events(), 2);
        let new = controller.slot().unwrap().id();
        assert_ne!(old, new);

        let calls = fx.library.calls();
        assert_eq!(calls[0], TagCall::Refresh { slots: vec![old] });
        assert_eq!(calls[1], TagCall::Clear { slots: vec![old] });
        assert!(matches!(calls[2], TagCall::DefineSlot { slot, .. } if slot == new));
        assert_eq!(calls.last(), Some(&TagCall::Refresh { slots: vec![new] }));
        assert_eq!(fx.refreshes(), 2);
    }

    #[test]
    fn test_page_targeting_merged_under_placement() {
        let library = RecordingLibrary::new();
        let mut options = TagOptions::default();
        options.targeting.insert("site", "example");
        options.targeting.insert("pos", "default");
        let tag = Rc::new(TagService::new(library.clone(), RecordingLoader::new(), options));
        tag.ensure_initialized();
        tag.library_loaded();

        let mut controller = SlotController::new(
            PlacementConfig::new("/1/a").with_targeting("pos", "top"),
            tag,
            Rc::new(Window::new(1200)),
            Box::new(HolderNode::new(1000)),
        );
        controller.on_mount();
        controller.on_ready();

        let targeting: Vec<(String, String)> = library
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                TagCall::SetTargeting { key, value, .. } => Some((key, value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            targeting,
            vec![
                ("pos".to_string(), "top".to_string()),
                ("site".to_string(), "example".to_string()),
            ]
        );
    }

    #[test]
    fn test_drop_clears_slot() {
        let fx = Fixture::new(1000, 1200);
        let mut controller = fx.ready_controller(PlacementConfig::new("/1/a"));
        controller.on_ready();

        drop(controller);

        assert!(fx.library.live_slots().is_empty());
        assert_eq!(fx.window.listener_count(), 0);
    }
}
